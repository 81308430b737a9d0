//! Photon map: a balanced k-d tree over photon positions.
//!
//! The tree is implicit. Photons are reordered in place so that the median
//! of every sub-range is its node, split on the longest axis of the range's
//! bounds; only the split axis is stored per node. The map is built once per
//! pass and dropped before the next one.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use prism_math::{Aabb, Vec3};

use crate::photon::Photon;

/// Read-only spatial index over one pass of photons.
pub struct PhotonMap {
    photons: Vec<Photon>,
    /// Split axis of the node stored at each index
    axes: Vec<u8>,
}

/// Result of a k-nearest query.
#[derive(Debug)]
pub struct Nearest<'a> {
    /// Photons ordered from nearest to farthest
    pub photons: Vec<&'a Photon>,
    /// Distance to the farthest returned photon (0 when empty)
    pub max_distance: f32,
}

impl PhotonMap {
    /// Build a balanced tree, taking ownership of the photons.
    pub fn build(mut photons: Vec<Photon>) -> Self {
        let mut axes = vec![0u8; photons.len()];
        balance(&mut photons, &mut axes);
        Self { photons, axes }
    }

    pub fn len(&self) -> usize {
        self.photons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    pub fn photons(&self) -> &[Photon] {
        &self.photons
    }

    /// All photons within `radius` of `point`, in no particular order.
    pub fn within_radius(&self, point: Vec3, radius: f32) -> Vec<&Photon> {
        let mut out = Vec::new();
        if radius >= 0.0 {
            self.collect_within(0, self.photons.len(), point, radius * radius, &mut out);
        }
        out
    }

    fn collect_within<'a>(&'a self, lo: usize, hi: usize, point: Vec3, r2: f32, out: &mut Vec<&'a Photon>) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let photon = &self.photons[mid];
        if photon.position.distance_squared(point) <= r2 {
            out.push(photon);
        }

        let axis = self.axes[mid] as usize;
        let delta = point[axis] - photon.position[axis];
        let (near, far) = if delta < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };

        self.collect_within(near.0, near.1, point, r2, out);
        if delta * delta <= r2 {
            self.collect_within(far.0, far.1, point, r2, out);
        }
    }

    /// The `k` photons closest to `point`.
    pub fn nearest(&self, point: Vec3, k: usize) -> Nearest<'_> {
        let mut heap = BinaryHeap::with_capacity(k + 1);
        if k > 0 {
            self.collect_nearest(0, self.photons.len(), point, k, &mut heap);
        }

        let candidates = heap.into_sorted_vec();
        let max_distance = candidates.last().map_or(0.0, |c| c.distance_squared.sqrt());
        Nearest {
            photons: candidates.iter().map(|c| &self.photons[c.index]).collect(),
            max_distance,
        }
    }

    fn collect_nearest(&self, lo: usize, hi: usize, point: Vec3, k: usize, heap: &mut BinaryHeap<Candidate>) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let photon = &self.photons[mid];

        let d2 = photon.position.distance_squared(point);
        if heap.len() < k {
            heap.push(Candidate::new(d2, mid));
        } else if heap.peek().is_some_and(|worst| d2 < worst.distance_squared) {
            heap.pop();
            heap.push(Candidate::new(d2, mid));
        }

        let axis = self.axes[mid] as usize;
        let delta = point[axis] - photon.position[axis];
        let (near, far) = if delta < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };

        self.collect_nearest(near.0, near.1, point, k, heap);
        let worst = heap.peek().map_or(f32::INFINITY, |c| c.distance_squared);
        if heap.len() < k || delta * delta < worst {
            self.collect_nearest(far.0, far.1, point, k, heap);
        }
    }
}

/// Reorder `photons` into implicit k-d tree order.
fn balance(photons: &mut [Photon], axes: &mut [u8]) {
    if photons.len() <= 1 {
        return;
    }

    let bounds = Aabb::enclosing(photons.iter().map(|p| &p.position));
    let axis = bounds.longest_axis();

    let mid = photons.len() / 2;
    photons.select_nth_unstable_by(mid, |a, b| a.position[axis].total_cmp(&b.position[axis]));
    axes[mid] = axis as u8;

    let (left, rest) = photons.split_at_mut(mid);
    let (left_axes, rest_axes) = axes.split_at_mut(mid);
    balance(left, left_axes);
    balance(&mut rest[1..], &mut rest_axes[1..]);
}

/// Max-heap entry ordered by distance.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance_squared: f32,
    index: usize,
}

impl Candidate {
    fn new(distance_squared: f32, index: usize) -> Self {
        Self {
            distance_squared,
            index,
        }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_squared
            .total_cmp(&other.distance_squared)
            .then(self.index.cmp(&other.index))
    }
}
