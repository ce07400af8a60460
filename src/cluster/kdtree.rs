//! Two-dimensional K-D tree over projected marker positions
//!
//! Points are separated from nodes. Nodes hold only indices into the point
//! list, so query results can be mapped straight back to input order.

use super::point::{PixelList, PixelPoint};
use std::cmp::Ordering;

/// K-D tree for pixel-space range queries
pub struct PixelTree {
    /// All points in the tree
    pub points: PixelList,
    root: Option<Box<Node>>,
}

struct Node {
    point_id: usize,
    /// Indices of points identical to this node's point
    equal_ids: Vec<usize>,
    split: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl PixelTree {
    /// Builds a balanced tree from the given points
    ///
    /// Points must have finite coordinates.
    pub fn new(points: PixelList) -> Self {
        let root = if points.is_empty() {
            None
        } else {
            build_tree(0, &pre_sort(&points), &points)
        };
        PixelTree { points, root }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns indices of all points within `radius` of `pt` (inclusive)
    ///
    /// Results come back in tree order; callers that care about input order
    /// must sort them. `out` is cleared and reused to avoid reallocating.
    pub fn within(&self, pt: &PixelPoint, radius: f64, out: &mut Vec<usize>) {
        out.clear();
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        self.within_recursive(self.root.as_deref(), pt, radius * radius, out);
    }

    fn within_recursive(
        &self,
        t: Option<&Node>,
        pt: &PixelPoint,
        r2: f64,
        out: &mut Vec<usize>,
    ) {
        let Some(t) = t else {
            return;
        };

        let node_pt = &self.points[t.point_id];
        let diff = pt.0[t.split] - node_pt.0[t.split];

        let (this_side, other_side) = if diff < 0.0 {
            (t.left.as_deref(), t.right.as_deref())
        } else {
            (t.right.as_deref(), t.left.as_deref())
        };

        self.within_recursive(this_side, pt, r2, out);
        if diff * diff <= r2 {
            if node_pt.sq_dist(pt) <= r2 {
                out.push(t.point_id);
                out.extend_from_slice(&t.equal_ids);
            }
            self.within_recursive(other_side, pt, r2, out);
        }
    }

    /// Returns the height of the tree
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.height())
    }
}

impl Node {
    fn height(&self) -> usize {
        let lh = self.left.as_ref().map_or(0, |l| l.height());
        let rh = self.right.as_ref().map_or(0, |r| r.height());
        lh.max(rh) + 1
    }
}

/// Simple O(N) equivalent of [`PixelTree::within`], returned in input order
pub fn scan_within(points: &[PixelPoint], pt: &PixelPoint, radius: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.sq_dist(pt) <= radius * radius)
        .map(|(i, _)| i)
        .collect()
}

fn build_tree(depth: usize, nodes: &PreSorted, points: &PixelList) -> Option<Box<Node>> {
    let split = depth % 2;
    match nodes.cur[split].len() {
        0 => None,
        1 => Some(Box::new(Node {
            point_id: nodes.cur[split][0],
            equal_ids: Vec::new(),
            split,
            left: None,
            right: None,
        })),
        _ => {
            let (med, equal, left, right) = nodes.split_med(split, points);
            Some(Box::new(Node {
                point_id: med,
                equal_ids: equal,
                split,
                left: build_tree(depth + 1, &left, points),
                right: build_tree(depth + 1, &right, points),
            }))
        }
    }
}

/// Point ids sorted on each axis
struct PreSorted {
    cur: [Vec<usize>; 2],
}

fn axis_cmp(points: &PixelList, axis: usize, a: usize, b: usize) -> Ordering {
    points[a].0[axis]
        .partial_cmp(&points[b].0[axis])
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            points[a].0[1 - axis]
                .partial_cmp(&points[b].0[1 - axis])
                .unwrap_or(Ordering::Equal)
        })
}

fn pre_sort(points: &PixelList) -> PreSorted {
    let mut cur = [Vec::new(), Vec::new()];
    for (axis, ids) in cur.iter_mut().enumerate() {
        *ids = (0..points.len()).collect();
        ids.sort_by(|&a, &b| axis_cmp(points, axis, a, b));
    }
    PreSorted { cur }
}

impl PreSorted {
    /// Picks the median on `dim`, collects ids identical to it, and splits the
    /// rest into ids below and at-or-above the pivot (still sorted per axis).
    fn split_med(
        &self,
        dim: usize,
        points: &PixelList,
    ) -> (usize, Vec<usize>, PreSorted, PreSorted) {
        let ids = &self.cur[dim];
        let mut m = ids.len() / 2;
        while m > 0 && points[ids[m - 1]].0[dim] == points[ids[m]].0[dim] {
            m -= 1;
        }
        let mut mh = m;
        while mh < ids.len() - 1 && points[ids[mh + 1]] == points[ids[m]] {
            mh += 1;
        }

        let med = ids[m];
        let equal = ids[m + 1..=mh].to_vec();
        let pivot = points[med].0[dim];

        let mut left = PreSorted {
            cur: [Vec::new(), Vec::new()],
        };
        let mut right = PreSorted {
            cur: [Vec::new(), Vec::new()],
        };
        left.cur[dim] = ids[..m].to_vec();
        right.cur[dim] = ids[mh + 1..].to_vec();

        let other = 1 - dim;
        for &n in &self.cur[other] {
            if n == med || equal.contains(&n) {
                continue;
            }
            if points[n].0[dim] < pivot {
                left.cur[other].push(n);
            } else {
                right.cur[other].push(n);
            }
        }

        (med, equal, left, right)
    }
}
