// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct KdNode {
    axis: usize,
    point: u32,
    left: i32,
    right: i32,
}

// Balanced k-d tree over 3-D points, split at the median along the axis
// of largest extent of the current subset. Tie-breaks order equal
// coordinates by point index so the layout is deterministic.
pub struct KdTree {
    nodes: Vec<KdNode>,
    points: Vec<Vector3f>,
    root: i32,
}

// Max-heap entry for the bounded k-NN queue, keyed by squared distance.
struct HeapEntry {
    dist2: Float,
    index: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist2.total_cmp(&other.dist2)
            .then(self.index.cmp(&other.index))
    }
}

impl KdTree {
    pub fn build(points: &[Vector3f]) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(points.len()),
            points: points.to_vec(),
            root: -1,
        };

        let mut indices: Vec<u32> = (0..points.len() as u32).collect();
        tree.root = build_subtree(&tree.points, &mut indices, &mut tree.nodes);
        tree
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    // Returns the indices of the k nearest points and the squared distance
    // to the farthest of them. Fewer than k points in the tree means all of
    // them come back; an empty tree yields an empty result with radius 0.
    pub fn knn(&self, query: &Vector3f, k: usize) -> (Vec<usize>, Float) {
        if k == 0 || self.root < 0 {
            return (Vec::new(), 0.0);
        }

        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(k + 1);
        self.search(self.root, query, k, &mut heap);

        let max_dist2 = heap.peek().map_or(0.0, |worst| worst.dist2);
        let indices = heap.into_iter().map(|entry| entry.index).collect();
        (indices, max_dist2)
    }

    fn search(&self, node_idx: i32, query: &Vector3f, k: usize,
              heap: &mut BinaryHeap<HeapEntry>) {
        if node_idx < 0 {
            return;
        }

        let node = &self.nodes[node_idx as usize];
        let point = self.points[node.point as usize];
        let dist2 = (point - query).norm_squared();
        heap.push(HeapEntry { dist2, index: node.point as usize });
        if heap.len() > k {
            heap.pop();
        }

        let delta = query[node.axis] - point[node.axis];
        let (near, far) = if delta < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.search(near, query, k, heap);

        // The far child can only improve the result when the splitting
        // plane is closer than the current worst candidate.
        let visit_far = heap.len() < k
            || heap.peek().map_or(true, |worst| delta * delta < worst.dist2);
        if visit_far {
            self.search(far, query, k, heap);
        }
    }
}

fn build_subtree(points: &[Vector3f], indices: &mut [u32],
                 nodes: &mut Vec<KdNode>) -> i32 {
    if indices.is_empty() {
        return -1;
    }

    let mut bounds = AABB::default();
    for &idx in indices.iter() {
        bounds.expand_by_point(&points[idx as usize]);
    }
    let axis = bounds.max_extent() as usize;

    let mid = indices.len() / 2;
    indices.select_nth_unstable_by(mid, |&a, &b| {
        points[a as usize][axis].total_cmp(&points[b as usize][axis])
            .then(a.cmp(&b))
    });

    let point = indices[mid];
    let node_idx = nodes.len();
    nodes.push(KdNode { axis, point, left: -1, right: -1 });

    let (lower, rest) = indices.split_at_mut(mid);
    let left = build_subtree(points, lower, nodes);
    let right = build_subtree(points, &mut rest[1..], nodes);
    nodes[node_idx].left = left;
    nodes[node_idx].right = right;

    node_idx as i32
}
