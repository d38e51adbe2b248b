// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;

const MAX_LEAF_SIZE: usize = 4;

struct BvhNode {
    bounds: AABB,
    left: i32,
    right: i32,
    start: u32,
    count: u32,
}

impl BvhNode {
    fn leaf(bounds: AABB, start: usize, count: usize) -> Self {
        Self { bounds, left: -1, right: -1,
               start: start as u32, count: count as u32 }
    }

    fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

// Equal-count median split over primitive bounds. Intersection is
// delegated through a callback so the tree never sees primitive types.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    indices: Vec<u32>,
}

impl Bvh {
    pub fn build(prim_bounds: &[AABB]) -> Self {
        let mut bvh = Self {
            nodes: Vec::new(),
            indices: (0..prim_bounds.len() as u32).collect(),
        };

        if !bvh.indices.is_empty() {
            build_node(prim_bounds, &mut bvh.nodes, &mut bvh.indices, 0);
        }
        bvh
    }

    // Closest hit reported by the callback, as (primitive index, payload).
    pub fn ray_intersection<T, F>(&self, ray: &Ray3f, mut hit_fn: F)
        -> Option<(usize, T)>
    where
        F: FnMut(usize, &Ray3f) -> Option<(Float, T)>,
    {
        if self.nodes.is_empty() {
            return None;
        }

        let mut closest: Option<(usize, T)> = None;
        let mut closest_t = std::f32::MAX;
        let mut stack = vec![0usize];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if !node.bounds.ray_intersect(ray) {
                continue;
            }

            if node.is_leaf() {
                for i in 0..node.count as usize {
                    let prim_idx = self.indices[node.start as usize + i] as usize;
                    if let Some((t, payload)) = hit_fn(prim_idx, ray) {
                        if t < closest_t {
                            closest_t = t;
                            closest = Some((prim_idx, payload));
                        }
                    }
                }
            } else {
                if node.left >= 0 {
                    stack.push(node.left as usize);
                }
                if node.right >= 0 {
                    stack.push(node.right as usize);
                }
            }
        }

        closest
    }
}

fn build_node(prim_bounds: &[AABB], nodes: &mut Vec<BvhNode>,
              indices: &mut [u32], start: usize) -> i32 {
    let mut bounds = AABB::default();
    let mut centroid_bounds = AABB::default();
    for &idx in indices.iter() {
        bounds.expand_by_aabb(&prim_bounds[idx as usize]);
        centroid_bounds.expand_by_point(&prim_bounds[idx as usize].center());
    }

    let count = indices.len();
    if count <= MAX_LEAF_SIZE {
        let node_idx = nodes.len();
        nodes.push(BvhNode::leaf(bounds, start, count));
        return node_idx as i32;
    }

    let axis = centroid_bounds.max_extent() as usize;
    let mid = count / 2;
    indices.select_nth_unstable_by(mid, |&a, &b| {
        prim_bounds[a as usize].center()[axis]
            .total_cmp(&prim_bounds[b as usize].center()[axis])
            .then(a.cmp(&b))
    });

    let node_idx = nodes.len();
    nodes.push(BvhNode { bounds, left: -1, right: -1, start: 0, count: 0 });

    let (lower, upper) = indices.split_at_mut(mid);
    let left = build_node(prim_bounds, nodes, lower, start);
    let right = build_node(prim_bounds, nodes, upper, start + mid);
    nodes[node_idx].left = left;
    nodes[node_idx].right = right;

    node_idx as i32
}
