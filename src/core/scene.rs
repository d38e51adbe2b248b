// Copyright @yucwang 2026

use crate::core::bvh::Bvh;
use crate::core::interaction::IntersectInfo;
use crate::core::sampler::UniformSampler;
use crate::emitters::area::AreaLight;
use crate::materials::Material;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::shapes::triangle::Triangle;
use std::sync::Arc;

pub struct Primitive {
    pub triangle: Triangle,
    pub material: Arc<Material>,
    pub light_index: Option<usize>,
}

pub struct Scene {
    primitives: Vec<Primitive>,
    lights: Vec<AreaLight>,
    bvh: Option<Bvh>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self { primitives: Vec::new(), lights: Vec::new(), bvh: None }
    }

    // Emissive primitives register a matching area light and remember its
    // index so emitter hits can be resolved during the camera pass.
    pub fn add_primitive(&mut self, triangle: Triangle,
                         material: Arc<Material>,
                         emission: Option<Vector3f>) {
        let light_index = emission.map(|radiance| {
            self.lights.push(AreaLight::new(triangle, radiance));
            self.lights.len() - 1
        });
        self.primitives.push(Primitive { triangle, material, light_index });
    }

    pub fn build(&mut self) {
        let bounds: Vec<AABB> = self.primitives.iter()
            .map(|prim| prim.triangle.bounding_box())
            .collect();
        self.bvh = Some(Bvh::build(&bounds));
        log::info!("Scene built: {} primitives, {} lights.",
                   self.primitives.len(), self.lights.len());
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn primitive(&self, index: usize) -> &Primitive {
        &self.primitives[index]
    }

    pub fn lights(&self) -> &[AreaLight] {
        &self.lights
    }

    pub fn light(&self, index: usize) -> &AreaLight {
        &self.lights[index]
    }

    pub fn intersect(&self, ray: &Ray3f) -> Option<IntersectInfo> {
        let hit = match &self.bvh {
            Some(bvh) => bvh.ray_intersection(ray, |prim_idx, ray| {
                self.primitives[prim_idx].triangle.ray_intersection(ray)
                    .map(|(t, surface)| (t, (t, surface)))
            }),
            None => {
                // Unbuilt scenes fall back to a linear scan; tests use it.
                let mut closest: Option<(usize, (Float, _))> = None;
                let mut closest_t = std::f32::MAX;
                for (idx, prim) in self.primitives.iter().enumerate() {
                    if let Some((t, surface)) =
                        prim.triangle.ray_intersection(ray) {
                        if t < closest_t {
                            closest_t = t;
                            closest = Some((idx, (t, surface)));
                        }
                    }
                }
                closest
            }
        };

        hit.map(|(prim_idx, (t, surface))|
            IntersectInfo::new(surface, t, prim_idx))
    }

    // Uniform choice over the light set with its discrete probability.
    // Callers must handle the empty-light-set case.
    pub fn sample_light(&self, sampler: &mut UniformSampler)
        -> Option<(&AreaLight, Float)> {
        if self.lights.is_empty() {
            return None;
        }

        let count = self.lights.len();
        let mut index = (sampler.next_1d() * count as Float) as usize;
        if index >= count {
            index = count - 1;
        }
        Some((&self.lights[index], 1.0 / count as Float))
    }
}
