// Copyright @yucwang 2026

use crate::core::sampler::UniformSampler;
use crate::core::scene::Scene;
use crate::math::constants::Vector3f;
use crate::math::ray::Ray3f;

pub trait Integrator: Sync {
    // do preliminary jobs before calling integrate
    fn build(&mut self, scene: &Scene, seed: u64);

    // compute radiance coming from the given ray
    fn integrate(&self, ray: &Ray3f, scene: &Scene,
                 sampler: &mut UniformSampler) -> Vector3f;
}
