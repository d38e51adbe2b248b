// Copyright @yucwang 2023

use crate::core::bsdf::{BsdfSample, TransportDirection};
use crate::core::sampler::UniformSampler;
use crate::math::constants::{ INV_PI, Vector3f };
use crate::math::warp::{ sample_cosine_hemisphere, sample_cosine_hemisphere_pdf };

#[derive(Debug, Clone)]
pub struct LambertBsdf {
    albedo: Vector3f,
}

impl LambertBsdf {
    pub fn new(albedo: Vector3f) -> Self {
        Self { albedo }
    }

    pub fn eval(&self, _wo: Vector3f, _wi: Vector3f,
                _transport_dir: TransportDirection) -> Vector3f {
        self.albedo * INV_PI
    }

    pub fn sample(&self, wo: Vector3f,
                  transport_dir: TransportDirection,
                  sampler: &mut UniformSampler) -> Option<BsdfSample> {
        let mut wi = sample_cosine_hemisphere(&sampler.next_2d());
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }

        let pdf = sample_cosine_hemisphere_pdf(wi.z.abs());
        if pdf <= 0.0 {
            return None;
        }

        Some(BsdfSample::new(wi, self.eval(wo, wi, transport_dir), pdf))
    }
}
