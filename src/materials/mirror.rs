// Copyright @yucwang 2026

use crate::core::bsdf::{BsdfSample, TransportDirection};
use crate::core::sampler::UniformSampler;
use crate::math::constants::Vector3f;

// Perfect specular reflector. The distribution is a delta, so `eval`
// of arbitrary direction pairs is zero and all energy flows through
// `sample` / `sample_all`.
#[derive(Debug, Clone)]
pub struct MirrorBsdf {
    reflectance: Vector3f,
}

pub fn reflect(wo: &Vector3f) -> Vector3f {
    Vector3f::new(-wo.x, -wo.y, wo.z)
}

impl MirrorBsdf {
    pub fn new(reflectance: Vector3f) -> Self {
        Self { reflectance }
    }

    pub fn eval(&self, _wo: Vector3f, _wi: Vector3f,
                _transport_dir: TransportDirection) -> Vector3f {
        Vector3f::zeros()
    }

    pub fn sample(&self, wo: Vector3f,
                  _transport_dir: TransportDirection,
                  _sampler: &mut UniformSampler) -> Option<BsdfSample> {
        let wi = reflect(&wo);
        let cos = wi.z.abs();
        if cos <= 0.0 {
            return None;
        }

        Some(BsdfSample::new(wi, self.reflectance / cos, 1.0))
    }

    pub fn sample_all(&self, wo: Vector3f,
                      _transport_dir: TransportDirection)
        -> Vec<(Vector3f, Vector3f)> {
        let wi = reflect(&wo);
        let cos = wi.z.abs();
        if cos <= 0.0 {
            return Vec::new();
        }

        vec![(wi, self.reflectance / cos)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflection_direction() {
        let bsdf = MirrorBsdf::new(Vector3f::new(0.9, 0.9, 0.9));
        let wo = Vector3f::new(0.5, -0.2, 0.8).normalize();
        let mut sampler = UniformSampler::new(1);
        let sample = bsdf
            .sample(wo, TransportDirection::FromCamera, &mut sampler)
            .expect("expected a sample");
        assert!((sample.wi.x + wo.x).abs() < 1e-6);
        assert!((sample.wi.y + wo.y).abs() < 1e-6);
        assert!((sample.wi.z - wo.z).abs() < 1e-6);
        assert_eq!(sample.pdf, 1.0);
    }

    #[test]
    fn test_sample_all_has_one_branch() {
        let bsdf = MirrorBsdf::new(Vector3f::new(1.0, 1.0, 1.0));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let branches = bsdf.sample_all(wo, TransportDirection::FromCamera);
        assert_eq!(branches.len(), 1);
        // f contains 1/|cos|, so f * cos returns the full reflectance.
        assert!((branches[0].1.x * branches[0].0.z.abs() - 1.0).abs() < 1e-6);
    }
}
