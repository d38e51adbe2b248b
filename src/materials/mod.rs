// Copyright @yucwang 2023

pub mod glass;
pub mod lambert;
pub mod mirror;

use crate::core::bsdf::{BsdfSample, MaterialKind, TransportDirection};
use crate::core::sampler::UniformSampler;
use crate::math::constants::Vector3f;

pub use self::glass::GlassBsdf;
pub use self::lambert::LambertBsdf;
pub use self::mirror::MirrorBsdf;

// The closed material set. Both passes dispatch on `kind`; all direction
// arguments are in the local shading frame.
#[derive(Debug, Clone)]
pub enum Material {
    Lambert(LambertBsdf),
    Mirror(MirrorBsdf),
    Glass(GlassBsdf),
}

impl Material {
    pub fn kind(&self) -> MaterialKind {
        match self {
            Material::Lambert(_) => MaterialKind::Diffuse,
            Material::Mirror(_) | Material::Glass(_) => MaterialKind::Specular,
        }
    }

    pub fn eval(&self, wo: Vector3f, wi: Vector3f,
                transport_dir: TransportDirection) -> Vector3f {
        match self {
            Material::Lambert(bsdf) => bsdf.eval(wo, wi, transport_dir),
            Material::Mirror(bsdf) => bsdf.eval(wo, wi, transport_dir),
            Material::Glass(bsdf) => bsdf.eval(wo, wi, transport_dir),
        }
    }

    pub fn sample(&self, wo: Vector3f,
                  transport_dir: TransportDirection,
                  sampler: &mut UniformSampler) -> Option<BsdfSample> {
        match self {
            Material::Lambert(bsdf) => bsdf.sample(wo, transport_dir, sampler),
            Material::Mirror(bsdf) => bsdf.sample(wo, transport_dir, sampler),
            Material::Glass(bsdf) => bsdf.sample(wo, transport_dir, sampler),
        }
    }

    // Every branch of a specular interaction, with the discrete branch
    // probabilities pre-multiplied into f. Diffuse materials have no
    // enumerable branches.
    pub fn sample_all(&self, wo: Vector3f,
                      transport_dir: TransportDirection)
        -> Vec<(Vector3f, Vector3f)> {
        match self {
            Material::Lambert(_) => Vec::new(),
            Material::Mirror(bsdf) => bsdf.sample_all(wo, transport_dir),
            Material::Glass(bsdf) => bsdf.sample_all(wo, transport_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_kinds() {
        let lambert =
            Material::Lambert(LambertBsdf::new(Vector3f::new(0.5, 0.5, 0.5)));
        let mirror =
            Material::Mirror(MirrorBsdf::new(Vector3f::new(0.9, 0.9, 0.9)));
        let glass =
            Material::Glass(GlassBsdf::new(Vector3f::new(1.0, 1.0, 1.0), 1.5));
        assert_eq!(lambert.kind(), MaterialKind::Diffuse);
        assert_eq!(mirror.kind(), MaterialKind::Specular);
        assert_eq!(glass.kind(), MaterialKind::Specular);
    }

    #[test]
    fn test_diffuse_has_no_specular_branches() {
        let lambert =
            Material::Lambert(LambertBsdf::new(Vector3f::new(0.5, 0.5, 0.5)));
        let branches = lambert.sample_all(Vector3f::new(0.0, 0.0, 1.0),
                                          TransportDirection::FromCamera);
        assert!(branches.is_empty());
    }
}
