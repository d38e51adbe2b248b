// Copyright @yucwang 2026

use crate::core::bsdf::{BsdfSample, TransportDirection};
use crate::core::sampler::UniformSampler;
use crate::math::constants::{ Float, Vector3f };
use crate::materials::mirror::reflect;

// Smooth dielectric with Fresnel-weighted reflection and refraction.
// Refraction under camera transport carries the (eta_i/eta_t)^2 radiance
// scaling; photon transport does not, which is exactly the asymmetry the
// shared cosine term corrects for on the diffuse side.
#[derive(Debug, Clone)]
pub struct GlassBsdf {
    transmittance: Vector3f,
    ior: Float,
}

pub fn fresnel_dielectric(cos_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let cos_i = cos_i.clamp(0.0, 1.0);
    let sin_t2 = (eta_i / eta_t) * (eta_i / eta_t) * (1.0 - cos_i * cos_i);
    if sin_t2 >= 1.0 {
        // Total internal reflection.
        return 1.0;
    }

    let cos_t = (1.0 - sin_t2).sqrt();
    let r_parallel = (eta_t * cos_i - eta_i * cos_t)
        / (eta_t * cos_i + eta_i * cos_t);
    let r_perpendicular = (eta_i * cos_i - eta_t * cos_t)
        / (eta_i * cos_i + eta_t * cos_t);
    0.5 * (r_parallel * r_parallel + r_perpendicular * r_perpendicular)
}

impl GlassBsdf {
    pub fn new(transmittance: Vector3f, ior: Float) -> Self {
        Self { transmittance, ior }
    }

    pub fn eval(&self, _wo: Vector3f, _wi: Vector3f,
                _transport_dir: TransportDirection) -> Vector3f {
        Vector3f::zeros()
    }

    fn refraction_scale(&self, eta_i: Float, eta_t: Float,
                        transport_dir: TransportDirection) -> Float {
        match transport_dir {
            TransportDirection::FromCamera => (eta_i / eta_t) * (eta_i / eta_t),
            TransportDirection::FromLight => 1.0,
        }
    }

    fn refract(&self, wo: &Vector3f, eta_i: Float, eta_t: Float)
        -> Option<Vector3f> {
        let cos_i = wo.z.abs();
        let eta = eta_i / eta_t;
        let sin_t2 = eta * eta * (1.0 - cos_i * cos_i);
        if sin_t2 >= 1.0 {
            return None;
        }

        let cos_t = (1.0 - sin_t2).sqrt();
        let n_sign = if wo.z > 0.0 { 1.0 } else { -1.0 };
        let normal = Vector3f::new(0.0, 0.0, n_sign);
        Some((eta * (-wo) + (eta * cos_i - cos_t) * normal).normalize())
    }

    pub fn sample(&self, wo: Vector3f,
                  transport_dir: TransportDirection,
                  sampler: &mut UniformSampler) -> Option<BsdfSample> {
        let entering = wo.z > 0.0;
        let (eta_i, eta_t) = if entering {
            (1.0, self.ior)
        } else {
            (self.ior, 1.0)
        };
        let fr = fresnel_dielectric(wo.z.abs(), eta_i, eta_t);

        if sampler.next_1d() < fr {
            let wi = reflect(&wo);
            let cos = wi.z.abs();
            if cos <= 0.0 {
                return None;
            }
            Some(BsdfSample::new(wi, fr * self.transmittance / cos, fr))
        } else {
            let wi = self.refract(&wo, eta_i, eta_t)?;
            let cos = wi.z.abs();
            if cos <= 0.0 {
                return None;
            }
            let scale = self.refraction_scale(eta_i, eta_t, transport_dir);
            let f = (1.0 - fr) * scale * self.transmittance / cos;
            Some(BsdfSample::new(wi, f, 1.0 - fr))
        }
    }

    // Both branches at once, Fresnel weights baked into f. Used by the
    // camera pass at shallow depths to suppress Fresnel noise.
    pub fn sample_all(&self, wo: Vector3f,
                      transport_dir: TransportDirection)
        -> Vec<(Vector3f, Vector3f)> {
        let entering = wo.z > 0.0;
        let (eta_i, eta_t) = if entering {
            (1.0, self.ior)
        } else {
            (self.ior, 1.0)
        };
        let fr = fresnel_dielectric(wo.z.abs(), eta_i, eta_t);

        let mut branches = Vec::with_capacity(2);
        let wr = reflect(&wo);
        if wr.z.abs() > 0.0 && fr > 0.0 {
            branches.push((wr, fr * self.transmittance / wr.z.abs()));
        }
        if let Some(wt) = self.refract(&wo, eta_i, eta_t) {
            if wt.z.abs() > 0.0 && fr < 1.0 {
                let scale = self.refraction_scale(eta_i, eta_t, transport_dir);
                branches.push(
                    (wt, (1.0 - fr) * scale * self.transmittance / wt.z.abs()));
            }
        }
        branches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresnel_bounds() {
        let f0 = fresnel_dielectric(1.0, 1.0, 1.5);
        // Normal incidence on glass is about 4 percent.
        assert!((f0 - 0.04).abs() < 0.01);
        let grazing = fresnel_dielectric(0.01, 1.0, 1.5);
        assert!(grazing > 0.9);
    }

    #[test]
    fn test_total_internal_reflection() {
        // Shallow exit angle from inside the denser medium.
        assert_eq!(fresnel_dielectric(0.1, 1.5, 1.0), 1.0);

        let bsdf = GlassBsdf::new(Vector3f::new(1.0, 1.0, 1.0), 1.5);
        let wo = Vector3f::new(0.9, 0.0, -0.1).normalize();
        let branches = bsdf.sample_all(wo, TransportDirection::FromCamera);
        assert_eq!(branches.len(), 1);
        assert!((branches[0].0.z - wo.z).abs() < 1e-6);
    }

    #[test]
    fn test_refraction_bends_toward_normal() {
        let bsdf = GlassBsdf::new(Vector3f::new(1.0, 1.0, 1.0), 1.5);
        let wo = Vector3f::new(0.5, 0.0, 0.8).normalize();
        let branches = bsdf.sample_all(wo, TransportDirection::FromLight);
        assert_eq!(branches.len(), 2);
        let (wt, _) = branches[1];
        // Transmitted ray continues into the lower hemisphere, closer to
        // the axis than the incident ray.
        assert!(wt.z < 0.0);
        assert!(wt.x.abs() < wo.x.abs());
        assert!((wt.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_straight_through_at_normal_incidence() {
        let bsdf = GlassBsdf::new(Vector3f::new(1.0, 1.0, 1.0), 1.5);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let branches = bsdf.sample_all(wo, TransportDirection::FromCamera);
        assert_eq!(branches.len(), 2);
        let (wt, _) = branches[1];
        assert!((wt - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }
}
