// Copyright @yucwang 2026

use crate::core::interaction::SurfaceInfo;
use crate::core::shading_frame::ShadingFrame;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::warp::{sample_cosine_hemisphere, sample_cosine_hemisphere_pdf};
use crate::shapes::triangle::Triangle;

// One-sided area light over an emissive triangle, radiating a constant
// radiance cosine-distributed about the shading normal.
pub struct AreaLight {
    triangle: Triangle,
    radiance: Vector3f,
}

impl AreaLight {
    pub fn new(triangle: Triangle, radiance: Vector3f) -> Self {
        Self { triangle, radiance }
    }

    // Uniform point on the light; pdf is in area measure.
    pub fn sample_point(&self, u: &Vector2f) -> (SurfaceInfo, Float) {
        self.triangle.sample(u)
    }

    // Cosine-distributed emission direction about the shading normal at
    // `surface`; pdf is in solid angle.
    pub fn sample_direction(&self, u: &Vector2f, surface: &SurfaceInfo)
        -> (Vector3f, Float) {
        let local_dir = sample_cosine_hemisphere(u);
        let pdf = sample_cosine_hemisphere_pdf(local_dir.z);
        let frame = ShadingFrame::from_normal(surface.sh_normal);
        (frame.to_world(&local_dir), pdf)
    }

    // Emitted radiance leaving `surface` along `dir`; the back face of
    // the light is dark.
    pub fn le(&self, surface: &SurfaceInfo, dir: &Vector3f) -> Vector3f {
        if dir.dot(&surface.sh_normal) <= 0.0 {
            return Vector3f::zeros();
        }
        self.radiance
    }
}
