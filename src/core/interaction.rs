// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector3f };

// Local geometry at a surface point. The shading normal may be perturbed
// by vertex-normal interpolation; the geometric normal is always kept in
// the same hemisphere so the cosine correction stays well defined.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceInfo {
    pub position: Vector3f,
    pub geo_normal: Vector3f,
    pub sh_normal: Vector3f,
}

impl SurfaceInfo {
    pub fn new(position: Vector3f, geo_normal: Vector3f, sh_normal: Vector3f) -> Self {
        Self { position, geo_normal, sh_normal }
    }
}

pub struct IntersectInfo {
    surface: SurfaceInfo,
    t: Float,
    prim_index: usize,
}

impl IntersectInfo {
    pub fn new(surface: SurfaceInfo, t: Float, prim_index: usize) -> Self {
        Self { surface, t, prim_index }
    }

    pub fn surface(&self) -> &SurfaceInfo {
        &self.surface
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn prim_index(&self) -> usize {
        self.prim_index
    }
}
