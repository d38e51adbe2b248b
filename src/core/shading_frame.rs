// Copyright @yucwang 2026

use crate::math::constants::Vector3f;

// Orthonormal basis about a shading normal, used to move directions
// between world space and the z-up local frame the BSDFs work in.
pub struct ShadingFrame {
    tangent: Vector3f,
    bitangent: Vector3f,
    normal: Vector3f,
}

impl ShadingFrame {
    // Branchless basis construction after Duff et al. 2017; stable for
    // normals near the poles without a fallback axis.
    pub fn from_normal(normal: Vector3f) -> Self {
        let sign = 1.0f32.copysign(normal.z);
        let a = -1.0 / (sign + normal.z);
        let b = normal.x * normal.y * a;
        Self {
            tangent: Vector3f::new(
                1.0 + sign * normal.x * normal.x * a,
                sign * b,
                -sign * normal.x,
            ),
            bitangent: Vector3f::new(
                b,
                sign + normal.y * normal.y * a,
                -normal.y,
            ),
            normal,
        }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.tangent),
                      v.dot(&self.bitangent),
                      v.dot(&self.normal))
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}
