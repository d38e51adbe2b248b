// Copyright @yucwang 2023

use crate::core::interaction::SurfaceInfo;
use crate::math::aabb::AABB;
use crate::math::constants::{ EPSILON, Float, Vector2f, Vector3f };
use crate::math::ray::Ray3f;

#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    p0: Vector3f,
    p1: Vector3f,
    p2: Vector3f,
    n0: Vector3f,
    n1: Vector3f,
    n2: Vector3f,
}

impl Triangle {
    pub fn new(p0: Vector3f, p1: Vector3f, p2: Vector3f) -> Self {
        let n = face_normal(&p0, &p1, &p2);
        Self { p0, p1, p2, n0: n, n1: n, n2: n }
    }

    pub fn with_normals(p0: Vector3f, p1: Vector3f, p2: Vector3f,
                        n0: Vector3f, n1: Vector3f, n2: Vector3f) -> Self {
        Self { p0, p1, p2, n0, n1, n2 }
    }

    pub fn geometric_normal(&self) -> Vector3f {
        face_normal(&self.p0, &self.p1, &self.p2)
    }

    pub fn surface_area(&self) -> Float {
        0.5 * (self.p1 - self.p0).cross(&(self.p2 - self.p0)).norm()
    }

    pub fn bounding_box(&self) -> AABB {
        let mut bbox = AABB::new(self.p0, self.p1);
        bbox.expand_by_point(&self.p2);
        bbox
    }

    // Moeller-Trumbore. Returns the hit distance and local geometry; the
    // geometric normal is re-oriented into the shading-normal hemisphere.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<(Float, SurfaceInfo)> {
        let e1 = self.p1 - self.p0;
        let e2 = self.p2 - self.p0;
        let p_vec = ray.dir().cross(&e2);
        let det = e1.dot(&p_vec);
        if det.abs() < 1e-9 {
            return None;
        }

        let inv_det = 1.0 / det;
        let t_vec = ray.origin() - self.p0;
        let u = t_vec.dot(&p_vec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let q_vec = t_vec.cross(&e1);
        let v = ray.dir().dot(&q_vec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(&q_vec) * inv_det;
        if !ray.test_segment(t) {
            return None;
        }

        let sh_normal = ((1.0 - u - v) * self.n0 + u * self.n1 + v * self.n2)
            .normalize();
        let mut geo_normal = self.geometric_normal();
        if geo_normal.dot(&sh_normal) < 0.0 {
            geo_normal = -geo_normal;
        }

        Some((t, SurfaceInfo::new(ray.at(t), geo_normal, sh_normal)))
    }

    // Uniform area sampling via the sqrt parameterization; pdf is with
    // respect to surface area.
    pub fn sample(&self, u: &Vector2f) -> (SurfaceInfo, Float) {
        let su0 = u.x.sqrt();
        let b0 = 1.0 - su0;
        let b1 = u.y * su0;
        let position = self.p0
            + b0 * (self.p1 - self.p0)
            + b1 * (self.p2 - self.p0);

        let sh_normal = ((1.0 - b0 - b1) * self.n0 + b0 * self.n1 + b1 * self.n2)
            .normalize();
        let mut geo_normal = self.geometric_normal();
        if geo_normal.dot(&sh_normal) < 0.0 {
            geo_normal = -geo_normal;
        }

        let area = self.surface_area();
        let pdf = if area > EPSILON { 1.0 / area } else { 0.0 };
        (SurfaceInfo::new(position, geo_normal, sh_normal), pdf)
    }
}

fn face_normal(p0: &Vector3f, p1: &Vector3f, p2: &Vector3f) -> Vector3f {
    (p1 - p0).cross(&(p2 - p0)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::UniformSampler;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_surface_area() {
        assert!((unit_triangle().surface_area() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ray_hits_interior() {
        let tri = unit_triangle();
        let ray = Ray3f::new(Vector3f::new(0.25, 0.25, 1.0),
                             Vector3f::new(0.0, 0.0, -1.0), None, None);
        let (t, surface) = tri.ray_intersection(&ray).expect("expected hit");
        assert!((t - 1.0).abs() < 1e-5);
        assert!((surface.position.z - 0.0).abs() < 1e-5);
        assert!((surface.sh_normal.z.abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_outside() {
        let tri = unit_triangle();
        let ray = Ray3f::new(Vector3f::new(0.9, 0.9, 1.0),
                             Vector3f::new(0.0, 0.0, -1.0), None, None);
        assert!(tri.ray_intersection(&ray).is_none());
    }

    #[test]
    fn test_ray_respects_segment_bounds() {
        let tri = unit_triangle();
        let ray = Ray3f::new(Vector3f::new(0.25, 0.25, 1.0),
                             Vector3f::new(0.0, 0.0, -1.0),
                             None, Some(0.5));
        assert!(tri.ray_intersection(&ray).is_none());
    }

    #[test]
    fn test_samples_lie_on_the_triangle_plane() {
        let tri = unit_triangle();
        let mut sampler = UniformSampler::new(3);
        for _ in 0..64 {
            let u = sampler.next_2d();
            let (surface, pdf) = tri.sample(&u);
            assert!(surface.position.z.abs() < 1e-6);
            assert!(surface.position.x >= -1e-6 && surface.position.y >= -1e-6);
            assert!(surface.position.x + surface.position.y <= 1.0 + 1e-5);
            assert!((pdf - 2.0).abs() < 1e-5);
        }
    }
}
