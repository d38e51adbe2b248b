// Copyright @yucwang 2026

use crate::core::bsdf::{MaterialKind, TransportDirection};
use crate::core::integrator::Integrator;
use crate::core::interaction::{IntersectInfo, SurfaceInfo};
use crate::core::photon_map::{Photon, PhotonMap};
use crate::core::sampler::UniformSampler;
use crate::core::scene::Scene;
use crate::core::shading_frame::ShadingFrame;
use crate::math::constants::{EPSILON, Float, PI, SHADOW_EPSILON, Vector3f};
use crate::math::ray::Ray3f;
use indicatif::{ProgressBar, ProgressStyle};
use std::thread;

// Cosine factor shared by the light and camera passes. Shading normals
// make the BSDF asymmetric, so radiance transport carries the Veach
// correction while importance transport uses the plain shading cosine.
// Direction pairs straddling the geometric and shading hemispheres are
// light leaks and contribute nothing.
pub fn cos_term(wo: &Vector3f, wi: &Vector3f, surface: &SurfaceInfo,
                transport_dir: TransportDirection) -> Float {
    let wi_ns = wi.dot(&surface.sh_normal);
    let wi_ng = wi.dot(&surface.geo_normal);
    let wo_ns = wo.dot(&surface.sh_normal);
    let wo_ng = wo.dot(&surface.geo_normal);

    if wi_ng * wi_ns <= 0.0 || wo_ng * wo_ns <= 0.0 {
        return 0.0;
    }

    match transport_dir {
        TransportDirection::FromCamera => wi_ns.abs(),
        TransportDirection::FromLight => {
            wo_ns.abs() * wi_ng.abs() / wo_ng.abs()
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PhotonPass {
    Global,
    Caustic,
}

pub struct PhotonMapIntegrator {
    // number of photons emitted for the global photon map
    n_photons_global: usize,

    // number of photons used for radiance estimation by the global map
    n_estimation_global: usize,

    // number of photons emitted for the caustic photon map
    n_photons_caustics: usize,

    // number of photons used for radiance estimation by the caustic map
    n_estimation_caustics: usize,

    // camera depth below which direct light, caustics and final gathering
    // replace the raw global-map estimate
    final_gathering_depth: u32,

    // maximum depth of photon tracing and eye tracing
    max_depth: u32,

    global_photon_map: PhotonMap,
    caustics_photon_map: PhotonMap,
}

impl PhotonMapIntegrator {
    pub fn new(n_photons_global: usize,
               n_estimation_global: usize,
               n_photons_caustics_multiplier: Float,
               n_estimation_caustics: usize,
               final_gathering_depth: u32,
               max_depth: u32) -> Self {
        let n_photons_caustics =
            (n_photons_global as Float * n_photons_caustics_multiplier) as usize;
        Self {
            n_photons_global,
            n_estimation_global,
            n_photons_caustics,
            n_estimation_caustics,
            final_gathering_depth,
            max_depth,
            global_photon_map: PhotonMap::new(),
            caustics_photon_map: PhotonMap::new(),
        }
    }

    pub fn global_photon_map(&self) -> &PhotonMap {
        &self.global_photon_map
    }

    pub fn caustics_photon_map(&self) -> &PhotonMap {
        &self.caustics_photon_map
    }

    // Sample the initial light ray and its starting throughput, already
    // divided by the light choice, position and direction densities.
    fn sample_ray_from_light(scene: &Scene, sampler: &mut UniformSampler)
        -> Option<(Ray3f, Vector3f)> {
        let (light, pdf_choose) = scene.sample_light(sampler)?;
        let (light_surf, pdf_pos) = light.sample_point(&sampler.next_2d());
        if pdf_pos <= 0.0 {
            return None;
        }

        let (dir, pdf_dir) = light.sample_direction(&sampler.next_2d(), &light_surf);
        if pdf_dir <= 0.0 {
            return None;
        }

        let cos = dir.dot(&light_surf.sh_normal).abs();
        let throughput =
            light.le(&light_surf, &dir) * (cos / (pdf_choose * pdf_pos * pdf_dir));
        let ray = Ray3f::new(light_surf.position, dir, Some(EPSILON), None);
        Some((ray, throughput))
    }

    // One light path. Deposits go into `out` according to the pass
    // predicate: the global pass stores every diffuse hit, the caustic
    // pass only a diffuse hit straight after a specular chain.
    fn trace_photon_path(&self, scene: &Scene, pass: PhotonPass,
                         sampler: &mut UniformSampler, out: &mut Vec<Photon>) {
        let Some((mut ray, mut throughput)) =
            Self::sample_ray_from_light(scene, sampler) else {
            return;
        };

        let mut prev_specular = false;
        for k in 0..self.max_depth {
            if throughput.x.is_nan() || throughput.y.is_nan()
                || throughput.z.is_nan() {
                log::error!("Photon throughput is NaN!");
                break;
            } else if throughput.x < 0.0 || throughput.y < 0.0
                || throughput.z < 0.0 {
                log::error!("Photon throughput is negative!");
                break;
            }

            let Some(info) = scene.intersect(&ray) else {
                // photon escaped the scene
                break;
            };

            let material = &scene.primitive(info.prim_index()).material;
            let kind = material.kind();

            match pass {
                PhotonPass::Global => {
                    if kind == MaterialKind::Diffuse {
                        out.push(Photon::new(throughput,
                                             info.surface().position,
                                             -ray.dir()));
                    }
                }
                PhotonPass::Caustic => {
                    if kind == MaterialKind::Diffuse {
                        if prev_specular {
                            out.push(Photon::new(throughput,
                                                 info.surface().position,
                                                 -ray.dir()));
                        }
                        // Either way the caustic path ends at the first
                        // diffuse surface.
                        break;
                    }
                    prev_specular = kind == MaterialKind::Specular;
                }
            }

            // Russian roulette, skipped on the first bounce.
            if k > 0 {
                let q = throughput.x.max(throughput.y).max(throughput.z)
                    .min(1.0);
                if sampler.next_1d() >= q {
                    break;
                }
                throughput /= q;
            }

            let wo_world = -ray.dir();
            let surface = info.surface();
            let frame = ShadingFrame::from_normal(surface.sh_normal);
            let wo_local = frame.to_local(&wo_world);

            let Some(sample) =
                material.sample(wo_local, TransportDirection::FromLight, sampler)
            else {
                break;
            };
            if sample.pdf <= 0.0 {
                break;
            }

            let wi_world = frame.to_world(&sample.wi);
            let cos = cos_term(&wo_world, &wi_world, surface,
                               TransportDirection::FromLight);
            throughput = throughput.component_mul(&sample.f)
                * (cos / sample.pdf);
            ray = Ray3f::new(surface.position, wi_world, Some(EPSILON), None);
        }
    }

    // Trace `n_photons` independent paths across all cores. Each worker
    // owns a statically assigned index range, a sampler seeded
    // `seed * (thread_index + 1)` and a private deposit buffer; buffers
    // are concatenated in thread order so a fixed thread count
    // reproduces the same photon array.
    fn trace_photons(&self, scene: &Scene, n_photons: usize,
                     pass: PhotonPass, seed: u64) -> Vec<Photon> {
        if n_photons == 0 {
            return Vec::new();
        }

        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(n_photons);
        let chunk = (n_photons + thread_count - 1) / thread_count;

        let progress = ProgressBar::new(n_photons as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} photons")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let buffers: Vec<Vec<Photon>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..thread_count)
                .map(|thread_index| {
                    let progress = progress.clone();
                    scope.spawn(move || {
                        let mut sampler = UniformSampler::new(
                            seed.wrapping_mul(thread_index as u64 + 1));
                        let start = thread_index * chunk;
                        let end = ((thread_index + 1) * chunk).min(n_photons);
                        let mut local = Vec::new();
                        for _ in start..end {
                            self.trace_photon_path(scene, pass, &mut sampler,
                                                   &mut local);
                            progress.inc(1);
                        }
                        local
                    })
                })
                .collect();

            workers.into_iter()
                .map(|worker| match worker.join() {
                    Ok(buffer) => buffer,
                    Err(_) => {
                        log::error!("A photon tracing worker panicked!");
                        Vec::new()
                    }
                })
                .collect()
        });
        progress.finish_and_clear();

        buffers.concat()
    }

    // Density estimation with the disk kernel 1/(pi r^2) over the k
    // nearest photons; the divisor is the emitted count of the pass that
    // filled the map, not the returned k.
    fn estimate_with_photon_map(&self, scene: &Scene, wo_world: &Vector3f,
                                info: &IntersectInfo, map: &PhotonMap,
                                n_emitted: usize, n_estimation: usize)
        -> Vector3f {
        let surface = info.surface();
        let (photon_indices, max_dist2) =
            map.query_k_nearest_photons(&surface.position, n_estimation);
        if photon_indices.is_empty() || max_dist2 <= 0.0 || n_emitted == 0 {
            return Vector3f::zeros();
        }

        let material = &scene.primitive(info.prim_index()).material;
        let frame = ShadingFrame::from_normal(surface.sh_normal);
        let wo_local = frame.to_local(wo_world);

        let mut lo = Vector3f::zeros();
        for photon_idx in photon_indices {
            let photon = map.ith_photon(photon_idx);
            let wi_local = frame.to_local(&photon.wi);
            let f = material.eval(wo_local, wi_local,
                                  TransportDirection::FromCamera);
            lo += f.component_mul(&photon.power);
        }

        lo / (n_emitted as Float * PI * max_dist2)
    }

    fn estimate_global(&self, scene: &Scene, wo_world: &Vector3f,
                       info: &IntersectInfo) -> Vector3f {
        self.estimate_with_photon_map(scene, wo_world, info,
                                      &self.global_photon_map,
                                      self.n_photons_global,
                                      self.n_estimation_global)
    }

    fn estimate_caustics(&self, scene: &Scene, wo_world: &Vector3f,
                         info: &IntersectInfo) -> Vector3f {
        self.estimate_with_photon_map(scene, wo_world, info,
                                      &self.caustics_photon_map,
                                      self.n_photons_caustics,
                                      self.n_estimation_caustics)
    }

    // Next event estimation: one light sample, converted to solid-angle
    // density, visibility-tested with a shortened shadow ray.
    fn direct_illumination(&self, scene: &Scene, wo_world: &Vector3f,
                           info: &IntersectInfo, sampler: &mut UniformSampler)
        -> Vector3f {
        let Some((light, pdf_choose)) = scene.sample_light(sampler) else {
            return Vector3f::zeros();
        };
        let (light_surf, pdf_pos) = light.sample_point(&sampler.next_2d());
        if pdf_pos <= 0.0 {
            return Vector3f::zeros();
        }

        let surface = info.surface();
        let to_light = light_surf.position - surface.position;
        let dist2 = to_light.norm_squared();
        if dist2 <= 0.0 {
            return Vector3f::zeros();
        }
        let dist = dist2.sqrt();
        let wi_world = to_light / dist;

        let cos_light = (-wi_world).dot(&light_surf.sh_normal).abs();
        if cos_light <= 0.0 {
            return Vector3f::zeros();
        }
        let pdf_dir = pdf_pos * dist2 / cos_light;

        let shadow_ray = Ray3f::new(surface.position, wi_world,
                                    Some(EPSILON),
                                    Some(dist - SHADOW_EPSILON));
        if scene.intersect(&shadow_ray).is_some() {
            return Vector3f::zeros();
        }

        let frame = ShadingFrame::from_normal(surface.sh_normal);
        let wo_local = frame.to_local(wo_world);
        let wi_local = frame.to_local(&wi_world);
        let f = scene.primitive(info.prim_index()).material
            .eval(wo_local, wi_local, TransportDirection::FromCamera);
        let cos = wi_world.dot(&surface.sh_normal).abs();
        let le = light.le(&light_surf, &(-wi_world));

        f.component_mul(&le) * (cos / (pdf_choose * pdf_dir))
    }

    // One-bounce final gathering; specular hits keep gathering so that
    // caustics seen through glass or mirrors still resolve.
    fn indirect_illumination(&self, scene: &Scene, wo_world: &Vector3f,
                             info: &IntersectInfo, sampler: &mut UniformSampler,
                             depth: u32) -> Vector3f {
        if depth >= self.max_depth {
            return Vector3f::zeros();
        }

        let surface = info.surface();
        let frame = ShadingFrame::from_normal(surface.sh_normal);
        let wo_local = frame.to_local(wo_world);
        let material = &scene.primitive(info.prim_index()).material;
        let Some(sample) =
            material.sample(wo_local, TransportDirection::FromCamera, sampler)
        else {
            return Vector3f::zeros();
        };
        if sample.pdf <= 0.0 {
            return Vector3f::zeros();
        }

        let wi_world = frame.to_world(&sample.wi);
        let cos = surface.sh_normal.dot(&wi_world).abs();
        let gather_ray = Ray3f::new(surface.position, wi_world,
                                    Some(EPSILON), None);
        let Some(gather_info) = scene.intersect(&gather_ray) else {
            return Vector3f::zeros();
        };

        let weight = sample.f * (cos / sample.pdf);
        let gather_wo = -gather_ray.dir();
        match scene.primitive(gather_info.prim_index()).material.kind() {
            MaterialKind::Diffuse => weight.component_mul(
                &self.estimate_global(scene, &gather_wo, &gather_info)),
            MaterialKind::Specular => weight.component_mul(
                &self.indirect_illumination(scene, &gather_wo, &gather_info,
                                            sampler, depth + 1)),
        }
    }

    fn integrate_recursive(&self, ray: &Ray3f, scene: &Scene,
                           sampler: &mut UniformSampler, depth: u32) -> Vector3f {
        if depth >= self.max_depth {
            return Vector3f::zeros();
        }

        let Some(info) = scene.intersect(ray) else {
            // ray goes out to the sky
            return Vector3f::zeros();
        };

        let prim = scene.primitive(info.prim_index());
        if let Some(light_index) = prim.light_index {
            return scene.light(light_index).le(info.surface(), &(-ray.dir()));
        }

        let wo_world = -ray.dir();
        match prim.material.kind() {
            MaterialKind::Diffuse => {
                if depth >= self.final_gathering_depth {
                    self.estimate_global(scene, &wo_world, &info)
                } else {
                    let ld = self.direct_illumination(scene, &wo_world,
                                                      &info, sampler);
                    let lc = self.estimate_caustics(scene, &wo_world, &info);
                    let li = self.indirect_illumination(scene, &wo_world,
                                                        &info, sampler, 0);
                    ld + lc + li
                }
            }
            MaterialKind::Specular => {
                let surface = info.surface();
                let frame = ShadingFrame::from_normal(surface.sh_normal);
                let wo_local = frame.to_local(&wo_world);

                if depth >= 3 {
                    let Some(sample) = prim.material.sample(
                        wo_local, TransportDirection::FromCamera, sampler)
                    else {
                        return Vector3f::zeros();
                    };
                    if sample.pdf <= 0.0 {
                        return Vector3f::zeros();
                    }

                    let wi_world = frame.to_world(&sample.wi);
                    let cos = cos_term(&wo_world, &wi_world, surface,
                                       TransportDirection::FromCamera);
                    let throughput = sample.f * (cos / sample.pdf);
                    let next_ray = Ray3f::new(surface.position, wi_world,
                                              Some(EPSILON), None);
                    throughput.component_mul(
                        &self.integrate_recursive(&next_ray, scene, sampler,
                                                  depth + 1))
                } else {
                    // Enumerate every branch at shallow depth to keep
                    // Fresnel split noise out of the first bounces.
                    let branches = prim.material.sample_all(
                        wo_local, TransportDirection::FromCamera);
                    let mut lo = Vector3f::zeros();
                    for (wi_local, f) in branches {
                        let wi_world = frame.to_world(&wi_local);
                        let cos = wi_world.dot(&surface.sh_normal).abs();
                        let throughput = f * cos;
                        let next_ray = Ray3f::new(surface.position, wi_world,
                                                  Some(EPSILON), None);
                        lo += throughput.component_mul(
                            &self.integrate_recursive(&next_ray, scene, sampler,
                                                      depth + 1));
                    }
                    lo
                }
            }
        }
    }
}

impl Integrator for PhotonMapIntegrator {
    // Photon tracing: fill and build the global map, then the caustic
    // map when final gathering is enabled.
    fn build(&mut self, scene: &Scene, seed: u64) {
        if scene.lights().is_empty() {
            log::warn!("Scene has no lights; skipping photon tracing.");
            return;
        }

        log::info!("Tracing photons for the global photon map...");
        let photons = self.trace_photons(scene, self.n_photons_global,
                                         PhotonPass::Global, seed);
        log::info!("Building the global photon map with {} photons...",
                   photons.len());
        self.global_photon_map.set_photons(photons);
        self.global_photon_map.build();

        if self.final_gathering_depth > 0 {
            log::info!("Tracing photons for the caustic photon map...");
            let photons = self.trace_photons(scene, self.n_photons_caustics,
                                             PhotonPass::Caustic, seed);
            log::info!("Building the caustic photon map with {} photons...",
                       photons.len());
            self.caustics_photon_map.set_photons(photons);
            self.caustics_photon_map.build();
        }
    }

    fn integrate(&self, ray: &Ray3f, scene: &Scene,
                 sampler: &mut UniformSampler) -> Vector3f {
        self.integrate_recursive(ray, scene, sampler, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{GlassBsdf, LambertBsdf, Material};
    use crate::shapes::triangle::Triangle;
    use std::sync::Arc;

    fn gray_lambert() -> Arc<Material> {
        Arc::new(Material::Lambert(
            LambertBsdf::new(Vector3f::new(0.8, 0.8, 0.8))))
    }

    // Horizontal quad at height `y` spanning [-half, half]^2 in xz. The
    // winding makes the face normal point along +y or -y as requested.
    fn add_quad(scene: &mut Scene, y: Float, half: Float, up: bool,
                material: Arc<Material>, emission: Option<Vector3f>) {
        let (a, b, c, d) = (
            Vector3f::new(-half, y, -half),
            Vector3f::new(-half, y, half),
            Vector3f::new(half, y, -half),
            Vector3f::new(half, y, half),
        );
        if up {
            scene.add_primitive(Triangle::new(a, b, c), material.clone(),
                                emission);
            scene.add_primitive(Triangle::new(d, c, b), material, emission);
        } else {
            scene.add_primitive(Triangle::new(a, c, b), material.clone(),
                                emission);
            scene.add_primitive(Triangle::new(d, b, c), material, emission);
        }
    }

    // Diffuse floor at y = 0 lit by a downward-facing area light at y = 2.
    fn floor_and_light_scene() -> Scene {
        let mut scene = Scene::new();
        add_quad(&mut scene, 0.0, 2.0, true, gray_lambert(), None);
        add_quad(&mut scene, 2.0, 1.0, false, gray_lambert(),
                 Some(Vector3f::new(5.0, 5.0, 5.0)));
        scene.build();
        scene
    }

    fn tilted_surface() -> SurfaceInfo {
        SurfaceInfo::new(
            Vector3f::zeros(),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.2, 0.0, 1.0).normalize(),
        )
    }

    #[test]
    fn test_cos_term_from_camera_is_shading_cosine() {
        let surface = tilted_surface();
        let wo = Vector3f::new(0.1, 0.3, 0.9).normalize();
        let wi = Vector3f::new(-0.4, 0.2, 0.8).normalize();
        let cos = cos_term(&wo, &wi, &surface,
                           TransportDirection::FromCamera);
        assert!((cos - wi.dot(&surface.sh_normal).abs()).abs() < 1e-6);
    }

    #[test]
    fn test_cos_term_rejects_light_leaks() {
        let surface = tilted_surface();
        // Grazing direction inside the geometric hemisphere but outside
        // the shading hemisphere.
        let leak = Vector3f::new(-0.995, 0.0, 0.1).normalize();
        assert!(leak.dot(&surface.geo_normal) > 0.0);
        assert!(leak.dot(&surface.sh_normal) < 0.0);

        let wo = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(cos_term(&wo, &leak, &surface,
                            TransportDirection::FromCamera), 0.0);
        assert_eq!(cos_term(&leak, &wo, &surface,
                            TransportDirection::FromLight), 0.0);
    }

    #[test]
    fn test_cos_term_from_light_correction() {
        let surface = tilted_surface();
        let wo = Vector3f::new(0.1, 0.3, 0.9).normalize();
        let wi = Vector3f::new(-0.4, 0.2, 0.8).normalize();
        let cos = cos_term(&wo, &wi, &surface,
                           TransportDirection::FromLight);
        let expected = wo.dot(&surface.sh_normal).abs()
            * wi.dot(&surface.geo_normal).abs()
            / wo.dot(&surface.geo_normal).abs();
        assert!((cos - expected).abs() < 1e-6);
    }

    #[test]
    fn test_empty_scene_is_black() {
        let mut scene = Scene::new();
        scene.build();
        let mut integrator = PhotonMapIntegrator::new(100, 10, 1.0, 10, 1, 4);
        integrator.build(&scene, 42);

        let ray = Ray3f::new(Vector3f::zeros(),
                             Vector3f::new(0.0, 0.0, -1.0), None, None);
        let mut sampler = UniformSampler::new(1);
        let radiance = integrator.integrate(&ray, &scene, &mut sampler);
        assert_eq!(radiance, Vector3f::zeros());
    }

    #[test]
    fn test_direct_emitter_hit_returns_le() {
        let scene = floor_and_light_scene();
        let mut integrator = PhotonMapIntegrator::new(100, 10, 1.0, 10, 1, 4);
        integrator.build(&scene, 42);

        let ray = Ray3f::new(Vector3f::new(0.0, 1.0, 0.0),
                             Vector3f::new(0.0, 1.0, 0.0), None, None);
        let mut sampler = UniformSampler::new(1);
        let radiance = integrator.integrate(&ray, &scene, &mut sampler);
        assert!((radiance - Vector3f::new(5.0, 5.0, 5.0)).norm() < 1e-5);
    }

    #[test]
    fn test_emitter_back_face_is_dark() {
        let scene = floor_and_light_scene();
        let mut integrator = PhotonMapIntegrator::new(100, 10, 1.0, 10, 1, 4);
        integrator.build(&scene, 42);

        // The light faces the floor; seen from above it emits nothing.
        let ray = Ray3f::new(Vector3f::new(0.0, 3.0, 0.0),
                             Vector3f::new(0.0, -1.0, 0.0), None, None);
        let mut sampler = UniformSampler::new(1);
        let radiance = integrator.integrate(&ray, &scene, &mut sampler);
        assert_eq!(radiance, Vector3f::zeros());
    }

    #[test]
    fn test_caustic_map_is_empty_without_specular_surfaces() {
        let scene = floor_and_light_scene();
        let mut integrator =
            PhotonMapIntegrator::new(2000, 10, 1.0, 10, 1, 6);
        integrator.build(&scene, 42);

        assert!(integrator.global_photon_map().size() > 0);
        assert_eq!(integrator.caustics_photon_map().size(), 0);
    }

    #[test]
    fn test_caustics_flow_through_glass() {
        let mut scene = Scene::new();
        add_quad(&mut scene, 0.0, 2.0, true, gray_lambert(), None);
        add_quad(&mut scene, 1.0, 1.5, true,
                 Arc::new(Material::Glass(
                     GlassBsdf::new(Vector3f::new(1.0, 1.0, 1.0), 1.5))),
                 None);
        add_quad(&mut scene, 2.0, 1.0, false, gray_lambert(),
                 Some(Vector3f::new(5.0, 5.0, 5.0)));
        scene.build();

        let mut with_caustics =
            PhotonMapIntegrator::new(4000, 10, 1.0, 10, 1, 6);
        with_caustics.build(&scene, 42);
        assert!(with_caustics.caustics_photon_map().size() > 0);

        // final_gathering_depth = 0 disables the caustic pass entirely.
        let mut without_caustics =
            PhotonMapIntegrator::new(4000, 10, 1.0, 10, 0, 6);
        without_caustics.build(&scene, 42);
        assert_eq!(without_caustics.caustics_photon_map().size(), 0);
    }

    #[test]
    fn test_deposited_photons_have_valid_power() {
        let mut scene = Scene::new();
        add_quad(&mut scene, 0.0, 2.0, true, gray_lambert(), None);
        add_quad(&mut scene, 1.0, 1.5, true,
                 Arc::new(Material::Glass(
                     GlassBsdf::new(Vector3f::new(1.0, 1.0, 1.0), 1.5))),
                 None);
        add_quad(&mut scene, 2.0, 1.0, false, gray_lambert(),
                 Some(Vector3f::new(5.0, 5.0, 5.0)));
        scene.build();

        let mut integrator =
            PhotonMapIntegrator::new(4000, 10, 1.0, 10, 1, 8);
        integrator.build(&scene, 42);

        let map = integrator.global_photon_map();
        assert!(map.size() > 0);
        for index in 0..map.size() {
            let photon = map.ith_photon(index);
            for channel in 0..3 {
                assert!(photon.power[channel].is_finite());
                assert!(photon.power[channel] >= 0.0);
            }
            assert!((photon.wi.norm() - 1.0).abs() < 1e-4);
        }
    }

    // On a floor lit only directly, the global-map estimate converges to
    // the same value next event estimation computes. Loose tolerance to
    // keep the photon count moderate.
    #[test]
    fn test_global_estimate_matches_direct_lighting_on_a_plane() {
        let scene = floor_and_light_scene();
        let mut integrator =
            PhotonMapIntegrator::new(40000, 100, 0.0, 10, 1, 4);
        integrator.build(&scene, 42);

        let ray = Ray3f::new(Vector3f::new(0.0, 1.0, 0.0),
                             Vector3f::new(0.0, -1.0, 0.0), None, None);
        let info = scene.intersect(&ray).expect("expected floor hit");
        let wo = -ray.dir();

        let density = integrator.estimate_global(&scene, &wo, &info);

        let mut sampler = UniformSampler::new(7);
        let mut reference = Vector3f::zeros();
        let n_reference = 2000;
        for _ in 0..n_reference {
            reference +=
                integrator.direct_illumination(&scene, &wo, &info, &mut sampler);
        }
        reference /= n_reference as Float;

        for channel in 0..3 {
            let expected = reference[channel];
            assert!(expected > 0.0);
            let relative = (density[channel] - expected).abs() / expected;
            assert!(relative < 0.35,
                    "channel {}: estimate {} vs reference {}",
                    channel, density[channel], expected);
        }
    }

    #[test]
    fn test_photon_pass_is_deterministic_for_a_seed() {
        let scene = floor_and_light_scene();
        let mut first = PhotonMapIntegrator::new(3000, 10, 1.0, 10, 1, 4);
        first.build(&scene, 42);
        let mut second = PhotonMapIntegrator::new(3000, 10, 1.0, 10, 1, 4);
        second.build(&scene, 42);

        assert_eq!(first.global_photon_map().size(),
                   second.global_photon_map().size());
        for index in 0..first.global_photon_map().size() {
            let a = first.global_photon_map().ith_photon(index);
            let b = second.global_photon_map().ith_photon(index);
            assert_eq!(a.position, b.position);
            assert_eq!(a.power, b.power);
            assert_eq!(a.wi, b.wi);
        }
    }
}
