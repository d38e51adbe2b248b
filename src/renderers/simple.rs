// Copyright @yucwang 2021

use crate::core::integrator::Integrator;
use crate::core::sampler::UniformSampler;
use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::sensors::perspective::PinholeCamera;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

pub use super::renderer::Renderer;

const BLOCK_SIZE: usize = 32;

pub struct SimpleRenderer {
    width: usize,
    height: usize,
    samples_per_pixel: u32,
    seed: u64,
}

impl SimpleRenderer {
    pub fn new(width: usize, height: usize, samples_per_pixel: u32,
               seed: u64) -> Self {
        Self {
            width,
            height,
            samples_per_pixel: samples_per_pixel.max(1),
            seed,
        }
    }

    // Per-pixel sampler seeds depend only on the pixel index, so the
    // image is reproducible no matter which worker claims which tile.
    fn pixel_seed(&self, x: usize, y: usize) -> u64 {
        self.seed.wrapping_add((y * self.width + x) as u64)
    }

    fn render_pixel(&self, scene: &Scene, camera: &PinholeCamera,
                    integrator: &dyn Integrator,
                    x: usize, y: usize) -> Vector3f {
        let mut sampler = UniformSampler::new(self.pixel_seed(x, y));
        let mut color = Vector3f::zeros();
        for _ in 0..self.samples_per_pixel {
            let u = (x as Float + sampler.next_1d()) / (self.width as Float);
            let v = (y as Float + sampler.next_1d()) / (self.height as Float);
            let ray = camera.sample_ray(&Vector2f::new(u, v));

            let radiance = integrator.integrate(&ray, scene, &mut sampler);
            if radiance.x.is_nan() || radiance.y.is_nan()
                || radiance.z.is_nan() {
                log::error!("Radiance of pixel [{},{}] is NaN!", y, x);
                continue;
            } else if radiance.x < 0.0 || radiance.y < 0.0
                || radiance.z < 0.0 {
                log::error!("Radiance of pixel [{},{}] is negative!", y, x);
                continue;
            }

            color += radiance;
        }

        color / (self.samples_per_pixel as Float)
    }
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &Scene, camera: &PinholeCamera,
              integrator: &dyn Integrator) -> Bitmap {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Bitmap::new(0, 0);
        }

        let blocks_x = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks_y = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let total_blocks = blocks_x * blocks_y;

        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let output = Arc::new(Mutex::new(Bitmap::new(width, height)));
        let next_block = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let output = Arc::clone(&output);
                let next_block = Arc::clone(&next_block);
                let progress = progress.clone();
                scope.spawn(move || {
                    loop {
                        let block_index =
                            next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * BLOCK_SIZE;
                        let y0 = by * BLOCK_SIZE;
                        let x1 = (x0 + BLOCK_SIZE).min(width);
                        let y1 = (y0 + BLOCK_SIZE).min(height);

                        let mut block =
                            vec![Vector3f::zeros(); (x1 - x0) * (y1 - y0)];
                        for y in y0..y1 {
                            for x in x0..x1 {
                                block[(x - x0) + (x1 - x0) * (y - y0)] =
                                    self.render_pixel(scene, camera,
                                                      integrator, x, y);
                            }
                        }

                        let mut bitmap = match output.lock() {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                        for y in y0..y1 {
                            for x in x0..x1 {
                                bitmap[(x, y)] =
                                    block[(x - x0) + (x1 - x0) * (y - y0)];
                            }
                        }
                        progress.inc(1);
                    }
                });
            }
        });
        progress.finish_and_clear();

        match Arc::try_unwrap(output) {
            Ok(mutex) => match mutex.into_inner() {
                Ok(bitmap) => bitmap,
                Err(poisoned) => poisoned.into_inner(),
            },
            Err(arc) => arc.lock()
                .map(|bitmap| bitmap.clone())
                .unwrap_or_else(|poisoned| poisoned.into_inner().clone()),
        }
    }
}
