// Copyright @yucwang 2021

use crate::core::integrator::Integrator;
use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;
use crate::sensors::perspective::PinholeCamera;

pub trait Renderer {
    fn render(&self, scene: &Scene, camera: &PinholeCamera,
              integrator: &dyn Integrator) -> Bitmap;
}
