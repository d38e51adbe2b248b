// Copyright 2020 TwoCookingMice

#![allow(dead_code)]

pub extern crate nalgebra as na;

mod core;
mod emitters;
mod io;
mod integrators;
mod materials;
mod math;
mod renderers;
mod sensors;
mod shapes;

use self::core::integrator::Integrator;
use self::core::scene_loader::load_scene;
use self::integrators::photon_map::PhotonMapIntegrator;
use self::io::ppm_utils;
use self::math::constants::{Float, PI, Vector3f};
use self::renderers::simple::{Renderer, SimpleRenderer};
use self::sensors::perspective::PinholeCamera;

use std::env;
use std::process;
use std::str::FromStr;

const SCENE_PATH: &str = "cornellbox-water.obj";
const OUTPUT_PATH: &str = "output.ppm";
const DEFAULT_SEED: u64 = 42;

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <width> <height> <spp> <n_photons_global> \
         <n_estimation_global> <n_photons_caustics_multiplier> \
         <n_estimation_caustics> <final_gathering_depth> <max_depth> [seed]",
        program);
    process::exit(1);
}

fn parse_arg<T: FromStr>(args: &[String], index: usize, name: &str) -> T {
    match args.get(index).and_then(|value| value.parse::<T>().ok()) {
        Some(value) => value,
        None => {
            eprintln!("Invalid or missing argument <{}>.", name);
            usage(&args[0]);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 10 {
        usage(args.get(0).map(String::as_str).unwrap_or("praline"));
    }

    let width: usize = parse_arg(&args, 1, "width");
    let height: usize = parse_arg(&args, 2, "height");
    let n_samples: u32 = parse_arg(&args, 3, "spp");
    let n_photons_global: usize = parse_arg(&args, 4, "n_photons_global");
    let n_estimation_global: usize =
        parse_arg(&args, 5, "n_estimation_global");
    let n_photons_caustics_multiplier: Float =
        parse_arg(&args, 6, "n_photons_caustics_multiplier");
    let n_estimation_caustics: usize =
        parse_arg(&args, 7, "n_estimation_caustics");
    let final_gathering_depth: u32 =
        parse_arg(&args, 8, "final_gathering_depth");
    let max_depth: u32 = parse_arg(&args, 9, "max_depth");
    let seed: u64 = args.get(10)
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    if width == 0 || height == 0 || n_samples == 0 || max_depth == 0
        || n_estimation_global == 0 || n_estimation_caustics == 0 {
        usage(&args[0]);
    }

    let camera = PinholeCamera::new(
        Vector3f::new(0.0, 1.0, 6.0),
        Vector3f::new(0.0, 1.0, 5.0),
        Vector3f::new(0.0, 1.0, 0.0),
        0.25 * PI,
        width as Float / height as Float,
    );

    let mut scene = match load_scene(SCENE_PATH) {
        Ok(scene) => scene,
        Err(err) => {
            log::error!("Failed to load scene {}: {}", SCENE_PATH, err);
            process::exit(1);
        }
    };
    scene.build();

    // photon tracing and build photon map
    let mut integrator = PhotonMapIntegrator::new(
        n_photons_global,
        n_estimation_global,
        n_photons_caustics_multiplier,
        n_estimation_caustics,
        final_gathering_depth,
        max_depth,
    );
    integrator.build(&scene, seed);

    log::info!("Tracing rays from camera...");
    let renderer = SimpleRenderer::new(width, height, n_samples, seed);
    let mut image = renderer.render(&scene, &camera, &integrator);

    image.gamma_correction(2.2);
    if let Err(err) = ppm_utils::write_ppm_to_file(&image, OUTPUT_PATH) {
        log::error!("Failed to write {}: {}", OUTPUT_PATH, err);
        process::exit(1);
    }
}
