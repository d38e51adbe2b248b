// Copyright @yucwang 2026

use crate::core::kdtree::KdTree;
use crate::math::constants::{Float, Vector3f};

// One deposited light-path sample. `wi` points back toward where the
// light came from, i.e. the negated ray direction at the deposit.
#[derive(Debug, Clone, Copy)]
pub struct Photon {
    pub power: Vector3f,
    pub position: Vector3f,
    pub wi: Vector3f,
}

impl Photon {
    pub fn new(power: Vector3f, position: Vector3f, wi: Vector3f) -> Self {
        Self { power, position, wi }
    }
}

// Append-once photon store with a k-d tree over the photon positions.
// `build` must run exactly once after `set_photons`; the tree indexes the
// photon array in identical order.
pub struct PhotonMap {
    photons: Vec<Photon>,
    tree: Option<KdTree>,
}

impl Default for PhotonMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotonMap {
    pub fn new() -> Self {
        Self { photons: Vec::new(), tree: None }
    }

    pub fn set_photons(&mut self, photons: Vec<Photon>) {
        self.photons = photons;
        self.tree = None;
    }

    pub fn build(&mut self) {
        let positions: Vec<Vector3f> =
            self.photons.iter().map(|photon| photon.position).collect();
        self.tree = Some(KdTree::build(&positions));
    }

    pub fn size(&self) -> usize {
        self.photons.len()
    }

    pub fn ith_photon(&self, index: usize) -> &Photon {
        &self.photons[index]
    }

    pub fn query_k_nearest_photons(&self, position: &Vector3f, k: usize)
        -> (Vec<usize>, Float) {
        match &self.tree {
            Some(tree) => tree.knn(position, k),
            None => {
                log::error!("Photon map queried before build!");
                (Vec::new(), 0.0)
            }
        }
    }
}
