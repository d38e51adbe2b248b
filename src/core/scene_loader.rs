// Copyright @yucwang 2026

use crate::core::scene::Scene;
use crate::io::obj_utils::{load_mesh_groups_from_file, ObjLoadError};
use crate::materials::{GlassBsdf, LambertBsdf, Material, MirrorBsdf};
use crate::math::constants::Vector3f;
use std::path::Path;
use std::sync::Arc;

// Material and emission assignment by OBJ material name. The model files
// this renderer consumes follow the usual Cornell-box naming: colored
// walls, a `light` group, and `glass`/`water` or `mirror` groups for the
// specular pieces. Unknown names fall back to a neutral gray diffuse.
fn material_for_name(name: Option<&str>) -> (Material, Option<Vector3f>) {
    let lower = name.unwrap_or("").to_ascii_lowercase();

    if lower.contains("light") {
        let material =
            Material::Lambert(LambertBsdf::new(Vector3f::new(0.8, 0.8, 0.8)));
        return (material, Some(Vector3f::new(34.0, 24.0, 8.0)));
    }
    if lower.contains("glass") || lower.contains("water") {
        return (Material::Glass(
            GlassBsdf::new(Vector3f::new(1.0, 1.0, 1.0), 1.5)), None);
    }
    if lower.contains("mirror") || lower.contains("metal") {
        return (Material::Mirror(
            MirrorBsdf::new(Vector3f::new(0.9, 0.9, 0.9))), None);
    }
    if lower.contains("red") || lower.contains("left") {
        return (Material::Lambert(
            LambertBsdf::new(Vector3f::new(0.8, 0.05, 0.05))), None);
    }
    if lower.contains("green") || lower.contains("right") {
        return (Material::Lambert(
            LambertBsdf::new(Vector3f::new(0.05, 0.8, 0.05))), None);
    }

    (Material::Lambert(LambertBsdf::new(Vector3f::new(0.8, 0.8, 0.8))), None)
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, ObjLoadError> {
    let groups = load_mesh_groups_from_file(path)?;

    let mut scene = Scene::new();
    for group in groups {
        let (material, emission) =
            material_for_name(group.material_name.as_deref());
        let material = Arc::new(material);
        for triangle in group.triangles {
            scene.add_primitive(triangle, material.clone(), emission);
        }
    }

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::material_for_name;
    use crate::core::bsdf::MaterialKind;

    #[test]
    fn test_name_table() {
        let (light, emission) = material_for_name(Some("ceilingLight"));
        assert_eq!(light.kind(), MaterialKind::Diffuse);
        assert!(emission.is_some());

        let (water, emission) = material_for_name(Some("water"));
        assert_eq!(water.kind(), MaterialKind::Specular);
        assert!(emission.is_none());

        let (unknown, emission) = material_for_name(None);
        assert_eq!(unknown.kind(), MaterialKind::Diffuse);
        assert!(emission.is_none());
    }
}
