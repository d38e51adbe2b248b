use std::fs;
use std::path::Path;

use wavefront_obj::{obj, ParseError};
use std::fmt;

use crate::math::constants::Vector3f;
use crate::shapes::triangle::Triangle;

#[derive(Debug)]
pub enum ObjLoadError {
    Io(std::io::Error),
    Parse(ParseError),
}

impl From<std::io::Error> for ObjLoadError {
    fn from(err: std::io::Error) -> Self {
        ObjLoadError::Io(err)
    }
}

impl From<ParseError> for ObjLoadError {
    fn from(err: ParseError) -> Self {
        ObjLoadError::Parse(err)
    }
}

impl fmt::Display for ObjLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjLoadError::Io(err) => write!(f, "io error: {}", err),
            ObjLoadError::Parse(err) => write!(f, "parse error: {}", err),
        }
    }
}

impl std::error::Error for ObjLoadError {}

// One group of triangles sharing an OBJ material name.
pub struct MeshGroup {
    pub material_name: Option<String>,
    pub triangles: Vec<Triangle>,
}

pub fn load_obj_from_str<S: AsRef<str>>(input: S)
    -> Result<obj::ObjSet, ParseError> {
    let triangulated = triangulate_faces(input.as_ref());
    obj::parse(triangulated)
}

pub fn load_obj_from_file<P: AsRef<Path>>(path: P)
    -> Result<obj::ObjSet, ObjLoadError> {
    let data = fs::read_to_string(path)?;
    let obj_set = load_obj_from_str(data)?;
    Ok(obj_set)
}

// Flatten an OBJ set into per-material triangle groups, interpolating
// vertex normals when the file provides them.
pub fn load_mesh_groups_from_file<P: AsRef<Path>>(path: P)
    -> Result<Vec<MeshGroup>, ObjLoadError> {
    let obj_set = load_obj_from_file(path)?;

    let mut groups = Vec::new();
    for object in &obj_set.objects {
        for geometry in &object.geometry {
            let mut triangles = Vec::new();
            for shape in &geometry.shapes {
                let obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                    continue;
                };

                let p0 = vertex_to_vector(&object.vertices[a.0]);
                let p1 = vertex_to_vector(&object.vertices[b.0]);
                let p2 = vertex_to_vector(&object.vertices[c.0]);

                let triangle = match (a.2, b.2, c.2) {
                    (Some(na), Some(nb), Some(nc)) => Triangle::with_normals(
                        p0, p1, p2,
                        vertex_to_vector(&object.normals[na]).normalize(),
                        vertex_to_vector(&object.normals[nb]).normalize(),
                        vertex_to_vector(&object.normals[nc]).normalize(),
                    ),
                    _ => Triangle::new(p0, p1, p2),
                };
                triangles.push(triangle);
            }

            if !triangles.is_empty() {
                groups.push(MeshGroup {
                    material_name: geometry.material_name.clone(),
                    triangles,
                });
            }
        }
    }

    log::info!("OBJ loaded: {} mesh groups.", groups.len());
    Ok(groups)
}

fn vertex_to_vector(v: &obj::Vertex) -> Vector3f {
    Vector3f::new(v.x as f32, v.y as f32, v.z as f32)
}

fn triangulate_faces(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("f ") || trimmed.starts_with("f\t") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() > 4 {
                let base = parts[1];
                for i in 2..(parts.len() - 1) {
                    out.push_str("f ");
                    out.push_str(base);
                    out.push(' ');
                    out.push_str(parts[i]);
                    out.push(' ');
                    out.push_str(parts[i + 1]);
                    out.push('\n');
                }
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
