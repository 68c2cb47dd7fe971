//! Wavefront OBJ import.
//!
//! Loads a triangulated OBJ (plus the diffuse colors of its MTL libraries)
//! into a [`PolygonBuffer`]; every material becomes a 1x1 texture. Vertex
//! UVs are scaled to the texel space of the polygon's texture.

use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use log::info;
use obj::raw::{RawObj, material::MtlColor, object::Polygon as RawPolygon, parse_mtl, parse_obj};
use thiserror::Error;

use super::{Polygon, PolygonBuffer, Vertex};
use crate::{
    bitmap::Bitmap,
    maths::{Vec2f, Vec3f},
};

/// Material color for polygons outside every MTL group.
pub const DEFAULT_DIFFUSE: u32 = 0xff99_9999;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed obj/mtl: {0}")]
    Parse(#[from] obj::ObjError),
    #[error("polygon with {0} corners; triangulate the model first")]
    NotTriangulated(usize),
    #[error("material {0:?} has no rgb diffuse color")]
    UnsupportedMaterial(String),
}

pub fn import_polygons<P: AsRef<Path>>(obj_path: P) -> Result<PolygonBuffer<u32>, ImportError> {
    let obj = parse_obj(BufReader::new(File::open(&obj_path)?))?;

    info!(
        "loading {} from {}: {} polygons, {} positions",
        obj.name.as_deref().unwrap_or("unnamed object"),
        obj_path.as_ref().display(),
        obj.polygons.len(),
        obj.positions.len(),
    );

    let mut buf = PolygonBuffer::new();
    let mtls = load_materials_diffuse(&obj_path, &obj.material_libraries, &mut buf)?;
    let default_texture = buf.add_texture(Bitmap::filled(1, 1, DEFAULT_DIFFUSE));

    // Texture of each polygon, from its OBJ material group.
    let mut textures = vec![default_texture; obj.polygons.len()];
    for (name, group) in obj.meshes.iter() {
        if let Some(&texture) = mtls.get(name) {
            for range in group.polygons.iter() {
                textures[range.start..range.end].fill(texture);
            }
        }
    }

    for (i, poly) in obj.polygons.iter().enumerate() {
        let mut verts = match poly {
            RawPolygon::P(v) if v.len() == 3 => {
                [0, 1, 2].map(|k| vertex(&obj, v[k], None))
            }
            RawPolygon::PT(v) if v.len() == 3 => {
                [0, 1, 2].map(|k| vertex(&obj, v[k].0, Some(v[k].1)))
            }
            RawPolygon::PN(v) if v.len() == 3 => {
                [0, 1, 2].map(|k| vertex(&obj, v[k].0, None))
            }
            RawPolygon::PTN(v) if v.len() == 3 => {
                [0, 1, 2].map(|k| vertex(&obj, v[k].0, Some(v[k].1)))
            }
            RawPolygon::P(v) => return Err(ImportError::NotTriangulated(v.len())),
            RawPolygon::PT(v) => return Err(ImportError::NotTriangulated(v.len())),
            RawPolygon::PN(v) => return Err(ImportError::NotTriangulated(v.len())),
            RawPolygon::PTN(v) => return Err(ImportError::NotTriangulated(v.len())),
        };

        let texture = &buf.textures[textures[i]];
        let scale = Vec2f::new((texture.width() - 1) as f32, (texture.height() - 1) as f32);
        for v in verts.iter_mut() {
            v.texture = Vec2f::new(v.texture.x * scale.x, v.texture.y * scale.y);
        }

        buf.polys.push(Polygon::new(verts, textures[i]));
    }

    Ok(buf)
}

fn vertex(obj: &RawObj, position: usize, tex_coord: Option<usize>) -> Vertex {
    let (x, y, z, _) = obj.positions[position];
    let mut vert = Vertex::new(Vec3f::new(x, y, z), Vec2f::new(0., 0.));
    if let Some(t) = tex_coord {
        let (u, v, _) = obj.tex_coords[t];
        vert.texture = Vec2f::new(u, v);
    }
    vert
}

fn load_materials_diffuse<P: AsRef<Path>>(
    obj_path: P,
    libraries: &[String],
    buf: &mut PolygonBuffer<u32>,
) -> Result<HashMap<String, usize>, ImportError> {
    let mut mtls = HashMap::new();
    let dir = obj_path.as_ref().parent().unwrap_or(Path::new("."));
    for library in libraries {
        let path = dir.join(library);
        let mut mtl = parse_mtl(BufReader::new(File::open(&path)?))?;

        info!(
            "loading materials from {}: {} entries",
            path.display(),
            mtl.materials.len(),
        );

        for (name, material) in mtl.materials.drain() {
            match material.diffuse {
                Some(MtlColor::Rgb(r, g, b)) => {
                    let color = 0xff00_0000
                        | (((r * 255.) as u32) << 16)
                        | (((g * 255.) as u32) << 8)
                        | ((b * 255.) as u32);
                    mtls.insert(name, buf.add_texture(Bitmap::filled(1, 1, color)));
                }
                _ => return Err(ImportError::UnsupportedMaterial(name)),
            }
        }
    }
    Ok(mtls)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_DIFFUSE, ImportError, import_polygons};
    use std::{env, fs};

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn imports_a_textured_triangle() {
        let path = write_temp(
            "softpipe_tri.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n",
        );
        let buf = import_polygons(&path).unwrap();
        assert_eq!(buf.len(), 1);
        let poly = &buf.polys[0];
        assert_eq!(poly.verts[1].model.x, 1.);
        // Ungrouped polygons use the 1x1 default diffuse, so UVs collapse
        // onto its only texel.
        assert_eq!(buf.textures[poly.texture].get(0, 0), DEFAULT_DIFFUSE);
        assert_eq!(poly.verts[1].texture.x, 0.);
    }

    #[test]
    fn refuses_quads() {
        let path = write_temp(
            "softpipe_quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );
        assert!(matches!(
            import_polygons(&path),
            Err(ImportError::NotTriangulated(4))
        ));
    }
}
