//! OBJ parser producing flat interleaved 3D mesh data.
//!
//! Supports `v`/`vt`/`vn`/`f` directives, 1-based and negative indices,
//! and arbitrary slash combinations per face element. Faces with more
//! than three vertices are fan-triangulated. Missing normals are
//! replaced by the face normal; missing UVs by (0, 0).

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use math::{Vec2, Vec3};

use crate::mesh::MeshData3D;
use crate::vertex::{Tri3D, Vert3D};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshData3D> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.as_ref().display()))?;
    parse_obj(BufReader::new(file))
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<MeshData3D> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(reader: R) -> Result<MeshData3D> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut texcoords: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut mesh = MeshData3D::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let tag = parts
            .next()
            .ok_or_else(|| anyhow!("Malformed OBJ line {}: '{}'", line_no + 1, trimmed))?;

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "v coordinate")?;
                texcoords.push(Vec2::new(u, v));
            }
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                normals.push(Vec3::new(nx, ny, nz));
            }
            "f" => {
                let mut corners: Vec<FaceVertex> = Vec::new();
                for part in parts {
                    corners.push(parse_face_vertex(
                        part,
                        positions.len(),
                        texcoords.len(),
                        normals.len(),
                        line_no,
                    )?);
                }
                if corners.len() < 3 {
                    continue;
                }
                // Triangulate fan
                for i in 1..(corners.len() - 1) {
                    let tri = build_triangle(
                        [corners[0], corners[i], corners[i + 1]],
                        &positions,
                        &texcoords,
                        &normals,
                    );
                    mesh.add_triangle(tri);
                }
            }
            _ => {
                // Ignore other directives (o/g/s/usemtl/etc.)
            }
        }
    }

    if mesh.triangles == 0 {
        anyhow::bail!("OBJ contained no triangles");
    }

    log::debug!(
        "Parsed OBJ: {} triangles, {} floats",
        mesh.triangles,
        mesh.data.len()
    );
    Ok(mesh)
}

#[derive(Clone, Copy, Debug)]
struct FaceVertex {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

fn build_triangle(
    corners: [FaceVertex; 3],
    positions: &[Vec3],
    texcoords: &[Vec2],
    normals: &[Vec3],
) -> Tri3D {
    let p = [
        positions[corners[0].position],
        positions[corners[1].position],
        positions[corners[2].position],
    ];
    // Counter-clockwise face normal for corners without a vn reference.
    let face_normal = (p[1] - p[0]).cross(p[2] - p[0]).normalized();

    let mut tri = Tri3D::default();
    for i in 0..3 {
        let uv = corners[i].uv.map_or(Vec2::ZERO, |idx| texcoords[idx]);
        let normal = corners[i].normal.map_or(face_normal, |idx| normals[idx]);
        tri.v[i] = Vert3D::new(p[i], uv, normal);
    }
    tri
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> Result<f32> {
    let token = value.ok_or_else(|| anyhow!("Missing {} on line {}", what, line_no + 1))?;
    token
        .parse::<f32>()
        .with_context(|| format!("Failed to parse {} on line {}", what, line_no + 1))
}

fn parse_face_vertex(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
    line_no: usize,
) -> Result<FaceVertex> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .ok_or_else(|| anyhow!("Malformed face element '{}' on line {}", token, line_no + 1))?;
    let position = resolve_index(pos, pos_count, line_no)?;

    let uv = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, tex_count, line_no)?),
        _ => None,
    };

    let normal = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, norm_count, line_no)?),
        _ => None,
    };

    Ok(FaceVertex { position, uv, normal })
}

fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize> {
    let raw = token
        .parse::<i32>()
        .with_context(|| format!("Invalid index '{}' on line {}", token, line_no + 1))?;
    if raw == 0 {
        anyhow::bail!("OBJ indices are 1-based; found 0 on line {}", line_no + 1);
    }

    let idx = if raw > 0 {
        (raw - 1) as isize
    } else {
        (len as isize) + (raw as isize)
    };

    if idx < 0 || idx as usize >= len {
        anyhow::bail!(
            "OBJ index {} resolved out of bounds (len={}) on line {}",
            raw,
            len,
            line_no + 1
        );
    }

    Ok(idx as usize)
}
