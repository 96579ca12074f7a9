//! Mesh and face data plus the OBJ loader
//!
//! Topology is append-only at load time and immutable afterwards; only
//! the transform fields mutate per frame. Face indices are 0-based
//! everywhere in the engine - the loader normalizes OBJ's 1-based
//! indices and validates them before a mesh is handed to the renderer.

use crate::raster::{Color, Texture, Vec2, Vec3};

/// A triangular face: three vertex indices into the owning mesh plus a
/// texture coordinate per corner and a flat color.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub a_uv: Vec2,
    pub b_uv: Vec2,
    pub c_uv: Vec2,
    pub color: Color,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            a,
            b,
            c,
            a_uv: Vec2::default(),
            b_uv: Vec2::default(),
            c_uv: Vec2::default(),
            color: Color::WHITE,
        }
    }

    pub fn with_uvs(mut self, a_uv: Vec2, b_uv: Vec2, c_uv: Vec2) -> Self {
        self.a_uv = a_uv;
        self.b_uv = b_uv;
        self.c_uv = c_uv;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// A mesh: vertices, faces, a per-mesh transform, and an optional texture
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub scale: Vec3,
    pub translation: Vec3,
    pub rotation: Vec3,
    /// Rotation applied per second by the demo update loop (radians)
    pub spin: Vec3,
    pub texture: Option<Texture>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            faces,
            scale: Vec3::ONE,
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Load a mesh from a Wavefront OBJ file
    pub fn load_obj<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_obj_str(&source)
            .map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Parse OBJ source: `v` positions, `vt` texture coordinates, and
    /// triangulated `f` lines (`v`, `v/t`, `v/t/n`, or `v//n` corners).
    /// The V texture component is flipped because V grows downwards in
    /// texture space. Indices are normalized to 0-based and validated.
    pub fn from_obj_str(source: &str) -> Result<Self, String> {
        let mut vertices: Vec<Vec3> = Vec::new();
        let mut tex_coords: Vec<Vec2> = Vec::new();
        let mut faces: Vec<Face> = Vec::new();

        for (line_no, line) in source.lines().enumerate() {
            let line = line.trim();
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("v") => {
                    let mut read = || -> Result<f32, String> {
                        parts
                            .next()
                            .ok_or_else(|| format!("line {}: short vertex", line_no + 1))?
                            .parse::<f32>()
                            .map_err(|e| format!("line {}: {}", line_no + 1, e))
                    };
                    let (x, y, z) = (read()?, read()?, read()?);
                    vertices.push(Vec3::new(x, y, z));
                }
                Some("vt") => {
                    let mut read = || -> Result<f32, String> {
                        parts
                            .next()
                            .ok_or_else(|| format!("line {}: short texcoord", line_no + 1))?
                            .parse::<f32>()
                            .map_err(|e| format!("line {}: {}", line_no + 1, e))
                    };
                    let (u, v) = (read()?, read()?);
                    tex_coords.push(Vec2::new(u, 1.0 - v));
                }
                Some("f") => {
                    let corners: Vec<&str> = parts.collect();
                    if corners.len() != 3 {
                        return Err(format!(
                            "line {}: face with {} corners; only triangulated meshes are supported",
                            line_no + 1,
                            corners.len()
                        ));
                    }

                    let mut indices = [0usize; 3];
                    let mut uvs = [Vec2::default(); 3];
                    for (i, corner) in corners.iter().enumerate() {
                        let mut fields = corner.split('/');
                        let v_idx: usize = fields
                            .next()
                            .unwrap_or_default()
                            .parse()
                            .map_err(|e| format!("line {}: {}", line_no + 1, e))?;
                        if v_idx == 0 || v_idx > vertices.len() {
                            return Err(format!(
                                "line {}: vertex index {} out of range (1-{})",
                                line_no + 1,
                                v_idx,
                                vertices.len()
                            ));
                        }
                        indices[i] = v_idx - 1;

                        if let Some(t) = fields.next().filter(|t| !t.is_empty()) {
                            let t_idx: usize = t
                                .parse()
                                .map_err(|e| format!("line {}: {}", line_no + 1, e))?;
                            if t_idx == 0 || t_idx > tex_coords.len() {
                                return Err(format!(
                                    "line {}: texcoord index {} out of range (1-{})",
                                    line_no + 1,
                                    t_idx,
                                    tex_coords.len()
                                ));
                            }
                            uvs[i] = tex_coords[t_idx - 1];
                        }
                    }

                    faces.push(
                        Face::new(indices[0], indices[1], indices[2])
                            .with_uvs(uvs[0], uvs[1], uvs[2]),
                    );
                }
                _ => {}
            }
        }

        Ok(Mesh::new(vertices, faces))
    }

    /// Built-in unit cube so the demo runs with no assets on disk
    pub fn cube() -> Self {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];

        // UV corners shared by both triangles of each cube side
        let uv_a = [Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        let uv_b = [Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];

        let quads: [[usize; 4]; 6] = [
            [0, 1, 2, 3], // front
            [3, 2, 4, 5], // right
            [5, 4, 6, 7], // back
            [7, 6, 1, 0], // left
            [1, 6, 4, 2], // top
            [5, 7, 0, 3], // bottom
        ];

        let mut faces = Vec::with_capacity(12);
        for [a, b, c, d] in quads {
            faces.push(Face::new(a, b, c).with_uvs(uv_a[0], uv_a[1], uv_a[2]));
            faces.push(Face::new(a, c, d).with_uvs(uv_b[0], uv_b[1], uv_b[2]));
        }

        Mesh::new(vertices, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJ: &str = "\
# comment
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1 2/2 3/3
";

    #[test]
    fn test_obj_parse_normalizes_to_zero_based() {
        let mesh = Mesh::from_obj_str(OBJ).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces.len(), 1);
        let f = mesh.faces[0];
        assert_eq!((f.a, f.b, f.c), (0, 1, 2));
    }

    #[test]
    fn test_obj_parse_flips_v() {
        let mesh = Mesh::from_obj_str(OBJ).unwrap();
        let f = mesh.faces[0];
        assert_eq!(f.a_uv, Vec2::new(0.0, 1.0));
        assert_eq!(f.b_uv, Vec2::new(1.0, 1.0));
        assert_eq!(f.c_uv, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_obj_face_without_texcoords() {
        let mesh = Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.faces[0].a_uv, Vec2::default());
    }

    #[test]
    fn test_obj_normal_only_corner() {
        let mesh = Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//1 2//1 3//1\n").unwrap();
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn test_obj_out_of_range_index_is_rejected() {
        let err = Mesh::from_obj_str("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(err.contains("out of range"), "unexpected error: {}", err);
    }

    #[test]
    fn test_obj_non_triangle_face_is_rejected() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let err = Mesh::from_obj_str(src).unwrap_err();
        assert!(err.contains("4 corners"), "unexpected error: {}", err);
    }

    #[test]
    fn test_cube_topology() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.faces.len(), 12);
        for f in &cube.faces {
            assert!(f.a < 8 && f.b < 8 && f.c < 8);
        }
    }
}
