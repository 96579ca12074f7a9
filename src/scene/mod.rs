//! Scene model: meshes, camera, light, and the RON scene description
//!
//! A scene file lists mesh entries (OBJ path, optional texture path,
//! transform, spin), the camera start state, and the light direction.
//! Entries that fail to load are reported and skipped.

mod camera;
mod mesh;

pub use camera::*;
pub use mesh::*;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::raster::{Color, Light, Texture, Vec3};

/// One mesh entry in a scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshEntry {
    pub obj: PathBuf,
    #[serde(default)]
    pub texture: Option<PathBuf>,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub spin: Vec3,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn default_camera_direction() -> Vec3 {
    Vec3::FORWARD
}

fn default_light_direction() -> Vec3 {
    Vec3::FORWARD
}

/// On-disk scene description (RON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub meshes: Vec<MeshEntry>,
    #[serde(default)]
    pub camera_position: Vec3,
    #[serde(default = "default_camera_direction")]
    pub camera_direction: Vec3,
    #[serde(default = "default_light_direction")]
    pub light_direction: Vec3,
}

/// Everything the pipeline reads each frame
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub camera: Camera,
    pub light: Light,
}

impl Scene {
    /// Load a scene from a RON file. Mesh paths are resolved relative to
    /// the scene file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let config: SceneConfig = ron::from_str(&source)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::from_config(&config, base))
    }

    /// Build a scene from a parsed config, skipping entries that fail
    pub fn from_config(config: &SceneConfig, base: &Path) -> Self {
        let mut meshes = Vec::with_capacity(config.meshes.len());

        for entry in &config.meshes {
            let obj_path = base.join(&entry.obj);
            let mut mesh = match Mesh::load_obj(&obj_path) {
                Ok(mesh) => mesh,
                Err(e) => {
                    eprintln!("Skipping mesh: {}", e);
                    continue;
                }
            };

            mesh.scale = entry.scale;
            mesh.translation = entry.translation;
            mesh.rotation = entry.rotation;
            mesh.spin = entry.spin;

            if let Some(tex_path) = &entry.texture {
                match Texture::from_file(base.join(tex_path)) {
                    Ok(tex) => {
                        println!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
                        mesh.texture = Some(tex);
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }

            println!(
                "Loaded mesh: {} ({} vertices, {} faces)",
                entry.obj.display(),
                mesh.vertices.len(),
                mesh.faces.len()
            );
            meshes.push(mesh);
        }

        Self {
            meshes,
            camera: Camera::new(config.camera_position, config.camera_direction),
            light: Light::new(config.light_direction),
        }
    }

    /// Asset-free fallback: a spinning textured cube in front of the camera
    pub fn demo() -> Self {
        let mut cube = Mesh::cube()
            .with_texture(Texture::checkerboard(64, 64, Color::WHITE, Color::new(40, 40, 160)));
        cube.translation = Vec3::new(0.0, 0.0, 5.0);
        cube.spin = Vec3::new(0.4, 0.6, 0.0);

        Self {
            meshes: vec![cube],
            camera: Camera::default(),
            light: Light::new(Vec3::FORWARD),
        }
    }
}
