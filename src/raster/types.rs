//! Core types for the renderer

use super::math::Vec3;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const GREY: Color = Color { r: 51, g: 51, b: 51, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Apply shading (multiply by intensity, clamped to 0.0-1.0)
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Convert to u32 (RGBA)
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
    }

    /// Convert to [u8; 4] for the framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
        }
    }

    /// Load a texture from an image file (PNG/JPEG/BMP)
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Load a texture from raw encoded bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, String> {
        use image::GenericImageView;

        let img = image::load_from_memory(bytes)
            .map_err(|e| format!("Failed to decode image: {}", e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Nearest-neighbor sample at UV coordinates, clamped to the texture
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let tx = ((u * self.width as f32) as i32).clamp(0, self.width as i32 - 1) as usize;
        let ty = ((v * self.height as f32) as i32).clamp(0, self.height as i32 - 1) as usize;
        self.pixels[ty * self.width + tx]
    }
}

/// What the renderer draws per triangle. A settable value with no
/// transitions of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe,
    WireframeVertices,
    Filled,
    FilledWireframe,
    Textured,
    TexturedWireframe,
}

impl RenderMode {
    pub fn draws_filled(self) -> bool {
        matches!(self, RenderMode::Filled | RenderMode::FilledWireframe)
    }

    pub fn draws_texture(self) -> bool {
        matches!(self, RenderMode::Textured | RenderMode::TexturedWireframe)
    }

    pub fn draws_wireframe(self) -> bool {
        matches!(
            self,
            RenderMode::Wireframe
                | RenderMode::WireframeVertices
                | RenderMode::FilledWireframe
                | RenderMode::TexturedWireframe
        )
    }

    pub fn draws_vertices(self) -> bool {
        matches!(self, RenderMode::WireframeVertices)
    }
}

/// Backface culling selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Backface,
}

/// Directional light. The direction points from the light toward the
/// scene and carries no position.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub direction: Vec3,
}

impl Light {
    pub fn new(direction: Vec3) -> Self {
        Self { direction: direction.normalize() }
    }

    /// Flat-shading intensity for a face normal, clamped to [0, 1]
    pub fn intensity(&self, normal: Vec3) -> f32 {
        (-normal.dot(self.direction)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_clamps_intensity() {
        let c = Color::new(100, 200, 50);
        assert_eq!(c.shade(2.0), c);
        assert_eq!(c.shade(-1.0), Color::new(0, 0, 0));
    }

    #[test]
    fn test_shade_halves_channels() {
        let c = Color::new(100, 200, 50).shade(0.5);
        assert_eq!(c, Color::new(50, 100, 25));
    }

    #[test]
    fn test_sample_clamps_out_of_range_uv() {
        let tex = Texture::checkerboard(8, 8, Color::WHITE, Color::BLACK);
        // Out-of-range UVs clamp to the border texel instead of wrapping
        assert_eq!(tex.sample(-0.5, 0.0), tex.sample(0.0, 0.0));
        assert_eq!(tex.sample(1.5, 0.99), tex.sample(0.99, 0.99));
    }

    #[test]
    fn test_light_intensity_anti_parallel_is_full() {
        let light = Light::new(Vec3::new(0.0, 0.0, 1.0));
        assert!((light.intensity(Vec3::new(0.0, 0.0, -1.0)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_light_intensity_parallel_clamps_to_zero() {
        let light = Light::new(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(light.intensity(Vec3::new(0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn test_render_mode_predicates() {
        assert!(RenderMode::Filled.draws_filled());
        assert!(!RenderMode::Filled.draws_wireframe());
        assert!(RenderMode::TexturedWireframe.draws_texture());
        assert!(RenderMode::TexturedWireframe.draws_wireframe());
        assert!(RenderMode::WireframeVertices.draws_vertices());
        assert!(!RenderMode::Wireframe.draws_texture());
    }
}
