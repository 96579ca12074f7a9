//! Geometry-to-pixels pipeline
//!
//! Per mesh, per face: world/view transform -> backface cull -> flat
//! lighting -> frustum clip -> perspective projection -> depth-tested
//! rasterization (flat or textured), with optional wireframe and
//! vertex-marker overlays on top.

use super::clip::{Frustum, PolyVertex, Polygon};
use super::framebuffer::Framebuffer;
use super::math::{Mat4, Vec2, Vec3, Vec4};
use super::types::{Color, CullMode, Light, RenderMode, Texture};
use crate::scene::{Camera, Mesh};

/// Below this |w| a vertex sits on the camera plane and cannot be
/// divided; the face or fragment is dropped instead.
const W_EPSILON: f32 = 1e-5;

pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_3;
pub const DEFAULT_ZNEAR: f32 = 0.1;
pub const DEFAULT_ZFAR: f32 = 100.0;

/// Screen-space triangle ready for rasterization. Each point carries
/// screen x/y, NDC depth (0 = near, 1 = far), and the clip-space w used
/// for perspective correction.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub points: [Vec4; 3],
    pub uvs: [Vec2; 3],
    pub color: Color,
}

/// Owns the projection state, the frustum, and the render/cull modes.
/// The per-frame triangle list is scratch storage reused across frames.
pub struct Renderer {
    width: usize,
    height: usize,
    fov_y: f32,
    znear: f32,
    zfar: f32,
    projection: Mat4,
    frustum: Frustum,
    pub render_mode: RenderMode,
    pub cull_mode: CullMode,
    triangles: Vec<Triangle>,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_projection(width, height, DEFAULT_FOV_Y, DEFAULT_ZNEAR, DEFAULT_ZFAR)
    }

    pub fn with_projection(
        width: usize,
        height: usize,
        fov_y: f32,
        znear: f32,
        zfar: f32,
    ) -> Self {
        let aspect = width as f32 / height as f32;
        let fov_x = 2.0 * ((fov_y / 2.0).tan() * aspect).atan();
        Self {
            width,
            height,
            fov_y,
            znear,
            zfar,
            projection: Mat4::perspective(fov_y, aspect, znear, zfar),
            frustum: Frustum::new(fov_x, fov_y, znear, zfar),
            render_mode: RenderMode::Textured,
            cull_mode: CullMode::Backface,
            triangles: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rebuild the projection matrix and frustum for a new viewport,
    /// keeping the current render and cull modes
    pub fn resize(&mut self, width: usize, height: usize) {
        let mut next = Self::with_projection(width, height, self.fov_y, self.znear, self.zfar);
        next.render_mode = self.render_mode;
        next.cull_mode = self.cull_mode;
        *self = next;
    }

    /// Project a camera-space point to the viewport: apply the
    /// projection matrix, divide by w, scale by the half-viewport, flip
    /// y (screen rows grow downward), and translate to the center.
    /// Returns screen x/y, NDC z, and clip w; None when w is too close
    /// to zero to divide.
    pub fn project_point(&self, p: Vec3) -> Option<Vec4> {
        let clip = self.projection * Vec4::from_vec3(p);
        if clip.w.abs() < W_EPSILON {
            return None;
        }
        let ndc = clip.project();
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;
        Some(Vec4::new(
            ndc.x * half_w + half_w,
            -ndc.y * half_h + half_h,
            ndc.z,
            clip.w,
        ))
    }

    /// Run the full pipeline for one mesh into the framebuffer
    pub fn draw_mesh(&mut self, fb: &mut Framebuffer, mesh: &Mesh, camera: &Camera, light: Light) {
        let view = camera.view_matrix();
        let world = Mat4::world(mesh.scale, mesh.rotation, mesh.translation);
        let world_view = view * world;

        self.triangles.clear();

        for face in &mesh.faces {
            let a = (world_view * Vec4::from_vec3(mesh.vertices[face.a])).to_vec3();
            let b = (world_view * Vec4::from_vec3(mesh.vertices[face.b])).to_vec3();
            let c = (world_view * Vec4::from_vec3(mesh.vertices[face.c])).to_vec3();

            // Face normal in camera space; counter-clockwise winding as
            // seen from the camera is the front side
            let normal = (b - a).cross(c - a).normalize();
            if normal == Vec3::ZERO {
                continue; // degenerate face
            }

            if self.cull_mode == CullMode::Backface {
                let camera_ray = Vec3::ZERO - a;
                if normal.dot(camera_ray) < 0.0 {
                    continue;
                }
            }

            let color = face.color.shade(light.intensity(normal));

            let polygon = self.frustum.clip_polygon(Polygon::from_triangle(
                PolyVertex::new(a, face.a_uv),
                PolyVertex::new(b, face.b_uv),
                PolyVertex::new(c, face.c_uv),
            ));

            'tri: for corners in polygon.triangles() {
                let mut points = [Vec4::default(); 3];
                let mut uvs = [Vec2::default(); 3];
                for (i, corner) in corners.iter().enumerate() {
                    match self.project_point(corner.pos) {
                        Some(p) => {
                            points[i] = p;
                            uvs[i] = corner.uv;
                        }
                        None => continue 'tri,
                    }
                }
                self.triangles.push(Triangle { points, uvs, color });
            }
        }

        for triangle in &self.triangles {
            if self.render_mode.draws_texture() {
                match &mesh.texture {
                    Some(texture) => draw_textured_triangle(fb, triangle, texture),
                    // No texture bound: fall back to the flat color
                    None => draw_filled_triangle(fb, triangle),
                }
            } else if self.render_mode.draws_filled() {
                draw_filled_triangle(fb, triangle);
            }

            if self.render_mode.draws_wireframe() {
                draw_wireframe_triangle(fb, triangle, Color::WHITE);
            }

            if self.render_mode.draws_vertices() {
                for p in &triangle.points {
                    fb.draw_rect(p.x as i32 - 2, p.y as i32 - 2, 4, 4, Color::RED);
                }
            }
        }
    }
}

/// Fill a screen-space triangle with its flat color
pub fn draw_filled_triangle(fb: &mut Framebuffer, triangle: &Triangle) {
    rasterize(fb, triangle, None);
}

/// Fill a screen-space triangle sampling the texture with
/// perspective-corrected UVs
pub fn draw_textured_triangle(fb: &mut Framebuffer, triangle: &Triangle, texture: &Texture) {
    rasterize(fb, triangle, Some(texture));
}

/// Outline a triangle, ignoring the depth buffer (debug overlay)
pub fn draw_wireframe_triangle(fb: &mut Framebuffer, triangle: &Triangle, color: Color) {
    let [p0, p1, p2] = triangle.points;
    fb.draw_line(p0.x as i32, p0.y as i32, p1.x as i32, p1.y as i32, color);
    fb.draw_line(p1.x as i32, p1.y as i32, p2.x as i32, p2.y as i32, color);
    fb.draw_line(p2.x as i32, p2.y as i32, p0.x as i32, p0.y as i32, color);
}

/// Twice the signed area of triangle (a, b, p); the edge function
fn edge_cross(a: Vec4, b: Vec4, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Bounding-box scan with barycentric weights. Depth and UV are
/// interpolated perspective-correctly: 1/w interpolates linearly in
/// screen space and is inverted per pixel.
fn rasterize(fb: &mut Framebuffer, triangle: &Triangle, texture: Option<&Texture>) {
    let [p0, p1, p2] = triangle.points;

    let area = edge_cross(p0, p1, p2.x, p2.y);
    if area.abs() < 1e-6 {
        return; // zero-area triangle
    }

    let min_x = p0.x.min(p1.x).min(p2.x).max(0.0) as usize;
    let max_x = ((p0.x.max(p1.x).max(p2.x) + 1.0).min(fb.width as f32)).max(0.0) as usize;
    let min_y = p0.y.min(p1.y).min(p2.y).max(0.0) as usize;
    let max_y = ((p0.y.max(p1.y).max(p2.y) + 1.0).min(fb.height as f32)).max(0.0) as usize;

    // w was validated non-zero at projection time
    let inv_w = [1.0 / p0.w, 1.0 / p1.w, 1.0 / p2.w];
    let z_over_w = [p0.z * inv_w[0], p1.z * inv_w[1], p2.z * inv_w[2]];
    let uv_over_w = [
        triangle.uvs[0] * inv_w[0],
        triangle.uvs[1] * inv_w[1],
        triangle.uvs[2] * inv_w[2],
    ];

    for y in min_y..max_y {
        for x in min_x..max_x {
            let (px, py) = (x as f32, y as f32);

            // Dividing by the signed area keeps the weights consistent
            // for either winding
            let alpha = edge_cross(p1, p2, px, py) / area;
            let beta = edge_cross(p2, p0, px, py) / area;
            let gamma = 1.0 - alpha - beta;
            if alpha < 0.0 || beta < 0.0 || gamma < 0.0 {
                continue;
            }

            let one_over_w = alpha * inv_w[0] + beta * inv_w[1] + gamma * inv_w[2];
            if one_over_w <= W_EPSILON {
                continue; // fragment too close to the camera plane
            }

            let depth =
                (alpha * z_over_w[0] + beta * z_over_w[1] + gamma * z_over_w[2]) / one_over_w;
            if !depth.is_finite() {
                continue;
            }

            let color = match texture {
                Some(tex) => {
                    let u = (alpha * uv_over_w[0].x + beta * uv_over_w[1].x + gamma * uv_over_w[2].x)
                        / one_over_w;
                    let v = (alpha * uv_over_w[0].y + beta * uv_over_w[1].y + gamma * uv_over_w[2].y)
                        / one_over_w;
                    tex.sample(u, v)
                }
                None => triangle.color,
            };

            fb.set_pixel_with_depth(x, y, depth, color);
        }
    }
}
