//! FPS-style camera
//!
//! Yaw/pitch rebuild the facing direction from the base forward axis;
//! the view matrix targets position + direction.

use crate::raster::{Mat4, Vec3, Vec4};

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub direction: Vec3,
    pub forward_velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera {
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction: direction.normalize(),
            forward_velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// The point the view matrix looks at
    pub fn look_at_target(&self) -> Vec3 {
        self.position + self.direction
    }

    pub fn rotate_yaw(&mut self, delta: f32) {
        self.yaw += delta;
        self.update_direction();
    }

    /// Pitch is clamped short of straight up/down to keep the look-at
    /// basis well defined.
    pub fn rotate_pitch(&mut self, delta: f32) {
        let limit = std::f32::consts::FRAC_PI_2 - 0.05;
        self.pitch = (self.pitch + delta).clamp(-limit, limit);
        self.update_direction();
    }

    /// Move along the current facing direction, recording the velocity
    pub fn move_forward(&mut self, amount: f32) {
        self.forward_velocity = self.direction * amount;
        self.position = self.position + self.forward_velocity;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.look_at_target(), Vec3::UP)
    }

    fn update_direction(&mut self) {
        let rotation = Mat4::rotation_y(self.yaw) * Mat4::rotation_x(self.pitch);
        self.direction = (rotation * Vec4::from_vec3(Vec3::FORWARD)).to_vec3().normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::FORWARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_look_at_target_is_position_plus_direction() {
        let cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::FORWARD);
        let target = cam.look_at_target();
        assert!((target.x - 1.0).abs() < EPS);
        assert!((target.y - 2.0).abs() < EPS);
        assert!((target.z - 4.0).abs() < EPS);
    }

    #[test]
    fn test_yaw_quarter_turn_faces_positive_x() {
        let mut cam = Camera::default();
        cam.rotate_yaw(std::f32::consts::FRAC_PI_2);
        assert!((cam.direction.x - 1.0).abs() < 1e-4);
        assert!(cam.direction.z.abs() < 1e-4);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.rotate_pitch(10.0);
        assert!(cam.pitch < std::f32::consts::FRAC_PI_2);
        cam.rotate_pitch(-20.0);
        assert!(cam.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_move_forward_tracks_direction() {
        let mut cam = Camera::default();
        cam.move_forward(2.0);
        assert!((cam.position.z - 2.0).abs() < EPS);
        assert!((cam.forward_velocity.z - 2.0).abs() < EPS);
    }
}
