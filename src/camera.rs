use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Orbital camera that trails the character.
///
/// Look angles change only while the pointer is locked. Position and look-at
/// are smoothed toward their targets every [`update`](Self::update).
pub struct FollowCamera {
    pub horizontal_angle: f32,
    pub vertical_angle: f32,
    pub distance: f32,
    pub position: Vec3,
    pub look_at: Vec3,
    pointer_locked: bool,
    seeded: bool,
    cfg: CameraConfig,
}

impl FollowCamera {
    pub fn new(cfg: CameraConfig) -> Self {
        Self {
            horizontal_angle: 0.0,
            vertical_angle: 0.0,
            distance: cfg.distance.clamp(cfg.min_distance, cfg.max_distance),
            position: Vec3::new(0.0, cfg.offset_y, -cfg.distance),
            look_at: Vec3::ZERO,
            pointer_locked: false,
            seeded: false,
            cfg,
        }
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Mouse motion in pixels.
    pub fn look(&mut self, mouse_dx: f32, mouse_dy: f32) {
        if !self.pointer_locked {
            return;
        }
        let sens = self.cfg.mouse_sensitivity;
        let limit = self.cfg.vertical_limit;
        self.horizontal_angle -= mouse_dx * sens;
        self.vertical_angle = (self.vertical_angle - mouse_dy * sens).clamp(-limit, limit);
    }

    /// Wheel delta in browser-style units (one notch ≈ 100).
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta * 0.01 * self.cfg.zoom_speed)
            .clamp(self.cfg.min_distance, self.cfg.max_distance);
    }

    /// Horizontal angle only; vertical angle and distance are kept.
    pub fn reset_angles(&mut self) {
        self.horizontal_angle = 0.0;
    }

    /// Where the camera wants to be for `target` seen from `azimuth`.
    pub fn desired_position(&self, target: Vec3, azimuth: f32) -> Vec3 {
        let hd = self.distance * self.vertical_angle.cos();
        let height = self.cfg.offset_y + self.distance * self.vertical_angle.sin();
        target + Vec3::new(-azimuth.sin() * hd, height, -azimuth.cos() * hd)
    }

    pub fn update(&mut self, target: Vec3, azimuth: f32) {
        let desired = self.desired_position(target, azimuth);
        let desired_look = target + Vec3::Y * self.cfg.look_offset_y;

        if !self.seeded {
            self.position = desired;
            self.look_at = desired_look;
            self.seeded = true;
        } else {
            let k = 1.0 - self.cfg.damping;
            let kv = 1.0 - self.cfg.vertical_damping;
            self.position.x += (desired.x - self.position.x) * k;
            self.position.z += (desired.z - self.position.z) * k;
            self.position.y += (desired.y - self.position.y) * kv;
            self.look_at = self.look_at.lerp(desired_look, 1.0 - self.cfg.rotation_damping);
        }

        let floor = self.cfg.ground_level + self.cfg.min_clearance;
        if self.position.y < floor {
            self.position.y = floor;
        }
    }

    /// Flat forward vector of the horizontal angle alone.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.horizontal_angle.sin(), 0.0, self.horizontal_angle.cos())
    }

    /// Flat forward vector relative to the character's yaw.
    pub fn player_forward(&self, yaw: f32) -> Vec3 {
        let a = yaw + self.horizontal_angle;
        Vec3::new(a.sin(), 0.0, a.cos())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.cfg.fov_deg.to_radians(), aspect, 0.1, 500.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_requires_pointer_lock() {
        let mut cam = FollowCamera::new(CameraConfig::default());
        cam.look(100.0, 0.0);
        assert_eq!(cam.horizontal_angle, 0.0);
        cam.set_pointer_locked(true);
        cam.look(100.0, 0.0);
        assert!((cam.horizontal_angle + 0.2).abs() < 1e-6);
    }

    #[test]
    fn vertical_angle_is_clamped() {
        let mut cam = FollowCamera::new(CameraConfig::default());
        cam.set_pointer_locked(true);
        cam.look(0.0, -10_000.0);
        assert_eq!(cam.vertical_angle, std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = FollowCamera::new(CameraConfig::default());
        cam.zoom(100_000.0);
        assert_eq!(cam.distance, 15.0);
        cam.zoom(-100_000.0);
        assert_eq!(cam.distance, 2.0);
    }

    #[test]
    fn reset_keeps_vertical_angle() {
        let mut cam = FollowCamera::new(CameraConfig::default());
        cam.set_pointer_locked(true);
        cam.look(50.0, 50.0);
        cam.reset_angles();
        assert_eq!(cam.horizontal_angle, 0.0);
        assert!(cam.vertical_angle < 0.0);
    }
}
