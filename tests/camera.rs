use glam::Vec3;

use arena::camera::FollowCamera;
use arena::config::CameraConfig;

#[test]
fn zoom_is_clamped_to_range() {
    let mut cam = FollowCamera::new(CameraConfig::default());
    cam.zoom(100_000.0);
    assert_eq!(cam.distance, 15.0);
    cam.zoom(-100_000.0);
    assert_eq!(cam.distance, 2.0);
}

#[test]
fn first_update_snaps_then_smooths() {
    let mut cam = FollowCamera::new(CameraConfig::default());
    cam.update(Vec3::ZERO, 0.0);
    let seeded = cam.position;
    assert_eq!(seeded, cam.desired_position(Vec3::ZERO, 0.0));

    let target = Vec3::new(0.0, 0.0, 10.0);
    cam.update(target, 0.0);
    let desired = cam.desired_position(target, 0.0);
    assert!(cam.position.z > seeded.z);
    assert!(cam.position.z < desired.z);
}

#[test]
fn camera_never_dips_below_ground() {
    let mut cam = FollowCamera::new(CameraConfig::default());
    cam.set_pointer_locked(true);
    cam.look(0.0, 10_000.0);
    cam.update(Vec3::ZERO, 0.0);
    assert!(cam.position.y >= 0.3 - 1e-6);
}

#[test]
fn reset_keeps_vertical_angle() {
    let mut cam = FollowCamera::new(CameraConfig::default());
    cam.set_pointer_locked(true);
    cam.look(200.0, 100.0);
    let v = cam.vertical_angle;
    cam.reset_angles();
    assert_eq!(cam.horizontal_angle, 0.0);
    assert_eq!(cam.vertical_angle, v);
}
