use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::{Mat3, Mat4, Vec2, Vec3};

use quill_engine::camera::{self, Camera, Ray};
use quill_engine::coords::Viewport;
use quill_engine::time::FrameTime;

const NEAR_Z: f32 = 0.5;

/// How [`FirstPersonCamera::move_by`] interprets movement.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CameraMode {
    /// Flies where it points; moving forward while looking up climbs.
    #[default]
    Plane,
    /// Stays level: movement only follows the horizontal rotation.
    Person,
}

/// Yaw/pitch camera facing -Z at zero rotation.
///
/// Matrices are rebuilt lazily whenever position, rotation or viewport changed.
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    mode: CameraMode,
    far_z: f32,
    viewport: Viewport,

    view: Mat4,
    projection: Mat4,
    dirty: bool,
}

impl FirstPersonCamera {
    pub fn new(viewport: Viewport, position: Vec3, mode: CameraMode) -> Self {
        Self::with_far_plane(viewport, position, mode, 1000.0)
    }

    pub fn with_far_plane(viewport: Viewport, position: Vec3, mode: CameraMode, far_z: f32) -> Self {
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            mode,
            far_z,
            viewport,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            dirty: true,
        };
        camera.rebuild();
        camera
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
    }

    pub fn far_z(&self) -> f32 {
        self.far_z
    }

    /// Rotation around the Y axis, in `(-2π, 2π)`.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Rotation around the X axis, in `[-π/2, π/2]`.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Positive values turn right.
    pub fn add_horizontal_rotation(&mut self, value: f32) {
        self.set_yaw(self.yaw - value);
        self.rebuild();
    }

    /// Positive values look down.
    pub fn add_vertical_rotation(&mut self, value: f32) {
        self.set_pitch(self.pitch - value);
        self.rebuild();
    }

    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.set_yaw(yaw);
        self.set_pitch(pitch);
        self.rebuild();
    }

    /// Moves by `movement` expressed in camera space (-Z forward, +X right).
    pub fn move_by(&mut self, movement: Vec3) {
        let rotation = match self.mode {
            CameraMode::Plane => self.rotation(),
            CameraMode::Person => Mat3::from_rotation_y(self.yaw),
        };
        self.position += rotation * movement;
        self.dirty = true;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    /// Follows the size of the render target; the projection keeps its aspect ratio.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.dirty = true;
        }
    }

    pub fn distance_to_camera(&self, world: Vec3) -> f32 {
        (world - self.position).length()
    }

    pub fn distance_to_camera_squared(&self, world: Vec3) -> f32 {
        (world - self.position).length_squared()
    }

    /// Ray from the camera through the near-plane point under `screen` (pixels).
    pub fn screen_to_world(&mut self, screen: Vec2) -> Ray {
        self.rebuild();
        let near = camera::unproject(self.viewport, screen.extend(0.0), self.view, self.projection);
        Ray::new(self.position, near - self.position)
    }

    /// Pixel position of `world` on the viewport.
    pub fn world_to_screen(&mut self, world: Vec3) -> Vec2 {
        self.rebuild();
        camera::project(self.viewport, world, self.view, self.projection).truncate()
    }

    fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw % TAU;
        self.dirty = true;
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.dirty = true;
    }

    fn rotation(&self) -> Mat3 {
        Mat3::from_rotation_y(self.yaw) * Mat3::from_rotation_x(self.pitch)
    }

    fn rebuild(&mut self) {
        if !self.dirty {
            return;
        }

        let rotation = self.rotation();
        let target = self.position + rotation * Vec3::NEG_Z;
        let up = rotation * Vec3::Y;
        self.view = Mat4::look_at_rh(self.position, target, up);
        self.projection =
            Mat4::perspective_rh(FRAC_PI_4, self.viewport.aspect_ratio(), NEAR_Z, self.far_z);

        self.dirty = false;
    }
}

impl Camera for FirstPersonCamera {
    fn projection(&self) -> Mat4 {
        self.projection
    }

    fn view(&self) -> Mat4 {
        self.view
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn update(&mut self, _time: &FrameTime) {
        self.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(mode: CameraMode) -> FirstPersonCamera {
        FirstPersonCamera::new(Viewport::new(800.0, 600.0), Vec3::ZERO, mode)
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    // ── rotation ──────────────────────────────────────────────────────────

    #[test]
    fn yaw_wraps_at_full_turn() {
        let mut cam = camera(CameraMode::Plane);
        cam.add_horizontal_rotation(-(TAU + 0.5));
        assert!((cam.yaw() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = camera(CameraMode::Plane);
        cam.add_vertical_rotation(-10.0);
        assert_eq!(cam.pitch(), FRAC_PI_2);
        cam.add_vertical_rotation(20.0);
        assert_eq!(cam.pitch(), -FRAC_PI_2);
    }

    #[test]
    fn positive_horizontal_rotation_turns_right() {
        let mut cam = camera(CameraMode::Plane);
        cam.add_horizontal_rotation(FRAC_PI_2);
        cam.move_by(Vec3::NEG_Z);
        assert!(approx(cam.position(), Vec3::X));
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn plane_mode_climbs_when_looking_up() {
        let mut cam = camera(CameraMode::Plane);
        cam.set_rotation(0.0, FRAC_PI_2);
        cam.move_by(Vec3::NEG_Z);
        assert!(approx(cam.position(), Vec3::Y));
    }

    #[test]
    fn person_mode_stays_level() {
        let mut cam = camera(CameraMode::Person);
        cam.set_rotation(0.0, FRAC_PI_2);
        cam.move_by(Vec3::NEG_Z);
        assert!(approx(cam.position(), Vec3::NEG_Z));
    }

    #[test]
    fn distances_are_measured_from_position() {
        let mut cam = camera(CameraMode::Plane);
        cam.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.distance_to_camera_squared(Vec3::new(1.0, 2.0, 5.0)), 4.0);
        assert_eq!(cam.distance_to_camera(Vec3::new(1.0, 2.0, 5.0)), 2.0);
    }

    // ── matrices ──────────────────────────────────────────────────────────

    #[test]
    fn update_rebuilds_dirty_view() {
        let mut cam = camera(CameraMode::Plane);
        cam.set_position(Vec3::new(0.0, 0.0, 10.0));
        let stale = cam.view();
        cam.update(&FrameTime::zero());
        assert_ne!(cam.view(), stale);
        assert!(approx(cam.view().transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn center_of_screen_looks_forward() {
        let mut cam = camera(CameraMode::Plane);
        let ray = cam.screen_to_world(Vec2::new(400.0, 300.0));
        assert!(approx(ray.direction, Vec3::NEG_Z));
        assert_eq!(ray.origin, Vec3::ZERO);
    }

    #[test]
    fn world_to_screen_centers_forward_points() {
        let mut cam = camera(CameraMode::Plane);
        let screen = cam.world_to_screen(Vec3::new(0.0, 0.0, -20.0));
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-2);
    }
}
