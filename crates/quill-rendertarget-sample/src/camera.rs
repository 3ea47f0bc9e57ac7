use std::f32::consts::FRAC_PI_4;

use glam::{Mat4, Vec3};

use quill_engine::camera::Camera;
use quill_engine::coords::Viewport;
use quill_engine::time::FrameTime;

const NEAR_Z: f32 = 0.5;
const FAR_Z: f32 = 1000.0;

/// Fixed camera looking down -Z from its position.
#[derive(Debug, Clone)]
pub struct StaticCamera {
    position: Vec3,
    viewport: Viewport,
    view: Mat4,
    projection: Mat4,
    dirty: bool,
}

impl StaticCamera {
    pub fn new(viewport: Viewport, position: Vec3) -> Self {
        Self {
            position,
            viewport,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            dirty: true,
        }
    }
}

impl Camera for StaticCamera {
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
        if !self.dirty {
            return;
        }

        self.view = Mat4::look_at_rh(self.position, self.position + Vec3::NEG_Z, Vec3::Y);
        self.projection =
            Mat4::perspective_rh(FRAC_PI_4, self.viewport.aspect_ratio(), NEAR_Z, FAR_Z);
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrices_are_built_on_first_update() {
        let mut camera = StaticCamera::new(Viewport::new(800.0, 600.0), Vec3::new(0.0, 0.0, 50.0));
        assert_eq!(camera.view(), Mat4::IDENTITY);

        camera.update(&FrameTime::zero());
        let origin = camera.view().transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -50.0)).length() < 1e-4);

        let clip = camera.projection().project_point3(origin);
        assert!(clip.x.abs() < 1e-6 && clip.y.abs() < 1e-6);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn matrices_are_cached_between_updates() {
        let mut camera = StaticCamera::new(Viewport::new(100.0, 50.0), Vec3::ZERO);
        camera.update(&FrameTime::zero());
        let projection = camera.projection();
        camera.update(&FrameTime::zero());
        assert_eq!(camera.projection(), projection);
        assert_ne!(projection, Mat4::IDENTITY);
    }
}
