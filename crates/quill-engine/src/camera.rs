//! Camera contract and viewport projection helpers.

use glam::{Mat4, Vec2, Vec3};

use crate::coords::Viewport;
use crate::time::FrameTime;

/// Source of the view and projection matrices used by a scene.
pub trait Camera {
    fn projection(&self) -> Mat4;

    fn view(&self) -> Mat4;

    fn position(&self) -> Vec3;

    /// Advances per-frame camera state (animation, deferred matrix rebuilds).
    fn update(&mut self, time: &FrameTime);
}

/// Half-line starting at `origin`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Projects `world` to pixel coordinates of `viewport`; `z` is the depth in `[0, 1]`.
pub fn project(viewport: Viewport, world: Vec3, view: Mat4, projection: Mat4) -> Vec3 {
    let clip = (projection * view).project_point3(world);
    let pixel = viewport.clip_to_pixel(Vec2::new(clip.x, clip.y));
    pixel.extend(clip.z)
}

/// Inverse of [`project`]: maps a pixel position plus depth back to world space.
pub fn unproject(viewport: Viewport, screen: Vec3, view: Mat4, projection: Mat4) -> Vec3 {
    let clip = viewport.pixel_to_clip(screen.truncate());
    (projection * view)
        .inverse()
        .project_point3(clip.extend(screen.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Viewport, Mat4, Mat4) {
        let viewport = Viewport::new(800.0, 600.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let projection =
            Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, viewport.aspect_ratio(), 0.5, 1000.0);
        (viewport, view, projection)
    }

    #[test]
    fn look_target_projects_to_viewport_center() {
        let (viewport, view, projection) = setup();
        let p = project(viewport, Vec3::ZERO, view, projection);
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 300.0).abs() < 1e-3);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn points_above_target_project_upwards() {
        let (viewport, view, projection) = setup();
        let p = project(viewport, Vec3::new(0.0, 1.0, 0.0), view, projection);
        assert!(p.y < 300.0);
    }

    #[test]
    fn unproject_inverts_project() {
        let (viewport, view, projection) = setup();
        let world = Vec3::new(1.5, -2.0, 3.0);
        let screen = project(viewport, world, view, projection);
        let back = unproject(viewport, screen, view, projection);
        assert!((back - world).length() < 1e-2);
    }

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }
}
