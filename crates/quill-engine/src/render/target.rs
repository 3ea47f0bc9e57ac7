//! Render-target swapping and small drawing helpers built on [`RenderContext`].

use std::ops::{Deref, DerefMut};

use glam::{Mat4, Vec2};

use crate::coords::Rect;
use crate::paint::Color;

use super::brush::TextureColorBrush;
use super::context::RenderContext;
use super::error::RenderError;
use super::mesh::description::{MeshDescriptionBuilder, TextureMeshDescriptionBuilder};
use super::mesh::CreateMesh;
use super::texture::{RenderTarget2D, Texture2D};

/// What "draw to the back buffer" means while an off-screen target is bound.
///
/// Only consulted when [`RenderContextExt::render_to`] is given `None`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BackBufferSwapUsage {
    /// The bound target *is* the presentation surface (the host draws into an
    /// image it composites itself); it is kept bound and nothing is swapped.
    #[default]
    HostSurface,
    /// Unbinds the target and draws to the real back buffer, restoring the
    /// target afterwards.
    OriginalBehaviour,
}

/// Bindings applied when a scope opens and closes.
///
/// `None` leaves the binding untouched; `Some(None)` binds the back buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPlan<T> {
    pub switch_to: Option<Option<T>>,
    pub restore_to: Option<Option<T>>,
}

impl<T> SwapPlan<T> {
    pub fn plan(original: Option<T>, requested: Option<T>, usage: BackBufferSwapUsage) -> Self {
        match (requested, original) {
            // Already on the back buffer.
            (None, None) => Self {
                switch_to: None,
                restore_to: Some(None),
            },
            (None, Some(original)) => match usage {
                BackBufferSwapUsage::HostSurface => Self {
                    switch_to: None,
                    restore_to: None,
                },
                BackBufferSwapUsage::OriginalBehaviour => Self {
                    switch_to: Some(None),
                    restore_to: Some(Some(original)),
                },
            },
            (Some(requested), original) => Self {
                switch_to: Some(Some(requested)),
                restore_to: Some(original),
            },
        }
    }
}

/// Scoped render-target binding returned by [`RenderContextExt::render_to`].
///
/// Dereferences to the context; the original binding is restored on drop.
pub struct RenderTargetScope<'a, C: RenderContext + ?Sized> {
    ctx: &'a mut C,
    restore_to: Option<Option<RenderTarget2D>>,
}

impl<C: RenderContext + ?Sized> Deref for RenderTargetScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctx
    }
}

impl<C: RenderContext + ?Sized> DerefMut for RenderTargetScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.ctx
    }
}

impl<C: RenderContext + ?Sized> Drop for RenderTargetScope<'_, C> {
    fn drop(&mut self) {
        if let Some(target) = self.restore_to.take() {
            self.ctx.set_render_target(target.as_ref());
        }
    }
}

pub trait RenderContextExt: RenderContext {
    /// Binds `target` (`None` for the back buffer) until the returned scope is dropped.
    fn render_to(
        &mut self,
        target: Option<&RenderTarget2D>,
        usage: BackBufferSwapUsage,
    ) -> RenderTargetScope<'_, Self> {
        let original = self.render_target().cloned();
        let plan = SwapPlan::plan(original, target.cloned(), usage);

        if let Some(switch_to) = &plan.switch_to {
            self.set_render_target(switch_to.as_ref());
        }

        RenderTargetScope {
            ctx: self,
            restore_to: plan.restore_to,
        }
    }

    /// Draws `texture` stretched over `rect` (pixels of the current target), tinted by `color`.
    ///
    /// Builds and uploads a quad per call; meant for debug overlays and
    /// compositing a handful of render targets.
    fn draw_texture(&mut self, texture: &Texture2D, rect: Rect, color: Color) -> Result<(), RenderError> {
        let viewport = self.viewport();
        if !viewport.bounds().intersects(rect) {
            return Ok(());
        }

        let top_left = viewport.pixel_to_clip(Vec2::new(rect.left(), rect.top()));
        let bottom_right = viewport.pixel_to_clip(Vec2::new(rect.right(), rect.bottom()));

        let mut description = TextureMeshDescriptionBuilder::new();
        description.add_plane_xy(
            top_left.x,
            bottom_right.x,
            bottom_right.y,
            top_left.y,
            0.0,
            true,
            Vec2::ONE,
        );
        let mut mesh = self.mesh_creator().create_mesh_from_description(&description)?;
        let mut brush = TextureColorBrush::new(texture.clone(), color);

        self.draw_mesh(
            &mut mesh,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Some(&mut brush),
            None,
        )
    }
}

impl<C: RenderContext + ?Sized> RenderContextExt for C {}

#[cfg(test)]
mod tests {
    use super::*;

    // ── swap plans ─────────────────────────────────────────────────────────

    #[test]
    fn back_buffer_to_back_buffer_only_resets() {
        let plan = SwapPlan::<u32>::plan(None, None, BackBufferSwapUsage::HostSurface);
        assert_eq!(plan.switch_to, None);
        assert_eq!(plan.restore_to, Some(None));

        let plan = SwapPlan::<u32>::plan(None, None, BackBufferSwapUsage::OriginalBehaviour);
        assert_eq!(plan.switch_to, None);
        assert_eq!(plan.restore_to, Some(None));
    }

    #[test]
    fn back_buffer_to_target_restores_back_buffer() {
        let plan = SwapPlan::plan(None, Some(1), BackBufferSwapUsage::HostSurface);
        assert_eq!(plan.switch_to, Some(Some(1)));
        assert_eq!(plan.restore_to, Some(None));
    }

    #[test]
    fn host_surface_keeps_bound_target_for_back_buffer() {
        let plan = SwapPlan::plan(Some(7), None, BackBufferSwapUsage::HostSurface);
        assert_eq!(plan.switch_to, None);
        assert_eq!(plan.restore_to, None);
    }

    #[test]
    fn original_behaviour_unbinds_target_for_back_buffer() {
        let plan = SwapPlan::plan(Some(7), None, BackBufferSwapUsage::OriginalBehaviour);
        assert_eq!(plan.switch_to, Some(None));
        assert_eq!(plan.restore_to, Some(Some(7)));
    }

    #[test]
    fn target_to_target_restores_original() {
        for usage in [BackBufferSwapUsage::HostSurface, BackBufferSwapUsage::OriginalBehaviour] {
            let plan = SwapPlan::plan(Some(2), Some(3), usage);
            assert_eq!(plan.switch_to, Some(Some(3)));
            assert_eq!(plan.restore_to, Some(Some(2)));
        }
    }

    #[test]
    fn default_usage_is_host_surface() {
        assert_eq!(BackBufferSwapUsage::default(), BackBufferSwapUsage::HostSurface);
    }
}
