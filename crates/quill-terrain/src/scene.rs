use glam::{Vec2, Vec3};

use quill_engine::camera::Camera;
use quill_engine::coords::Viewport;
use quill_engine::core::{AppControl, FrameCtx};
use quill_engine::device::Gpu;
use quill_engine::paint::Color;
use quill_engine::render::{ContextConfig, DefaultRenderContext, RenderContext, RenderError};
use quill_engine::time::FrameTime;

use crate::camera::{CameraMode, FirstPersonCamera};
use crate::textures::TextureCache;
use crate::world::{World, WorldConfig};

/// Mouse-look sensitivity, in radians per pixel-second.
const TURN_FACTOR: f32 = 0.1;

/// Camera height above the ground plane at start.
const START_HEIGHT: f32 = 50.0;

/// Input snapshot the scene reacts to, decoupled from the windowing layer.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SceneInput {
    /// The scene only steers while the window has focus.
    pub focused: bool,
    /// Pointer position in window pixels.
    pub pointer: Option<Vec2>,
    /// Point the pointer is recentered to after each update.
    pub center: Vec2,
    /// Size of the back buffer the scene renders to.
    pub viewport: Viewport,

    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl SceneInput {
    /// Camera-space movement for the held keys (-Z forward, +X right).
    pub fn movement(&self) -> Vec3 {
        let mut movement = Vec3::ZERO;
        if self.forward {
            movement += Vec3::NEG_Z;
        }
        if self.left {
            movement += Vec3::NEG_X;
        }
        if self.back {
            movement += Vec3::Z;
        }
        if self.right {
            movement += Vec3::X;
        }
        movement
    }

    /// Pointer offset from the center; zero without a pointer.
    pub fn pointer_offset(&self) -> Vec2 {
        self.pointer.map_or(Vec2::ZERO, |p| p - self.center)
    }
}

/// Terrain viewer: render context, world and first-person camera.
pub struct TerrainScene {
    context: DefaultRenderContext,
    textures: TextureCache,
    world: World,
    camera: FirstPersonCamera,
}

impl TerrainScene {
    pub fn new(gpu: &Gpu<'_>, config: WorldConfig) -> Result<Self, RenderError> {
        let context = DefaultRenderContext::new(
            gpu.device().clone(),
            gpu.queue().clone(),
            gpu.surface_format(),
            ContextConfig::default(),
        )?;

        let mut textures = TextureCache::new();
        let world = World::new(&context, config, &mut textures)?;

        let size = gpu.size();
        let camera = FirstPersonCamera::new(
            Viewport::from_size(size.width, size.height),
            config.center(START_HEIGHT),
            CameraMode::Plane,
        );

        Ok(Self {
            context,
            textures,
            world,
            camera,
        })
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FirstPersonCamera {
        &mut self.camera
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Rebuilds the world (new heightmap) reusing the cached textures.
    pub fn regenerate(&mut self, config: WorldConfig) -> Result<(), RenderError> {
        self.world = World::new(&self.context, config, &mut self.textures)?;
        self.camera.set_position(config.center(START_HEIGHT));
        Ok(())
    }

    /// Turns by the pointer offset from the center, recenters the pointer
    /// through `set_cursor`, then moves with the held keys.
    pub fn update(&mut self, time: &FrameTime, input: &SceneInput, set_cursor: impl FnOnce(Vec2)) {
        self.camera.set_viewport(input.viewport);

        if input.focused {
            let offset = input.pointer_offset();
            let t = time.elapsed_seconds();
            self.camera.add_horizontal_rotation(offset.x * t * TURN_FACTOR);
            self.camera.add_vertical_rotation(offset.y * t * TURN_FACTOR);
            set_cursor(input.center);

            self.camera.move_by(input.movement());
        }

        self.camera.update(time);
    }

    /// Clears to white and draws the world for the current frame.
    pub fn draw(&mut self, frame: &mut FrameCtx<'_, '_>) -> AppControl {
        let (world, camera) = (&mut self.world, &self.camera);
        frame.render(&mut self.context, |ctx| {
            ctx.clear(Color::WHITE)?;
            ctx.attach()?;
            let drawn = world.draw(ctx, camera);
            ctx.detach()?;
            drawn
        })
    }
}
