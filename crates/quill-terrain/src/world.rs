use std::time::{SystemTime, UNIX_EPOCH};

use glam::{Mat4, Vec2, Vec3};

use quill_engine::camera::Camera;
use quill_engine::paint::Color;
use quill_engine::render::mesh::description::{
    BoundingBox, MeshDescriptionBuilder, Plane, TextureMeshDescriptionBuilder,
};
use quill_engine::render::mesh::{CreateMesh, StaticMesh, VertexPositionColorTexture};
use quill_engine::render::{RenderContext, RenderError, SolidColorPen, TextureBrush};

use crate::skybox::SkyboxBrush;
use crate::textures::{TextureCache, TextureGenerator, TextureKey};

/// Edge length of one terrain quad.
pub const CELL_SIZE: f32 = 10.0;

/// Heights are drawn from `0..MAX_HEIGHT`.
pub const MAX_HEIGHT: u32 = 45;

/// Largest accepted terrain edge, in cells; keeps the vertex buffer under wgpu's default limit.
const MAX_CELLS: u32 = 1024;

/// Size and seed of a generated world.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    /// Cells along X.
    pub width: u32,
    /// Cells along Z.
    pub length: u32,
    /// Heightmap seed; `None` draws one from the clock.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 256,
            length: 256,
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Applies `QUILL_TERRAIN_SIZE` (cells per edge) and `QUILL_SEED` when set.
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var("QUILL_TERRAIN_SIZE").ok().as_deref(),
            std::env::var("QUILL_SEED").ok().as_deref(),
        )
    }

    fn with_overrides(mut self, size: Option<&str>, seed: Option<&str>) -> Self {
        if let Some(raw) = size {
            match raw.trim().parse::<u32>() {
                Ok(size) if (1..=MAX_CELLS).contains(&size) => {
                    self.width = size;
                    self.length = size;
                }
                _ => log::warn!("ignoring QUILL_TERRAIN_SIZE={raw:?}; expected 1..={MAX_CELLS}"),
            }
        }
        if let Some(raw) = seed {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => log::warn!("ignoring QUILL_SEED={raw:?}; expected an unsigned integer"),
            }
        }
        self
    }

    /// World-space center of the terrain at height `y`.
    pub fn center(&self, y: f32) -> Vec3 {
        Vec3::new(
            CELL_SIZE * self.width as f32 / 2.0,
            y,
            CELL_SIZE * self.length as f32 / 2.0,
        )
    }
}

/// xorshift64* generator; reproducible heightmaps for a given seed.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        // A zero state would only ever yield zeros.
        Self {
            state: seed.max(1),
        }
    }

    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(nanos)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform value in `0..bound` (`bound` > 0).
    pub fn next_below(&mut self, bound: u32) -> u32 {
        ((self.next_u64() >> 32) * bound as u64 >> 32) as u32
    }
}

/// Corner heights of a `width` × `length` cell grid.
#[derive(Debug, Clone)]
pub struct Heightmap {
    width: u32,
    length: u32,
    heights: Vec<u32>,
}

/// Row-major index of corner `(x, z)` in a grid `width` cells wide.
#[inline]
fn corner_index(width: u32, x: u32, z: u32) -> usize {
    z as usize * (width as usize + 1) + x as usize
}

impl Heightmap {
    /// Random heights in `0..max_height` for every grid corner.
    pub fn random(width: u32, length: u32, max_height: u32, rng: &mut DeterministicRng) -> Self {
        let corners = (width as usize + 1) * (length as usize + 1);
        let heights = (0..corners).map(|_| rng.next_below(max_height)).collect();
        Self {
            width,
            length,
            heights,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Height of corner `(x, z)`, with `x <= width` and `z <= length`.
    pub fn at(&self, x: u32, z: u32) -> u32 {
        self.heights[corner_index(self.width, x, z)]
    }

    /// Two triangles per cell, white, with `v = height / max_height`.
    pub fn vertices(&self, max_height: u32) -> Vec<VertexPositionColorTexture> {
        let mut vertices = Vec::with_capacity(self.width as usize * self.length as usize * 6);
        let scale = 1.0 / max_height as f32;

        for z in 0..self.length {
            for x in 0..self.width {
                let (x0, z0) = (x as f32 * CELL_SIZE, z as f32 * CELL_SIZE);
                let (x1, z1) = (x0 + CELL_SIZE, z0 + CELL_SIZE);
                let corner = |px: f32, cx: u32, pz: f32, cz: u32| {
                    let h = self.at(cx, cz) as f32;
                    VertexPositionColorTexture::new(
                        Vec3::new(px, h, pz),
                        Color::WHITE,
                        Vec2::splat(h * scale),
                    )
                };

                vertices.extend([
                    corner(x1, x + 1, z0, z),
                    corner(x0, x, z1, z + 1),
                    corner(x0, x, z0, z),
                    corner(x0, x, z1, z + 1),
                    corner(x1, x + 1, z0, z),
                    corner(x1, x + 1, z1, z + 1),
                ]);
            }
        }
        vertices
    }
}

/// Four inward-facing walls of a ±1 box; drawn around the camera.
pub(crate) fn skybox_description() -> TextureMeshDescriptionBuilder {
    let mut skybox = TextureMeshDescriptionBuilder::new();
    let bounds = BoundingBox::new(-Vec3::ONE, Vec3::ONE);
    for side in [Plane::NegativeX, Plane::PositiveX, Plane::NegativeZ, Plane::PositiveZ] {
        skybox.add_plane(bounds, side, false, Vec2::ONE);
    }
    skybox
}

/// Skybox plus terrain.
pub struct World {
    config: WorldConfig,
    skybox: StaticMesh<VertexPositionColorTexture>,
    skybox_brush: SkyboxBrush,
    terrain: StaticMesh<VertexPositionColorTexture>,
    terrain_brush: TextureBrush,
    terrain_pen: SolidColorPen,
}

impl World {
    pub fn new(
        ctx: &impl RenderContext,
        config: WorldConfig,
        textures: &mut TextureCache,
    ) -> Result<Self, RenderError> {
        let generator = TextureGenerator::new(ctx.resources());
        let creator = ctx.mesh_creator();

        let skybox = creator.create_mesh_from_description(&skybox_description())?;
        let sky = textures.get_or_create(TextureKey::Skybox, |_| generator.create_skybox_texture())?;

        let mut rng = match config.seed {
            Some(seed) => DeterministicRng::new(seed),
            None => DeterministicRng::from_clock(),
        };
        let heightmap = Heightmap::random(config.width, config.length, MAX_HEIGHT, &mut rng);

        let mut terrain = TextureMeshDescriptionBuilder::new();
        terrain.add_vertices(&heightmap.vertices(MAX_HEIGHT));
        let terrain = creator.create_mesh_from_description(&terrain)?;
        let ground =
            textures.get_or_create(TextureKey::Terrain, |_| generator.create_terrain_texture())?;

        log::info!(
            "world generated: {}x{} cells, {} terrain vertices",
            config.width,
            config.length,
            heightmap.width() * heightmap.length() * 6
        );

        Ok(Self {
            config,
            skybox,
            skybox_brush: SkyboxBrush::new(sky),
            terrain,
            terrain_brush: TextureBrush::new(ground),
            terrain_pen: SolidColorPen::new(Color::BLACK, None),
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn cell_size(&self) -> f32 {
        CELL_SIZE
    }

    /// Draws the skybox centered on the camera, then the terrain. The context must be attached.
    pub fn draw(&mut self, ctx: &mut impl RenderContext, camera: &impl Camera) -> Result<(), RenderError> {
        let (view, projection) = (camera.view(), camera.projection());

        ctx.draw_mesh(
            &mut self.skybox,
            Mat4::from_translation(camera.position()),
            view,
            projection,
            Some(&mut self.skybox_brush),
            None,
        )?;

        ctx.draw_mesh(
            &mut self.terrain,
            Mat4::IDENTITY,
            view,
            projection,
            Some(&mut self.terrain_brush),
            Some(&mut self.terrain_pen),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_engine::render::mesh::description::MeshDescription;

    // ── config ────────────────────────────────────────────────────────────

    #[test]
    fn overrides_apply_when_valid() {
        let config = WorldConfig::default().with_overrides(Some("64"), Some(" 42 "));
        assert_eq!((config.width, config.length), (64, 64));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let config = WorldConfig::default().with_overrides(Some("0"), Some("-3"));
        assert_eq!(config, WorldConfig::default());

        let config = WorldConfig::default().with_overrides(Some("4096"), None);
        assert_eq!(config.width, 256);
    }

    #[test]
    fn center_is_half_the_world_extent() {
        let config = WorldConfig {
            width: 4,
            length: 2,
            seed: None,
        };
        assert_eq!(config.center(50.0), Vec3::new(20.0, 50.0, 10.0));
    }

    // ── rng / heightmap ───────────────────────────────────────────────────

    #[test]
    fn same_seed_same_sequence() {
        let mut a = DeterministicRng::new(7);
        let mut b = DeterministicRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        assert_ne!(DeterministicRng::new(7).next_u64(), DeterministicRng::new(8).next_u64());
    }

    #[test]
    fn heights_stay_below_max() {
        let mut rng = DeterministicRng::new(123);
        let map = Heightmap::random(16, 8, MAX_HEIGHT, &mut rng);
        for z in 0..=8 {
            for x in 0..=16 {
                assert!(map.at(x, z) < MAX_HEIGHT);
            }
        }
    }

    #[test]
    fn corners_are_row_major() {
        assert_eq!(corner_index(16, 0, 0), 0);
        assert_eq!(corner_index(16, 16, 0), 16);
        assert_eq!(corner_index(16, 0, 1), 17);
        assert_eq!(corner_index(16, 3, 2), 37);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn corner_index_of_wide_grids_does_not_wrap() {
        let width = u32::MAX - 1;
        assert_eq!(corner_index(width, 0, 1), u32::MAX as usize);
        assert_eq!(corner_index(width, 5, 2), 2 * u32::MAX as usize + 5);
    }

    #[test]
    fn terrain_has_two_upward_triangles_per_cell() {
        let mut rng = DeterministicRng::new(1);
        let map = Heightmap::random(3, 2, MAX_HEIGHT, &mut rng);
        let vertices = map.vertices(MAX_HEIGHT);
        assert_eq!(vertices.len(), 3 * 2 * 6);

        for tri in vertices.chunks(3) {
            let [a, b, c] = [tri[0].position, tri[1].position, tri[2].position].map(Vec3::from);
            // Clockwise front faces: the front normal is the negated right-handed normal.
            let front = -(b - a).cross(c - a);
            assert!(front.y > 0.0, "triangle faces down: {a} {b} {c}");
        }
    }

    #[test]
    fn texture_v_tracks_height() {
        let mut rng = DeterministicRng::new(99);
        let map = Heightmap::random(1, 1, MAX_HEIGHT, &mut rng);
        for v in map.vertices(MAX_HEIGHT) {
            let expected = v.position[1] / MAX_HEIGHT as f32;
            assert!((v.uv[1] - expected).abs() < 1e-6);
            assert_eq!(v.uv[0], v.uv[1]);
        }
    }

    // ── skybox ────────────────────────────────────────────────────────────

    #[test]
    fn skybox_has_four_inward_walls() {
        let skybox = skybox_description();
        let vertices = skybox.vertices();
        assert_eq!(vertices.len(), 24);

        for tri in vertices.chunks(3) {
            let [a, b, c] = [tri[0].position, tri[1].position, tri[2].position].map(Vec3::from);
            let front = -(b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(front.dot(center) < 0.0, "wall faces outwards");
            assert_eq!(front.y, 0.0);
        }
    }
}
