//! Geometry builders producing triangle lists of axis-aligned planes.
//!
//! Coordinates are right-handed: +X right, +Y up, +Z towards the viewer.
//! Front faces are wound clockwise on screen.

use glam::{Vec2, Vec3};

use crate::paint::Color;

use super::{PrimitiveType, Vertex, VertexPositionColor, VertexPositionColorTexture, VertexPositionTexture};

/// Vertex data a mesh can be created from.
pub trait MeshDescription<V: Vertex> {
    fn primitive_type(&self) -> PrimitiveType;

    fn vertex_count(&self) -> u32 {
        self.vertices().len() as u32
    }

    fn vertices(&self) -> &[V];
}

/// An axis-aligned face and the direction it faces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Plane {
    /// Left.
    NegativeX,
    /// Right.
    PositiveX,
    /// Down.
    NegativeY,
    /// Up.
    PositiveY,
    /// Into the screen.
    NegativeZ,
    /// Out of the screen.
    PositiveZ,
}

impl Plane {
    pub const ALL: [Plane; 6] = [
        Plane::PositiveX,
        Plane::PositiveY,
        Plane::PositiveZ,
        Plane::NegativeX,
        Plane::NegativeY,
        Plane::NegativeZ,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Cube of edge `2 * half_extent` centered on `center`.
    pub fn centered(center: Vec3, half_extent: f32) -> Self {
        Self::new(center - Vec3::splat(half_extent), center + Vec3::splat(half_extent))
    }
}

/// Vertex types the builders can emit.
pub trait PlaneVertex: Vertex {
    fn plane_vertex(position: Vec3, color: Color, uv: Vec2) -> Self;
}

impl PlaneVertex for VertexPositionColorTexture {
    fn plane_vertex(position: Vec3, color: Color, uv: Vec2) -> Self {
        Self::new(position, color, uv)
    }
}

impl PlaneVertex for VertexPositionColor {
    fn plane_vertex(position: Vec3, color: Color, _uv: Vec2) -> Self {
        Self::new(position, color)
    }
}

impl PlaneVertex for VertexPositionTexture {
    fn plane_vertex(position: Vec3, _color: Color, uv: Vec2) -> Self {
        Self::new(position, uv)
    }
}

/// Builds meshes out of planes, boxes and rooms. Always emits triangle lists.
pub trait MeshDescriptionBuilder<V: Vertex>: MeshDescription<V> {
    /// Plane spanning X/Y at depth `z`.
    ///
    /// `face_negative_axis` selects which side of the plane is wound as front.
    #[allow(clippy::too_many_arguments)]
    fn add_plane_xy(
        &mut self,
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
        z: f32,
        face_negative_axis: bool,
        tile_size: Vec2,
    );

    /// Plane spanning X/Z at height `y`.
    #[allow(clippy::too_many_arguments)]
    fn add_plane_xz(
        &mut self,
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
        y: f32,
        face_negative_axis: bool,
        tile_size: Vec2,
    );

    /// Plane spanning Y/Z at `x`.
    #[allow(clippy::too_many_arguments)]
    fn add_plane_yz(
        &mut self,
        min_y: f32,
        max_y: f32,
        min_z: f32,
        max_z: f32,
        x: f32,
        face_negative_axis: bool,
        tile_size: Vec2,
    );

    fn add_vertices(&mut self, vertices: &[V]);

    /// Removes all vertices.
    fn clear(&mut self);

    /// Adds the `side` face of `bounds`, visible from outside when `face_outwards`.
    fn add_plane(&mut self, bounds: BoundingBox, side: Plane, face_outwards: bool, tile_size: Vec2) {
        let (min, max) = (bounds.min, bounds.max);
        match side {
            // floor
            Plane::NegativeY => {
                self.add_plane_xz(min.x, max.x, min.z, max.z, min.y, !face_outwards, tile_size)
            }
            // ceiling
            Plane::PositiveY => {
                self.add_plane_xz(min.x, max.x, min.z, max.z, max.y, face_outwards, tile_size)
            }
            // far wall
            Plane::NegativeZ => {
                self.add_plane_xy(min.x, max.x, min.y, max.y, min.z, !face_outwards, tile_size)
            }
            // near wall
            Plane::PositiveZ => {
                self.add_plane_xy(min.x, max.x, min.y, max.y, max.z, face_outwards, tile_size)
            }
            Plane::NegativeX => {
                self.add_plane_yz(min.y, max.y, min.z, max.z, min.x, !face_outwards, tile_size)
            }
            Plane::PositiveX => {
                self.add_plane_yz(min.y, max.y, min.z, max.z, max.x, face_outwards, tile_size)
            }
        }
    }

    /// All six faces, facing outwards.
    fn add_box(&mut self, bounds: BoundingBox, tile_size: Vec2) {
        for side in Plane::ALL {
            self.add_plane(bounds, side, true, tile_size);
        }
    }

    /// All six faces, facing inwards.
    fn add_room(&mut self, bounds: BoundingBox, tile_size: Vec2) {
        for side in Plane::ALL {
            self.add_plane(bounds, side, false, tile_size);
        }
    }
}

/// Plane-based mesh builder for any [`PlaneVertex`].
///
/// Every vertex gets [`PlaneMeshBuilder::color`]; brushes that tint textures
/// expect it to stay white. UVs span `[0, tile_size]` per plane.
#[derive(Debug, Clone)]
pub struct PlaneMeshBuilder<V: PlaneVertex> {
    pub color: Color,
    vertices: Vec<V>,
}

/// Builder emitting [`VertexPositionColorTexture`] with white vertex colors.
pub type TextureMeshDescriptionBuilder = PlaneMeshBuilder<VertexPositionColorTexture>;

/// Builder emitting [`VertexPositionColor`] with a configurable color.
pub type ColorMeshDescriptionBuilder = PlaneMeshBuilder<VertexPositionColor>;

impl<V: PlaneVertex> PlaneMeshBuilder<V> {
    pub fn new() -> Self {
        Self::with_color(Color::WHITE)
    }

    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            vertices: Vec::new(),
        }
    }

    fn push_plane(&mut self, corners: [(Vec3, Vec2); 6], face_negative_axis: bool) {
        let color = self.color;
        let quad = corners.map(|(p, uv)| V::plane_vertex(p, color, uv));
        if face_negative_axis {
            self.vertices.extend_from_slice(&quad);
        } else {
            self.vertices.extend(quad.iter().rev());
        }
    }
}

impl<V: PlaneVertex> Default for PlaneMeshBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PlaneVertex> MeshDescription<V> for PlaneMeshBuilder<V> {
    fn primitive_type(&self) -> PrimitiveType {
        PrimitiveType::TriangleList
    }

    fn vertices(&self) -> &[V] {
        &self.vertices
    }
}

impl<V: PlaneVertex> MeshDescriptionBuilder<V> for PlaneMeshBuilder<V> {
    fn add_plane_xy(
        &mut self,
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
        z: f32,
        face_negative_axis: bool,
        tile: Vec2,
    ) {
        self.push_plane(
            [
                (Vec3::new(min_x, max_y, z), Vec2::new(0.0, 0.0)),
                (Vec3::new(max_x, min_y, z), Vec2::new(tile.x, tile.y)),
                (Vec3::new(min_x, min_y, z), Vec2::new(0.0, tile.y)),
                (Vec3::new(max_x, min_y, z), Vec2::new(tile.x, tile.y)),
                (Vec3::new(min_x, max_y, z), Vec2::new(0.0, 0.0)),
                (Vec3::new(max_x, max_y, z), Vec2::new(tile.x, 0.0)),
            ],
            face_negative_axis,
        );
    }

    fn add_plane_xz(
        &mut self,
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
        y: f32,
        face_negative_axis: bool,
        tile: Vec2,
    ) {
        self.push_plane(
            [
                (Vec3::new(max_x, y, min_z), Vec2::new(tile.x, 0.0)),
                (Vec3::new(min_x, y, max_z), Vec2::new(0.0, tile.y)),
                (Vec3::new(min_x, y, min_z), Vec2::new(0.0, 0.0)),
                (Vec3::new(min_x, y, max_z), Vec2::new(0.0, tile.y)),
                (Vec3::new(max_x, y, min_z), Vec2::new(tile.x, 0.0)),
                (Vec3::new(max_x, y, max_z), Vec2::new(tile.x, tile.y)),
            ],
            face_negative_axis,
        );
    }

    fn add_plane_yz(
        &mut self,
        min_y: f32,
        max_y: f32,
        min_z: f32,
        max_z: f32,
        x: f32,
        face_negative_axis: bool,
        tile: Vec2,
    ) {
        self.push_plane(
            [
                (Vec3::new(x, max_y, min_z), Vec2::new(0.0, 0.0)),
                (Vec3::new(x, min_y, min_z), Vec2::new(0.0, tile.y)),
                (Vec3::new(x, min_y, max_z), Vec2::new(tile.x, tile.y)),
                (Vec3::new(x, max_y, max_z), Vec2::new(tile.x, 0.0)),
                (Vec3::new(x, max_y, min_z), Vec2::new(0.0, 0.0)),
                (Vec3::new(x, min_y, max_z), Vec2::new(tile.x, tile.y)),
            ],
            face_negative_axis,
        );
    }

    fn add_vertices(&mut self, vertices: &[V]) {
        self.vertices.extend_from_slice(vertices);
    }

    fn clear(&mut self) {
        self.vertices.clear();
    }
}
