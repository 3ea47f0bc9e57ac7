use crate::render::error::MeshError;
use crate::render::resources::RenderResources;

use super::description::MeshDescription;
use super::{AppendingMesh, DynamicMesh, PrimitiveType, StaticMesh, UpdatableDynamicMesh, Vertex};

/// How often a dynamic mesh is expected to change.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum DynamicMeshUsage {
    /// Updated (and drawn) several times per frame; backed by [`AppendingMesh`].
    UpdateOften,
    /// Replaced occasionally; backed by [`UpdatableDynamicMesh`].
    #[default]
    UpdateSeldom,
}

/// Factory for meshes bound to one device.
pub trait CreateMesh {
    /// Empty dynamic mesh; data is supplied later through [`DynamicMesh::update`].
    fn create_dynamic_mesh<V: Vertex>(
        &self,
        primitive_type: PrimitiveType,
        usage: DynamicMeshUsage,
    ) -> Box<dyn DynamicMesh<V>>;

    /// Dynamic mesh filled with `vertices`. At least one vertex is required.
    fn create_dynamic_mesh_from<V: Vertex>(
        &self,
        primitive_type: PrimitiveType,
        vertices: &[V],
        usage: DynamicMeshUsage,
    ) -> Result<Box<dyn DynamicMesh<V>>, MeshError> {
        if vertices.is_empty() {
            return Err(MeshError::EmptyVertices);
        }
        let mut mesh = self.create_dynamic_mesh::<V>(primitive_type, usage);
        mesh.update(vertices)?;
        Ok(mesh)
    }

    fn create_dynamic_mesh_from_description<V: Vertex>(
        &self,
        description: &impl MeshDescription<V>,
        usage: DynamicMeshUsage,
    ) -> Result<Box<dyn DynamicMesh<V>>, MeshError> {
        self.create_dynamic_mesh_from(description.primitive_type(), description.vertices(), usage)
    }

    /// Immutable mesh uploaded once.
    fn create_mesh<V: Vertex>(
        &self,
        primitive_type: PrimitiveType,
        vertices: &[V],
    ) -> Result<StaticMesh<V>, MeshError>;

    fn create_mesh_from_description<V: Vertex>(
        &self,
        description: &impl MeshDescription<V>,
    ) -> Result<StaticMesh<V>, MeshError> {
        self.create_mesh(description.primitive_type(), description.vertices())
    }
}

/// Default [`CreateMesh`] implementation.
#[derive(Debug, Clone)]
pub struct MeshCreator {
    resources: RenderResources,
}

impl MeshCreator {
    pub fn new(resources: RenderResources) -> Self {
        Self { resources }
    }
}

impl CreateMesh for MeshCreator {
    fn create_dynamic_mesh<V: Vertex>(
        &self,
        primitive_type: PrimitiveType,
        usage: DynamicMeshUsage,
    ) -> Box<dyn DynamicMesh<V>> {
        match usage {
            DynamicMeshUsage::UpdateOften => {
                Box::new(AppendingMesh::<V>::new(self.resources.clone(), primitive_type))
            }
            DynamicMeshUsage::UpdateSeldom => Box::new(UpdatableDynamicMesh::<V>::new(
                self.resources.clone(),
                primitive_type,
            )),
        }
    }

    fn create_mesh<V: Vertex>(
        &self,
        primitive_type: PrimitiveType,
        vertices: &[V],
    ) -> Result<StaticMesh<V>, MeshError> {
        StaticMesh::new(&self.resources, primitive_type, vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mesh::VertexPositionColor;

    /// Factory whose constructors must never be reached.
    struct NoDevice;

    impl CreateMesh for NoDevice {
        fn create_dynamic_mesh<V: Vertex>(
            &self,
            _primitive_type: PrimitiveType,
            _usage: DynamicMeshUsage,
        ) -> Box<dyn DynamicMesh<V>> {
            unreachable!("empty data must be rejected before creating a mesh")
        }

        fn create_mesh<V: Vertex>(
            &self,
            _primitive_type: PrimitiveType,
            _vertices: &[V],
        ) -> Result<StaticMesh<V>, MeshError> {
            unreachable!()
        }
    }

    struct EmptyDescription;

    impl MeshDescription<VertexPositionColor> for EmptyDescription {
        fn primitive_type(&self) -> PrimitiveType {
            PrimitiveType::TriangleList
        }

        fn vertices(&self) -> &[VertexPositionColor] {
            &[]
        }
    }

    #[test]
    fn dynamic_mesh_from_no_vertices_is_rejected() {
        let vertices: &[VertexPositionColor] = &[];
        for usage in [DynamicMeshUsage::UpdateOften, DynamicMeshUsage::UpdateSeldom] {
            let err = NoDevice
                .create_dynamic_mesh_from(PrimitiveType::LineList, vertices, usage)
                .err();
            assert_eq!(err, Some(MeshError::EmptyVertices));
        }
    }

    #[test]
    fn dynamic_mesh_from_empty_description_is_rejected() {
        let err = NoDevice
            .create_dynamic_mesh_from_description(&EmptyDescription, DynamicMeshUsage::default())
            .err();
        assert_eq!(err, Some(MeshError::EmptyVertices));
    }
}
