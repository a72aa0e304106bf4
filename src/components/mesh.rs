use bevy_ecs::prelude::*;


#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct MeshName(pub String);

/// Vertex and index totals of an imported primitive.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub vertex_count: usize,
    pub index_count: usize,
}

/// Marks meshes owned by the XR teleportation feature.
#[derive(Component, Debug)]
pub struct TeleportHelper;
