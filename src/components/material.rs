use bevy_ecs::prelude::*;

use crate::math::Color3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

/// Texture a material channel samples from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureRef {
    /// The scene's video texture, by name.
    Video(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse_color: Color3,
    pub diffuse_texture: Option<TextureRef>,
    pub emissive_texture: Option<TextureRef>,
    pub back_face_culling: bool,
    pub wireframe: bool,
}

impl Material {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            diffuse_color: Color3::white(),
            diffuse_texture: None,
            emissive_texture: None,
            back_face_culling: true,
            wireframe: false,
        }
    }

    pub fn with_diffuse_color(mut self, color: Color3) -> Self {
        self.diffuse_color = color;
        self
    }
}

/// Materials shared between meshes. A mesh points at one through [`MaterialHandle`].
#[derive(Resource, Debug, Default)]
pub struct MaterialStore {
    materials: Vec<Material>,
}

impl MaterialStore {
    pub fn add(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialHandle(pub MaterialId);
