use bevy_ecs::prelude::*;

use crate::math::{Color3, Vec3f};


#[derive(Debug,Component)]
pub struct Light {
    pub name: String,
    pub color: Color3,
    pub intensity: f32,
    /// Sky direction of a hemispheric light.
    pub direction: Vec3f,
}

impl Light {
    pub fn hemispheric(name: &str) -> Self {
        Self {
            name: name.to_string(),
            color: Color3::white(),
            intensity: 1.0,
            direction: Vec3f::new(0., 1., 0.),
        }
    }
}
