use anyhow::{bail, Result};
use bevy_ecs::prelude::Entity;
use log::{debug, info};

use crate::app::ExperienceState;
use crate::components::{Geometry, Material, Transform};
use crate::events::{Observable, ObserverHandle};
use crate::math::{Color3, Vec3f};
use crate::scene::Scene;

use super::XrSessionMode;

pub const TELEPORTATION_TARGET: &str = "teleportationTarget";
pub const TORUS_TELEPORTATION: &str = "torusTeleportation";
pub const ROTATION_CONE: &str = "rotationCone";

pub const HELPER_MESH_NAMES: [&str; 3] = [TELEPORTATION_TARGET, TORUS_TELEPORTATION, ROTATION_CONE];

// Teleportation ring sits just above the floor
const TARGET_HEIGHT: f32 = 0.01;
const HELPER_COLOR: Color3 = Color3::new(0.3, 0.3, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrState {
    NotInXr,
    EnteringXr,
    InXr,
}

/// Default immersive experience: session bookkeeping plus the teleportation
/// helpers that walk the floor meshes.
pub struct XrExperience {
    floor_meshes: Vec<Entity>,
    helpers: Vec<Entity>,
    state: XrState,
    on_session_init: Observable<ExperienceState, XrSessionMode>,
}

impl XrExperience {
    pub fn create(scene: &mut Scene, floor_meshes: Vec<Entity>) -> Self {
        let helpers = HELPER_MESH_NAMES
            .iter()
            .map(|name| {
                let material = scene.add_material(
                    Material::new(&format!("{}Material", name)).with_diffuse_color(HELPER_COLOR),
                );
                let transform = Transform::from_position(Vec3f::new(0., TARGET_HEIGHT, 0.));
                scene.spawn_teleport_helper(name, material, helper_geometry(name), transform)
            })
            .collect();
        info!("XR experience created with {} walkable floor meshes", floor_meshes.len());

        Self {
            floor_meshes,
            helpers,
            state: XrState::NotInXr,
            on_session_init: Observable::new(),
        }
    }

    pub fn floor_meshes(&self) -> &[Entity] {
        &self.floor_meshes
    }

    pub fn helpers(&self) -> &[Entity] {
        &self.helpers
    }

    pub fn state(&self) -> XrState {
        self.state
    }

    pub fn on_session_init(
        &mut self,
        callback: impl FnMut(&mut ExperienceState, &XrSessionMode) + 'static,
    ) -> ObserverHandle {
        self.on_session_init.add(callback)
    }

    pub fn remove_session_init_observer(&mut self, handle: ObserverHandle) -> bool {
        self.on_session_init.remove(handle)
    }

    /// Marks a session request as in flight.
    pub fn begin_entry(&mut self) -> Result<()> {
        if self.state != XrState::NotInXr {
            bail!("XR session already {:?}", self.state);
        }
        self.state = XrState::EnteringXr;
        Ok(())
    }

    pub fn entry_failed(&mut self) {
        debug!("XR session request failed, back to {:?}", XrState::NotInXr);
        self.state = XrState::NotInXr;
    }

    /// Runs the session-init observers in registration order.
    pub fn session_initialized(&mut self, state: &mut ExperienceState, mode: XrSessionMode) {
        self.state = XrState::InXr;
        info!("XR session initialized ({})", mode);
        self.on_session_init.notify(state, &mode);
    }
}

fn helper_geometry(name: &str) -> Geometry {
    match name {
        TELEPORTATION_TARGET => disc_geometry(32),
        TORUS_TELEPORTATION => torus_geometry(32),
        _ => cone_geometry(4),
    }
}

fn disc_geometry(tessellation: usize) -> Geometry {
    Geometry { vertex_count: tessellation + 2, index_count: tessellation * 3 }
}

fn torus_geometry(tessellation: usize) -> Geometry {
    let ring = tessellation + 1;
    Geometry { vertex_count: ring * ring, index_count: tessellation * tessellation * 6 }
}

fn cone_geometry(tessellation: usize) -> Geometry {
    // side plus one cap
    Geometry { vertex_count: (tessellation + 1) * 2 + tessellation + 2, index_count: tessellation * 9 }
}
