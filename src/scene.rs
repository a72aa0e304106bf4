use bevy_ecs::prelude::*;

use crate::camera_controller::{FirstPersonController, OrbitController};
use crate::components::{
    Camera, CameraControls, Geometry, Light, Material, MaterialHandle, MaterialId,
    MaterialStore, MeshName, OrbitRig, TeleportHelper, Transform,
};
use crate::events::{KeyboardEvent, MouseEvent, WindowResizeEvent};
use crate::frame_time::FrameTime;
use crate::input::Input;
use crate::math::{Color4, Mat4f, Vec3f};
use crate::systems::{new_frame_schedule, FrameLabel};

pub const DEFAULT_CAMERA_NAME: &str = "default camera";
pub const DEFAULT_LIGHT_NAME: &str = "default light";

// Canvas size assumed until the first resize arrives
const INITIAL_SURFACE: (u32, u32) = (1280, 720);

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub Color4);

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCamera(pub Entity);

/// Last canvas size seen by `resize_cameras`. New cameras start from it.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        let (width, height) = INITIAL_SURFACE;
        Self { width, height }
    }
}

/// Read-only snapshot of a mesh and its material.
#[derive(Debug, Clone)]
pub struct MeshInfo {
    pub entity: Entity,
    pub name: String,
    pub material: Option<MaterialId>,
    pub material_name: Option<String>,
    pub geometry: Option<Geometry>,
}

/// What the engine needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: Color4,
    pub view_proj: Option<Mat4f>,
    pub mesh_count: usize,
}

pub struct Scene {
    world: World,
}

impl Scene {
    pub fn new() -> Self {
        let mut world = World::default();
        world.init_resource::<Schedules>();

        world.insert_resource(MaterialStore::default());
        world.insert_resource(ClearColor(Color4::default()));
        world.insert_resource(SurfaceSize::default());
        world.insert_resource(FrameTime::new());
        world.insert_resource(Input::new());

        // Events
        world.init_resource::<Events<WindowResizeEvent>>();
        world.init_resource::<Events<KeyboardEvent>>();
        world.init_resource::<Events<MouseEvent>>();

        // Schedules
        let frame_schedule = new_frame_schedule();
        world.add_schedule(frame_schedule.0, frame_schedule.1);

        Self { world }
    }

    /// Orbit camera around the origin plus a hemispheric light.
    pub fn create_default_camera_and_light(&mut self) {
        let rig = OrbitRig::new(-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2, 3.0, Vec3f::zeros());
        let camera = self.add_orbit_camera(DEFAULT_CAMERA_NAME, rig);
        self.set_active_camera(camera);
        self.world.spawn(Light::hemispheric(DEFAULT_LIGHT_NAME));
    }

    //
    // Materials
    //

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.world.resource_mut::<MaterialStore>().add(material)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.world.resource::<MaterialStore>().get(id)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.world.resource_mut::<MaterialStore>().into_inner().get_mut(id)
    }

    pub fn material_count(&self) -> usize {
        self.world.resource::<MaterialStore>().len()
    }

    //
    // Meshes
    //

    pub fn spawn_mesh(
        &mut self,
        name: &str,
        material: Option<MaterialId>,
        geometry: Geometry,
        transform: Transform,
    ) -> Entity {
        let mut entity = self.world.spawn((MeshName(name.to_string()), geometry, transform));
        if let Some(id) = material {
            entity.insert(MaterialHandle(id));
        }
        entity.id()
    }

    pub fn spawn_teleport_helper(
        &mut self,
        name: &str,
        material: MaterialId,
        geometry: Geometry,
        transform: Transform,
    ) -> Entity {
        let entity = self.spawn_mesh(name, Some(material), geometry, transform);
        self.world.entity_mut(entity).insert(TeleportHelper);
        entity
    }

    /// Helper meshes in spawn order.
    pub fn teleport_helpers(&mut self) -> Vec<Entity> {
        let mut query = self.world.query_filtered::<Entity, (With<MeshName>, With<TeleportHelper>)>();
        let mut helpers: Vec<Entity> = query.iter(&self.world).collect();
        helpers.sort_by_key(|e| e.index());
        helpers
    }

    /// Meshes in spawn order.
    pub fn meshes(&mut self) -> Vec<MeshInfo> {
        let mut query = self.world.query::<(Entity, &MeshName, Option<&MaterialHandle>, Option<&Geometry>)>();
        let store = self.world.resource::<MaterialStore>();
        let mut meshes: Vec<MeshInfo> = query
            .iter(&self.world)
            .map(|(entity, name, handle, geometry)| {
                let material = handle.map(|h| h.0);
                MeshInfo {
                    entity,
                    name: name.0.clone(),
                    material,
                    material_name: material.and_then(|id| store.get(id)).map(|m| m.name.clone()),
                    geometry: geometry.copied(),
                }
            })
            .collect();
        meshes.sort_by_key(|m| m.entity.index());
        meshes
    }

    pub fn mesh_count(&mut self) -> usize {
        self.world.query::<&MeshName>().iter(&self.world).count()
    }

    /// Meshes named any of `names`, in spawn order.
    pub fn meshes_named(&mut self, names: &[&str]) -> Vec<Entity> {
        self.meshes()
            .into_iter()
            .filter(|m| names.contains(&m.name.as_str()))
            .map(|m| m.entity)
            .collect()
    }

    /// Meshes whose current material is named `material_name`, in spawn order.
    pub fn meshes_with_material(&mut self, material_name: &str) -> Vec<Entity> {
        self.meshes()
            .into_iter()
            .filter(|m| m.material_name.as_deref() == Some(material_name))
            .map(|m| m.entity)
            .collect()
    }

    pub fn mesh_material(&self, mesh: Entity) -> Option<MaterialId> {
        self.world.get::<MaterialHandle>(mesh).map(|h| h.0)
    }

    pub fn set_mesh_material(&mut self, mesh: Entity, material: MaterialId) {
        if let Some(mut entity) = self.world.get_entity_mut(mesh) {
            entity.insert(MaterialHandle(material));
        }
    }

    pub fn mesh_transform(&self, mesh: Entity) -> Option<&Transform> {
        self.world.get::<Transform>(mesh)
    }

    pub fn translate_meshes(&mut self, offset: Vec3f) {
        let mut query = self.world.query_filtered::<&mut Transform, With<MeshName>>();
        for mut transform in query.iter_mut(&mut self.world) {
            transform.translate(offset);
        }
    }

    //
    // Cameras
    //

    pub fn add_orbit_camera(&mut self, name: &str, rig: OrbitRig) -> Entity {
        let camera = self.sized_camera(name);
        let transform = rig.transform();
        self.world
            .spawn((camera, transform, rig, OrbitController::new(0.005, 0.01)))
            .id()
    }

    pub fn add_first_person_camera(&mut self, name: &str, position: Vec3f, direction: Vec3f) -> Entity {
        let camera = self.sized_camera(name);
        let mut transform = Transform::from_position(position);
        transform.look_at(position + direction);
        self.world
            .spawn((camera, transform, FirstPersonController::new(4.0, 0.4)))
            .id()
    }

    fn sized_camera(&self, name: &str) -> Camera {
        let size = self.world.resource::<SurfaceSize>();
        Camera::new(name, size.width, size.height)
    }

    pub fn set_active_camera(&mut self, camera: Entity) {
        self.world.insert_resource(ActiveCamera(camera));
    }

    pub fn active_camera(&self) -> Option<Entity> {
        self.world.get_resource::<ActiveCamera>().map(|a| a.0)
    }

    pub fn active_camera_name(&self) -> Option<String> {
        let camera = self.active_camera()?;
        self.world.get::<Camera>(camera).map(|c| c.name.clone())
    }

    pub fn camera_transform(&self, camera: Entity) -> Option<&Transform> {
        self.world.get::<Transform>(camera)
    }

    /// Routes pointer and keyboard input to `camera`.
    pub fn attach_control(&mut self, camera: Entity) {
        if let Some(mut entity) = self.world.get_entity_mut(camera) {
            entity.insert(CameraControls);
        }
    }

    pub fn has_control(&self, camera: Entity) -> bool {
        self.world.get::<CameraControls>(camera).is_some()
    }

    pub fn light_count(&mut self) -> usize {
        self.world.query::<&Light>().iter(&self.world).count()
    }

    //
    // Background
    //

    pub fn clear_color(&self) -> Color4 {
        self.world.resource::<ClearColor>().0
    }

    pub fn set_clear_color(&mut self, color: Color4) {
        self.world.insert_resource(ClearColor(color));
    }

    //
    // Per-frame
    //

    pub fn send_keyboard(&mut self, event: KeyboardEvent) {
        self.world.send_event(event);
    }

    pub fn send_mouse(&mut self, event: MouseEvent) {
        self.world.send_event(event);
    }

    pub fn send_resize(&mut self, width: u32, height: u32) {
        self.world.send_event(WindowResizeEvent { width, height });
    }

    /// Advances input and camera controllers by one animation frame.
    pub fn update(&mut self, timestamp_ms: f64) {
        self.world.resource_mut::<FrameTime>().advance(timestamp_ms);
        self.world.run_schedule(FrameLabel);

        self.world.resource_mut::<Events<WindowResizeEvent>>().update();
        self.world.resource_mut::<Events<KeyboardEvent>>().update();
        self.world.resource_mut::<Events<MouseEvent>>().update();
    }

    pub fn frame(&mut self) -> Frame {
        let view_proj = self.active_camera().and_then(|camera| {
            let c = self.world.get::<Camera>(camera)?;
            let t = self.world.get::<Transform>(camera)?;
            Some(c.view_proj(t))
        });
        Frame {
            clear_color: self.clear_color(),
            view_proj,
            mesh_count: self.mesh_count(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
