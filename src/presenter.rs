//! The two ways the exhibit is offered once content is in place.

use bevy_ecs::prelude::Entity;
use log::{info, warn};

use crate::app::{CallToAction, ExperienceState};
use crate::components::OrbitRig;
use crate::config::{CameraStyle, ExhibitConfig, FallbackClick};
use crate::math::{Color3, Color4, Vec3f};
use crate::xr::{ReferenceSpaceType, XrExperience, XrSessionMode, HELPER_MESH_NAMES};

pub const ARC_CAMERA_NAME: &str = "ArcCamera";
pub const WALK_CAMERA_NAME: &str = "WalkCamera";

/// Desktop path: a controllable camera and a click that reveals the canvas.
/// Returns the new active camera. Canvas input is wired by the caller.
pub fn present_fallback(state: &mut ExperienceState, config: &ExhibitConfig) -> Entity {
    let scene = &mut state.scene;
    let camera = match &config.camera {
        CameraStyle::Orbit { alpha, beta, radius, target } => {
            scene.add_orbit_camera(ARC_CAMERA_NAME, OrbitRig::new(*alpha, *beta, *radius, *target))
        }
        CameraStyle::FirstPerson { eye_height, direction } => {
            scene.add_first_person_camera(WALK_CAMERA_NAME, Vec3f::new(0., *eye_height, 0.), *direction)
        }
    };
    scene.set_active_camera(camera);
    scene.attach_control(camera);
    scene.set_clear_color(config.fallback_clear_color);

    if let Some(offset) = config.fallback_mesh_offset {
        scene.translate_meshes(Vec3f::new(0., offset, 0.));
    }

    state.call_to_action = match config.fallback_click {
        FallbackClick::Reveal => CallToAction::Reveal,
        FallbackClick::RevealWithXrStyling => CallToAction::RevealWithXrStyling,
    };
    state.page.image_src = Some(config.enter_image_url());
    info!("Desktop fallback ready");
    camera
}

/// Immersive path. `probed` is the mode the capability probe accepted.
pub fn present_xr(
    state: &mut ExperienceState,
    config: &ExhibitConfig,
    floor_meshes: Vec<Entity>,
    probed: XrSessionMode,
) -> XrExperience {
    let mut xr = XrExperience::create(&mut state.scene, floor_meshes);

    let clear_color = config.xr_clear_color;
    let reveal = config.reveal_on_session_init;
    xr.on_session_init(move |state, _mode| {
        apply_xr_init_styling(state, clear_color);
        if reveal {
            state.reveal();
        }
    });

    if probed != config.session_entry_mode {
        warn!(
            "Probe accepted {} but the session is requested as {}",
            probed, config.session_entry_mode
        );
    }
    state.call_to_action = CallToAction::EnterXr {
        mode: config.session_entry_mode,
        reference_space: ReferenceSpaceType::BoundedFloor,
    };
    state.page.image_src = Some(config.enter_image_url());
    info!("XR experience ready");
    xr
}

/// Every mesh named like a teleportation helper, imported ones included, is
/// drawn as a white wireframe over the clear color.
pub fn apply_xr_init_styling(state: &mut ExperienceState, clear_color: Color4) {
    let scene = &mut state.scene;
    for helper in scene.meshes_named(&HELPER_MESH_NAMES) {
        let Some(id) = scene.mesh_material(helper) else {
            continue;
        };
        if let Some(material) = scene.material_mut(id) {
            material.wireframe = true;
            material.diffuse_color = Color3::white();
        }
    }
    scene.set_clear_color(clear_color);
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Geometry, Material, Transform};
    use crate::config::Variant;
    use crate::content::install_content;
    use crate::test_support::{glb_with_meshes, GlbMesh};

    fn state_with_mesh() -> (ExperienceState, Entity) {
        let mut state = ExperienceState::new();
        let floor = state.scene.add_material(Material::new("floor.001"));
        let mesh = state.scene.spawn_mesh(
            "Floor",
            Some(floor),
            Geometry { vertex_count: 4, index_count: 6 },
            Transform::from_position(Vec3f::new(0., 1., 0.)),
        );
        (state, mesh)
    }

    #[test]
    fn orbit_fallback_uses_arc_camera_and_lowers_meshes() {
        let (mut state, mesh) = state_with_mesh();
        let config = ExhibitConfig::for_variant(Variant::Orbit);
        let camera = present_fallback(&mut state, &config);

        assert_eq!(state.scene.active_camera(), Some(camera));
        assert_eq!(state.scene.active_camera_name().as_deref(), Some(ARC_CAMERA_NAME));
        assert!(state.scene.has_control(camera));
        assert_eq!(state.scene.clear_color(), Color4::opaque_black());
        assert!((state.scene.mesh_transform(mesh).unwrap().position().y - 0.6).abs() < 1e-6);
        assert_eq!(state.call_to_action, CallToAction::Reveal);
        assert_eq!(state.page.image_src, Some(config.enter_image_url()));
    }

    #[test]
    fn walk_fallback_stands_at_eye_height() {
        let (mut state, mesh) = state_with_mesh();
        let config = ExhibitConfig::for_variant(Variant::Walk);
        let camera = present_fallback(&mut state, &config);

        assert_eq!(state.scene.active_camera_name().as_deref(), Some(WALK_CAMERA_NAME));
        let position = state.scene.camera_transform(camera).unwrap().position();
        assert!((position.y - 1.6).abs() < 1e-6);
        assert!((state.scene.mesh_transform(mesh).unwrap().position().y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn latest_fallback_click_styles_first() {
        let (mut state, _) = state_with_mesh();
        present_fallback(&mut state, &ExhibitConfig::for_variant(Variant::Immersive));
        assert_eq!(state.call_to_action, CallToAction::RevealWithXrStyling);
    }

    #[test]
    fn xr_entry_always_requests_vr_on_bounded_floor() {
        let (mut state, mesh) = state_with_mesh();
        let config = ExhibitConfig::for_variant(Variant::Immersive);
        let xr = present_xr(&mut state, &config, vec![mesh], XrSessionMode::ImmersiveAr);

        assert_eq!(xr.floor_meshes(), &[mesh]);
        assert_eq!(
            state.call_to_action,
            CallToAction::EnterXr {
                mode: XrSessionMode::ImmersiveVr,
                reference_space: ReferenceSpaceType::BoundedFloor,
            }
        );
        assert_eq!(state.page.image_src, Some(config.enter_image_url()));
        assert!(state.page.canvas_hidden);
    }

    #[test]
    fn session_init_styles_exactly_the_helpers() {
        let (mut state, mesh) = state_with_mesh();
        let config = ExhibitConfig::for_variant(Variant::Orbit);
        let mut xr = present_xr(&mut state, &config, vec![mesh], XrSessionMode::ImmersiveVr);
        let floor_before = state.scene.material(state.scene.mesh_material(mesh).unwrap()).cloned();

        xr.begin_entry().unwrap();
        xr.session_initialized(&mut state, XrSessionMode::ImmersiveVr);

        let mut styled = vec![];
        for info in state.scene.meshes() {
            let material = state.scene.material(info.material.unwrap()).unwrap();
            if material.wireframe {
                assert_eq!(material.diffuse_color, Color3::white());
                styled.push(info.name);
            }
        }
        assert_eq!(styled, HELPER_MESH_NAMES.to_vec());
        assert_eq!(state.scene.material(state.scene.mesh_material(mesh).unwrap()).cloned(), floor_before);
        assert_eq!(state.scene.clear_color(), Color4::transparent_black());
        // Orbit variant reveals only after entry resolves
        assert!(state.page.canvas_hidden);
    }

    #[test]
    fn styling_reaches_imported_helper_meshes() {
        let mut state = ExperienceState::new();
        let config = ExhibitConfig::for_variant(Variant::Immersive);
        let glb = glb_with_meshes(&[
            GlbMesh::new("rotationCone", Some("coneMaterial")),
            GlbMesh::new("Plinth", Some("stone")),
        ]);
        install_content(&mut state, &glb, &config).unwrap();

        apply_xr_init_styling(&mut state, config.xr_clear_color);

        for info in state.scene.meshes() {
            let material = state.scene.material(info.material.unwrap()).unwrap();
            if info.name == "rotationCone" {
                assert!(material.wireframe);
                assert_eq!(material.diffuse_color, Color3::white());
            } else {
                assert!(!material.wireframe, "{} styled", info.name);
            }
        }
        assert_eq!(state.scene.clear_color(), config.xr_clear_color);
    }

    #[test]
    fn latest_variant_reveals_on_session_init() {
        let (mut state, mesh) = state_with_mesh();
        let config = ExhibitConfig::for_variant(Variant::Immersive);
        let mut xr = present_xr(&mut state, &config, vec![mesh], XrSessionMode::ImmersiveVr);
        xr.session_initialized(&mut state, XrSessionMode::ImmersiveVr);
        assert_eq!(state.scene.clear_color(), Color4::opaque_black());
        assert!(!state.page.canvas_hidden);
        assert!(state.page.image_hidden);
    }
}
