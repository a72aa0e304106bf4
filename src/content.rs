//! Scene content: the exhibit model and the video material on its walls.

use anyhow::{Context, Result};
use bevy_ecs::prelude::Entity;

use crate::app::{ExperienceState, SharedState};
use crate::assets::AssetSource;
use crate::components::{Material, TextureRef};
use crate::config::ExhibitConfig;
use crate::loader::import_glb;
use crate::logging::printlog;
use crate::surface::VideoTexture;

pub const VIDEO_TEXTURE_NAME: &str = "videoTexture";
pub const VIDEO_MATERIAL_NAME: &str = "videoMaterial";

/// Fetches and installs the exhibit model. Returns the imported meshes.
pub async fn load_content<A: AssetSource>(
    state: &SharedState,
    assets: &A,
    config: &ExhibitConfig,
) -> Result<Vec<Entity>> {
    let url = config.asset_url(&config.scene_file);
    let bytes = assets.fetch(&url).await?;
    let mut state = state.borrow_mut();
    install_content(&mut state, &bytes, config).with_context(|| format!("Failed to load {}", url))
}

pub fn install_content(state: &mut ExperienceState, glb: &[u8], config: &ExhibitConfig) -> Result<Vec<Entity>> {
    let meshes = import_glb(glb, &mut state.scene)?;

    let video = VideoTexture::new(VIDEO_TEXTURE_NAME, &config.asset_url(&config.video_file));
    let mut video_material = Material::new(VIDEO_MATERIAL_NAME);
    video_material.diffuse_texture = Some(TextureRef::Video(video.name.clone()));
    video_material.emissive_texture = Some(TextureRef::Video(video.name.clone()));
    video_material.back_face_culling = false;
    let video_material = state.scene.add_material(video_material);
    state.video = Some(video);

    for &mesh in &meshes {
        let Some(material) = state.scene.mesh_material(mesh) else {
            continue;
        };
        let Some(name) = state.scene.material(material).map(|m| m.name.clone()) else {
            continue;
        };
        if name == config.room_material {
            state.scene.set_mesh_material(mesh, video_material);
        } else if name == config.floor_material {
            if let Some(floor) = state.scene.material_mut(material) {
                floor.wireframe = true;
            }
        }
    }

    if config.log_mesh_stats {
        for info in state.scene.meshes().iter().filter(|m| meshes.contains(&m.entity)) {
            let geometry = info.geometry.unwrap_or_default();
            printlog(&format!(
                "Mesh Loaded: {}, num vertices: {} num indices: {}",
                info.name, geometry.vertex_count, geometry.index_count
            ));
        }
    }
    Ok(meshes)
}
