use std::f32::consts::FRAC_PI_2;
use std::str::FromStr;

use anyhow::bail;

use crate::math::{Color4, Vec3f};
use crate::xr::XrSessionMode;

// Switch between local and cloud file locations
pub const CLOUD_FILE_PREFIX: &str = "https://allotropeijk.blob.core.windows.net/2021summerexhibit/";
pub const LOCAL_FILE_PREFIX: &str = "/resources/";

const IMAGE_STEM: &str = "23rdAndCherry";

/// The three published builds of the installation page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Orbit camera on desktop, VR only.
    Orbit,
    /// First-person walking camera on desktop, VR only.
    Walk,
    /// Latest build: VR with AR fallback, opaque XR background.
    #[default]
    Immersive,
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orbit" => Ok(Variant::Orbit),
            "walk" => Ok(Variant::Walk),
            "immersive" => Ok(Variant::Immersive),
            other => bail!("unknown exhibit variant '{}'", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CameraStyle {
    /// Camera orbiting `target`, angles in radians.
    Orbit {
        alpha: f32,
        beta: f32,
        radius: f32,
        target: Vec3f,
    },
    /// Walking camera at eye height looking along `direction`.
    FirstPerson {
        eye_height: f32,
        direction: Vec3f,
    },
}

/// What the call-to-action does on the desktop path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackClick {
    Reveal,
    RevealWithXrStyling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExhibitConfig {
    pub file_prefix: String,
    pub scene_file: String,
    pub video_file: String,
    pub image_stem: String,
    pub floor_material: String,
    pub room_material: String,
    pub camera: CameraStyle,
    pub fallback_clear_color: Color4,
    pub xr_clear_color: Color4,
    /// Vertical shift applied to every mesh on the desktop path.
    pub fallback_mesh_offset: Option<f32>,
    /// Probed in order, first supported mode wins.
    pub xr_modes: Vec<XrSessionMode>,
    pub session_entry_mode: XrSessionMode,
    pub reveal_on_session_init: bool,
    pub fallback_click: FallbackClick,
    pub log_mesh_stats: bool,
    /// Run the desktop path when no XR session is available.
    pub debug_override: bool,
}

impl ExhibitConfig {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Orbit => Self {
                file_prefix: CLOUD_FILE_PREFIX.to_string(),
                scene_file: "home.07.glb".to_string(),
                video_file: "noise.04.mp4".to_string(),
                image_stem: IMAGE_STEM.to_string(),
                floor_material: "floor.001".to_string(),
                room_material: "room.002".to_string(),
                camera: CameraStyle::Orbit {
                    alpha: FRAC_PI_2,
                    beta: FRAC_PI_2,
                    radius: 1.0,
                    target: Vec3f::zeros(),
                },
                fallback_clear_color: Color4::opaque_black(),
                xr_clear_color: Color4::transparent_black(),
                fallback_mesh_offset: Some(-0.4),
                xr_modes: vec![XrSessionMode::ImmersiveVr],
                session_entry_mode: XrSessionMode::ImmersiveVr,
                reveal_on_session_init: false,
                fallback_click: FallbackClick::Reveal,
                log_mesh_stats: true,
                debug_override: false,
            },
            Variant::Walk => Self {
                file_prefix: CLOUD_FILE_PREFIX.to_string(),
                scene_file: "home.05.glb".to_string(),
                video_file: "noise.03.mp4".to_string(),
                image_stem: IMAGE_STEM.to_string(),
                floor_material: "floor".to_string(),
                room_material: "room.001".to_string(),
                camera: CameraStyle::FirstPerson {
                    eye_height: 1.6,
                    direction: Vec3f::new(0., 0., 1.),
                },
                fallback_clear_color: Color4::opaque_black(),
                xr_clear_color: Color4::transparent_black(),
                fallback_mesh_offset: None,
                xr_modes: vec![XrSessionMode::ImmersiveVr],
                session_entry_mode: XrSessionMode::ImmersiveVr,
                reveal_on_session_init: false,
                fallback_click: FallbackClick::Reveal,
                log_mesh_stats: false,
                debug_override: false,
            },
            Variant::Immersive => Self {
                file_prefix: CLOUD_FILE_PREFIX.to_string(),
                scene_file: "home.08.glb".to_string(),
                video_file: "noise.04.mp4".to_string(),
                image_stem: IMAGE_STEM.to_string(),
                floor_material: "floor.001".to_string(),
                room_material: "room.002".to_string(),
                camera: CameraStyle::FirstPerson {
                    eye_height: 1.6,
                    direction: Vec3f::new(0., 0., 1.),
                },
                fallback_clear_color: Color4::opaque_black(),
                xr_clear_color: Color4::opaque_black(),
                fallback_mesh_offset: None,
                xr_modes: vec![XrSessionMode::ImmersiveVr, XrSessionMode::ImmersiveAr],
                // Entry keeps the VR literal even when only AR probed as supported.
                session_entry_mode: XrSessionMode::ImmersiveVr,
                reveal_on_session_init: true,
                fallback_click: FallbackClick::RevealWithXrStyling,
                log_mesh_stats: false,
                debug_override: false,
            },
        }
    }

    pub fn with_debug_override(mut self, debug_override: bool) -> Self {
        self.debug_override = debug_override;
        self
    }

    pub fn with_file_prefix(mut self, prefix: &str) -> Self {
        self.file_prefix = prefix.to_string();
        self
    }

    pub fn asset_url(&self, file_name: &str) -> String {
        format!("{}{}", self.file_prefix, file_name)
    }

    pub fn enter_image_url(&self) -> String {
        self.asset_url(&format!("{}Enter.png", self.image_stem))
    }

    pub fn failure_image_url(&self) -> String {
        self.asset_url(&format!("{}Failure.png", self.image_stem))
    }
}

impl Default for ExhibitConfig {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}
