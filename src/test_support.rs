//! In-memory fixtures shared by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{anyhow, bail, Result};

use crate::app::SharedState;
use crate::assets::AssetSource;
use crate::render_loop::RenderEngine;
use crate::scene::Frame;
use crate::surface::{Page, PageView, VideoTexture};
use crate::xr::{ReferenceSpaceType, XrRuntime, XrSessionMode};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const CHUNK_JSON: u32 = 0x4E4F534A;
const CHUNK_BIN: u32 = 0x004E4942;

pub struct GlbMesh {
    name: String,
    material: Option<String>,
    translation: [f32; 3],
}

impl GlbMesh {
    pub fn new(name: &str, material: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            material: material.map(str::to_string),
            translation: [0., 0., 0.],
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = [x, y, z];
        self
    }
}

/// One indexed triangle per entry, one node per mesh, materials shared by name.
pub fn glb_with_meshes(meshes: &[GlbMesh]) -> Vec<u8> {
    let mut bin: Vec<u8> = vec![];
    for v in [[0f32, 0., 0.], [1., 0., 0.], [0., 1., 0.]] {
        for c in v {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    pad(&mut bin, 0);

    let mut material_names: Vec<&str> = vec![];
    let mut gltf_meshes = vec![];
    let mut nodes = vec![];
    for (i, mesh) in meshes.iter().enumerate() {
        let material = match mesh.material.as_deref() {
            Some(name) => {
                let existing = material_names.iter().position(|m| *m == name);
                let index = match existing {
                    Some(index) => index,
                    None => {
                        material_names.push(name);
                        material_names.len() - 1
                    }
                };
                format!(r#","material":{}"#, index)
            }
            None => String::new(),
        };
        gltf_meshes.push(format!(
            r#"{{"name":"{}","primitives":[{{"attributes":{{"POSITION":0}},"indices":1{}}}]}}"#,
            mesh.name, material
        ));
        let [x, y, z] = mesh.translation;
        nodes.push(format!(r#"{{"name":"{}","mesh":{},"translation":[{},{},{}]}}"#, mesh.name, i, x, y, z));
    }

    let materials = if material_names.is_empty() {
        String::new()
    } else {
        let list: Vec<String> = material_names.iter().map(|m| format!(r#"{{"name":"{}"}}"#, m)).collect();
        format!(r#","materials":[{}]"#, list.join(","))
    };
    let scene_nodes: Vec<String> = (0..meshes.len()).map(|i| i.to_string()).collect();

    let json = format!(
        concat!(
            r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[{}]}}],"#,
            r#""nodes":[{}],"meshes":[{}]{},"#,
            r#""buffers":[{{"byteLength":{}}}],"#,
            r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36}},{{"buffer":0,"byteOffset":36,"byteLength":6}}],"#,
            r#""accessors":["#,
            r#"{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}},"#,
            r#"{{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}}]}}"#
        ),
        scene_nodes.join(","),
        nodes.join(","),
        gltf_meshes.join(","),
        materials,
        bin.len()
    );
    let mut json = json.into_bytes();
    pad(&mut json, b' ');

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(&bin);
    glb
}

fn pad(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

/// Serves fixed bytes per URL and records every request.
#[derive(Default)]
pub struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
    requested: RefCell<Vec<String>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(url.to_string(), bytes);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl AssetSource for MemoryAssets {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requested.borrow_mut().push(url.to_string());
        self.files.get(url).cloned().ok_or_else(|| anyhow!("404 {}", url))
    }
}

pub struct MockXr {
    supported: Vec<XrSessionMode>,
    fail_queries: bool,
    reject_sessions: bool,
    queried: RefCell<Vec<XrSessionMode>>,
    entered: RefCell<Vec<(XrSessionMode, ReferenceSpaceType)>>,
}

impl MockXr {
    pub fn supporting(modes: &[XrSessionMode]) -> Self {
        Self {
            supported: modes.to_vec(),
            fail_queries: false,
            reject_sessions: false,
            queried: RefCell::new(vec![]),
            entered: RefCell::new(vec![]),
        }
    }

    pub fn failing_queries() -> Self {
        Self { fail_queries: true, ..Self::supporting(&[]) }
    }

    pub fn rejecting_sessions(mut self) -> Self {
        self.reject_sessions = true;
        self
    }

    pub fn queried(&self) -> Vec<XrSessionMode> {
        self.queried.borrow().clone()
    }

    pub fn entered(&self) -> Vec<(XrSessionMode, ReferenceSpaceType)> {
        self.entered.borrow().clone()
    }
}

impl XrRuntime for MockXr {
    async fn is_session_supported(&self, mode: XrSessionMode) -> Result<bool> {
        self.queried.borrow_mut().push(mode);
        if self.fail_queries {
            bail!("isSessionSupported threw");
        }
        Ok(self.supported.contains(&mode))
    }

    async fn request_session(&self, mode: XrSessionMode, reference_space: ReferenceSpaceType) -> Result<()> {
        self.entered.borrow_mut().push((mode, reference_space));
        if self.reject_sessions {
            bail!("NotAllowedError");
        }
        Ok(())
    }
}

/// Keeps every view applied to it.
#[derive(Default)]
pub struct RecordingPage {
    views: Vec<PageView>,
    video: Option<VideoTexture>,
    controls: usize,
}

impl RecordingPage {
    pub fn last_view(&self) -> Option<PageView> {
        self.views.last().cloned()
    }

    pub fn video_playing(&self) -> bool {
        self.video.as_ref().map(|v| v.playing).unwrap_or(false)
    }

    pub fn controls_attached(&self) -> usize {
        self.controls
    }
}

impl Page for RecordingPage {
    fn apply(&mut self, view: &PageView, video: Option<&VideoTexture>) -> Result<()> {
        self.views.push(view.clone());
        self.video = video.cloned();
        Ok(())
    }

    fn attach_camera_controls(&mut self, _state: &SharedState) -> Result<()> {
        self.controls += 1;
        Ok(())
    }
}

pub struct RecordingEngine {
    size: (u32, u32),
    frames: Vec<Frame>,
    resizes: usize,
}

impl RecordingEngine {
    pub fn new(width: u32, height: u32) -> Self {
        Self { size: (width, height), frames: vec![], resizes: 0 }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn resizes(&self) -> usize {
        self.resizes
    }
}

impl RenderEngine for RecordingEngine {
    fn resize(&mut self) -> Result<(u32, u32)> {
        self.resizes += 1;
        Ok(self.size)
    }

    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
