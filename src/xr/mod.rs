//! XR capability probing and session entry.

mod experience;
#[cfg(all(target_arch = "wasm32", web_sys_unstable_apis))]
mod webxr;

use std::fmt;

use anyhow::Result;
use log::info;

pub use experience::{XrExperience, XrState, HELPER_MESH_NAMES};
#[cfg(all(target_arch = "wasm32", web_sys_unstable_apis))]
pub use webxr::WebXrRuntime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrSessionMode {
    ImmersiveVr,
    ImmersiveAr,
}

impl XrSessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            XrSessionMode::ImmersiveVr => "immersive-vr",
            XrSessionMode::ImmersiveAr => "immersive-ar",
        }
    }
}

impl fmt::Display for XrSessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSpaceType {
    Local,
    LocalFloor,
    BoundedFloor,
}

impl ReferenceSpaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceSpaceType::Local => "local",
            ReferenceSpaceType::LocalFloor => "local-floor",
            ReferenceSpaceType::BoundedFloor => "bounded-floor",
        }
    }
}

impl fmt::Display for ReferenceSpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the one-time probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrCapability {
    Unsupported,
    /// First mode the platform reported as supported.
    Supported(XrSessionMode),
}

impl XrCapability {
    pub fn is_supported(&self) -> bool {
        matches!(self, XrCapability::Supported(_))
    }
}

/// The platform's immersive session API.
#[allow(async_fn_in_trait)]
pub trait XrRuntime {
    /// `Ok(false)` when the platform has no XR at all.
    async fn is_session_supported(&self, mode: XrSessionMode) -> Result<bool>;

    /// Resolves once the session is running.
    async fn request_session(&self, mode: XrSessionMode, reference_space: ReferenceSpaceType) -> Result<()>;
}

/// Queries `modes` in order and stops at the first supported one.
pub async fn probe_capability<X: XrRuntime>(runtime: &X, modes: &[XrSessionMode]) -> Result<XrCapability> {
    for mode in modes {
        if runtime.is_session_supported(*mode).await? {
            info!("XR session mode {} supported", mode);
            return Ok(XrCapability::Supported(*mode));
        }
        info!("XR session mode {} not supported", mode);
    }
    Ok(XrCapability::Unsupported)
}
