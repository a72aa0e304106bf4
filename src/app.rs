use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::assets::AssetSource;
use crate::config::ExhibitConfig;
use crate::content::load_content;
use crate::logging::printlog;
use crate::presenter::{apply_xr_init_styling, present_fallback, present_xr};
use crate::scene::Scene;
use crate::surface::{Page, PageView, VideoTexture};
use crate::xr::{probe_capability, ReferenceSpaceType, XrCapability, XrExperience, XrRuntime, XrSessionMode, XrState};

/// Everything the bootstrap steps and the render loop share.
pub struct ExperienceState {
    pub scene: Scene,
    pub page: PageView,
    pub video: Option<VideoTexture>,
    pub call_to_action: CallToAction,
}

pub type SharedState = Rc<RefCell<ExperienceState>>;

impl ExperienceState {
    /// Empty scene with the default camera and light, canvas hidden.
    pub fn new() -> Self {
        let mut scene = Scene::new();
        scene.create_default_camera_and_light();
        Self {
            scene,
            page: PageView::initial(),
            video: None,
            call_to_action: CallToAction::Unbound,
        }
    }

    pub fn shared(self) -> SharedState {
        Rc::new(RefCell::new(self))
    }

    /// Shows the canvas in place of the image and starts the video.
    pub fn reveal(&mut self) {
        self.page.reveal_canvas();
        if let Some(video) = self.video.as_mut() {
            video.play();
        }
    }
}

impl Default for ExperienceState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a click on the page image does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallToAction {
    /// Nothing is ready yet.
    Unbound,
    Reveal,
    RevealWithXrStyling,
    EnterXr {
        mode: XrSessionMode,
        reference_space: ReferenceSpaceType,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Failure image shown, nothing loaded.
    Unsupported,
    Fallback,
    Xr(XrSessionMode),
}

pub struct Bootstrapper<P: Page, X: XrRuntime, A: AssetSource> {
    config: ExhibitConfig,
    state: SharedState,
    page: RefCell<P>,
    xr_runtime: X,
    assets: A,
    xr: RefCell<Option<XrExperience>>,
    capability: Cell<Option<XrCapability>>,
}

impl<P: Page, X: XrRuntime, A: AssetSource> Bootstrapper<P, X, A> {
    pub fn new(config: ExhibitConfig, state: SharedState, page: P, xr_runtime: X, assets: A) -> Self {
        Self {
            config,
            state,
            page: RefCell::new(page),
            xr_runtime,
            assets,
            xr: RefCell::new(None),
            capability: Cell::new(None),
        }
    }

    pub fn config(&self) -> &ExhibitConfig {
        &self.config
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn page(&self) -> Ref<'_, P> {
        self.page.borrow()
    }

    pub fn capability(&self) -> Option<XrCapability> {
        self.capability.get()
    }

    pub fn xr_state(&self) -> Option<XrState> {
        self.xr.borrow().as_ref().map(|xr| xr.state())
    }

    /// Probe, then either show the failure image or load content and
    /// present one of the two paths. Runs once per page.
    pub async fn start(&self) -> Result<Outcome> {
        self.sync_page()?;

        let capability = probe_capability(&self.xr_runtime, &self.config.xr_modes).await?;
        self.capability.set(Some(capability));

        if !capability.is_supported() && !self.config.debug_override {
            printlog("No immersive session available");
            self.state.borrow_mut().page.image_src = Some(self.config.failure_image_url());
            self.sync_page()?;
            return Ok(Outcome::Unsupported);
        }

        load_content(&self.state, &self.assets, &self.config).await?;

        let outcome = {
            let mut state = self.state.borrow_mut();
            let floor_meshes = state.scene.meshes_with_material(&self.config.floor_material);
            info!("{} floor meshes", floor_meshes.len());

            match capability {
                XrCapability::Supported(mode) => {
                    let xr = present_xr(&mut state, &self.config, floor_meshes, mode);
                    *self.xr.borrow_mut() = Some(xr);
                    Outcome::Xr(mode)
                }
                XrCapability::Unsupported => {
                    present_fallback(&mut state, &self.config);
                    Outcome::Fallback
                }
            }
        };

        if outcome == Outcome::Fallback {
            self.page.borrow_mut().attach_camera_controls(&self.state)?;
        }
        self.sync_page()?;
        Ok(outcome)
    }

    /// Runs the bound call-to-action.
    pub async fn handle_click(&self) -> Result<()> {
        let action = self.state.borrow().call_to_action;
        match action {
            CallToAction::Unbound => {
                debug!("Click ignored, experience not ready");
                return Ok(());
            }
            CallToAction::Reveal => self.state.borrow_mut().reveal(),
            CallToAction::RevealWithXrStyling => {
                let mut state = self.state.borrow_mut();
                apply_xr_init_styling(&mut state, self.config.xr_clear_color);
                state.reveal();
            }
            CallToAction::EnterXr { mode, reference_space } => {
                self.enter_xr(mode, reference_space).await?;
            }
        }
        self.sync_page()
    }

    async fn enter_xr(&self, mode: XrSessionMode, reference_space: ReferenceSpaceType) -> Result<()> {
        {
            let mut xr = self.xr.borrow_mut();
            let xr = xr.as_mut().context("XR experience not created")?;
            if xr.state() != XrState::NotInXr {
                debug!("Click ignored, XR session already {:?}", xr.state());
                return Ok(());
            }
            xr.begin_entry()?;
        }

        let entered = self.xr_runtime.request_session(mode, reference_space).await;

        let mut xr = self.xr.borrow_mut();
        let xr = xr.as_mut().context("XR experience not created")?;
        if let Err(e) = entered {
            xr.entry_failed();
            return Err(e.context(format!("Failed to enter {} on {}", mode, reference_space)));
        }

        let mut state = self.state.borrow_mut();
        xr.session_initialized(&mut state, mode);
        if !self.config.reveal_on_session_init {
            state.reveal();
        }
        Ok(())
    }

    fn sync_page(&self) -> Result<()> {
        let state = self.state.borrow();
        self.page.borrow_mut().apply(&state.page, state.video.as_ref())
    }
}
