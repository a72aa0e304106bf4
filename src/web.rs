use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

use crate::app::{Bootstrapper, ExperienceState, Outcome};
use crate::assets::DefaultAssets;
use crate::config::{ExhibitConfig, Variant};
use crate::device::Device;
use crate::logging::{init_logging, printlog};
use crate::render_loop::RenderLoop;
use crate::surface::{DomPage, Page};
use crate::xr::WebXrRuntime;

// Runs the desktop camera when no XR session is available
const DEBUG_OVERRIDE: bool = false;

const VARIANT_ATTRIBUTE: &str = "data-variant";

type PageBootstrapper = Bootstrapper<DomPage, WebXrRuntime, DefaultAssets>;

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) -> Result<i32> {
    web_sys::window()
        .context("No window")?
        .request_animation_frame(f.as_ref().unchecked_ref())
        .map_err(js_err)
}

pub async fn start() -> Result<()> {
    init_logging(DEBUG_OVERRIDE);

    let mut page = DomPage::acquire()?;
    let variant = match page.canvas.get_attribute(VARIANT_ATTRIBUTE) {
        Some(name) => name.parse::<Variant>()?,
        None => Variant::default(),
    };
    printlog(&format!("Starting exhibit ({:?})", variant));
    let config = ExhibitConfig::for_variant(variant).with_debug_override(DEBUG_OVERRIDE);

    let state = ExperienceState::new().shared();
    {
        let state = state.borrow();
        page.apply(&state.page, None)?;
    }

    let device = Device::new(&page.canvas).await?;
    let render_loop = Rc::new(RefCell::new(RenderLoop::new(state.clone(), device)));
    start_render_loop(render_loop.clone())?;
    listen_for_resize(render_loop)?;

    let image = page.image.clone();
    let xr_runtime = WebXrRuntime::new(page.canvas.clone(), state.clone());
    let bootstrapper = Rc::new(Bootstrapper::new(config, state, page, xr_runtime, DefaultAssets));
    bind_call_to_action(&image, bootstrapper.clone());

    match bootstrapper.start().await? {
        Outcome::Unsupported => printlog("Immersive mode unsupported"),
        Outcome::Fallback => printlog("Desktop experience ready"),
        Outcome::Xr(mode) => printlog(&format!("XR experience ready ({})", mode)),
    }
    Ok(())
}

fn start_render_loop(render_loop: Rc<RefCell<RenderLoop<Device>>>) -> Result<()> {
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::new(move |time: f64| {
        if let Err(e) = render_loop.borrow_mut().frame(time) {
            error!("Frame failed: {:?}", e);
        }
        if let Some(callback) = f.borrow().as_ref() {
            if let Err(e) = request_animation_frame(callback) {
                error!("{:?}", e);
            }
        }
    }));

    if let Some(callback) = g.borrow().as_ref() {
        request_animation_frame(callback)?;
    }
    Ok(())
}

fn listen_for_resize(render_loop: Rc<RefCell<RenderLoop<Device>>>) -> Result<()> {
    render_loop.borrow_mut().resize()?;

    let on_resize = Closure::<dyn FnMut()>::new(move || {
        if let Err(e) = render_loop.borrow_mut().resize() {
            error!("Resize failed: {:?}", e);
        }
    });
    web_sys::window()
        .context("No window")?
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_resize.forget();
    Ok(())
}

fn bind_call_to_action(image: &HtmlImageElement, bootstrapper: Rc<PageBootstrapper>) {
    let on_click = Closure::<dyn FnMut()>::new(move || {
        let bootstrapper = bootstrapper.clone();
        // Using future_to_promise instead of spawn_local so the XR request
        // still counts as triggered by the click on the Meta Quest browser.
        let _ = wasm_bindgen_futures::future_to_promise(async move {
            if let Err(e) = bootstrapper.handle_click().await {
                error!("{:?}", e);
            }
            Ok(JsValue::UNDEFINED)
        });
    });
    image.set_onclick(Some(on_click.as_ref().unchecked_ref()));
    on_click.forget();
}
