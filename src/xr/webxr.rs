use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use js_sys::{Object, Reflect};
use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext, XrFrame, XrReferenceSpace, XrRenderStateInit,
    XrSession, XrSessionInit, XrSystem, XrView, XrWebGlLayer,
};

use super::{ReferenceSpaceType, XrRuntime, XrSessionMode};
use crate::app::SharedState;
use crate::logging::printlog;

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

fn request_animation_frame(session: &XrSession, f: &Closure<dyn FnMut(f64, XrFrame)>) -> u32 {
    session.request_animation_frame(f.as_ref().unchecked_ref())
}

fn js_array(values: &[&str]) -> JsValue {
    JsValue::from(values.iter().map(|x| JsValue::from_str(x)).collect::<js_sys::Array>())
}

fn web_mode(mode: XrSessionMode) -> web_sys::XrSessionMode {
    match mode {
        XrSessionMode::ImmersiveVr => web_sys::XrSessionMode::ImmersiveVr,
        XrSessionMode::ImmersiveAr => web_sys::XrSessionMode::ImmersiveAr,
    }
}

fn web_space(space: ReferenceSpaceType) -> web_sys::XrReferenceSpaceType {
    match space {
        ReferenceSpaceType::Local => web_sys::XrReferenceSpaceType::Local,
        ReferenceSpaceType::LocalFloor => web_sys::XrReferenceSpaceType::LocalFloor,
        ReferenceSpaceType::BoundedFloor => web_sys::XrReferenceSpaceType::BoundedFloor,
    }
}

/// `None` when the browser has no WebXR at all.
fn xr_system() -> Result<Option<XrSystem>> {
    let navigator = web_sys::window().context("No window")?.navigator();
    let has_xr = Reflect::has(&navigator, &JsValue::from_str("xr")).map_err(js_err)?;
    Ok(if has_xr { Some(navigator.xr()) } else { None })
}

async fn xr_compatible_context(canvas: &HtmlCanvasElement) -> Result<WebGl2RenderingContext> {
    let gl_attribs = Object::new();
    Reflect::set(&gl_attribs, &JsValue::from_str("xrCompatible"), &JsValue::TRUE).map_err(js_err)?;

    let gl: WebGl2RenderingContext = canvas
        .get_context_with_context_options("webgl2", &gl_attribs)
        .map_err(js_err)?
        .context("Canvas has no WebGL2 context")?
        .dyn_into()
        .map_err(|_| anyhow!("Canvas context is not WebGL2"))?;
    // The context may predate the xrCompatible request
    JsFuture::from(gl.make_xr_compatible()).await.map_err(js_err)?;
    Ok(gl)
}

/// WebXR device API on the page canvas.
pub struct WebXrRuntime {
    canvas: HtmlCanvasElement,
    state: SharedState,
}

impl WebXrRuntime {
    pub fn new(canvas: HtmlCanvasElement, state: SharedState) -> Self {
        Self { canvas, state }
    }

    /// Session animation loop: advances the scene and clears every view to
    /// the scene's clear color.
    fn start(&self, session: &XrSession, ref_space: XrReferenceSpace, gl: WebGl2RenderingContext) {
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64, XrFrame)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        let state = self.state.clone();

        *g.borrow_mut() = Some(Closure::new(move |time: f64, frame: XrFrame| {
            let sess: XrSession = frame.session();

            let clear_color = {
                let mut state = state.borrow_mut();
                state.scene.update(time);
                state.scene.clear_color()
            };

            if let Some(xr_gl_layer) = sess.render_state().base_layer() {
                // A null framebuffer means the default one
                gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, xr_gl_layer.framebuffer().as_ref());
                gl.clear_color(clear_color.r, clear_color.g, clear_color.b, clear_color.a);
                gl.enable(WebGl2RenderingContext::SCISSOR_TEST);

                if let Some(viewer_pose) = frame.get_viewer_pose(&ref_space) {
                    for view in viewer_pose.views().iter() {
                        let view: XrView = view.into();
                        // Each view is a region of the same framebuffer
                        if let Some(viewport) = xr_gl_layer.get_viewport(&view) {
                            gl.viewport(viewport.x(), viewport.y(), viewport.width(), viewport.height());
                            gl.scissor(viewport.x(), viewport.y(), viewport.width(), viewport.height());
                            gl.clear(WebGl2RenderingContext::COLOR_BUFFER_BIT | WebGl2RenderingContext::DEPTH_BUFFER_BIT);
                        }
                    }
                } else {
                    debug!("No viewer pose this frame");
                }
                gl.disable(WebGl2RenderingContext::SCISSOR_TEST);
            }

            // Schedule ourself for another requestAnimationFrame callback.
            if let Some(callback) = f.borrow().as_ref() {
                request_animation_frame(&sess, callback);
            }
        }));

        if let Some(callback) = g.borrow().as_ref() {
            request_animation_frame(session, callback);
        }
    }
}

impl XrRuntime for WebXrRuntime {
    async fn is_session_supported(&self, mode: XrSessionMode) -> Result<bool> {
        let Some(xr) = xr_system()? else {
            info!("navigator.xr missing");
            return Ok(false);
        };
        let supported = JsFuture::from(xr.is_session_supported(web_mode(mode)))
            .await
            .map_err(js_err)?;
        Ok(supported.as_bool().unwrap_or(false))
    }

    async fn request_session(&self, mode: XrSessionMode, reference_space: ReferenceSpaceType) -> Result<()> {
        let xr = xr_system()?.context("WebXR unavailable")?;
        printlog(&format!("Requesting {} session on {}", mode, reference_space));

        let mut session_init = XrSessionInit::new();
        session_init.required_features(&js_array(&[reference_space.as_str()]));
        let xr_session = JsFuture::from(xr.request_session_with_options(web_mode(mode), &session_init))
            .await
            .map_err(js_err)?;
        let xr_session: XrSession = xr_session.into();

        let gl = xr_compatible_context(&self.canvas).await?;
        let xr_gl_layer = XrWebGlLayer::new_with_web_gl2_rendering_context(&xr_session, &gl).map_err(js_err)?;
        let mut render_state_init = XrRenderStateInit::new();
        render_state_init.base_layer(Some(&xr_gl_layer));
        xr_session.update_render_state_with_state(&render_state_init);

        let ref_space = JsFuture::from(xr_session.request_reference_space(web_space(reference_space)))
            .await
            .map_err(js_err)?;
        let ref_space: XrReferenceSpace = ref_space.into();

        // The session stays alive through its own animation frame callbacks
        self.start(&xr_session, ref_space, gl);
        Ok(())
    }
}
