//! Page-side model of the two DOM handles the experience drives.
//!
//! The bootstrap only mutates [`PageView`] and the optional
//! [`VideoTexture`]; a [`Page`] implementation mirrors them onto the real
//! document after every step.

use anyhow::Result;

use crate::app::SharedState;

pub const CANVAS_ELEMENT_ID: &str = "renderCanvas";
pub const IMAGE_ELEMENT_ID: &str = "image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub canvas_hidden: bool,
    pub image_hidden: bool,
    /// `None` keeps whatever the page markup ships with.
    pub image_src: Option<String>,
}

impl PageView {
    /// Canvas hidden behind the call-to-action image.
    pub fn initial() -> Self {
        Self {
            canvas_hidden: true,
            image_hidden: false,
            image_src: None,
        }
    }

    pub fn reveal_canvas(&mut self) {
        self.image_hidden = true;
        self.canvas_hidden = false;
    }
}

/// Muted, looping video streamed into a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTexture {
    pub name: String,
    pub url: String,
    pub muted: bool,
    pub looping: bool,
    pub playing: bool,
}

impl VideoTexture {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            muted: true,
            looping: true,
            playing: false,
        }
    }

    // Browsers only allow playback after a user gesture
    pub fn play(&mut self) {
        self.playing = true;
    }
}

/// The document hosting the experience.
pub trait Page {
    /// Mirrors the model onto the document. Idempotent.
    fn apply(&mut self, view: &PageView, video: Option<&VideoTexture>) -> Result<()>;

    /// Forwards pointer and keyboard input on the canvas into the scene.
    fn attach_camera_controls(&mut self, state: &SharedState) -> Result<()>;
}


#[cfg(target_arch = "wasm32")]
pub use dom::DomPage;

#[cfg(target_arch = "wasm32")]
mod dom {
    use anyhow::{anyhow, Context, Result};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{
        Document, HtmlCanvasElement, HtmlImageElement, HtmlVideoElement, KeyboardEvent,
        PointerEvent, WheelEvent,
    };

    use super::{Page, PageView, VideoTexture, CANVAS_ELEMENT_ID, IMAGE_ELEMENT_ID};
    use crate::app::SharedState;
    use crate::events::{self, MouseEvent};
    use crate::input::{Key, MouseButton};

    pub struct DomPage {
        document: Document,
        pub canvas: HtmlCanvasElement,
        pub image: HtmlImageElement,
        video: Option<HtmlVideoElement>,
        video_started: bool,
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> Result<T> {
        document
            .get_element_by_id(id)
            .with_context(|| format!("No element with id '{}'", id))?
            .dyn_into::<T>()
            .map_err(|_| anyhow!("Element '{}' has an unexpected type", id))
    }

    impl DomPage {
        pub fn acquire() -> Result<Self> {
            let document = web_sys::window()
                .and_then(|win| win.document())
                .context("No document")?;
            let canvas = element::<HtmlCanvasElement>(&document, CANVAS_ELEMENT_ID)?;
            let image = element::<HtmlImageElement>(&document, IMAGE_ELEMENT_ID)?;
            Ok(Self { document, canvas, image, video: None, video_started: false })
        }

        fn video_element(&mut self, video: &VideoTexture) -> Result<&HtmlVideoElement> {
            if self.video.is_none() {
                let element: HtmlVideoElement = self
                    .document
                    .create_element("video")
                    .map_err(|e| anyhow!("{:?}", e))?
                    .dyn_into()
                    .map_err(|_| anyhow!("createElement(video) returned a non-video element"))?;
                element.set_cross_origin(Some("anonymous"));
                element.set_muted(video.muted);
                element.set_loop(video.looping);
                element.set_autoplay(false);
                element.set_src(&video.url);
                self.video = Some(element);
            }
            self.video.as_ref().context("Video element missing")
        }
    }

    impl Page for DomPage {
        fn apply(&mut self, view: &PageView, video: Option<&VideoTexture>) -> Result<()> {
            self.canvas.set_hidden(view.canvas_hidden);
            self.image.set_hidden(view.image_hidden);
            if let Some(src) = &view.image_src {
                if self.image.src() != *src {
                    self.image.set_src(src);
                }
            }

            if let Some(video) = video {
                let start = video.playing && !self.video_started;
                let element = self.video_element(video)?;
                if start {
                    // The returned promise only reports autoplay policy failures
                    let _playback = element.play().map_err(|e| anyhow!("{:?}", e))?;
                    self.video_started = true;
                }
            }
            Ok(())
        }

        fn attach_camera_controls(&mut self, state: &SharedState) -> Result<()> {
            let window = web_sys::window().context("No window")?;

            let pointer_state = state.clone();
            let on_pointer_down = Closure::<dyn FnMut(PointerEvent)>::new(move |e: PointerEvent| {
                if let Some(button) = MouseButton::from_dom_button(e.button()) {
                    pointer_state.borrow_mut().scene.send_mouse(MouseEvent::Button { button, pressed: true });
                }
            });
            let pointer_state = state.clone();
            let on_pointer_up = Closure::<dyn FnMut(PointerEvent)>::new(move |e: PointerEvent| {
                if let Some(button) = MouseButton::from_dom_button(e.button()) {
                    pointer_state.borrow_mut().scene.send_mouse(MouseEvent::Button { button, pressed: false });
                }
            });
            let pointer_state = state.clone();
            let on_pointer_move = Closure::<dyn FnMut(PointerEvent)>::new(move |e: PointerEvent| {
                pointer_state.borrow_mut().scene
                    .send_mouse(MouseEvent::Move(e.movement_x() as f32, e.movement_y() as f32));
            });
            let wheel_state = state.clone();
            let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |e: WheelEvent| {
                e.prevent_default();
                wheel_state.borrow_mut().scene.send_mouse(MouseEvent::Wheel(e.delta_y() as f32 * 0.01));
            });
            let key_state = state.clone();
            let on_key_down = Closure::<dyn FnMut(KeyboardEvent)>::new(move |e: KeyboardEvent| {
                if let Some(code) = Key::from_dom_code(&e.code()) {
                    key_state.borrow_mut().scene.send_keyboard(events::KeyboardEvent { code, pressed: true });
                }
            });
            let key_state = state.clone();
            let on_key_up = Closure::<dyn FnMut(KeyboardEvent)>::new(move |e: KeyboardEvent| {
                if let Some(code) = Key::from_dom_code(&e.code()) {
                    key_state.borrow_mut().scene.send_keyboard(events::KeyboardEvent { code, pressed: false });
                }
            });

            let js_err = |e: JsValue| anyhow!("{:?}", e);
            self.canvas.add_event_listener_with_callback("pointerdown", on_pointer_down.as_ref().unchecked_ref()).map_err(js_err)?;
            self.canvas.add_event_listener_with_callback("pointerup", on_pointer_up.as_ref().unchecked_ref()).map_err(js_err)?;
            self.canvas.add_event_listener_with_callback("pointermove", on_pointer_move.as_ref().unchecked_ref()).map_err(js_err)?;
            self.canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref()).map_err(js_err)?;
            window.add_event_listener_with_callback("keydown", on_key_down.as_ref().unchecked_ref()).map_err(js_err)?;
            window.add_event_listener_with_callback("keyup", on_key_up.as_ref().unchecked_ref()).map_err(js_err)?;

            // Listeners live as long as the page
            on_pointer_down.forget();
            on_pointer_up.forget();
            on_pointer_move.forget();
            on_wheel.forget();
            on_key_down.forget();
            on_key_up.forget();
            Ok(())
        }
    }
}
