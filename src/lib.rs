pub mod app;
pub mod assets;
pub mod camera_controller;
pub mod components;
pub mod config;
pub mod content;
pub mod events;
pub mod frame_time;
pub mod input;
pub mod loader;
pub mod logging;
pub mod math;
pub mod presenter;
pub mod render_loop;
pub mod scene;
pub mod surface;
pub mod systems;
pub mod xr;

#[cfg(target_arch = "wasm32")]
pub mod device;

#[cfg(all(target_arch = "wasm32", web_sys_unstable_apis))]
mod web;

#[cfg(test)]
mod test_support;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;


#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn run() {
    cfg_if::cfg_if! {
        if #[cfg(all(target_arch = "wasm32", web_sys_unstable_apis))] {
            if let Err(e) = web::start().await {
                log::error!("{:?}", e);
            }
        } else {
            logging::init_logging(false);
            log::warn!("The exhibit runs in a WebXR capable browser, build for wasm32-unknown-unknown");
        }
    }
}
