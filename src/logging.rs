#[allow(unused_imports)]
use log::{info, warn};


pub fn init_logging(verbose: bool) {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            let level = if verbose { log::Level::Info } else { log::Level::Warn };
            console_log::init_with_level(level).expect(
                "Couldn't initialize logger");
        } else {
            let default_filter = if verbose { "info" } else { "warn" };
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(default_filter))
                .try_init();
        }
    }
}


// Diagnostics that have to reach the browser console even at the default level
pub fn printlog(log_str: &str) {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            warn!("{}",log_str);
        } else {
            info!("{}",log_str);
        }
    }
}
