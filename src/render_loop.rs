use anyhow::Result;
use log::debug;

use crate::app::SharedState;
use crate::scene::Frame;

/// Draws frames for the desktop canvas.
pub trait RenderEngine {
    /// Matches the drawing buffer to the canvas and returns the new size.
    fn resize(&mut self) -> Result<(u32, u32)>;

    fn render(&mut self, frame: &Frame) -> Result<()>;
}

/// Runs independently of the bootstrap, so early frames show an empty scene.
pub struct RenderLoop<E: RenderEngine> {
    state: SharedState,
    engine: E,
}

impl<E: RenderEngine> RenderLoop<E> {
    pub fn new(state: SharedState, engine: E) -> Self {
        Self { state, engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn frame(&mut self, timestamp_ms: f64) -> Result<()> {
        let frame = {
            let mut state = self.state.borrow_mut();
            state.scene.update(timestamp_ms);
            state.scene.frame()
        };
        self.engine.render(&frame)
    }

    pub fn resize(&mut self) -> Result<()> {
        let (width, height) = self.engine.resize()?;
        debug!("Resized to {}x{}", width, height);
        self.state.borrow_mut().scene.send_resize(width, height);
        Ok(())
    }
}
