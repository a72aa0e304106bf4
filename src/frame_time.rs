use bevy_ecs::prelude::*;

// Long stalls (hidden tab, breakpoint) would otherwise fling the camera
const MAX_DELTA_SECS: f32 = 0.25;

/// Seconds elapsed between the last two animation frames.
#[derive(Resource, Debug, Default)]
pub struct FrameTime {
    pub delta: f32,
    last_timestamp_ms: Option<f64>,
}

impl FrameTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a `requestAnimationFrame` timestamp in milliseconds.
    pub fn advance(&mut self, timestamp_ms: f64) {
        self.delta = match self.last_timestamp_ms {
            Some(last) => (((timestamp_ms - last) / 1000.0) as f32).clamp(0.0, MAX_DELTA_SECS),
            None => 0.0,
        };
        self.last_timestamp_ms = Some(timestamp_ms);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_no_delta() {
        let mut time = FrameTime::new();
        time.advance(1000.0);
        assert_eq!(time.delta, 0.0);
        time.advance(1016.0);
        assert!((time.delta - 0.016).abs() < 1e-6);
        time.advance(9000.0);
        assert_eq!(time.delta, MAX_DELTA_SECS);
    }
}
