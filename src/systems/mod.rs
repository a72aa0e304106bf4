mod schedules;

use bevy_ecs::prelude::*;

use crate::components::Camera;
use crate::events::WindowResizeEvent;
use crate::scene::SurfaceSize;

pub use schedules::{new_frame_schedule, FrameLabel};

pub fn resize_cameras(
    mut cameras: Query<&mut Camera>,
    mut surface: ResMut<SurfaceSize>,
    mut events: EventReader<WindowResizeEvent>,
) {
    if let Some(e) = events.iter().last() {
        *surface = SurfaceSize { width: e.width, height: e.height };
        for mut camera in cameras.iter_mut() {
            camera.resize(e.width, e.height);
        }
    }
}
