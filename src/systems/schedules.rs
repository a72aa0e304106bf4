use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{ExecutorKind, ScheduleLabel};

use crate::camera_controller::{sync_orbit_transforms, update_cameras};
use crate::input::update_input_state;
use crate::systems::resize_cameras;


#[derive(ScheduleLabel, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameLabel;

pub fn new_frame_schedule() -> (Schedule, FrameLabel) {
    let mut schedule = Schedule::default();
    // Everything runs on the browser main thread anyway
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule
        .add_systems((
            resize_cameras,
            update_input_state,
            update_cameras.after(update_input_state),
            sync_orbit_transforms.after(update_cameras),
        ));
    (schedule, FrameLabel)
}
