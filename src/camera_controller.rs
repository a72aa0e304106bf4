use std::f32::consts::PI;

use bevy_ecs::prelude::*;

use crate::components::{CameraControls, OrbitRig, Transform};
use crate::frame_time::FrameTime;
use crate::input::{Input, Key};
use crate::math::{Vec3, Vec3f};

/// Walking camera: keys move on the horizontal plane, dragging looks around.
#[derive(Debug, Component)]
pub struct FirstPersonController {
    speed: f32,
    sensitivity: f32,

    translation_acc: Vec3f,
    v_rot_acc: f32,
    h_rot_acc: f32,
}

impl FirstPersonController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            translation_acc: Vec3::zeros(),
            v_rot_acc: 0.0,
            h_rot_acc: 0.0,
        }
    }

    pub fn update(&mut self, transform: &mut Transform, input: &Input, dt: f32) {
        if input.lmb_down {
            self.rotate(transform, input.mouse_delta, dt);
        }
        self.translate(transform, input, dt);
    }

    fn translate(&mut self, transform: &mut Transform, input: &Input, dt: f32) {
        // Walk on the horizontal plane so the eye height never changes
        let mut forward = transform.forward();
        forward.y = 0.0;
        let forward = forward.try_normalize(1e-6).unwrap_or_else(Vec3f::zeros);
        let mut right = transform.right();
        right.y = 0.0;
        let right = right.try_normalize(1e-6).unwrap_or_else(Vec3f::zeros);

        let mut translation = Vec3f::from_element(0.0);
        translation += forward * input.axis(&[Key::W, Key::Up], &[Key::S, Key::Down]);
        translation += right * input.axis(&[Key::D, Key::Right], &[Key::A, Key::Left]);
        translation -= forward * input.wheel_delta * self.sensitivity;

        if let Some(direction) = translation.try_normalize(0.01) {
            self.translation_acc += direction * self.speed * dt;
        }

        // Smooth the movement a bit
        let step = (self.speed * dt).min(1.0) * self.translation_acc;
        self.translation_acc -= step;
        transform.translate(step);
    }

    fn rotate(&mut self, transform: &mut Transform, mouse_delta: (f32, f32), dt: f32) {
        const MIN_TOP_ANGLE: f32 = 0.1;
        const MIN_BOTTOM_ANGLE: f32 = PI - 0.1;

        let angle_to_top = transform.forward().angle(&Vec3::y_axis());

        self.v_rot_acc += mouse_delta.1 * self.sensitivity * dt;

        // Protect from overturning - prevent camera from reaching the vertical line with small
        // margin angles.
        if self.v_rot_acc + angle_to_top <= MIN_TOP_ANGLE {
            self.v_rot_acc = MIN_TOP_ANGLE - angle_to_top;
        } else if self.v_rot_acc + angle_to_top >= MIN_BOTTOM_ANGLE {
            self.v_rot_acc = MIN_BOTTOM_ANGLE - angle_to_top;
        }

        let v_rot = (self.speed * dt).min(1.0) * self.v_rot_acc;
        self.v_rot_acc -= v_rot;

        self.h_rot_acc += mouse_delta.0 * self.sensitivity * dt;
        let h_rot = (self.speed * dt).min(1.0) * self.h_rot_acc;
        self.h_rot_acc -= h_rot;

        // Right-handed world: positive angles are anti-clockwise, so negate
        transform.rotate_axis(&Vec3::y_axis(), -h_rot);
        transform.rotate_local_axis(&Vec3::x_axis(), -v_rot);
    }
}

/// Orbit input: dragging turns the rig, the wheel changes its radius.
#[derive(Debug, Component)]
pub struct OrbitController {
    angular_sensitivity: f32,
    zoom_sensitivity: f32,
}

impl OrbitController {
    pub fn new(angular_sensitivity: f32, zoom_sensitivity: f32) -> Self {
        Self { angular_sensitivity, zoom_sensitivity }
    }

    pub fn update(&self, rig: &mut OrbitRig, input: &Input) {
        if input.lmb_down {
            rig.alpha -= input.mouse_delta.0 * self.angular_sensitivity;
            rig.beta -= input.mouse_delta.1 * self.angular_sensitivity;
        }
        rig.radius += input.wheel_delta * self.zoom_sensitivity;
        rig.clamp();
    }
}

pub fn update_cameras(
    input: Res<Input>,
    frame_time: Res<FrameTime>,
    mut walkers: Query<(&mut FirstPersonController, &mut Transform), With<CameraControls>>,
    mut orbiters: Query<(&OrbitController, &mut OrbitRig), With<CameraControls>>,
) {
    for (mut controller, mut transform) in walkers.iter_mut() {
        controller.update(&mut transform, &input, frame_time.delta);
    }
    for (controller, mut rig) in orbiters.iter_mut() {
        controller.update(&mut rig, &input);
    }
}

pub fn sync_orbit_transforms(mut rigs: Query<(&OrbitRig, &mut Transform), Changed<OrbitRig>>) {
    for (rig, mut transform) in rigs.iter_mut() {
        *transform = rig.transform();
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{KeyboardEvent, MouseEvent};
    use crate::input::update_input_state;

    fn held(keys: &[Key]) -> Input {
        let mut world = World::new();
        world.insert_resource(Input::new());
        world.init_resource::<Events<KeyboardEvent>>();
        world.init_resource::<Events<MouseEvent>>();
        for key in keys {
            world.send_event(KeyboardEvent { code: *key, pressed: true });
        }
        let mut schedule = Schedule::default();
        schedule.add_systems(update_input_state);
        schedule.run(&mut world);
        world.remove_resource::<Input>().unwrap()
    }

    #[test]
    fn walking_keeps_eye_height() {
        let mut transform = Transform::from_position(Vec3f::new(0., 1.6, 0.));
        transform.look_at(Vec3f::new(0., 0., 5.));
        let mut controller = FirstPersonController::new(4.0, 0.5);
        let input = held(&[Key::W]);
        for _ in 0..10 {
            controller.update(&mut transform, &input, 0.1);
        }
        assert!((transform.position().y - 1.6).abs() < 1e-5);
        assert!(transform.position().z > 0.0);
    }

    #[test]
    fn orbit_drag_is_ignored_without_button() {
        let controller = OrbitController::new(0.01, 0.1);
        let mut rig = OrbitRig::new(1.0, 1.0, 2.0, Vec3f::zeros());
        let mut input = Input::new();
        input.mouse_delta = (50., 50.);
        controller.update(&mut rig, &input);
        assert_eq!(rig.alpha, 1.0);

        input.lmb_down = true;
        input.wheel_delta = -100.;
        controller.update(&mut rig, &input);
        assert!(rig.alpha < 1.0);
        assert_eq!(rig.radius, OrbitRig::MIN_RADIUS);
    }
}
