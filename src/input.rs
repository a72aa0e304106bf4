use std::collections::HashSet;

use bevy_ecs::prelude::*;

use crate::events::{KeyboardEvent, MouseEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    LShift,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.code` value.
    pub fn from_dom_code(code: &str) -> Option<Key> {
        match code {
            "KeyW" => Some(Key::W),
            "KeyA" => Some(Key::A),
            "KeyS" => Some(Key::S),
            "KeyD" => Some(Key::D),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Space" => Some(Key::Space),
            "ShiftLeft" => Some(Key::LShift),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Maps a DOM `MouseEvent.button` value.
    pub fn from_dom_button(button: i16) -> Option<MouseButton> {
        match button {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}

/// Input accumulated since the last frame.
#[derive(Resource, Debug, Default)]
pub struct Input {
    held_keys: HashSet<Key>,
    pub mouse_delta: (f32, f32),
    pub wheel_delta: f32,
    pub lmb_down: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held_keys.contains(&key)
    }

    pub fn axis(&self, positive: &[Key], negative: &[Key]) -> f32 {
        let pos = positive.iter().any(|k| self.is_held(*k)) as i32;
        let neg = negative.iter().any(|k| self.is_held(*k)) as i32;
        (pos - neg) as f32
    }

    // Deltas are per frame, held keys persist
    pub fn reset(&mut self) {
        self.mouse_delta = (0., 0.);
        self.wheel_delta = 0.;
    }
}

pub fn update_input_state(
    mut input: ResMut<Input>,
    mut keyboard_events: EventReader<KeyboardEvent>,
    mut mouse_events: EventReader<MouseEvent>,
) {
    input.reset();

    for e in keyboard_events.iter() {
        if e.pressed {
            input.held_keys.insert(e.code);
        } else {
            input.held_keys.remove(&e.code);
        }
    }

    for e in mouse_events.iter() {
        match *e {
            MouseEvent::Move(dx, dy) => {
                input.mouse_delta.0 += dx;
                input.mouse_delta.1 += dy;
            }
            MouseEvent::Button { button: MouseButton::Left, pressed } => {
                input.lmb_down = pressed;
            }
            MouseEvent::Button { .. } => {}
            MouseEvent::Wheel(delta) => input.wheel_delta += delta,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_dom_codes() {
        assert_eq!(Key::from_dom_code("KeyW"), Some(Key::W));
        assert_eq!(Key::from_dom_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom_code("KeyQ"), None);
        assert_eq!(MouseButton::from_dom_button(0), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_dom_button(4), None);
    }

    #[test]
    fn axis_combines_opposing_keys() {
        let mut world = World::new();
        world.insert_resource(Input::new());
        world.init_resource::<Events<KeyboardEvent>>();
        world.init_resource::<Events<MouseEvent>>();
        world.send_event(KeyboardEvent { code: Key::W, pressed: true });
        world.send_event(MouseEvent::Move(2., -1.));
        world.send_event(MouseEvent::Move(1., 0.));

        let mut schedule = Schedule::default();
        schedule.add_systems(update_input_state);
        schedule.run(&mut world);

        let input = world.resource::<Input>();
        assert_eq!(input.axis(&[Key::W, Key::Up], &[Key::S, Key::Down]), 1.);
        assert_eq!(input.mouse_delta, (3., -1.));
        assert_eq!(input.axis(&[Key::D], &[Key::A]), 0.);
    }
}
