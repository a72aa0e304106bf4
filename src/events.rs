use bevy_ecs::prelude::*;

use crate::input::{Key, MouseButton};


#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WindowResizeEvent {
    pub width: u32,
    pub height: u32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct KeyboardEvent {
    pub code: Key,
    pub pressed: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum MouseEvent {
    Move(f32, f32),
    Button { button: MouseButton, pressed: bool },
    Wheel(f32),
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

struct Observer<C, E> {
    handle: ObserverHandle,
    once: bool,
    callback: Box<dyn FnMut(&mut C, &E)>,
}

/// Callbacks over a context `C`, fired in registration order.
///
/// Observers added with [`Observable::add_once`] are dropped after their
/// first notification. Handles stay valid until the observer is removed or
/// has fired once.
pub struct Observable<C, E> {
    next_handle: u64,
    observers: Vec<Observer<C, E>>,
}

impl<C, E> Observable<C, E> {
    pub fn new() -> Self {
        Self { next_handle: 0, observers: Vec::new() }
    }

    pub fn add(&mut self, callback: impl FnMut(&mut C, &E) + 'static) -> ObserverHandle {
        self.push(callback, false)
    }

    pub fn add_once(&mut self, callback: impl FnMut(&mut C, &E) + 'static) -> ObserverHandle {
        self.push(callback, true)
    }

    fn push(&mut self, callback: impl FnMut(&mut C, &E) + 'static, once: bool) -> ObserverHandle {
        let handle = ObserverHandle(self.next_handle);
        self.next_handle += 1;
        self.observers.push(Observer { handle, once, callback: Box::new(callback) });
        handle
    }

    pub fn remove(&mut self, handle: ObserverHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.handle != handle);
        self.observers.len() != before
    }

    pub fn notify(&mut self, context: &mut C, event: &E) {
        for observer in self.observers.iter_mut() {
            (observer.callback)(context, event);
        }
        self.observers.retain(|o| !o.once);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<C, E> Default for Observable<C, E> {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_registration_order() {
        let mut observable: Observable<Vec<u32>, u32> = Observable::new();
        observable.add(|log, e| log.push(*e));
        observable.add(|log, e| log.push(e * 10));
        let mut log = vec![];
        observable.notify(&mut log, &3);
        assert_eq!(log, vec![3, 30]);
    }

    #[test]
    fn once_observers_fire_a_single_time() {
        let mut observable: Observable<Vec<&'static str>, ()> = Observable::new();
        observable.add_once(|log, _| log.push("once"));
        observable.add(|log, _| log.push("always"));
        let mut log = vec![];
        observable.notify(&mut log, &());
        observable.notify(&mut log, &());
        assert_eq!(log, vec!["once", "always", "always"]);
        assert_eq!(observable.len(), 1);
    }

    #[test]
    fn removed_observer_stops_firing() {
        let mut observable: Observable<u32, ()> = Observable::new();
        let handle = observable.add(|count, _| *count += 1);
        let mut count = 0;
        observable.notify(&mut count, &());
        assert!(observable.remove(handle));
        assert!(!observable.remove(handle));
        observable.notify(&mut count, &());
        assert_eq!(count, 1);
        assert!(observable.is_empty());
    }
}
