//! Virtual key state for a controllable tank.
//!
//! Written by the human-input adapter (or the autopilot), read by the mover.

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Fixed key-state table for one tank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Held direction keys, indexed by `Direction::index`.
    pub held: [bool; 4],
    pub fire: bool,
    pub pause: bool,
    /// Most recently pressed direction key, if any.
    pub last_pressed: Option<Direction>,
}

impl InputIntent {
    pub fn is_held(&self, direction: Direction) -> bool {
        self.held[direction.index()]
    }

    pub fn press(&mut self, direction: Direction) {
        self.held[direction.index()] = true;
        self.last_pressed = Some(direction);
    }

    pub fn release(&mut self, direction: Direction) {
        self.held[direction.index()] = false;
    }

    /// Release every direction key; fire is left untouched.
    pub fn release_directions(&mut self) {
        self.held = [false; 4];
    }

    /// Hold exactly one direction key (or none).
    pub fn drive(&mut self, direction: Option<Direction>) {
        self.release_directions();
        if let Some(direction) = direction {
            self.press(direction);
        }
    }

    /// Resolve the held keys to a single movement direction.
    ///
    /// The most recently pressed key wins while it is still held. Otherwise
    /// the fixed precedence is Right, Left, Down, Up.
    pub fn direction(&self) -> Option<Direction> {
        if let Some(last) = self.last_pressed {
            if self.is_held(last) {
                return Some(last);
            }
        }
        [
            Direction::Right,
            Direction::Left,
            Direction::Down,
            Direction::Up,
        ]
        .into_iter()
        .find(|d| self.is_held(*d))
    }
}
