//! Keyboard input
//!
//! The host feeds raw key codes through `KeyBindings`; the session loop only
//! ever reads the resulting `KeyState`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Logical actions the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    Bomb,
    Pause,
    Restart,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Fire,
        Action::Bomb,
        Action::Pause,
        Action::Restart,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Which actions are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    held: [bool; Action::ALL.len()],
}

impl KeyState {
    pub fn press(&mut self, action: Action) {
        self.held[action.index()] = true;
    }

    pub fn release(&mut self, action: Action) {
        self.held[action.index()] = false;
    }

    pub fn set(&mut self, action: Action, down: bool) {
        self.held[action.index()] = down;
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    /// Held if down now but not in `previous`
    pub fn just_pressed(&self, previous: &KeyState, action: Action) -> bool {
        self.is_down(action) && !previous.is_down(action)
    }

    /// Continuous part of the tick input (movement and fire)
    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            up: self.is_down(Action::MoveUp),
            down: self.is_down(Action::MoveDown),
            left: self.is_down(Action::MoveLeft),
            right: self.is_down(Action::MoveRight),
            fire: self.is_down(Action::Fire),
            ..Default::default()
        }
    }
}

/// Maps host key codes (DOM `KeyboardEvent.code` names) to actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    map: HashMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let pairs = [
            ("ArrowUp", Action::MoveUp),
            ("KeyW", Action::MoveUp),
            ("ArrowDown", Action::MoveDown),
            ("KeyS", Action::MoveDown),
            ("ArrowLeft", Action::MoveLeft),
            ("KeyA", Action::MoveLeft),
            ("ArrowRight", Action::MoveRight),
            ("KeyD", Action::MoveRight),
            ("Space", Action::Fire),
            ("KeyB", Action::Bomb),
            ("KeyP", Action::Pause),
            ("Escape", Action::Pause),
            ("KeyR", Action::Restart),
        ];
        Self {
            map: pairs
                .into_iter()
                .map(|(code, action)| (code.to_string(), action))
                .collect(),
        }
    }
}

impl KeyBindings {
    pub fn bind(&mut self, code: impl Into<String>, action: Action) {
        self.map.insert(code.into(), action);
    }

    pub fn action_for(&self, code: &str) -> Option<Action> {
        self.map.get(code).copied()
    }

    /// Apply a key event. Unmapped keys are ignored; returns the action if any.
    pub fn apply(&self, keys: &mut KeyState, code: &str, down: bool) -> Option<Action> {
        let action = self.action_for(code)?;
        keys.set(action, down);
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_events_update_state() {
        let bindings = KeyBindings::default();
        let mut keys = KeyState::default();

        assert_eq!(
            bindings.apply(&mut keys, "ArrowRight", true),
            Some(Action::MoveRight)
        );
        assert!(keys.is_down(Action::MoveRight));
        bindings.apply(&mut keys, "ArrowRight", false);
        assert!(!keys.is_down(Action::MoveRight));
    }

    #[test]
    fn test_unmapped_key_ignored() {
        let bindings = KeyBindings::default();
        let mut keys = KeyState::default();
        assert_eq!(bindings.apply(&mut keys, "F13", true), None);
        assert_eq!(keys, KeyState::default());
    }

    #[test]
    fn test_rebind() {
        let mut bindings = KeyBindings::default();
        bindings.bind("KeyJ", Action::Fire);
        assert_eq!(bindings.action_for("KeyJ"), Some(Action::Fire));
        assert_eq!(bindings.action_for("Space"), Some(Action::Fire));
    }

    #[test]
    fn test_just_pressed() {
        let before = KeyState::default();
        let mut now = KeyState::default();
        now.press(Action::Pause);
        assert!(now.just_pressed(&before, Action::Pause));
        assert!(!now.just_pressed(&now, Action::Pause));
    }

    #[test]
    fn test_tick_input_has_no_one_shots() {
        let mut keys = KeyState::default();
        for action in Action::ALL {
            keys.press(action);
        }
        let input = keys.to_tick_input();
        assert!(input.up && input.down && input.left && input.right && input.fire);
        assert!(!input.pause && !input.restart && !input.bomb);
    }
}
