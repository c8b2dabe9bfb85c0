//! Keyboard to intent encoding
//!
//! Key presses are edges; the server wants one `move_paddle` per step. While
//! any movement key is held a single repeat timer runs, and each tick emits
//! a move for every direction that is still held.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::repeat::{IntervalTimer, RepeatWhile};
use crate::protocol::{Direction, Intent};

/// What a recognized key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Start,
}

/// Key names (as reported by `KeyboardEvent.key`) per action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub start: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["ArrowLeft".into(), "a".into()],
            right: vec!["ArrowRight".into(), "d".into()],
            start: vec![" ".into()],
        }
    }
}

impl KeyBindings {
    pub fn action(&self, key: &str) -> Option<KeyAction> {
        let key = normalize(key);
        let matches = |keys: &[String]| keys.iter().any(|k| normalize(k) == key);
        if matches(&self.left) {
            Some(KeyAction::Move(Direction::Left))
        } else if matches(&self.right) {
            Some(KeyAction::Move(Direction::Right))
        } else if matches(&self.start) {
            Some(KeyAction::Start)
        } else {
            None
        }
    }
}

/// Letter keys arrive upper-cased while Shift or Caps Lock is on
fn normalize(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Result of one key event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyResponse {
    /// The host should cancel the key's default action (scrolling etc.)
    pub suppress_default: bool,
    /// Intent to send right away
    pub intent: Option<Intent>,
}

pub struct IntentEncoder<T: IntervalTimer> {
    bindings: KeyBindings,
    held: BTreeSet<String>,
    repeat: RepeatWhile<T::Handle>,
    timer: T,
}

impl<T: IntervalTimer> IntentEncoder<T> {
    pub fn new(bindings: KeyBindings, period: Duration, timer: T) -> Self {
        Self {
            bindings,
            held: BTreeSet::new(),
            repeat: RepeatWhile::new(period),
            timer,
        }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat.is_active()
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&normalize(key))
    }

    fn direction_held(&self, direction: Direction) -> bool {
        self.held
            .iter()
            .any(|k| self.bindings.action(k) == Some(KeyAction::Move(direction)))
    }

    fn movement_held(&self) -> bool {
        self.direction_held(Direction::Left) || self.direction_held(Direction::Right)
    }

    pub fn key_down(&mut self, key: &str) -> KeyResponse {
        let key = normalize(key);
        let Some(action) = self.bindings.action(&key) else {
            return KeyResponse::default();
        };
        let mut response = KeyResponse {
            suppress_default: true,
            intent: None,
        };

        // Auto-repeat key-downs for a key already down
        if !self.held.insert(key) {
            return response;
        }

        match action {
            KeyAction::Start => response.intent = Some(Intent::StartGame),
            KeyAction::Move(_) => self.repeat.sync(&mut self.timer, true),
        }
        response
    }

    pub fn key_up(&mut self, key: &str) -> KeyResponse {
        let key = normalize(key);
        if self.bindings.action(&key).is_none() {
            return KeyResponse::default();
        }
        self.held.remove(&key);
        let still_moving = self.movement_held();
        self.repeat.sync(&mut self.timer, still_moving);
        KeyResponse {
            suppress_default: true,
            intent: None,
        }
    }

    /// Release everything, e.g. when the window loses focus and key-ups
    /// will never arrive
    pub fn release_all(&mut self) {
        self.held.clear();
        self.repeat.sync(&mut self.timer, false);
    }

    /// One repeat period elapsed
    pub fn repeat_tick(&mut self) -> Vec<Intent> {
        self.repeat
            .fire(|| {
                [Direction::Left, Direction::Right]
                    .into_iter()
                    .filter(|d| self.direction_held(*d))
                    .map(|direction| Intent::MovePaddle { direction })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    }
}
