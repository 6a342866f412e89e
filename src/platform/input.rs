//! Keyboard mapping
//!
//! Translates `KeyboardEvent.key` values into intents. Capture and dispatch
//! stay in the host; this is the shared, testable part.

use crate::game::Intent;
use crate::sim::Direction;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Game(Intent),
    /// Reset then start in one press
    Restart,
    /// Toggle the autopilot demo mode
    ToggleAutopilot,
    /// Flip sound effects on or off and remember the choice
    ToggleSound,
    /// Flip particle bursts on or off and remember the choice
    ToggleParticles,
}

pub fn action_for_key(key: &str) -> Option<KeyAction> {
    let action = match key {
        "ArrowUp" | "w" | "W" => KeyAction::Game(Intent::Turn(Direction::Up)),
        "ArrowDown" | "s" | "S" => KeyAction::Game(Intent::Turn(Direction::Down)),
        "ArrowLeft" | "a" | "A" => KeyAction::Game(Intent::Turn(Direction::Left)),
        "ArrowRight" | "d" | "D" => KeyAction::Game(Intent::Turn(Direction::Right)),
        " " | "p" | "P" | "Escape" => KeyAction::Game(Intent::TogglePause),
        "Enter" => KeyAction::Game(Intent::Start),
        "r" | "R" => KeyAction::Restart,
        "i" | "I" => KeyAction::ToggleAutopilot,
        "m" | "M" => KeyAction::ToggleSound,
        "x" | "X" => KeyAction::ToggleParticles,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_and_wasd_agree() {
        for (arrow, letter) in [
            ("ArrowUp", "w"),
            ("ArrowDown", "s"),
            ("ArrowLeft", "a"),
            ("ArrowRight", "d"),
        ] {
            assert_eq!(action_for_key(arrow), action_for_key(letter));
            assert_eq!(
                action_for_key(letter),
                action_for_key(&letter.to_uppercase())
            );
        }
    }

    #[test]
    fn test_lifecycle_keys() {
        assert_eq!(
            action_for_key(" "),
            Some(KeyAction::Game(Intent::TogglePause))
        );
        assert_eq!(action_for_key("Enter"), Some(KeyAction::Game(Intent::Start)));
        assert_eq!(action_for_key("r"), Some(KeyAction::Restart));
        assert_eq!(action_for_key("i"), Some(KeyAction::ToggleAutopilot));
        assert_eq!(action_for_key("Shift"), None);
    }

    #[test]
    fn test_settings_keys() {
        assert_eq!(action_for_key("m"), Some(KeyAction::ToggleSound));
        assert_eq!(action_for_key("M"), Some(KeyAction::ToggleSound));
        assert_eq!(action_for_key("x"), Some(KeyAction::ToggleParticles));
        assert_eq!(action_for_key("X"), Some(KeyAction::ToggleParticles));
    }
}
