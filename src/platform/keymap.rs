use std::collections::HashMap;

use sdl2::keyboard::Scancode;

use arena::config::Binding;
use arena::engine::input::Action;
use arena::{Error, Result};

/// Physical key to logical action. Several keys may share one action.
///
/// The clip browser adds a second layer that is only read while the browser
/// is on and Shift is held.
pub struct KeyMap {
    map: HashMap<Scancode, Action>,
    browser: HashMap<Scancode, Action>,
}

impl KeyMap {
    pub fn default_layout() -> Self {
        use Scancode::*;
        let pairs = [
            (W, Action::Forward),
            (Up, Action::Forward),
            (S, Action::Backward),
            (Down, Action::Backward),
            (A, Action::Left),
            (Left, Action::Left),
            (D, Action::Right),
            (Right, Action::Right),
            (LShift, Action::Run),
            (RShift, Action::Run),
            (LCtrl, Action::Crouch),
            (RCtrl, Action::Crouch),
            (Q, Action::TurnLeft),
            (E, Action::TurnRight),
            (R, Action::Turn180),
            (Space, Action::Jump),
            (V, Action::Victory),
            (T, Action::AlignToggle),
            (H, Action::ToggleControls),
            (F3, Action::DebugToggle),
        ];
        let browser = [
            (N, Action::DebugNext),
            (P, Action::DebugPrevious),
            (R, Action::DebugRandom),
            (I, Action::DebugInfo),
            (L, Action::DebugList),
            (M, Action::DebugList),
            (D, Action::DebugDump),
        ];
        Self {
            map: pairs.into_iter().collect(),
            browser: browser.into_iter().collect(),
        }
    }

    /// Layer config bindings over the default layout. An override replaces
    /// whatever the key did before.
    pub fn with_overrides(mut self, bindings: &[Binding]) -> Result<Self> {
        for binding in bindings {
            let key = Scancode::from_name(&binding.key)
                .ok_or_else(|| Error::UnknownKey(binding.key.clone()))?;
            let action: Action = binding.action.parse()?;
            log::debug!("binding {} -> {action}", binding.key);
            self.map.insert(key, action);
        }
        Ok(self)
    }

    pub fn action(&self, key: Scancode) -> Option<Action> {
        self.map.get(&key).copied()
    }

    pub fn browser_action(&self, key: Scancode) -> Option<Action> {
        self.browser.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(key: &str, action: &str) -> Binding {
        Binding {
            key: key.to_string(),
            action: action.to_string(),
        }
    }

    #[test]
    fn default_layout_covers_arrows_and_wasd() {
        let keys = KeyMap::default_layout();
        assert_eq!(keys.action(Scancode::W), Some(Action::Forward));
        assert_eq!(keys.action(Scancode::Up), Some(Action::Forward));
        assert_eq!(keys.action(Scancode::RCtrl), Some(Action::Crouch));
        assert_eq!(keys.action(Scancode::F), None);
    }

    #[test]
    fn browser_layer_is_separate() {
        let keys = KeyMap::default_layout();
        assert_eq!(keys.action(Scancode::F3), Some(Action::DebugToggle));
        assert_eq!(keys.action(Scancode::R), Some(Action::Turn180));
        assert_eq!(keys.browser_action(Scancode::R), Some(Action::DebugRandom));
        assert_eq!(keys.browser_action(Scancode::M), Some(Action::DebugList));
        assert_eq!(keys.browser_action(Scancode::W), None);
    }

    #[test]
    fn override_rebinds_key() {
        let keys = KeyMap::default_layout()
            .with_overrides(&[binding("F", "jump"), binding("Space", "victory")])
            .unwrap();
        assert_eq!(keys.action(Scancode::F), Some(Action::Jump));
        assert_eq!(keys.action(Scancode::Space), Some(Action::Victory));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!(
            KeyMap::default_layout().with_overrides(&[binding("NoSuchKey", "jump")]),
            Err(Error::UnknownKey(_))
        ));
        assert!(matches!(
            KeyMap::default_layout().with_overrides(&[binding("F", "fly")]),
            Err(Error::UnknownAction(_))
        ));
    }
}
