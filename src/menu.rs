//! Keyboard shortcut handling
//!
//! Provides the shortcut actions, a small key-binding model and the default
//! shortcut table. Bindings can be overridden by strings in the
//! configuration such as `"Ctrl+Shift+Z"`.

use std::collections::HashMap;
use std::fmt;

use crate::config::KeybindingsConfig;
use crate::editor::format::FormatKey;
use crate::editor::insert::DialogKind;
use crate::error::KeymapError;
use crate::message::Command;

/// Actions that can be triggered from keyboard shortcuts
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    // Format actions
    Bold,
    Italic,
    Underline,
    InlineCode,
    CodeBlock,
    Link,

    // Document actions
    Save,
    Undo,
    Redo,

    // View actions
    TogglePreview,
    ToggleFullscreen,
}

impl Action {
    /// Convert action to editor command
    pub fn to_command(self) -> Command {
        match self {
            Action::Bold => Command::Format(FormatKey::Bold),
            Action::Italic => Command::Format(FormatKey::Italic),
            Action::Underline => Command::Format(FormatKey::Underline),
            Action::InlineCode => Command::Format(FormatKey::InlineCode),
            Action::CodeBlock => Command::Format(FormatKey::CodeBlock),
            Action::Link => Command::OpenDialog(DialogKind::Link),

            Action::Save => Command::Save,
            Action::Undo => Command::Undo,
            Action::Redo => Command::Redo,

            Action::TogglePreview => Command::TogglePreview,
            Action::ToggleFullscreen => Command::ToggleFullscreen,
        }
    }
}

/// Keyboard modifier; Cmd/Super/Meta are folded into `Ctrl`
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
}

impl Modifier {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "cmd" | "command" | "super" | "meta" => Some(Modifier::Ctrl),
            "shift" => Some(Modifier::Shift),
            "alt" | "option" => Some(Modifier::Alt),
            _ => None,
        }
    }
}

/// Non-character keys
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NamedKey {
    Enter,
    Tab,
    Escape,
    Space,
}

impl NamedKey {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Some(NamedKey::Enter),
            "tab" => Some(NamedKey::Tab),
            "esc" | "escape" => Some(NamedKey::Escape),
            "space" => Some(NamedKey::Space),
            _ => None,
        }
    }
}

/// A key, either a printable character (lowercase) or a named key
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    Character(String),
    Named(NamedKey),
}

/// A modifier set plus a key
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct KeyBind {
    pub modifiers: Vec<Modifier>,
    pub key: Key,
}

impl KeyBind {
    /// Build a binding with modifiers sorted and deduplicated
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>, key: Key) -> Self {
        let mut modifiers: Vec<Modifier> = modifiers.into_iter().collect();
        modifiers.sort();
        modifiers.dedup();
        Self { modifiers, key }
    }

    /// Parse a binding string such as `"Ctrl+Shift+Enter"`
    pub fn parse(binding: &str) -> Result<Self, KeymapError> {
        let trimmed = binding.trim();
        if trimmed.is_empty() {
            return Err(KeymapError::Empty);
        }

        // "Ctrl++" binds the plus key itself
        let (head, key_name) = match trimmed.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match trimmed.rsplit_once('+') {
                Some((rest, key)) => (rest, key.trim()),
                None => ("", trimmed),
            },
        };
        if key_name.is_empty() {
            return Err(KeymapError::MissingKey(binding.to_string()));
        }

        let mut modifiers = Vec::new();
        for name in head.split('+').map(str::trim).filter(|n| !n.is_empty()) {
            let modifier = Modifier::parse(name).ok_or_else(|| KeymapError::UnknownModifier {
                binding: binding.to_string(),
                modifier: name.to_string(),
            })?;
            modifiers.push(modifier);
        }

        let key = match NamedKey::parse(key_name) {
            Some(named) => Key::Named(named),
            None => Key::Character(key_name.to_lowercase()),
        };

        Ok(Self::new(modifiers, key))
    }

    /// Normalise a key press from the input widget
    ///
    /// Characters are lowercased, and with Shift held the shifted backtick
    /// (`~`) is reported as the backtick it sits on.
    pub fn from_event(modifiers: impl IntoIterator<Item = Modifier>, key: Key) -> Self {
        let bind = Self::new(modifiers, key);
        let key = match bind.key {
            Key::Character(c) if c == "~" && bind.modifiers.contains(&Modifier::Shift) => {
                Key::Character("`".to_string())
            }
            Key::Character(c) => Key::Character(c.to_lowercase()),
            named => named,
        };
        Self {
            modifiers: bind.modifiers,
            key,
        }
    }
}

impl fmt::Display for KeyBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{:?}+", modifier)?;
        }
        match &self.key {
            Key::Character(c) => write!(f, "{}", c.to_uppercase()),
            Key::Named(named) => write!(f, "{:?}", named),
        }
    }
}

fn ctrl(key: &str) -> KeyBind {
    KeyBind::new([Modifier::Ctrl], Key::Character(key.into()))
}

fn ctrl_shift(key: Key) -> KeyBind {
    KeyBind::new([Modifier::Ctrl, Modifier::Shift], key)
}

/// Create default keyboard shortcuts
pub fn default_key_binds() -> HashMap<KeyBind, Action> {
    let mut binds = HashMap::new();

    // Format shortcuts
    binds.insert(ctrl("b"), Action::Bold);
    binds.insert(ctrl("i"), Action::Italic);
    binds.insert(ctrl("u"), Action::Underline);
    binds.insert(ctrl("k"), Action::Link);
    binds.insert(ctrl("`"), Action::InlineCode);
    binds.insert(ctrl_shift(Key::Character("`".into())), Action::CodeBlock);

    // Document shortcuts
    binds.insert(ctrl("s"), Action::Save);
    binds.insert(ctrl("z"), Action::Undo);
    binds.insert(ctrl_shift(Key::Character("z".into())), Action::Redo);

    // View shortcuts
    binds.insert(ctrl_shift(Key::Character("p".into())), Action::TogglePreview);
    binds.insert(ctrl_shift(Key::Named(NamedKey::Enter)), Action::ToggleFullscreen);

    binds
}

/// Build the shortcut table from configured binding strings
pub fn key_binds(config: &KeybindingsConfig) -> Result<HashMap<KeyBind, Action>, KeymapError> {
    let entries = [
        (&config.bold, Action::Bold),
        (&config.italic, Action::Italic),
        (&config.underline, Action::Underline),
        (&config.save, Action::Save),
        (&config.undo, Action::Undo),
        (&config.redo, Action::Redo),
        (&config.link, Action::Link),
        (&config.inline_code, Action::InlineCode),
        (&config.code_block, Action::CodeBlock),
        (&config.toggle_preview, Action::TogglePreview),
        (&config.fullscreen, Action::ToggleFullscreen),
    ];

    let mut binds = HashMap::with_capacity(entries.len());
    for (binding, action) in entries {
        let bind = KeyBind::parse(binding)?;
        if let Some(previous) = binds.insert(bind.clone(), action) {
            log::warn!("Key binding {} reassigned from {:?} to {:?}", bind, previous, action);
        }
    }
    Ok(binds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let bind = KeyBind::parse("Ctrl+B").unwrap();
        assert_eq!(bind, ctrl("b"));
    }

    #[test]
    fn test_parse_normalizes_cmd_and_order() {
        let bind = KeyBind::parse("Shift+Cmd+z").unwrap();
        assert_eq!(bind, ctrl_shift(Key::Character("z".into())));
    }

    #[test]
    fn test_parse_named_and_punctuation() {
        assert_eq!(
            KeyBind::parse("Ctrl+Shift+Enter").unwrap().key,
            Key::Named(NamedKey::Enter)
        );
        assert_eq!(KeyBind::parse("Ctrl+`").unwrap().key, Key::Character("`".into()));
        assert_eq!(KeyBind::parse("Ctrl++").unwrap().key, Key::Character("+".into()));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(KeyBind::parse("  "), Err(KeymapError::Empty));
        assert_eq!(
            KeyBind::parse("Ctrl+"),
            Err(KeymapError::MissingKey("Ctrl+".to_string()))
        );
        assert!(matches!(
            KeyBind::parse("Hyper+B"),
            Err(KeymapError::UnknownModifier { .. })
        ));
    }

    #[test]
    fn test_configured_defaults_match_builtin_table() {
        let parsed = key_binds(&KeybindingsConfig::default()).unwrap();
        assert_eq!(parsed, default_key_binds());
        assert_eq!(parsed.len(), 11);
    }

    #[test]
    fn test_shifted_backtick_event() {
        let bind = KeyBind::from_event(
            [Modifier::Shift, Modifier::Ctrl],
            Key::Character("~".into()),
        );
        assert_eq!(default_key_binds().get(&bind), Some(&Action::CodeBlock));
    }

    #[test]
    fn test_uppercase_event_character() {
        let bind = KeyBind::from_event([Modifier::Ctrl, Modifier::Shift], Key::Character("P".into()));
        assert_eq!(default_key_binds().get(&bind), Some(&Action::TogglePreview));
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyBind::parse("ctrl+shift+z").unwrap().to_string(), "Ctrl+Shift+Z");
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(Action::Bold.to_command(), Command::Format(FormatKey::Bold));
        assert_eq!(Action::Link.to_command(), Command::OpenDialog(DialogKind::Link));
    }
}
