use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::app::{Action, Focus};

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    Diagnostics,
    LogViewer,
    Help,
}

impl KeyContext {
    /// Context for the focused pane
    pub fn for_focus(focus: Focus) -> Self {
        match focus {
            Focus::Diagnostics => Self::Diagnostics,
            Focus::Log => Self::LogViewer,
        }
    }
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::DismissError);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Tab), Action::FocusNext);
        global.insert(KeyBinding::shift(KeyCode::BackTab), Action::FocusNext);
        global.insert(KeyBinding::new(KeyCode::Char('n')), Action::NextDiagnostic);
        global.insert(KeyBinding::shift(KeyCode::Char('N')), Action::PrevDiagnostic);
        bindings.insert(KeyContext::Global, global);

        // Diagnostics tree
        let mut tree = HashMap::new();
        tree.insert(KeyBinding::new(KeyCode::Char('j')), Action::CursorDown(1));
        tree.insert(KeyBinding::new(KeyCode::Down), Action::CursorDown(1));
        tree.insert(KeyBinding::new(KeyCode::Char('k')), Action::CursorUp(1));
        tree.insert(KeyBinding::new(KeyCode::Up), Action::CursorUp(1));
        tree.insert(KeyBinding::new(KeyCode::Char('g')), Action::CursorTop);
        tree.insert(KeyBinding::shift(KeyCode::Char('G')), Action::CursorBottom);
        tree.insert(KeyBinding::new(KeyCode::Home), Action::CursorTop);
        tree.insert(KeyBinding::new(KeyCode::End), Action::CursorBottom);
        tree.insert(KeyBinding::new(KeyCode::Enter), Action::Activate);
        tree.insert(KeyBinding::new(KeyCode::Char('l')), Action::Activate);
        bindings.insert(KeyContext::Diagnostics, tree);

        // Log viewer bindings - less-like navigation
        let mut log_viewer = HashMap::new();
        // Line navigation
        log_viewer.insert(KeyBinding::new(KeyCode::Char('j')), Action::CursorDown(1));
        log_viewer.insert(KeyBinding::new(KeyCode::Down), Action::CursorDown(1));
        log_viewer.insert(KeyBinding::new(KeyCode::Char('k')), Action::CursorUp(1));
        log_viewer.insert(KeyBinding::new(KeyCode::Up), Action::CursorUp(1));
        // Page navigation (less-style)
        log_viewer.insert(KeyBinding::ctrl(KeyCode::Char('f')), Action::PageDown);
        log_viewer.insert(KeyBinding::ctrl(KeyCode::Char('b')), Action::PageUp);
        log_viewer.insert(KeyBinding::ctrl(KeyCode::Char('d')), Action::PageDown);
        log_viewer.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::PageUp);
        log_viewer.insert(KeyBinding::new(KeyCode::PageDown), Action::PageDown);
        log_viewer.insert(KeyBinding::new(KeyCode::PageUp), Action::PageUp);
        // Top/bottom navigation (less-style)
        log_viewer.insert(KeyBinding::new(KeyCode::Char('g')), Action::CursorTop);
        log_viewer.insert(KeyBinding::shift(KeyCode::Char('G')), Action::CursorBottom);
        log_viewer.insert(KeyBinding::shift(KeyCode::Char('<')), Action::CursorTop);
        log_viewer.insert(KeyBinding::shift(KeyCode::Char('>')), Action::CursorBottom);
        log_viewer.insert(KeyBinding::new(KeyCode::Home), Action::CursorTop);
        log_viewer.insert(KeyBinding::new(KeyCode::End), Action::CursorBottom);
        // Chunks
        log_viewer.insert(KeyBinding::new(KeyCode::Enter), Action::ToggleChunk);
        log_viewer.insert(KeyBinding::new(KeyCode::Char(' ')), Action::ToggleChunk);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('y')), Action::CopyChunk);
        bindings.insert(KeyContext::LogViewer, log_viewer);

        // Help overlay swallows everything but closing it
        let mut help = HashMap::new();
        help.insert(KeyBinding::new(KeyCode::Esc), Action::ToggleHelp);
        help.insert(KeyBinding::new(KeyCode::Char('q')), Action::ToggleHelp);
        bindings.insert(KeyContext::Help, help);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(action) = self
            .bindings
            .get(&context)
            .and_then(|context_bindings| context_bindings.get(&binding))
        {
            return Some(action.clone());
        }

        // Help only lets '?' and Ctrl-c through
        if context == KeyContext::Help
            && !matches!(binding.code, KeyCode::Char('?') | KeyCode::Char('c'))
        {
            return None;
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}
