//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::workspace::PanelView;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    // Navigation
    Up,
    Down,
    Select,
    ToggleFocus,
    ScrollUp,
    ScrollDown,

    // Tabs
    NextTab,
    PrevTab,
    CloseTab,
    ShowOverview,
    SwitchView,

    // Sidebar
    StartFilter,
    ToggleSidebar,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    Newline,
    CursorLeft,
    CursorRight,
    NextField,
    PrevField,

    // Debug actions
    Execute,
    ResetInputs,
    FormatBody,
    CopyCurl,
    CopyResponse,
    CycleResponsePane,

    // Document groups
    OpenGroupPicker,
    Refresh,

    // Popups
    OpenPalette,
    OpenGoto,
    OpenGlobalParams,
    ToggleHelp,
    ClosePopup,
    Confirm,

    // Global parameter manager
    ParamAdd,
    ParamEdit,
    ParamDelete,
    ToggleGlobalParams,
    ToggleParamKind,

    // Display
    ToggleTheme,

    // System
    Quit,
}

/// Which half of the screen receives navigation keys
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    Panel,
}

impl Focus {
    pub fn toggle(&self) -> Focus {
        match self {
            Focus::Sidebar => Focus::Panel,
            Focus::Panel => Focus::Sidebar,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Open popup, as far as key mapping is concerned
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PopupKind {
    #[default]
    None,
    Help,
    Goto,
    Palette,
    Groups,
    GlobalParams,
    ParamForm,
}

/// UI context needed to interpret a key press
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct KeyContext {
    pub popup: PopupKind,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub view: Option<PanelView>,
    /// The field being edited is the multi-line body editor
    pub multiline: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: &KeyContext) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('k') if ctx.popup == PopupKind::None => return Some(UiEvent::OpenPalette),
            KeyCode::Char('t') if ctx.popup == PopupKind::ParamForm => {
                return Some(UiEvent::ToggleParamKind)
            }
            _ => {}
        }
    }

    match ctx.popup {
        PopupKind::None => {}
        PopupKind::Help => return Some(UiEvent::ClosePopup),
        PopupKind::Goto => return text_popup_keys(key),
        PopupKind::Palette => {
            return match key.code {
                KeyCode::Up => Some(UiEvent::Up),
                KeyCode::Down => Some(UiEvent::Down),
                _ => text_popup_keys(key),
            }
        }
        PopupKind::Groups => {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(UiEvent::ClosePopup),
                KeyCode::Enter => Some(UiEvent::Confirm),
                KeyCode::Up => Some(UiEvent::Up),
                KeyCode::Down => Some(UiEvent::Down),
                _ => None,
            }
        }
        PopupKind::GlobalParams => {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(UiEvent::ClosePopup),
                KeyCode::Up => Some(UiEvent::Up),
                KeyCode::Down => Some(UiEvent::Down),
                KeyCode::Char('a') => Some(UiEvent::ParamAdd),
                KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::ParamEdit),
                KeyCode::Char('d') => Some(UiEvent::ParamDelete),
                KeyCode::Char('t') => Some(UiEvent::ToggleGlobalParams),
                _ => None,
            }
        }
        PopupKind::ParamForm => {
            return match key.code {
                KeyCode::Tab => Some(UiEvent::NextField),
                KeyCode::BackTab => Some(UiEvent::PrevField),
                _ => text_popup_keys(key),
            }
        }
    }

    match ctx.input_mode {
        InputMode::Editing => editing_keys(key, ctx),
        InputMode::Normal => normal_keys(key, ctx),
    }
}

/// Single-line text input inside a popup
fn text_popup_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::ClosePopup),
        KeyCode::Enter => Some(UiEvent::Confirm),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn editing_keys(key: KeyEvent, ctx: &KeyContext) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Enter if ctx.multiline => Some(UiEvent::Newline),
        KeyCode::Enter => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Tab if ctx.focus == Focus::Panel => Some(UiEvent::NextField),
        KeyCode::BackTab if ctx.focus == Focus::Panel => Some(UiEvent::PrevField),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn normal_keys(key: KeyEvent, ctx: &KeyContext) -> Option<UiEvent> {
    let global = match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('/') => Some(UiEvent::StartFilter),
        KeyCode::Char(':') => Some(UiEvent::OpenGoto),
        KeyCode::Char('g') => Some(UiEvent::OpenGroupPicker),
        KeyCode::Char('G') => Some(UiEvent::OpenGlobalParams),
        KeyCode::Char('R') | KeyCode::F(5) => Some(UiEvent::Refresh),
        KeyCode::Char('T') => Some(UiEvent::ToggleTheme),
        KeyCode::Char('b') => Some(UiEvent::ToggleSidebar),
        KeyCode::Char(']') => Some(UiEvent::NextTab),
        KeyCode::Char('[') => Some(UiEvent::PrevTab),
        KeyCode::Char('x') => Some(UiEvent::CloseTab),
        KeyCode::Char('h') => Some(UiEvent::ShowOverview),
        KeyCode::Char('v') => Some(UiEvent::SwitchView),
        KeyCode::Tab | KeyCode::BackTab => Some(UiEvent::ToggleFocus),
        KeyCode::Up => Some(UiEvent::Up),
        KeyCode::Down => Some(UiEvent::Down),
        KeyCode::PageUp => Some(UiEvent::ScrollUp),
        KeyCode::PageDown => Some(UiEvent::ScrollDown),
        KeyCode::Enter => Some(UiEvent::Select),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    if ctx.focus == Focus::Panel && ctx.view == Some(PanelView::Debug) {
        return match key.code {
            KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Char('s') => Some(UiEvent::Execute),
            KeyCode::Char('r') => Some(UiEvent::ResetInputs),
            KeyCode::Char('f') => Some(UiEvent::FormatBody),
            KeyCode::Char('c') => Some(UiEvent::CopyCurl),
            KeyCode::Char('y') => Some(UiEvent::CopyResponse),
            KeyCode::Char('p') => Some(UiEvent::CycleResponsePane),
            KeyCode::Char('t') => Some(UiEvent::ToggleGlobalParams),
            _ => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn debug_panel() -> KeyContext {
        KeyContext {
            focus: Focus::Panel,
            view: Some(PanelView::Debug),
            ..Default::default()
        }
    }

    #[test]
    fn test_release_events_are_ignored() {
        let key = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(key_to_ui_event(key, &KeyContext::default()), None);
    }

    #[test]
    fn test_debug_actions_need_debug_focus() {
        let ctx = KeyContext::default();
        assert_eq!(key_to_ui_event(press(KeyCode::Char('s')), &ctx), None);
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), &debug_panel()),
            Some(UiEvent::Execute)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('c')), &debug_panel()),
            Some(UiEvent::CopyCurl)
        );
    }

    #[test]
    fn test_editing_body_enter_inserts_newline() {
        let mut ctx = debug_panel();
        ctx.input_mode = InputMode::Editing;
        assert_eq!(key_to_ui_event(press(KeyCode::Enter), &ctx), Some(UiEvent::StopEditing));
        ctx.multiline = true;
        assert_eq!(key_to_ui_event(press(KeyCode::Enter), &ctx), Some(UiEvent::Newline));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), &ctx), Some(UiEvent::CharInput('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Tab), &ctx), Some(UiEvent::NextField));
    }

    #[test]
    fn test_popups_capture_keys() {
        let ctx = KeyContext {
            popup: PopupKind::Palette,
            ..Default::default()
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), &ctx), Some(UiEvent::CharInput('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Down), &ctx), Some(UiEvent::Down));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), &ctx), Some(UiEvent::ClosePopup));

        let help = KeyContext {
            popup: PopupKind::Help,
            ..Default::default()
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('x')), &help), Some(UiEvent::ClosePopup));
    }

    #[test]
    fn test_ctrl_shortcuts() {
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(key_to_ui_event(ctrl_k, &KeyContext::default()), Some(UiEvent::OpenPalette));

        let form = KeyContext {
            popup: PopupKind::ParamForm,
            ..Default::default()
        };
        let ctrl_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_eq!(key_to_ui_event(ctrl_t, &form), Some(UiEvent::ToggleParamKind));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('t')), &form), Some(UiEvent::CharInput('t')));
    }
}
