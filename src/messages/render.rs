//! Render state - data structure sent from App layer to UI for rendering

use std::sync::Arc;

use crate::app::state::{ClipboardRequest, Popup};
use crate::groups::LoadStatus;
use crate::messages::ui_events::{Focus, InputMode, KeyContext, PopupKind};
use crate::models::{GlobalParam, HttpMethod, Theme};
use crate::notify::Notification;
use crate::spec::{MethodCounts, Operation, SearchEntry};
use crate::workspace::{DebugField, PanelView, TabPanel};

/// One visible sidebar line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarItem {
    Tag {
        name: String,
        count: usize,
        expanded: bool,
    },
    Operation {
        method: HttpMethod,
        label: String,
        deprecated: bool,
        active: bool,
    },
}

/// One entry of the tab strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabItem {
    pub title: String,
    pub method: HttpMethod,
}

/// Document statistics shown on the overview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overview {
    pub title: Option<String>,
    pub version: Option<String>,
    pub counts: MethodCounts,
    pub tag_count: usize,
}

/// The active tab's operation and its panel
#[derive(Debug, Clone)]
pub struct ActivePanel {
    pub operation: Arc<Operation>,
    pub panel: TabPanel,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Chrome
    pub document_title: String,
    pub theme: Theme,
    pub accent: (u8, u8, u8),
    pub location: String,
    pub enable_search: bool,
    pub enable_code_copy: bool,

    // Focus and editing
    pub focus: Focus,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Groups
    pub group_names: Vec<String>,
    pub current_group: Option<usize>,
    pub load_status: LoadStatus,

    // Sidebar
    pub sidebar_collapsed: bool,
    pub filter_input: String,
    pub sidebar_items: Vec<SidebarItem>,
    pub sidebar_cursor: usize,

    // Workspace
    pub tabs: Vec<TabItem>,
    pub active_tab: Option<usize>,
    pub overview: Option<Overview>,
    pub active: Option<ActivePanel>,

    // Global parameters
    pub globals: Vec<GlobalParam>,
    pub globals_enabled: bool,

    // Popups
    pub popup: Popup,
    pub palette_items: Vec<SearchEntry>,

    // Feedback
    pub notifications: Vec<Notification>,
    pub clipboard: Option<ClipboardRequest>,
}

impl RenderState {
    /// Context the key mapper needs to interpret the next key press
    pub fn key_context(&self) -> KeyContext {
        let popup = match &self.popup {
            Popup::None => PopupKind::None,
            Popup::Help => PopupKind::Help,
            Popup::Goto { .. } => PopupKind::Goto,
            Popup::Palette(_) => PopupKind::Palette,
            Popup::Groups { .. } => PopupKind::Groups,
            Popup::GlobalParams(manager) if manager.form.is_some() => PopupKind::ParamForm,
            Popup::GlobalParams(_) => PopupKind::GlobalParams,
        };
        let view = self.active.as_ref().map(|a| a.panel.view);
        let multiline = self.focus == Focus::Panel
            && view == Some(PanelView::Debug)
            && self
                .active
                .as_ref()
                .and_then(|a| a.panel.selected_field())
                == Some(DebugField::Body);
        KeyContext {
            popup,
            input_mode: self.input_mode,
            focus: self.focus,
            view,
            multiline,
        }
    }
}
