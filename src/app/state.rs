//! App state - pure data structure with no I/O logic

use crate::config::Config;
use crate::global_params::GlobalParamStore;
use crate::groups::GroupStore;
use crate::constants::SEARCH_DEBOUNCE;
use crate::messages::render::{ActivePanel, Overview, SidebarItem, TabItem};
use crate::messages::ui_events::{Focus, InputMode};
use crate::messages::RenderState;
use crate::models::{GlobalParamKind, Theme};
use crate::notify::Notifications;
use crate::search::{CommandPalette, Debouncer, Sidebar, SidebarRow};
use crate::spec::SpecIndex;
use crate::storage::Storage;
use crate::workspace::{Router, TabWorkspace};

/// Which input of the parameter form has focus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Value,
}

/// Add/edit form of the global parameter manager
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamForm {
    /// Index being edited; `None` when adding
    pub editing: Option<usize>,
    pub name: String,
    pub value: String,
    pub kind: GlobalParamKind,
    pub field: FormField,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamManager {
    pub cursor: usize,
    pub form: Option<ParamForm>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Popup {
    #[default]
    None,
    Help,
    Goto { input: String },
    Palette(CommandPalette),
    Groups { cursor: usize },
    GlobalParams(ParamManager),
}

/// Text the UI should place on the system clipboard; `seq` changes per copy
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipboardRequest {
    pub seq: u64,
    pub text: String,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub config: Config,
    pub storage: Storage,

    // Display
    pub theme: Theme,
    pub sidebar_collapsed: bool,

    // Document
    pub groups: GroupStore,
    pub index: Option<SpecIndex>,

    // Workspace
    pub workspace: TabWorkspace,
    pub router: Router,
    pub global_params: GlobalParamStore,

    // Sidebar
    pub sidebar: Sidebar,
    pub filter_input: String,
    pub filter_debounce: Debouncer,

    // UI state
    pub focus: Focus,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub popup: Popup,

    // Feedback
    pub notifications: Notifications,
    pub clipboard: Option<ClipboardRequest>,

    pub next_request_id: u64,
}

impl AppState {
    pub fn new(config: Config, storage: Storage, location: Option<String>) -> Self {
        let theme = storage.load_theme().unwrap_or(config.default_theme);
        let sidebar_collapsed = storage.load_sidebar_collapsed();
        AppState {
            groups: GroupStore::new(config.urls.clone()),
            global_params: GlobalParamStore::load(storage.clone()),
            config,
            storage,
            theme,
            sidebar_collapsed,
            index: None,
            workspace: TabWorkspace::new(),
            router: Router::new(location),
            sidebar: Sidebar::new(),
            filter_input: String::new(),
            filter_debounce: Debouncer::new(SEARCH_DEBOUNCE),
            focus: if sidebar_collapsed { Focus::Panel } else { Focus::Sidebar },
            input_mode: InputMode::Normal,
            cursor_position: 0,
            popup: Popup::None,
            notifications: Notifications::default(),
            clipboard: None,
            next_request_id: 1,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Sidebar rows for the loaded document
    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        self.index
            .as_ref()
            .map(|index| self.sidebar.rows(index))
            .unwrap_or_default()
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let sidebar_items = match &self.index {
            Some(index) => self
                .sidebar
                .rows(index)
                .into_iter()
                .filter_map(|row| match row {
                    SidebarRow::Tag { name, visible, expanded, .. } => Some(SidebarItem::Tag {
                        name,
                        count: visible,
                        expanded,
                    }),
                    SidebarRow::Operation { operation, .. } => {
                        let op = index.operations.get(operation)?;
                        let active = self
                            .workspace
                            .active_tab()
                            .map(|t| op.is(t.method, &t.path))
                            .unwrap_or(false);
                        Some(SidebarItem::Operation {
                            method: op.method,
                            label: op.display_name().to_string(),
                            deprecated: op.deprecated,
                            active,
                        })
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        let palette_items = match (&self.popup, &self.index) {
            (Popup::Palette(palette), Some(index)) => palette
                .results
                .iter()
                .filter_map(|&i| index.search_index.get(i).cloned())
                .collect(),
            _ => Vec::new(),
        };

        let active = self.workspace.active_tab().and_then(|tab| {
            let panel = self.workspace.panel(&tab.id)?;
            Some(ActivePanel {
                operation: tab.operation.clone(),
                panel: panel.clone(),
            })
        });

        RenderState {
            document_title: self.config.document_title.clone(),
            theme: self.theme,
            accent: self.config.accent_rgb(),
            location: self.router.location().to_string(),
            enable_search: self.config.enable_search,
            enable_code_copy: self.config.enable_code_copy,
            focus: self.focus,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            group_names: self.groups.groups().iter().map(|g| g.name.clone()).collect(),
            current_group: self.groups.current_index(),
            load_status: self.groups.status().clone(),
            sidebar_collapsed: self.sidebar_collapsed,
            filter_input: self.filter_input.clone(),
            sidebar_items,
            sidebar_cursor: self.sidebar.cursor(),
            tabs: self
                .workspace
                .tabs()
                .iter()
                .map(|t| TabItem {
                    title: t.title.clone(),
                    method: t.method,
                })
                .collect(),
            active_tab: self.workspace.active_index(),
            overview: self.index.as_ref().map(|index| Overview {
                title: index.title.clone(),
                version: index.version.clone(),
                counts: index.method_counts(),
                tag_count: index.tags.len(),
            }),
            active,
            globals: self.global_params.params().to_vec(),
            globals_enabled: self.global_params.is_enabled(),
            popup: self.popup.clone(),
            palette_items,
            notifications: self.notifications.items().to_vec(),
            clipboard: self.clipboard.clone(),
        }
    }
}
