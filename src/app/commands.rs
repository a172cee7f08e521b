//! Command handlers - business logic for processing UI events

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::app::state::{ClipboardRequest, FormField, ParamForm, ParamManager, Popup};
use crate::app::AppState;
use crate::curl;
use crate::messages::ui_events::{Focus, InputMode};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{ExecutionResult, Outcome};
use crate::request::{BuiltRequest, RequestBuilder, RequestInputs};
use crate::search::{CommandPalette, SidebarRow};
use crate::spec::{Operation, SpecIndex};
use crate::workspace::PanelView;

fn step(cursor: usize, down: bool, count: usize) -> usize {
    if count == 0 {
        0
    } else if down {
        (cursor + 1).min(count - 1)
    } else {
        cursor.saturating_sub(1)
    }
}

impl AppState {
    // ========================
    // Document groups
    // ========================

    /// Load the first configured group
    pub fn startup(&mut self) -> Option<NetworkCommand> {
        if self.groups.groups().is_empty() {
            tracing::warn!("No document groups configured");
            self.notifications.error("No API document configured");
            return None;
        }
        self.switch_group(0)
    }

    /// Save the outgoing group's tabs and start loading `index`
    pub fn switch_group(&mut self, index: usize) -> Option<NetworkCommand> {
        let outgoing = self.workspace.snapshot();
        let ticket = self.groups.begin_switch(index, outgoing)?;
        self.global_params.switch_group(&ticket.group.name);
        self.workspace.clear();
        self.index = None;
        self.sidebar.reset();
        self.input_mode = InputMode::Normal;

        match self.config.resolve_url(&ticket.group.url) {
            Ok(url) => Some(NetworkCommand::FetchDocument {
                generation: ticket.generation,
                url: url.to_string(),
            }),
            Err(e) => {
                let message = format!("{:#}", e);
                self.groups.fail(ticket.generation, message.clone());
                self.notifications.error(format!("Failed to load API document: {}", message));
                None
            }
        }
    }

    pub fn refresh(&mut self) -> Option<NetworkCommand> {
        let index = self.groups.current_index()?;
        self.switch_group(index)
    }

    fn document_loaded(&mut self, generation: u64, document: Value) {
        let Some(snapshot) = self.groups.complete(generation) else {
            tracing::warn!(generation, "Discarding stale document");
            return;
        };
        let index = SpecIndex::parse(document);
        tracing::info!(
            generation,
            operations = index.operations.len(),
            tags = index.tags.len(),
            "Document loaded"
        );
        self.workspace.restore(snapshot, &index);
        if !self.filter_input.is_empty() {
            self.sidebar.set_filter(&index, &self.filter_input);
        }
        let target = self
            .router
            .target()
            .and_then(|(method, path)| index.find(method, &path).cloned());
        self.index = Some(index);

        // Location first, then the restored active tab, else the overview
        match target {
            Some(operation) => self.open_operation(operation),
            None => self.after_activation(),
        }
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        match response {
            NetworkResponse::DocumentLoaded { generation, document } => {
                self.document_loaded(generation, document)
            }
            NetworkResponse::DocumentFailed { generation, error } => {
                if self.groups.fail(generation, error.to_string()) {
                    tracing::warn!(generation, error = %error, "Document load failed");
                    self.notifications.error(format!("Failed to load API document: {}", error));
                } else {
                    tracing::warn!(generation, "Discarding stale document failure");
                }
            }
            NetworkResponse::Executed { id, tab_id, result } => {
                self.execution_finished(id, &tab_id, result)
            }
        }
    }

    fn execution_finished(&mut self, id: u64, tab_id: &str, result: ExecutionResult) {
        let failure = (result.outcome == Outcome::Failed).then(|| result.body.clone());
        let applied = self
            .workspace
            .panel_mut(tab_id)
            .map(|panel| panel.finish_request(id, result))
            .unwrap_or(false);
        if !applied {
            tracing::warn!(id, tab = %tab_id, "Discarding stale execution result");
            return;
        }
        if let Some(message) = failure {
            self.notifications.error(message);
        }
    }

    // ========================
    // Tabs and routing
    // ========================

    pub fn open_operation(&mut self, operation: Arc<Operation>) {
        self.workspace.open(operation);
        self.after_activation();
    }

    /// Build the active panel on first use and mirror it in the location
    fn after_activation(&mut self) {
        if let Some(index) = &self.index {
            self.workspace.ensure_panel(index, self.global_params.params());
        }
        match self.workspace.active_tab() {
            Some(tab) => self.router.replace(tab.method, &tab.path),
            None => self.router.clear(),
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn next_tab(&mut self) {
        self.workspace.cycle(true);
        self.after_activation();
    }

    pub fn prev_tab(&mut self) {
        self.workspace.cycle(false);
        self.after_activation();
    }

    pub fn close_tab(&mut self) {
        if self.workspace.close_active() {
            self.after_activation();
        }
    }

    pub fn show_overview(&mut self) {
        self.workspace.show_overview();
        self.after_activation();
    }

    /// Externally supplied location; unknown targets fall back to the overview
    pub fn navigate(&mut self, fragment: &str) {
        let target = self.router.navigate(fragment).and_then(|(method, path)| {
            self.index.as_ref()?.find(method, &path).cloned()
        });
        match target {
            Some(operation) => self.open_operation(operation),
            None => {
                tracing::debug!(fragment, "Location does not match an operation");
                self.show_overview();
            }
        }
    }

    pub fn switch_view(&mut self) {
        if let Some(panel) = self.workspace.active_panel_mut() {
            panel.view = panel.view.toggle();
            panel.scroll = 0;
        }
    }

    pub fn cycle_response_pane(&mut self) {
        if let Some(panel) = self.workspace.active_panel_mut() {
            panel.pane = panel.pane.next();
            panel.scroll = 0;
        }
    }

    pub fn scroll_up(&mut self) {
        if let Some(panel) = self.workspace.active_panel_mut() {
            panel.scroll = panel.scroll.saturating_sub(5);
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(panel) = self.workspace.active_panel_mut() {
            panel.scroll = panel.scroll.saturating_add(5);
        }
    }

    // ========================
    // Navigation
    // ========================

    pub fn toggle_focus(&mut self) {
        if !self.sidebar_collapsed {
            self.focus = self.focus.toggle();
        }
    }

    pub fn move_up(&mut self) {
        self.move_selection(false);
    }

    pub fn move_down(&mut self) {
        self.move_selection(true);
    }

    fn move_selection(&mut self, down: bool) {
        if self.popup == Popup::None {
            self.move_in_workspace(down);
            return;
        }
        let group_count = self.groups.groups().len();
        let param_count = self.global_params.params().len();
        match &mut self.popup {
            Popup::Palette(palette) => palette.move_selection(down),
            Popup::Groups { cursor } => *cursor = step(*cursor, down, group_count),
            Popup::GlobalParams(manager) if manager.form.is_none() => {
                manager.cursor = step(manager.cursor, down, param_count)
            }
            _ => {}
        }
    }

    fn move_in_workspace(&mut self, down: bool) {
        match self.focus {
            Focus::Sidebar => {
                let count = self.sidebar_rows().len();
                self.sidebar.move_cursor(down, count);
            }
            Focus::Panel => {
                let Some(panel) = self.workspace.active_panel_mut() else {
                    return;
                };
                match (panel.view, down) {
                    (PanelView::Document, true) => panel.scroll = panel.scroll.saturating_add(1),
                    (PanelView::Document, false) => panel.scroll = panel.scroll.saturating_sub(1),
                    (PanelView::Debug, true) => panel.next_field(),
                    (PanelView::Debug, false) => panel.prev_field(),
                }
            }
        }
    }

    /// Enter outside of editing: toggle a tag, open an operation or edit a field
    pub fn select(&mut self) {
        match self.focus {
            Focus::Sidebar => self.select_sidebar_row(),
            Focus::Panel => self.start_editing(),
        }
    }

    fn select_sidebar_row(&mut self) {
        let Some(index) = &self.index else {
            return;
        };
        let rows = self.sidebar.rows(index);
        match rows.get(self.sidebar.cursor()) {
            Some(SidebarRow::Tag { name, .. }) => {
                self.sidebar.toggle_tag(name);
                let count = self.sidebar_rows().len();
                self.sidebar.clamp_cursor(count);
            }
            Some(SidebarRow::Operation { operation, .. }) => {
                if let Some(operation) = index.operations.get(*operation).cloned() {
                    self.open_operation(operation);
                }
            }
            None => {}
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        if self.sidebar_collapsed {
            self.focus = Focus::Panel;
        }
        if let Err(e) = self.storage.save_sidebar_collapsed(self.sidebar_collapsed) {
            tracing::warn!(error = %e, "Failed to persist sidebar state");
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        if let Err(e) = self.storage.save_theme(self.theme) {
            tracing::warn!(error = %e, "Failed to persist theme");
        }
    }

    // ========================
    // Sidebar filter
    // ========================

    pub fn start_filter(&mut self) {
        if !self.config.enable_search {
            self.notifications.info("Search is disabled");
            return;
        }
        if self.sidebar_collapsed {
            self.toggle_sidebar();
        }
        self.focus = Focus::Sidebar;
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.filter_input.len();
    }

    fn apply_filter(&mut self) {
        if let Some(index) = &self.index {
            self.sidebar.set_filter(index, &self.filter_input);
        }
    }

    /// Housekeeping; true when something visible changed
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.notifications.expire(now);
        if self.filter_debounce.ready(now) {
            self.apply_filter();
            changed = true;
        }
        changed
    }

    // ========================
    // Input editing
    // ========================

    /// Text currently receiving keystrokes, if any
    pub fn current_input(&self) -> Option<&str> {
        match &self.popup {
            Popup::Goto { input } => Some(input.as_str()),
            Popup::Palette(palette) => Some(palette.query.as_str()),
            Popup::GlobalParams(ParamManager { form: Some(form), .. }) => Some(match form.field {
                FormField::Name => form.name.as_str(),
                FormField::Value => form.value.as_str(),
            }),
            Popup::None if self.input_mode == InputMode::Editing => match self.focus {
                Focus::Sidebar => Some(self.filter_input.as_str()),
                Focus::Panel => {
                    let panel = self.workspace.active_panel()?;
                    panel.field_value(panel.selected_field()?)
                }
            },
            _ => None,
        }
    }

    fn current_input_mut(&mut self) -> Option<&mut String> {
        match &mut self.popup {
            Popup::Goto { input } => Some(input),
            Popup::Palette(palette) => Some(&mut palette.query),
            Popup::GlobalParams(ParamManager { form: Some(form), .. }) => Some(match form.field {
                FormField::Name => &mut form.name,
                FormField::Value => &mut form.value,
            }),
            Popup::None if self.input_mode == InputMode::Editing => match self.focus {
                Focus::Sidebar => Some(&mut self.filter_input),
                Focus::Panel => {
                    let panel = self.workspace.active_panel_mut()?;
                    let field = panel.selected_field()?;
                    panel.field_mut(field)
                }
            },
            _ => None,
        }
    }

    fn input_changed(&mut self) {
        let editing_filter = self.focus == Focus::Sidebar && self.input_mode == InputMode::Editing;
        match &mut self.popup {
            Popup::Palette(palette) => {
                if let Some(index) = &self.index {
                    palette.update(index);
                }
            }
            Popup::None if editing_filter => self.filter_debounce.touch(Instant::now()),
            _ => {}
        }
    }

    fn cursor_to_end(&mut self) {
        self.cursor_position = self.current_input().map(str::len).unwrap_or(0);
    }

    pub fn start_editing(&mut self) {
        if self.focus != Focus::Panel {
            return;
        }
        let editable = self
            .workspace
            .active_panel()
            .map(|p| p.view == PanelView::Debug && p.selected_field().is_some())
            .unwrap_or(false);
        if editable {
            self.input_mode = InputMode::Editing;
            self.cursor_to_end();
        }
    }

    pub fn stop_editing(&mut self) {
        if self.focus == Focus::Sidebar && self.input_mode == InputMode::Editing {
            self.apply_filter();
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let Some(input) = self.current_input() else {
            return;
        };
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let Some(input) = self.current_input() else {
            return;
        };
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else {
            return;
        };
        if cursor_pos <= input.len() && input.is_char_boundary(cursor_pos) {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
        self.input_changed();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else {
            return;
        };
        if cursor_pos > input.len() {
            return;
        }
        let prev_pos = input[..cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        input.remove(prev_pos);
        self.cursor_position = prev_pos;
        self.input_changed();
    }

    pub fn next_field(&mut self) {
        self.step_field(true);
    }

    pub fn prev_field(&mut self) {
        self.step_field(false);
    }

    fn step_field(&mut self, forward: bool) {
        if let Popup::GlobalParams(ParamManager { form: Some(form), .. }) = &mut self.popup {
            form.field = match form.field {
                FormField::Name => FormField::Value,
                FormField::Value => FormField::Name,
            };
        } else if let Some(panel) = self.workspace.active_panel_mut() {
            if forward {
                panel.next_field();
            } else {
                panel.prev_field();
            }
        }
        self.cursor_to_end();
    }

    // ========================
    // Debug actions
    // ========================

    /// Build the active tab's request from its form; failures are notified
    fn build_active_request(&mut self) -> Option<(String, BuiltRequest)> {
        let tab = self.workspace.active_tab()?;
        let panel = self.workspace.panel(&tab.id)?;
        let built = RequestBuilder::new(&self.config.origin, self.config.bearer()).and_then(|builder| {
            let inputs = RequestInputs {
                parameters: &panel.doc.parameters,
                values: &panel.values,
                live_globals: &panel.globals,
                stored_globals: self.global_params.params(),
                globals_enabled: self.global_params.is_enabled(),
                body: &panel.body,
            };
            builder.build(&tab.operation, &inputs)
        });
        match built {
            Ok(request) => Some((tab.id.clone(), request)),
            Err(e) => {
                self.notifications.error(format!("Cannot build request: {:#}", e));
                None
            }
        }
    }

    pub fn execute(&mut self) -> Option<NetworkCommand> {
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
        }
        let (tab_id, request) = self.build_active_request()?;
        let id = self.next_id();
        if let Some(panel) = self.workspace.panel_mut(&tab_id) {
            panel.begin_request(id);
        }
        Some(NetworkCommand::Execute { id, tab_id, request })
    }

    pub fn reset_inputs(&mut self) {
        if let Some(panel) = self.workspace.active_panel_mut() {
            panel.reset();
        }
    }

    pub fn format_body(&mut self) {
        let Some(panel) = self.workspace.active_panel_mut() else {
            return;
        };
        if !panel.has_body() {
            return;
        }
        match panel.format_body() {
            Ok(()) => self.notifications.success("Body formatted"),
            Err(e) => self.notifications.error(e.to_string()),
        }
    }

    fn copy(&mut self, text: String, message: &str) {
        let seq = self.clipboard.as_ref().map(|c| c.seq + 1).unwrap_or(1);
        self.clipboard = Some(ClipboardRequest { seq, text });
        self.notifications.success(message);
    }

    pub fn copy_curl(&mut self) {
        if !self.config.enable_code_copy {
            return;
        }
        if let Some((_, request)) = self.build_active_request() {
            self.copy(curl::to_curl(&request), "cURL command copied");
        }
    }

    pub fn copy_response(&mut self) {
        if !self.config.enable_code_copy {
            return;
        }
        let body = self
            .workspace
            .active_panel()
            .and_then(|p| p.result())
            .map(|r| r.body.clone());
        if let Some(body) = body {
            self.copy(body, "Response copied");
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.popup = if self.popup == Popup::Help { Popup::None } else { Popup::Help };
    }

    pub fn open_palette(&mut self) {
        if !self.config.enable_search {
            self.notifications.info("Search is disabled");
            return;
        }
        if self.index.is_none() {
            return;
        }
        self.popup = Popup::Palette(CommandPalette::default());
        self.cursor_position = 0;
    }

    pub fn open_goto(&mut self) {
        self.popup = Popup::Goto {
            input: self.router.location().to_string(),
        };
        self.cursor_to_end();
    }

    pub fn open_group_picker(&mut self) {
        if self.groups.groups().is_empty() {
            self.notifications.warning("No API document configured");
            return;
        }
        self.popup = Popup::Groups {
            cursor: self.groups.current_index().unwrap_or(0),
        };
    }

    pub fn open_global_params(&mut self) {
        self.popup = Popup::GlobalParams(ParamManager::default());
    }

    pub fn close_popup(&mut self) {
        // An open form closes back to the parameter list
        if let Popup::GlobalParams(manager) = &mut self.popup {
            if manager.form.take().is_some() {
                return;
            }
        }
        self.popup = Popup::None;
    }

    /// Enter inside a popup
    pub fn confirm(&mut self) -> Option<NetworkCommand> {
        match std::mem::take(&mut self.popup) {
            Popup::Goto { input } => {
                self.navigate(&input);
                None
            }
            Popup::Palette(palette) => {
                let target = palette.selected_result().and_then(|i| {
                    let index = self.index.as_ref()?;
                    let entry = index.search_index.get(i)?;
                    index.find(entry.method, &entry.path).cloned()
                });
                if let Some(operation) = target {
                    self.open_operation(operation);
                }
                None
            }
            Popup::Groups { cursor } => self.switch_group(cursor),
            Popup::GlobalParams(manager) => {
                self.popup = Popup::GlobalParams(manager);
                self.save_param();
                None
            }
            other => {
                self.popup = other;
                None
            }
        }
    }

    // ========================
    // Global parameters
    // ========================

    pub fn param_add(&mut self) {
        if let Popup::GlobalParams(manager) = &mut self.popup {
            manager.form = Some(ParamForm::default());
            self.cursor_position = 0;
        }
    }

    pub fn param_edit(&mut self) {
        let params = self.global_params.params();
        if let Popup::GlobalParams(manager) = &mut self.popup {
            if let Some(param) = params.get(manager.cursor) {
                manager.form = Some(ParamForm {
                    editing: Some(manager.cursor),
                    name: param.name.clone(),
                    value: param.value.clone(),
                    kind: param.kind,
                    field: FormField::Name,
                });
                self.cursor_position = param.name.len();
            }
        }
    }

    pub fn param_delete(&mut self) {
        let Popup::GlobalParams(manager) = &mut self.popup else {
            return;
        };
        match self.global_params.remove(manager.cursor) {
            Ok(removed) => {
                tracing::info!(name = %removed.name, "Deleted global parameter");
                manager.cursor = manager
                    .cursor
                    .min(self.global_params.params().len().saturating_sub(1));
                self.notifications.success("Parameter deleted");
                self.workspace.sync_globals(self.global_params.params());
            }
            Err(e) => tracing::debug!(error = %e, "Nothing to delete"),
        }
    }

    pub fn toggle_param_kind(&mut self) {
        if let Popup::GlobalParams(ParamManager { form: Some(form), .. }) = &mut self.popup {
            form.kind = form.kind.toggle();
        }
    }

    fn save_param(&mut self) {
        let Popup::GlobalParams(manager) = &mut self.popup else {
            return;
        };
        let Some(form) = &manager.form else {
            return;
        };
        let result = match form.editing {
            Some(index) => self
                .global_params
                .update(index, &form.name, &form.value, form.kind)
                .map(|_| "Parameter updated"),
            None => self
                .global_params
                .add(&form.name, &form.value, form.kind)
                .map(|_| "Parameter added"),
        };
        match result {
            Ok(message) => {
                manager.form = None;
                self.notifications.success(message);
                self.workspace.sync_globals(self.global_params.params());
            }
            Err(e) => self.notifications.warning(e.to_string()),
        }
    }

    pub fn toggle_global_params(&mut self) {
        let enabled = self.global_params.toggle_enabled();
        self.notifications.info(if enabled {
            "Global parameters enabled"
        } else {
            "Global parameters disabled"
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::LoadError;
    use crate::groups::LoadStatus;
    use crate::models::{DocumentGroup, GlobalParamKind, HttpMethod};
    use crate::notify::Severity;
    use crate::storage::Storage;
    use crate::workspace::{tab_id, ResponseState};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "info": {"title": "Demo", "version": "1.0"},
            "paths": {
                "/api/users/{id}": {
                    "get": {
                        "tags": ["用户管理"],
                        "summary": "Get user",
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}
                        ]
                    }
                },
                "/api/users": {
                    "post": {
                        "tags": ["用户管理"],
                        "summary": "Create user",
                        "requestBody": {
                            "content": {"application/json": {"schema": {
                                "type": "object",
                                "properties": {"name": {"type": "string"}}
                            }}}
                        }
                    }
                }
            }
        })
    }

    fn state(dir: &tempfile::TempDir, location: Option<&str>) -> AppState {
        let config = Config {
            urls: vec![
                DocumentGroup::new("v1", "/swagger/v1.json"),
                DocumentGroup::new("v2", "/swagger/v2.json"),
            ],
            ..Config::default()
        };
        AppState::new(config, Storage::with_dir(dir.path()), location.map(String::from))
    }

    fn fetch_generation(cmd: Option<NetworkCommand>) -> u64 {
        match cmd {
            Some(NetworkCommand::FetchDocument { generation, .. }) => generation,
            other => panic!("expected a fetch, got {:?}", other),
        }
    }

    fn loaded(dir: &tempfile::TempDir, location: Option<&str>) -> AppState {
        let mut state = state(dir, location);
        let generation = fetch_generation(state.startup());
        state.handle_response(NetworkResponse::DocumentLoaded { generation, document: document() });
        state
    }

    fn op(state: &AppState, method: HttpMethod, path: &str) -> Arc<Operation> {
        state.index.as_ref().unwrap().find(method, path).cloned().unwrap()
    }

    #[test]
    fn test_startup_fetches_first_group_against_origin() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(&dir, None);
        match state.startup() {
            Some(NetworkCommand::FetchDocument { url, .. }) => {
                assert_eq!(url, "http://localhost:8080/swagger/v1.json")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(state.groups.status(), &LoadStatus::Loading);
    }

    #[test]
    fn test_no_groups_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(Config::default(), Storage::with_dir(dir.path()), None);
        assert!(state.startup().is_none());
        assert_eq!(state.notifications.items()[0].severity, Severity::Error);
    }

    #[test]
    fn test_deep_link_opens_operation_after_load() {
        let dir = tempfile::tempdir().unwrap();
        let state = loaded(&dir, Some("#get/api/users/{id}"));
        assert_eq!(state.workspace.active_id(), Some("get:/api/users/{id}"));
        assert!(state.workspace.active_panel().is_some());
        assert_eq!(state.router.location(), "#GET/api/users/{id}");
    }

    #[test]
    fn test_unknown_location_shows_overview() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, Some("#DELETE/nope"));
        assert!(state.workspace.is_overview());
        assert_eq!(state.router.location(), "");

        state.navigate("garbage");
        assert!(state.workspace.is_overview());
        state.navigate("#GET/nope");
        assert!(state.workspace.is_overview());
        assert_eq!(state.router.location(), "");
        state.navigate("POST/api/users");
        assert_eq!(state.workspace.active_id(), Some("post:/api/users"));
    }

    #[test]
    fn test_stale_document_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(&dir, None);
        let first = fetch_generation(state.startup());
        let second = fetch_generation(state.switch_group(1));

        state.handle_response(NetworkResponse::DocumentLoaded { generation: first, document: document() });
        assert!(state.index.is_none());
        state.handle_response(NetworkResponse::DocumentFailed {
            generation: first,
            error: LoadError::Status(500),
        });
        assert!(state.notifications.is_empty());

        state.handle_response(NetworkResponse::DocumentLoaded { generation: second, document: document() });
        assert!(state.index.is_some());
        assert_eq!(state.groups.current().map(|g| g.name.as_str()), Some("v2"));
    }

    #[test]
    fn test_load_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(&dir, None);
        let generation = fetch_generation(state.startup());
        state.handle_response(NetworkResponse::DocumentFailed {
            generation,
            error: LoadError::Status(404),
        });
        assert_eq!(state.groups.status(), &LoadStatus::Failed("HTTP 404".into()));
        assert_eq!(state.notifications.items()[0].message, "Failed to load API document: HTTP 404");
    }

    #[test]
    fn test_group_switch_restores_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, None);
        let get = op(&state, HttpMethod::GET, "/api/users/{id}");
        let post = op(&state, HttpMethod::POST, "/api/users");
        state.open_operation(get);
        state.open_operation(post);

        let generation = fetch_generation(state.switch_group(1));
        assert!(state.workspace.tabs().is_empty());
        state.handle_response(NetworkResponse::DocumentLoaded { generation, document: json!({"paths": {}}) });
        assert!(state.workspace.is_overview());

        // v2 has no operations, so the location no longer resolves
        let generation = fetch_generation(state.switch_group(0));
        state.handle_response(NetworkResponse::DocumentLoaded { generation, document: document() });
        let ids: Vec<&str> = state.workspace.tabs().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["get:/api/users/{id}", "post:/api/users"]);
        assert_eq!(state.workspace.active_id(), Some("post:/api/users"));
        assert!(state.workspace.active_panel().is_some());
    }

    #[test]
    fn test_execute_and_apply_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, Some("#GET/api/users/{id}"));
        state.focus = Focus::Panel;
        state.switch_view();
        state.start_editing();
        state.enter_char('7');
        state.stop_editing();

        let (id, tab) = match state.execute() {
            Some(NetworkCommand::Execute { id, tab_id, request }) => {
                assert_eq!(request.url, "http://localhost:8080/api/users/7");
                (id, tab_id)
            }
            other => panic!("unexpected {:?}", other),
        };
        assert!(matches!(state.workspace.active_panel().unwrap().response, ResponseState::Pending { .. }));

        let result = ExecutionResult {
            outcome: Outcome::Status { code: 200, text: "OK".into() },
            elapsed_ms: 4,
            headers: Vec::new(),
            body: "{}".into(),
            curl: String::new(),
        };
        // a result for an older request is ignored
        state.handle_response(NetworkResponse::Executed { id: id + 100, tab_id: tab.clone(), result: result.clone() });
        assert!(matches!(state.workspace.active_panel().unwrap().response, ResponseState::Pending { .. }));

        state.handle_response(NetworkResponse::Executed { id, tab_id: tab, result: result.clone() });
        assert_eq!(state.workspace.active_panel().unwrap().response, ResponseState::Ready(result));
    }

    #[test]
    fn test_result_for_closed_tab_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, Some("#GET/api/users/{id}"));
        let Some(NetworkCommand::Execute { id, tab_id, .. }) = state.execute() else {
            panic!("expected execute");
        };
        state.close_tab();
        assert!(state.workspace.is_overview());
        state.handle_response(NetworkResponse::Executed {
            id,
            tab_id,
            result: ExecutionResult {
                outcome: Outcome::Failed,
                elapsed_ms: 0,
                headers: Vec::new(),
                body: "Connection failed".into(),
                curl: String::new(),
            },
        });
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn test_format_body_error_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, Some("#POST/api/users"));
        let id = tab_id(HttpMethod::POST, "/api/users");
        state.workspace.panel_mut(&id).unwrap().body = "{bad".into();
        state.format_body();
        assert_eq!(state.workspace.panel(&id).unwrap().body, "{bad");
        assert_eq!(state.notifications.items()[0].severity, Severity::Error);

        state.workspace.panel_mut(&id).unwrap().body = "{\"a\":1}".into();
        state.format_body();
        assert_eq!(state.workspace.panel(&id).unwrap().body, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_copy_curl_fills_clipboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, Some("#POST/api/users"));
        state.copy_curl();
        let clip = state.clipboard.clone().unwrap();
        assert_eq!(clip.seq, 1);
        assert!(clip.text.starts_with("curl -X POST 'http://localhost:8080/api/users'"));
        assert!(clip.text.contains("-H 'Content-Type: application/json'"));
        state.copy_curl();
        assert_eq!(state.clipboard.as_ref().unwrap().seq, 2);
    }

    #[test]
    fn test_param_manager_add_and_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, None);
        state.open_global_params();
        for _ in 0..2 {
            state.param_add();
            for c in "X-Tenant".chars() {
                state.enter_char(c);
            }
            state.next_field();
            for c in "acme".chars() {
                state.enter_char(c);
            }
            state.confirm();
        }
        assert_eq!(state.global_params.params().len(), 1);
        assert_eq!(state.global_params.params()[0].kind, GlobalParamKind::Header);
        let severities: Vec<Severity> = state.notifications.items().iter().map(|n| n.severity).collect();
        assert_eq!(severities, vec![Severity::Success, Severity::Warning]);

        // the rejected form stays open for correction
        state.toggle_param_kind();
        state.confirm();
        assert_eq!(state.global_params.params().len(), 2);
        assert_eq!(state.popup, Popup::GlobalParams(ParamManager::default()));
    }

    #[test]
    fn test_sidebar_open_operation() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, None);
        state.select();
        assert!(state.sidebar.is_expanded("用户管理"));
        state.move_down();
        state.move_down();
        state.select();
        assert_eq!(state.workspace.active_id(), Some("post:/api/users"));
        assert_eq!(state.router.location(), "#POST/api/users");
    }

    #[test]
    fn test_filter_is_debounced() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, None);
        state.start_filter();
        state.enter_char('p');
        state.enter_char('o');
        assert_eq!(state.sidebar.filter(), "");
        assert!(!state.tick(Instant::now()));
        assert!(state.tick(Instant::now() + std::time::Duration::from_millis(250)));
        assert_eq!(state.sidebar.filter(), "po");
    }

    #[test]
    fn test_disabled_search_hides_filter() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir, None);
        state.config.enable_search = false;
        state.start_filter();
        assert_eq!(state.input_mode, InputMode::Normal);
        state.open_palette();
        assert_eq!(state.popup, Popup::None);
        assert!(!state.to_render_state().enable_search);
    }
}
