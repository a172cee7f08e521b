//! App actor - message loop processing UI events and network responses

use std::time::Instant;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::app::state::AppState;
use crate::constants::TICK_INTERVAL;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    fn send(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    fn render(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let startup = self.state.startup();
        self.send(startup);
        self.render();

        let mut tick = tokio::time::interval(TICK_INTERVAL);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    let Some(event) = event else { break };
                    if self.handle_ui_event(event) {
                        break;
                    }
                    self.render();
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    self.render();
                }
                _ = tick.tick() => {
                    if self.state.tick(Instant::now()) {
                        self.render();
                    }
                }
            }
        }

        tracing::info!("App actor stopping");
        let _ = self.network_tx.send(NetworkCommand::Shutdown);
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::Up => self.state.move_up(),
            UiEvent::Down => self.state.move_down(),
            UiEvent::Select => self.state.select(),
            UiEvent::ToggleFocus => self.state.toggle_focus(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Tabs
            UiEvent::NextTab => self.state.next_tab(),
            UiEvent::PrevTab => self.state.prev_tab(),
            UiEvent::CloseTab => self.state.close_tab(),
            UiEvent::ShowOverview => self.state.show_overview(),
            UiEvent::SwitchView => self.state.switch_view(),

            // Sidebar
            UiEvent::StartFilter => self.state.start_filter(),
            UiEvent::ToggleSidebar => self.state.toggle_sidebar(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::Newline => self.state.enter_char('\n'),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),

            // Debug actions
            UiEvent::Execute => {
                let cmd = self.state.execute();
                self.send(cmd);
            }
            UiEvent::ResetInputs => self.state.reset_inputs(),
            UiEvent::FormatBody => self.state.format_body(),
            UiEvent::CopyCurl => self.state.copy_curl(),
            UiEvent::CopyResponse => self.state.copy_response(),
            UiEvent::CycleResponsePane => self.state.cycle_response_pane(),

            // Document groups
            UiEvent::OpenGroupPicker => self.state.open_group_picker(),
            UiEvent::Refresh => {
                let cmd = self.state.refresh();
                self.send(cmd);
            }

            // Popups
            UiEvent::OpenPalette => self.state.open_palette(),
            UiEvent::OpenGoto => self.state.open_goto(),
            UiEvent::OpenGlobalParams => self.state.open_global_params(),
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::ClosePopup => self.state.close_popup(),
            UiEvent::Confirm => {
                let cmd = self.state.confirm();
                self.send(cmd);
            }

            // Global parameter manager
            UiEvent::ParamAdd => self.state.param_add(),
            UiEvent::ParamEdit => self.state.param_edit(),
            UiEvent::ParamDelete => self.state.param_delete(),
            UiEvent::ToggleGlobalParams => self.state.toggle_global_params(),
            UiEvent::ToggleParamKind => self.state.toggle_param_kind(),

            // Display
            UiEvent::ToggleTheme => self.state.toggle_theme(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
