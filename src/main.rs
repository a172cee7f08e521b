//! Swagger Console - Actor-based OpenAPI browser and request console
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - document fetches and request execution

mod app;
mod config;
mod constants;
mod curl;
mod error;
mod global_params;
mod groups;
mod messages;
mod models;
mod network;
mod notify;
mod request;
mod search;
mod spec;
mod storage;
mod ui;
mod workspace;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use app::state::{FormField, ParamManager, Popup};
use app::{AppActor, AppState};
use config::{Config, LaunchArgs};
use constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use groups::LoadStatus;
use messages::render::{ActivePanel, SidebarItem};
use messages::ui_events::{key_to_ui_event, Focus, InputMode};
use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use network::NetworkActor;
use spec::PropertyRow;
use storage::Storage;
use ui::{highlight_json, method_color, severity_color, status_color, Palette};
use workspace::{DebugField, PanelView, ResponsePane, ResponseState, TabPanel};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = LaunchArgs::parse(std::env::args().skip(1));
    let storage = Storage::new();

    // Initialize logging to file
    let log_dir = match std::fs::create_dir_all(storage.dir()) {
        Ok(()) => storage.dir().to_path_buf(),
        Err(_) => PathBuf::from("."),
    };
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    for arg in &args.ignored {
        tracing::warn!(arg = %arg, "Ignoring unrecognized argument");
    }

    let mut config = Config::discover(args.config_path.as_deref())?;
    args.apply(&mut config);
    tracing::info!(
        version = APP_VERSION,
        groups = config.urls.len(),
        origin = %config.origin,
        "Starting"
    );

    let timeout_secs = config.timeout_secs;
    let state = AppState::new(config, storage, args.fragment.clone());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx, timeout_secs);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Put text on the system clipboard through the terminal (OSC 52)
fn write_clipboard(text: &str) -> io::Result<()> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]52;c;{}\x07", encoded)?;
    stdout.flush()
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();
    let mut copied_seq = 0;

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, &current_state.key_context()) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }

        if let Some(clip) = &current_state.clipboard {
            if clip.seq != copied_seq {
                copied_seq = clip.seq;
                if let Err(e) = write_clipboard(&clip.text) {
                    tracing::warn!(error = %e, "Clipboard write failed");
                }
            }
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();
    let palette = Palette::new(state.theme, state.accent);
    f.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        area,
    );

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, state, &palette, main_chunks[0]);

    let content = if state.sidebar_collapsed {
        main_chunks[1]
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(main_chunks[1]);
        draw_sidebar(f, state, &palette, columns[0]);
        columns[1]
    };
    draw_workspace(f, state, &palette, content);

    draw_status_bar(f, state, &palette, main_chunks[2]);

    match &state.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, &palette, area),
        Popup::Goto { input } => draw_goto_popup(f, state, &palette, input, area),
        Popup::Palette(palette_state) => {
            draw_palette_popup(f, state, &palette, &palette_state.query, palette_state.selected, area)
        }
        Popup::Groups { cursor } => draw_groups_popup(f, state, &palette, *cursor, area),
        Popup::GlobalParams(manager) => draw_global_params_popup(f, state, &palette, manager, area),
    }

    draw_toasts(f, state, main_chunks[1]);
}

/// Display width of `text` up to byte offset `pos`
fn cursor_column(text: &str, pos: usize) -> u16 {
    text.get(..pos.min(text.len()))
        .map(|s| s.chars().count())
        .unwrap_or(0) as u16
}

fn draw_header(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect) {
    let group = state
        .current_group
        .and_then(|i| state.group_names.get(i))
        .map(String::as_str)
        .unwrap_or("-");
    let status = match &state.load_status {
        LoadStatus::Idle => Span::raw(""),
        LoadStatus::Loading => Span::styled(" loading…", Style::default().fg(Color::Yellow)),
        LoadStatus::Loaded => Span::raw(""),
        LoadStatus::Failed(_) => Span::styled(" load failed", Style::default().fg(Color::Red)),
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", state.document_title),
            Style::default().fg(palette.accent).bold(),
        ),
        Span::styled(" │ ", Style::default().fg(palette.muted)),
        Span::raw(format!("group: {}", group)),
        status,
        Span::styled(
            format!("  │ theme: {}", state.theme.as_str()),
            Style::default().fg(palette.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_sidebar(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(if state.enable_search { 3 } else { 0 }), Constraint::Min(0)])
        .split(area);

    let focused = state.focus == Focus::Sidebar && state.popup == Popup::None;
    let editing = focused && state.input_mode == InputMode::Editing;

    if state.enable_search {
        draw_filter(f, state, palette, chunks[0], focused, editing);
    }

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused, false))
        .title(" Operations ");

    let placeholder = match &state.load_status {
        LoadStatus::Loading => Some(String::from("Loading document…")),
        LoadStatus::Failed(message) => Some(format!("Failed to load document:\n{}", message)),
        _ if state.group_names.is_empty() => Some(String::from("No API document configured")),
        _ if state.sidebar_items.is_empty() && !state.filter_input.is_empty() => {
            Some(String::from("No matching operations"))
        }
        _ => None,
    };
    if let Some(text) = placeholder {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(palette.muted))
            .block(list_block)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = state
        .sidebar_items
        .iter()
        .map(|item| match item {
            SidebarItem::Tag { name, count, expanded } => {
                let arrow = if *expanded { "▾" } else { "▸" };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} {}", arrow, name), Style::default().bold()),
                    Span::styled(format!(" ({})", count), Style::default().fg(palette.muted)),
                ]))
            }
            SidebarItem::Operation { method, label, deprecated, active } => {
                let mut label_style = Style::default();
                if *deprecated {
                    label_style = label_style.fg(palette.muted).add_modifier(Modifier::CROSSED_OUT);
                }
                if *active {
                    label_style = label_style.fg(palette.accent).bold();
                }
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("  {:7}", method.as_str()),
                        Style::default().fg(method_color(*method)).bold(),
                    ),
                    Span::styled(label.clone(), label_style),
                ]))
            }
        })
        .collect();

    let highlight_style = if focused {
        Style::default().bg(palette.accent).fg(Color::Black)
    } else {
        Style::default()
    };
    let list = List::new(items).block(list_block).highlight_style(highlight_style);
    let mut list_state = ListState::default();
    list_state.select(Some(state.sidebar_cursor));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_filter(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect, focused: bool, editing: bool) {
    let filter_block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused, editing))
        .title(" Filter (/) ");
    let filter = if state.filter_input.is_empty() && !editing {
        Paragraph::new(Span::styled("path, method or name", Style::default().fg(palette.muted)))
    } else {
        Paragraph::new(state.filter_input.as_str())
    };
    f.render_widget(filter.block(filter_block), area);
    if editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + 1 + cursor_column(&state.filter_input, state.cursor_position)).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_workspace(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let mut titles = vec![Line::from(" Home ")];
    titles.extend(state.tabs.iter().map(|tab| {
        Line::from(vec![
            Span::styled(format!(" {} ", tab.method.as_str()), Style::default().fg(method_color(tab.method))),
            Span::raw(format!("{} ", tab.title)),
        ])
    }));
    let selected = state.active_tab.map(|i| i + 1).unwrap_or(0);
    f.render_widget(ui::render_tabs(titles, selected, palette), chunks[0]);

    match &state.active {
        Some(active) => match active.panel.view {
            PanelView::Document => draw_document_view(f, state, palette, active, chunks[1]),
            PanelView::Debug => draw_debug_view(f, state, palette, active, chunks[1]),
        },
        None => draw_overview(f, state, palette, chunks[1]),
    }
}

fn draw_overview(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(" Overview ");

    let mut lines = Vec::new();
    match &state.overview {
        Some(overview) => {
            lines.push(Line::from(Span::styled(
                overview.title.clone().unwrap_or_else(|| state.document_title.clone()),
                Style::default().fg(palette.accent).bold(),
            )));
            if let Some(version) = &overview.version {
                lines.push(Line::from(Span::styled(
                    format!("version {}", version),
                    Style::default().fg(palette.muted),
                )));
            }
            lines.push(Line::from(""));
            let counts = overview.counts;
            let stat = |label: &str, value: usize, color: Color| {
                Line::from(vec![
                    Span::raw(format!("  {:<12}", label)),
                    Span::styled(value.to_string(), Style::default().fg(color).bold()),
                ])
            };
            lines.push(stat("Operations", counts.total, palette.accent));
            lines.push(stat("Tags", overview.tag_count, palette.accent));
            lines.push(stat("GET", counts.get, method_color(models::HttpMethod::GET)));
            lines.push(stat("POST", counts.post, method_color(models::HttpMethod::POST)));
            lines.push(stat("PUT", counts.put, method_color(models::HttpMethod::PUT)));
            lines.push(stat("DELETE", counts.delete, method_color(models::HttpMethod::DELETE)));
            lines.push(stat("Other", counts.other, palette.muted));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Pick an operation in the sidebar, or press Ctrl+K to search.",
                Style::default().fg(palette.muted),
            )));
        }
        None => {
            let text = match &state.load_status {
                LoadStatus::Loading => String::from("Loading API document…"),
                LoadStatus::Failed(message) => format!("Failed to load API document: {}", message),
                _ => String::from("No API document configured"),
            };
            lines.push(Line::from(Span::styled(text, Style::default().fg(palette.muted))));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn property_lines(rows: &[PropertyRow], marker: &str, palette: &Palette) -> Vec<Line<'static>> {
    rows.iter()
        .map(|row| {
            let mut spans = vec![
                Span::raw(format!("    {}{}", "  ".repeat(row.depth), row.name)),
                Span::styled(
                    if row.marked { marker.to_string() } else { String::new() },
                    Style::default().fg(Color::Red),
                ),
                Span::styled(format!("  {}", row.type_label), Style::default().fg(palette.key)),
            ];
            if !row.description.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", row.description),
                    Style::default().fg(palette.muted),
                ));
            }
            if !row.enum_values.is_empty() {
                spans.push(Span::styled(
                    format!("  [{}]", row.enum_values.join(", ")),
                    Style::default().fg(palette.literal),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

fn section(title: &str, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(title.to_string(), Style::default().fg(palette.accent).bold()))
}

fn draw_document_view(f: &mut Frame, state: &RenderState, palette: &Palette, active: &ActivePanel, area: Rect) {
    let op = &active.operation;
    let doc = &active.panel.doc;
    let focused = state.focus == Focus::Panel;

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} ", op.method.as_str()), Style::default().fg(method_color(op.method)).bold()),
        Span::styled(op.path.clone(), Style::default().bold()),
    ])];
    if op.deprecated {
        lines.push(Line::from(Span::styled(
            "Deprecated",
            Style::default().fg(Color::Red).add_modifier(Modifier::CROSSED_OUT),
        )));
    }
    if !op.summary.is_empty() {
        lines.push(Line::from(op.summary.clone()));
    }
    for text in op.description.lines() {
        lines.push(Line::from(Span::styled(text.to_string(), Style::default().fg(palette.muted))));
    }

    lines.push(Line::from(""));
    lines.push(section("Parameters", palette));
    if doc.parameters.is_empty() {
        lines.push(Line::from(Span::styled("    none", Style::default().fg(palette.muted))));
    }
    for param in &doc.parameters {
        let mut spans = vec![
            Span::raw(format!("    {}", param.name)),
            Span::styled(if param.required { "*" } else { "" }, Style::default().fg(Color::Red)),
            Span::styled(format!("  {}", param.location.as_str()), Style::default().fg(palette.muted)),
            Span::styled(format!("  {}", param.param_type), Style::default().fg(palette.key)),
        ];
        if let Some(format) = &param.format {
            spans.push(Span::styled(format!("({})", format), Style::default().fg(palette.key)));
        }
        if !param.description.is_empty() {
            spans.push(Span::styled(format!("  {}", param.description), Style::default().fg(palette.muted)));
        }
        if let Some(default) = &param.default {
            spans.push(Span::styled(format!("  default: {}", default), Style::default().fg(palette.number)));
        }
        if let Some(values) = &param.enum_values {
            spans.push(Span::styled(format!("  [{}]", values.join(", ")), Style::default().fg(palette.literal)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(body) = &doc.request_body {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Request body", Style::default().fg(palette.accent).bold()),
            Span::styled(
                format!("  {}{}", body.content_type, if body.required { "  required" } else { "" }),
                Style::default().fg(palette.muted),
            ),
        ]));
        lines.extend(property_lines(&body.rows, "*", palette));
        if !body.example.is_empty() {
            lines.push(Line::from(Span::styled("    Example", Style::default().fg(palette.muted))));
            lines.extend(highlight_json(&body.example, palette).into_iter().map(|line| {
                let mut spans = vec![Span::raw("    ")];
                spans.extend(line.spans);
                Line::from(spans)
            }));
        }
    }

    lines.push(Line::from(""));
    lines.push(section("Responses", palette));
    for response in &doc.responses {
        let code = response.status.parse::<u16>().map(status_color).unwrap_or(palette.fg);
        lines.push(Line::from(vec![
            Span::styled(format!("    {}", response.status), Style::default().fg(code).bold()),
            Span::raw(format!("  {}", response.description)),
            Span::styled(
                if response.is_array { "  array" } else { "" },
                Style::default().fg(palette.key),
            ),
        ]));
        lines.extend(property_lines(&response.rows, "?", palette));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused, false))
        .title(" Document (v: debug) ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((active.panel.scroll, 0));
    f.render_widget(paragraph, area);
}

fn field_label(panel: &TabPanel, field: DebugField) -> String {
    match field {
        DebugField::Global(i) => panel
            .globals
            .get(i)
            .map(|g| format!("{} ({})", g.name, g.kind.as_str()))
            .unwrap_or_default(),
        DebugField::Param(i) => panel
            .doc
            .parameters
            .get(i)
            .map(|p| format!("{}{} ({})", p.name, if p.required { "*" } else { "" }, p.location.as_str()))
            .unwrap_or_default(),
        DebugField::Body => panel
            .doc
            .request_body
            .as_ref()
            .map(|b| format!("Body ({})", b.content_type))
            .unwrap_or_default(),
    }
}

/// Form lines, the selected field's first line and the edit cursor (line, column)
fn debug_form(
    state: &RenderState,
    palette: &Palette,
    panel: &TabPanel,
) -> (Vec<Line<'static>>, usize, Option<(usize, u16)>) {
    let focused = state.focus == Focus::Panel;
    let editing = focused && state.input_mode == InputMode::Editing;
    let selected = panel.selected_field();

    let mut lines = Vec::new();
    let mut selected_line = 0;
    let mut cursor = None;

    if !panel.globals.is_empty() {
        let toggle = if state.globals_enabled { "on" } else { "off" };
        lines.push(section(&format!("Global parameters ({}, t: toggle)", toggle), palette));
    }

    for field in panel.fields() {
        if field == DebugField::Param(0) {
            lines.push(section("Parameters", palette));
        }
        let is_selected = focused && selected == Some(field);
        if is_selected {
            selected_line = lines.len();
        }
        let marker = if is_selected { "▶ " } else { "  " };
        let label_style = if is_selected {
            Style::default().fg(palette.accent).bold()
        } else {
            Style::default()
        };
        let label = field_label(panel, field);
        let value = panel.field_value(field).unwrap_or("");

        if field == DebugField::Body {
            lines.push(Line::from(Span::styled(format!("{}{}", marker, label), label_style)));
            let start = lines.len();
            if value.is_empty() {
                lines.push(Line::from(Span::styled("    {}", Style::default().fg(palette.muted))));
            } else {
                lines.extend(value.split('\n').map(|l| Line::from(format!("    {}", l))));
            }
            if is_selected && editing {
                let before = value.get(..state.cursor_position.min(value.len())).unwrap_or("");
                let row = before.matches('\n').count();
                let col = before.rsplit('\n').next().map(|s| s.chars().count()).unwrap_or(0);
                cursor = Some((start + row, 4 + col as u16));
            }
            continue;
        }

        let prefix = format!("{}{}: ", marker, label);
        let value_span = if value.is_empty() {
            let hint = match field {
                DebugField::Param(i) => panel.doc.parameters.get(i).map(|p| p.placeholder()).unwrap_or(""),
                _ => "",
            };
            Span::styled(hint.to_string(), Style::default().fg(palette.muted))
        } else {
            Span::raw(value.to_string())
        };
        if is_selected && editing {
            let col = prefix.chars().count() as u16 + cursor_column(value, state.cursor_position);
            cursor = Some((lines.len(), col));
        }
        lines.push(Line::from(vec![Span::styled(prefix, label_style), value_span]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "This operation takes no input.",
            Style::default().fg(palette.muted),
        )));
    }
    (lines, selected_line, cursor)
}

fn draw_debug_view(f: &mut Frame, state: &RenderState, palette: &Palette, active: &ActivePanel, area: Rect) {
    let panel = &active.panel;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let focused = state.focus == Focus::Panel;
    let editing = focused && state.input_mode == InputMode::Editing;
    let (lines, selected_line, cursor) = debug_form(state, palette, panel);

    let visible = chunks[0].height.saturating_sub(2) as usize;
    let offset = selected_line.saturating_sub(visible.saturating_sub(3));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused, editing))
        .title(format!(
            " {} {} (e:edit s:send r:reset f:format c:cURL v:docs) ",
            active.operation.method.as_str(),
            active.operation.path
        ));
    let form = Paragraph::new(lines).block(block).scroll((offset as u16, 0));
    f.render_widget(form, chunks[0]);

    if let Some((row, col)) = cursor {
        let area = chunks[0];
        if row >= offset && row - offset < visible {
            let max_x = area.x + area.width.saturating_sub(2);
            let cursor_x = (area.x + 1 + col).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, area.y + 1 + (row - offset) as u16));
        }
    }

    draw_response(f, state, palette, panel, chunks[1]);
}

fn draw_response(f: &mut Frame, state: &RenderState, palette: &Palette, panel: &TabPanel, area: Rect) {
    let pane_hint = format!(" [{}] p:pane y:copy ", panel.pane.title());
    let (title, lines) = match &panel.response {
        ResponseState::Hidden => (
            Line::from(" Response "),
            vec![Line::from(Span::styled(
                "Press s to send the request",
                Style::default().fg(palette.muted),
            ))],
        ),
        ResponseState::Pending { .. } => (
            Line::from(" Response "),
            vec![Line::from(Span::styled("Sending request…", Style::default().fg(Color::Yellow)))],
        ),
        ResponseState::Ready(result) => {
            let color = result.status_code().map(status_color).unwrap_or(Color::Red);
            let title = Line::from(vec![
                Span::styled(format!(" {} ", result.status_label()), Style::default().fg(color).bold()),
                Span::styled(format!(" {}ms ", result.elapsed_ms), Style::default().fg(palette.muted)),
            ]);
            let lines = match panel.pane {
                ResponsePane::Body => highlight_json(&result.body, palette),
                ResponsePane::Headers => result
                    .headers
                    .iter()
                    .map(|(name, value)| {
                        Line::from(vec![
                            Span::styled(format!("{}: ", name), Style::default().fg(palette.key)),
                            Span::raw(value.clone()),
                        ])
                    })
                    .collect(),
                ResponsePane::Curl => result.curl.lines().map(|l| Line::from(l.to_string())).collect(),
            };
            (title, lines)
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(title)
        .title_bottom(Line::from(if state.enable_code_copy { pane_hint } else { String::new() }).right_aligned());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((panel.scroll, 0));
    f.render_widget(paragraph, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, palette: &Palette, area: Rect) {
    let hints = if state.input_mode == InputMode::Editing {
        " Esc:stop editing | ←/→:move | Tab:next field "
    } else {
        " Tab:focus | /:filter | Ctrl+K:search | ::goto | g:groups | G:globals | ?:help | q:quit "
    };
    let location = if state.location.is_empty() {
        String::from("#")
    } else {
        state.location.clone()
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", location), Style::default().fg(palette.accent)),
        Span::styled(hints, Style::default().fg(palette.muted)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn popup_block<'a>(title: String, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .title(title)
        .style(Style::default().bg(palette.popup_bg).fg(palette.fg))
}

fn draw_help_popup(f: &mut Frame, palette: &Palette, area: Rect) {
    let popup_area = ui::centered_rect(64, 80, area);

    let help_text = format!(
        r#"
 {} {} - Keyboard Shortcuts

 NAVIGATION
   Tab                Switch sidebar / panel focus
   ↑ / ↓              Move in sidebar, fields or document
   Enter              Expand tag, open operation, edit field
   PgUp / PgDn        Scroll
   [ / ]              Previous / next tab
   x                  Close tab
   h                  Overview
   v                  Switch Document / Debug view
   :                  Go to location (#METHOD/path)
   / , Ctrl+K         Filter sidebar, command palette

 DEBUG VIEW
   e                  Edit selected field
   s                  Send request
   r                  Reset inputs
   f                  Format JSON body
   c / y              Copy cURL / response
   p                  Cycle Body / Headers / cURL
   t                  Toggle global parameters

 GENERAL
   g                  Switch document group
   G                  Manage global parameters
   R / F5             Reload document
   b                  Toggle sidebar
   T                  Toggle theme
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#,
        APP_NAME, APP_VERSION
    );

    let help = Paragraph::new(help_text)
        .block(popup_block(String::from(" Help "), palette))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_input_line(f: &mut Frame, state: &RenderState, input: &str, area: Rect) {
    f.render_widget(Paragraph::new(input.to_string()), area);
    let max_x = area.x + area.width.saturating_sub(1);
    let cursor_x = (area.x + cursor_column(input, state.cursor_position)).min(max_x);
    f.set_cursor_position(Position::new(cursor_x, area.y));
}

fn draw_goto_popup(f: &mut Frame, state: &RenderState, palette: &Palette, input: &str, area: Rect) {
    let popup_area = ui::centered_rect(60, 20, area);
    let block = popup_block(String::from(" Go to (#METHOD/path, Enter to go, Esc to cancel) "), palette);
    let inner = block.inner(popup_area);
    f.render_widget(Clear, popup_area);
    f.render_widget(block, popup_area);
    draw_input_line(f, state, input, Rect { height: 1, ..inner });
}

fn draw_palette_popup(
    f: &mut Frame,
    state: &RenderState,
    palette: &Palette,
    query: &str,
    selected: usize,
    area: Rect,
) {
    let popup_area = ui::centered_rect(70, 60, area);
    let block = popup_block(String::from(" Search operations "), palette);
    let inner = block.inner(popup_area);
    f.render_widget(Clear, popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);
    draw_input_line(f, state, query, Rect { height: 1, ..chunks[0] });

    if state.palette_items.is_empty() {
        let hint = if query.trim().is_empty() {
            "Type to search paths, methods and summaries"
        } else {
            "No results"
        };
        f.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(palette.muted))),
            chunks[1],
        );
        return;
    }

    let items: Vec<ListItem> = state
        .palette_items
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:7}", entry.method.as_str()), Style::default().fg(method_color(entry.method)).bold()),
                Span::raw(entry.path.clone()),
                Span::styled(format!("  {}", entry.summary), Style::default().fg(palette.muted)),
            ]))
        })
        .collect();
    let list = List::new(items).highlight_style(Style::default().bg(palette.accent).fg(Color::Black));
    let mut list_state = ListState::default();
    list_state.select(Some(selected));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_groups_popup(f: &mut Frame, state: &RenderState, palette: &Palette, cursor: usize, area: Rect) {
    let popup_area = ui::centered_rect(50, 40, area);
    let items: Vec<ListItem> = state
        .group_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let current = if Some(i) == state.current_group { " ●" } else { "" };
            ListItem::new(format!("{}{}", name, current))
        })
        .collect();
    let list = List::new(items)
        .block(popup_block(String::from(" Document groups (Enter to switch) "), palette))
        .highlight_style(Style::default().bg(palette.accent).fg(Color::Black));
    let mut list_state = ListState::default();
    list_state.select(Some(cursor));
    f.render_widget(Clear, popup_area);
    f.render_stateful_widget(list, popup_area, &mut list_state);
}

fn draw_global_params_popup(
    f: &mut Frame,
    state: &RenderState,
    palette: &Palette,
    manager: &ParamManager,
    area: Rect,
) {
    let popup_area = ui::centered_rect(70, 60, area);
    let toggle = if state.globals_enabled { "on" } else { "off" };

    let Some(form) = &manager.form else {
        let items: Vec<ListItem> = state
            .globals
            .iter()
            .map(|p| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:7}", p.kind.as_str()), Style::default().fg(palette.key)),
                    Span::styled(p.name.clone(), Style::default().bold()),
                    Span::raw(format!(" = {}", p.value)),
                ]))
            })
            .collect();
        let title = format!(" Global parameters [{}] (a:add e:edit d:delete t:toggle) ", toggle);
        if items.is_empty() {
            let paragraph = Paragraph::new(Span::styled(
                "No global parameters. Press a to add one.",
                Style::default().fg(palette.muted),
            ))
            .block(popup_block(title, palette));
            f.render_widget(Clear, popup_area);
            f.render_widget(paragraph, popup_area);
            return;
        }
        let list = List::new(items)
            .block(popup_block(title, palette))
            .highlight_style(Style::default().bg(palette.accent).fg(Color::Black));
        let mut list_state = ListState::default();
        list_state.select(Some(manager.cursor));
        f.render_widget(Clear, popup_area);
        f.render_stateful_widget(list, popup_area, &mut list_state);
        return;
    };

    let title = if form.editing.is_some() { " Edit parameter " } else { " Add parameter " };
    let block = popup_block(format!("{}(Tab:field Ctrl+T:kind Enter:save Esc:back) ", title), palette);
    let inner = block.inner(popup_area);
    f.render_widget(Clear, popup_area);
    f.render_widget(block, popup_area);

    let label = |text: &str, active: bool| {
        let style = if active {
            Style::default().fg(palette.accent).bold()
        } else {
            Style::default()
        };
        Span::styled(format!("{:<8}", text), style)
    };
    let lines = vec![
        Line::from(vec![label("Kind", false), Span::raw(form.kind.as_str())]),
        Line::from(vec![label("Name", form.field == FormField::Name), Span::raw(form.name.clone())]),
        Line::from(vec![label("Value", form.field == FormField::Value), Span::raw(form.value.clone())]),
    ];
    f.render_widget(Paragraph::new(lines), inner);

    let (row, text) = match form.field {
        FormField::Name => (1, form.name.as_str()),
        FormField::Value => (2, form.value.as_str()),
    };
    let max_x = inner.x + inner.width.saturating_sub(1);
    let cursor_x = (inner.x + 8 + cursor_column(text, state.cursor_position)).min(max_x);
    f.set_cursor_position(Position::new(cursor_x, inner.y + row));
}

fn draw_toasts(f: &mut Frame, state: &RenderState, area: Rect) {
    let width = area.width.min(48);
    let shown = state.notifications.iter().rev().take(4);
    for (i, notification) in shown.enumerate() {
        let y = area.y + 3 * i as u16;
        if y + 3 > area.y + area.height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width - width,
            y,
            width,
            height: 3,
        };
        let color = severity_color(notification.severity);
        let toast = Paragraph::new(notification.message.clone())
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
        f.render_widget(Clear, rect);
        f.render_widget(toast, rect);
    }
}
