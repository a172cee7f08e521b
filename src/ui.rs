use ratatui::{prelude::*, widgets::*};

use crate::models::{HttpMethod, Theme};
use crate::notify::Severity;

/// Colors derived from the theme and the configured accent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub fg: Color,
    pub muted: Color,
    pub bg: Color,
    pub popup_bg: Color,
    pub key: Color,
    pub string: Color,
    pub number: Color,
    pub literal: Color,
}

impl Palette {
    pub fn new(theme: Theme, accent: (u8, u8, u8)) -> Self {
        let accent = Color::Rgb(accent.0, accent.1, accent.2);
        if theme.is_dark() {
            Palette {
                accent,
                fg: Color::White,
                muted: Color::DarkGray,
                bg: Color::Reset,
                popup_bg: Color::Black,
                key: Color::Cyan,
                string: Color::Green,
                number: Color::Yellow,
                literal: Color::Magenta,
            }
        } else {
            Palette {
                accent,
                fg: Color::Black,
                muted: Color::Gray,
                bg: Color::White,
                popup_bg: Color::White,
                key: Color::Blue,
                string: Color::Rgb(0, 128, 0),
                number: Color::Rgb(175, 95, 0),
                literal: Color::Rgb(135, 0, 135),
            }
        }
    }

    pub fn border(&self, focused: bool, editing: bool) -> Style {
        if focused && editing {
            Style::default().fg(Color::Yellow)
        } else if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }
}

/// Renders the tab strip
pub fn render_tabs<'a>(titles: Vec<Line<'a>>, selected: usize, palette: &Palette) -> Tabs<'a> {
    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(palette.muted))
        .highlight_style(Style::default().fg(palette.accent).bold())
        .divider("|")
}

/// JSON syntax highlighting, one `Line` per input line
pub fn highlight_json(text: &str, palette: &Palette) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| Line::from(highlight_line(line, palette)))
        .collect()
}

fn highlight_line(line: &str, palette: &Palette) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = line;

    let flush = |plain: &mut String, spans: &mut Vec<Span<'static>>| {
        if !plain.is_empty() {
            spans.push(Span::raw(std::mem::take(plain)));
        }
    };

    while let Some(c) = rest.chars().next() {
        if c == '"' {
            flush(&mut plain, &mut spans);
            let end = string_end(rest);
            let (token, tail) = rest.split_at(end);
            let color = if tail.trim_start().starts_with(':') {
                palette.key
            } else {
                palette.string
            };
            spans.push(Span::styled(token.to_string(), Style::default().fg(color)));
            rest = tail;
        } else if c == '-' || c.is_ascii_digit() {
            flush(&mut plain, &mut spans);
            let end = rest
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '+' | '.')))
                .unwrap_or(rest.len());
            let (token, tail) = rest.split_at(end);
            spans.push(Span::styled(token.to_string(), Style::default().fg(palette.number)));
            rest = tail;
        } else if let Some(word) = ["true", "false", "null"].into_iter().find(|w| rest.starts_with(w)) {
            flush(&mut plain, &mut spans);
            spans.push(Span::styled(word.to_string(), Style::default().fg(palette.literal)));
            rest = &rest[word.len()..];
        } else {
            plain.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    flush(&mut plain, &mut spans);
    spans
}

/// Byte offset just past the string literal starting at `text[0]`
fn string_end(text: &str) -> usize {
    let mut escaped = false;
    for (i, c) in text.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return i + 1,
            _ => {}
        }
    }
    text.len()
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
        _ => Color::Gray,
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
