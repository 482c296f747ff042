use chrono::{DateTime, Local, NaiveDateTime};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::api::Message;
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A single chat bubble.
///
/// Created fresh each frame by the thread view. Own messages are drawn in
/// green with the time as title; the peer's in blue. Image messages show a
/// placeholder with the payload size instead of the base64 text.
#[derive(Clone, Copy)]
pub struct Bubble<'a> {
    pub message: &'a Message,
    pub mine: bool,
    pub is_selected: bool,
}

impl<'a> Bubble<'a> {
    pub fn new(message: &'a Message, mine: bool, is_selected: bool) -> Self {
        Self {
            message,
            mine,
            is_selected,
        }
    }

    /// Text shown inside the bubble.
    pub fn body(message: &Message) -> String {
        if message.is_image() {
            let kb = message.message_text.len().div_ceil(1024);
            format!("🖼 image ({} KB)", kb)
        } else {
            message.message_text.trim().to_string()
        }
    }

    /// Predicts the rendered height at `width` without rendering.
    ///
    /// The wrap options must match `Paragraph` with `Wrap { trim: true }`.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let body = Self::body(message);
        if body.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(&body, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }
}

impl<'a> Widget for Bubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = if self.mine {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Blue)
        };
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let mut title = format_clock(&self.message.created_at);
        if self.mine && self.message.is_read {
            title.push_str(" ✓✓");
        }

        let block = Block::bordered()
            .title(title)
            .title_alignment(if self.mine {
                Alignment::Right
            } else {
                Alignment::Left
            })
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let mut body_style = style;
        if self.message.is_image() {
            body_style = body_style.add_modifier(Modifier::ITALIC);
        }
        Paragraph::new(Self::body(self.message))
            .style(body_style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Bubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

/// `HH:MM` in local time for an ISO-8601 timestamp. Timestamps without an
/// offset are taken as local already. Unparseable input is returned as-is.
pub fn format_clock(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.with_timezone(&Local).format("%H:%M").to_string();
    }
    match NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive.format("%H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message;

    #[test]
    fn calculate_height_single_line_fits() {
        let msg = message(1, 1, 2, "Hello");
        assert_eq!(Bubble::calculate_height(&msg, 40), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        let msg = message(1, 1, 2, "Hello world");
        // content width 5 → "Hello" | "world"
        assert_eq!(Bubble::calculate_height(&msg, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let msg = message(1, 1, 2, "Hello");
        assert_eq!(Bubble::calculate_height(&msg, 0), 1);
    }

    #[test]
    fn image_body_is_a_placeholder() {
        let msg = message(1, 1, 2, "data:image/png;base64,AAAA");
        let body = Bubble::body(&msg);
        assert!(body.starts_with("🖼 image"));
        assert!(!body.contains("base64"));
        assert_eq!(Bubble::calculate_height(&msg, 40), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn format_clock_handles_naive_and_garbage() {
        assert_eq!(format_clock("2024-05-01T12:30:00.123456"), "12:30");
        assert_eq!(format_clock("2024-05-01T08:05:59"), "08:05");
        assert_eq!(format_clock("yesterday"), "yesterday");
    }
}
