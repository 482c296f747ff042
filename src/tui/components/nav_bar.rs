//! # NavBar Component
//!
//! Top line: the four tabs with their function keys, the unread badge on
//! Messages, and the status message on the right.
//!
//! Stateless. Receives everything as props:
//!
//! ```rust,ignore
//! let mut nav = NavBar::new(app.view.tab(), app.total_unread(), &app.status_message);
//! nav.render(frame, area);
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::Tab;
use crate::tui::component::Component;

pub struct NavBar<'a> {
    /// Highlighted tab. None on the auth screen, where the tabs are hidden.
    pub active: Option<Tab>,
    pub unread: u32,
    pub status_message: &'a str,
}

impl<'a> NavBar<'a> {
    pub fn new(active: Option<Tab>, unread: u32, status_message: &'a str) -> Self {
        Self {
            active,
            unread,
            status_message,
        }
    }

    fn tab_spans(&self) -> Vec<Span<'static>> {
        let Some(active) = self.active else {
            return vec![Span::styled(
                " Courier ",
                Style::default().add_modifier(Modifier::BOLD),
            )];
        };
        let mut spans = Vec::new();
        for (i, tab) in Tab::ALL.iter().enumerate() {
            let mut label = format!(" F{} {} ", i + 1, tab.label());
            if *tab == Tab::Messages && self.unread > 0 {
                label = format!(" F{} {} ({}) ", i + 1, tab.label(), self.unread);
            }
            let style = if *tab == active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(label, style));
        }
        spans
    }
}

impl<'a> Component for NavBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [tabs_area, status_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Percentage(35)]).areas(area);

        frame.render_widget(Paragraph::new(Line::from(self.tab_spans())), tabs_area);
        frame.render_widget(
            Paragraph::new(self.status_message)
                .style(Style::default().fg(Color::DarkGray))
                .right_aligned(),
            status_area,
        );
    }
}
