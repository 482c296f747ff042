//! User search: query line on top, results below. Results arrive 300 ms
//! after the last keystroke.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph};

use crate::api::Contact;
use crate::core::state::SearchState;
use crate::tui::component::Component;
use crate::tui::components::avatar_glyph;
use crate::tui::components::selection::ListSelection;

pub struct SearchView<'a> {
    pub state: &'a mut ListSelection,
    pub search: &'a SearchState,
}

impl<'a> SearchView<'a> {
    pub fn new(state: &'a mut ListSelection, search: &'a SearchState) -> Self {
        Self { state, search }
    }
}

fn contact_line(contact: &Contact) -> Line<'static> {
    let (dot, dot_style) = if contact.online {
        ("●", Style::default().fg(Color::Green))
    } else {
        ("○", Style::default().fg(Color::DarkGray))
    };
    let mut spans = vec![
        Span::styled(format!("{} ", dot), dot_style),
        Span::raw(format!("{} ", avatar_glyph(contact.avatar.as_deref()))),
        Span::styled(contact.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(status) = &contact.status {
        spans.push(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

impl<'a> Component for SearchView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.set_len(self.search.results.len());

        let [query_area, results_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

        let query = if self.search.query.is_empty() {
            Line::from(Span::styled(
                "Search by name…",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(format!("{}▏", self.search.query))
        };
        frame.render_widget(
            Paragraph::new(query).block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Find people "),
            ),
            query_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} found ", self.search.results.len()))
            .title_bottom(Line::from(" ↑↓ select  Enter start chat ").centered());

        if self.search.results.is_empty() {
            frame.render_widget(
                Paragraph::new("No users found")
                    .style(Style::default().fg(Color::DarkGray))
                    .centered()
                    .block(block),
                results_area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .search
            .results
            .iter()
            .map(|c| ListItem::new(contact_line(c)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, results_area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn contact(id: i64, name: &str, online: bool) -> Contact {
        Contact {
            id,
            name: name.to_string(),
            avatar: Some("🚀".to_string()),
            status: Some("Busy".to_string()),
            online,
        }
    }

    #[test]
    fn test_renders_query_and_results() {
        let search = SearchState {
            query: "ma".to_string(),
            results: vec![contact(2, "Max", true), contact(5, "Mara", false)],
        };
        let mut state = ListSelection::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| SearchView::new(&mut state, &search).render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("ma"));
        assert!(text.contains("2 found"));
        assert!(text.contains("Max"));
        assert!(text.contains("Mara"));
        assert!(text.contains("Busy"));
        assert_eq!(state.len, 2);
    }

    #[test]
    fn test_no_results_message() {
        let search = SearchState::default();
        let mut state = ListSelection::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|f| SearchView::new(&mut state, &search).render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Search by name"));
        assert!(text.contains("No users found"));
    }
}
