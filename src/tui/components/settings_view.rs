//! Notification toggles. Held in memory for the session only.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, Padding};

use crate::core::state::{NotificationKind, NotificationSettings};
use crate::tui::component::Component;
use crate::tui::components::selection::ListSelection;

pub struct SettingsView<'a> {
    pub state: &'a mut ListSelection,
    pub settings: NotificationSettings,
}

impl<'a> SettingsView<'a> {
    pub fn new(state: &'a mut ListSelection, settings: NotificationSettings) -> Self {
        Self { state, settings }
    }
}

impl<'a> Component for SettingsView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.set_len(NotificationKind::ALL.len());

        let items: Vec<ListItem> = NotificationKind::ALL
            .iter()
            .map(|kind| {
                let on = self.settings.get(*kind);
                let mark = if on { "[x]" } else { "[ ]" };
                let style = if on {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::styled(format!("{} {}", mark, kind.label()), style))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Notifications ")
            .title_bottom(Line::from(" ↑↓ select  Enter/Space toggle ").centered())
            .padding(Padding::uniform(1));

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_defaults_render_checked_and_unchecked() {
        let mut state = ListSelection::default();
        let mut terminal = Terminal::new(TestBackend::new(50, 10)).unwrap();
        terminal
            .draw(|f| {
                SettingsView::new(&mut state, NotificationSettings::default()).render(f, f.area())
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("[x] Message notifications"));
        assert!(text.contains("[x] Mentions"));
        assert!(text.contains("[ ] Sounds"));
        assert_eq!(state.len, 3);
    }
}
