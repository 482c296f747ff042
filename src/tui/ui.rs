//! Frame layout: nav bar on top, the active view below, and the path
//! prompt overlay when open.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::{App, View};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    AuthFormView, ChatList, ChatView, NavBar, ProfileView, SearchView, SettingsView,
};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [nav_area, main_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());

    NavBar::new(app.view.tab(), app.total_unread(), &app.status_message).render(frame, nav_area);

    match (&app.view, &app.session) {
        (View::Chats, _) => ChatList::new(&mut tui.chat_list, &app.chats).render(frame, main_area),
        (View::Chat(peer), Some(user)) => ChatView {
            thread: &mut tui.thread,
            peer,
            messages: &app.messages,
            me: user.id,
            composer: &app.composer,
        }
        .render(frame, main_area),
        (View::Search, _) => {
            SearchView::new(&mut tui.search_list, &app.search).render(frame, main_area)
        }
        (View::Profile, Some(user)) => ProfileView::new(user, &app.profile).render(frame, main_area),
        (View::Settings, _) => {
            SettingsView::new(&mut tui.settings_list, app.notifications).render(frame, main_area)
        }
        _ => AuthFormView::new(&app.auth).render(frame, main_area),
    }

    if let Some(prompt) = tui.prompt.as_mut() {
        prompt.render(frame, main_area);
    }
}
