//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `NavBar`: tabs, unread badge, status message
//! - `AuthFormView`, `ProfileView`: forms whose values live in core state
//! - `Bubble`: a single chat message
//!
//! ### Stateful Components (Event-Driven)
//!
//! Transient wrappers created each frame around persistent state in `TuiState`:
//! - `ChatList`, `SearchView`, `SettingsView` over a shared `ListSelection`
//! - `ChatView` over `ThreadState` (scroll + message selection)
//! - `PathPrompt`: overlay that emits the chosen file path
//!
//! ### Props-Based Data Flow
//!
//! ```rust,ignore
//! // Dependencies are explicit
//! NavBar::new(app.view.tab(), app.total_unread(), &app.status_message).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file + shared layout helpers)
//! ├── nav_bar.rs
//! ├── auth_form.rs
//! ├── selection.rs      (list cursor shared by three views)
//! ├── chat_list.rs
//! ├── chat_view.rs      (header + thread + composer)
//! ├── thread.rs         (scrollable bubbles)
//! ├── message.rs        (Bubble)
//! ├── search_view.rs
//! ├── profile_view.rs
//! ├── settings_view.rs
//! └── path_prompt.rs
//! ```

use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::UnicodeWidthChar;

use crate::api::is_image_data;

pub mod auth_form;
pub mod chat_list;
pub mod chat_view;
pub mod message;
pub mod nav_bar;
pub mod path_prompt;
pub mod profile_view;
pub mod search_view;
pub mod selection;
pub mod settings_view;
pub mod thread;

pub use auth_form::AuthFormView;
pub use chat_list::ChatList;
pub use chat_view::ChatView;
pub use nav_bar::NavBar;
pub use path_prompt::{PathPrompt, PromptEvent};
pub use profile_view::ProfileView;
pub use search_view::SearchView;
pub use selection::{ListEvent, ListSelection};
pub use settings_view::SettingsView;
pub use thread::ThreadState;

/// Shown when a user has no avatar.
const DEFAULT_AVATAR: &str = "👤";
/// Stand-in for image avatars, which a terminal cannot draw.
const IMAGE_AVATAR: &str = "🖼";

/// The avatar as one glyph: emoji avatars as-is, image avatars as a marker.
pub fn avatar_glyph(avatar: Option<&str>) -> &str {
    match avatar {
        Some(a) if is_image_data(a) => IMAGE_AVATAR,
        Some(a) if !a.trim().is_empty() => a,
        _ => DEFAULT_AVATAR,
    }
}

/// Truncate to `max_width` display columns, adding "..." if needed.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_glyph() {
        assert_eq!(avatar_glyph(Some("🎨")), "🎨");
        assert_eq!(avatar_glyph(Some("data:image/png;base64,AA")), IMAGE_AVATAR);
        assert_eq!(avatar_glyph(Some("  ")), DEFAULT_AVATAR);
        assert_eq!(avatar_glyph(None), DEFAULT_AVATAR);
    }

    #[test]
    fn test_truncate_str_respects_display_width() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("Привет мир", 7), "Прив...");
        assert_eq!(truncate_str("abcdef", 2), "..");
    }
}
