//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Each turn of the loop:
//!
//! 1. draws the frame if anything changed,
//! 2. waits up to 100ms for terminal input, then drains all pending input,
//! 3. drains actions sent back by background tasks (poll results, sends),
//! 4. after every `update()`, hands the effects to the `Synchronizer` and
//!    calls `reconcile()` so the pollers follow the active view.

mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info};
use tokio::sync::mpsc::unbounded_channel;

use crate::api::MessengerApi;
use crate::core::action::{Action, AttachTarget, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::session::SessionStore;
use crate::core::state::{App, FieldEdit, NotificationKind, Peer, View};
use crate::core::sync::Synchronizer;
use crate::tui::component::EventHandler;
use crate::tui::components::{ListEvent, ListSelection, PathPrompt, PromptEvent, ThreadState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub chat_list: ListSelection,
    pub search_list: ListSelection,
    pub settings_list: ListSelection,
    pub thread: ThreadState,
    /// File path overlay (None = hidden)
    pub prompt: Option<PathPrompt>,
    /// Peer whose thread `thread` belongs to
    thread_peer: Option<i64>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            chat_list: ListSelection::default(),
            search_list: ListSelection::default(),
            settings_list: ListSelection::default(),
            thread: ThreadState::new(),
            prompt: None,
            thread_peer: None,
        }
    }

    /// Resets per-view state that belongs to a view the app just left.
    fn follow(&mut self, app: &App) {
        let peer = app.open_peer().map(|p| p.id);
        if peer != self.thread_peer {
            self.thread = ThreadState::new();
            self.thread_peer = peer;
        }
        if app.session.is_none() {
            self.prompt = None;
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Maps text editing events to a `FieldEdit`.
fn field_edit(event: &TuiEvent) -> Option<FieldEdit> {
    match event {
        TuiEvent::InputChar(c) => Some(FieldEdit::Insert(*c)),
        TuiEvent::Paste(text) => Some(FieldEdit::Paste(text.clone())),
        TuiEvent::Backspace => Some(FieldEdit::Backspace),
        _ => None,
    }
}

/// Translates one terminal event into at most one core action, updating
/// TUI-local state (selection, scroll, prompt) along the way.
pub fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }

    if let Some(prompt) = tui.prompt.as_mut() {
        return match prompt.handle_event(event)? {
            PromptEvent::Submit { path, target } => {
                tui.prompt = None;
                Some(Action::Attach { path, target })
            }
            PromptEvent::Cancel => {
                tui.prompt = None;
                None
            }
        };
    }

    if app.session.is_none() {
        return match event {
            TuiEvent::Submit => Some(Action::SubmitAuth),
            TuiEvent::Escape => Some(Action::Quit),
            TuiEvent::NextField | TuiEvent::CursorDown => Some(Action::AuthFocus(1)),
            TuiEvent::PrevField | TuiEvent::CursorUp => Some(Action::AuthFocus(-1)),
            TuiEvent::ToggleAuthMode => Some(Action::AuthToggleMode),
            _ => field_edit(event).map(Action::AuthInput),
        };
    }

    match event {
        TuiEvent::SwitchTab(tab) => return Some(Action::Navigate(*tab)),
        TuiEvent::Logout => return Some(Action::Logout),
        _ => {}
    }

    match &app.view {
        View::Chats => match tui.chat_list.handle_event(event)? {
            ListEvent::Activate(i) => app.chats.get(i).map(|c| Action::OpenChat(Peer::from(c))),
        },
        View::Chat(_) => route_chat(app, tui, event),
        View::Search => {
            if let Some(edit) = field_edit(event) {
                return Some(Action::SearchInput(edit));
            }
            match tui.search_list.handle_event(event)? {
                ListEvent::Activate(i) => app
                    .search
                    .results
                    .get(i)
                    .map(|c| Action::OpenChat(Peer::from(c))),
            }
        }
        View::Profile => match event {
            TuiEvent::Submit => Some(Action::SubmitProfile),
            TuiEvent::NextField | TuiEvent::PrevField => Some(Action::ProfileToggleFocus),
            TuiEvent::Attach => {
                tui.prompt = Some(PathPrompt::new(AttachTarget::Avatar));
                None
            }
            _ => field_edit(event).map(Action::ProfileInput),
        },
        View::Settings => {
            let activated = match event {
                TuiEvent::InputChar(' ') => tui.settings_list.selected(),
                _ => match tui.settings_list.handle_event(event)? {
                    ListEvent::Activate(i) => Some(i),
                },
            };
            activated
                .and_then(|i| NotificationKind::ALL.get(i).copied())
                .map(Action::ToggleNotification)
        }
        View::Auth => None,
    }
}

fn route_chat(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Escape if tui.thread.selected_index.is_some() => {
            tui.thread.selected_index = None;
            tui.thread.stick_to_bottom = true;
            None
        }
        TuiEvent::Escape => Some(Action::CloseChat),
        TuiEvent::Submit => Some(Action::SendMessage),
        TuiEvent::Attach => {
            tui.prompt = Some(PathPrompt::new(AttachTarget::Composer));
            None
        }
        TuiEvent::ClearAttachment => Some(Action::ClearAttachment),
        TuiEvent::Delete => {
            let idx = tui.thread.selected_index?;
            app.messages.get(idx).map(|m| Action::DeleteMessage(m.id))
        }
        TuiEvent::CursorUp
        | TuiEvent::CursorDown
        | TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.thread.handle_event(event);
            None
        }
        _ => field_edit(event).map(Action::ComposerInput),
    }
}

/// Runs one action through `update()` and the synchronizer.
/// Returns true when the app should quit.
fn apply(app: &mut App, tui: &mut TuiState, sync: &mut Synchronizer, action: Action) -> bool {
    let mut quit = false;
    for effect in update(app, action) {
        if effect == Effect::Quit {
            quit = true;
        } else {
            sync.execute(effect);
        }
    }
    sync.reconcile(app);
    tui.follow(app);
    quit
}

pub fn run(
    config: ResolvedConfig,
    api: Arc<dyn MessengerApi>,
    store: SessionStore,
) -> std::io::Result<()> {
    let session = store.load();
    match &session {
        Some(user) => info!("Resuming session for {} (id {})", user.username, user.id),
        None => info!("No session found, showing sign-in"),
    }

    let mut app = App::bootstrap(session, config.notifications);
    let mut tui = TuiState::new();

    let (tx, mut rx) = unbounded_channel();
    let mut sync = Synchronizer::new(api, store, tx, config.polling);
    sync.reconcile(&app);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new().inspect_err(|_| ratatui::restore())?;

    let mut needs_redraw = true;
    let result = loop {
        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let mut should_quit = false;
        let first_event = poll_event_timeout(Duration::from_millis(100));
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            if let Some(action) = route_event(&app, &mut tui, &event) {
                should_quit |= apply(&mut app, &mut tui, &mut sync, action);
            }
        }

        while let Ok(action) = rx.try_recv() {
            debug!("Background action: {}", action_name(&action));
            needs_redraw = true;
            should_quit |= apply(&mut app, &mut tui, &mut sync, action);
        }

        if should_quit {
            break Ok(());
        }
    };

    sync.shutdown();
    ratatui::restore();
    info!("Courier exiting");
    result
}

/// Variant name only; results can carry whole image payloads.
fn action_name(action: &Action) -> &'static str {
    match action {
        Action::AuthCompleted(_) => "AuthCompleted",
        Action::ChatsLoaded { .. } => "ChatsLoaded",
        Action::MessagesLoaded { .. } => "MessagesLoaded",
        Action::SearchLoaded { .. } => "SearchLoaded",
        Action::AttachmentLoaded { .. } => "AttachmentLoaded",
        Action::MessageSent { .. } => "MessageSent",
        Action::MessageDeleted { .. } => "MessageDeleted",
        Action::ProfileSaved { .. } => "ProfileSaved",
        _ => "Other",
    }
}
