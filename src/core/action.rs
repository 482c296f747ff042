//! # Actions
//!
//! Everything that can happen in Courier becomes an `Action`.
//! User presses Enter in the composer? That's `Action::SendMessage`.
//! A poll comes back? That's `Action::MessagesLoaded { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the `Effect`s to run. No side effects here. I/O
//! happens in `core::sync`.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! Periodic refetches are not effects: the synchronizer derives them from
//! `App::view` after every update (see `Synchronizer::reconcile`).

use log::{debug, info, warn};

use crate::api::{
    ApiError, AuthAction, AuthRequest, ChatSummary, Contact, Message, ProfileUpdate,
    SendMessageRequest, User,
};
use crate::core::state::{
    App, AuthForm, FieldEdit, NotificationKind, Peer, ProfileForm, Tab, View,
};

/// Shown when register is submitted without a phone number.
pub const PHONE_REQUIRED: &str = "Phone number required";
/// Shown for auth failures that never reached the server.
pub const CONNECTION_ERROR: &str = "Connection error";

/// Where a loaded attachment goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachTarget {
    Composer,
    Avatar,
}

#[derive(Debug)]
pub enum Action {
    // Auth form
    AuthInput(FieldEdit),
    AuthFocus(isize),
    AuthToggleMode,
    SubmitAuth,
    AuthCompleted(Result<User, ApiError>),
    Logout,

    // Navigation
    Navigate(Tab),
    OpenChat(Peer),
    CloseChat,

    // Poll results
    ChatsLoaded {
        user_id: i64,
        result: Result<Vec<ChatSummary>, ApiError>,
    },
    MessagesLoaded {
        user_id: i64,
        peer_id: i64,
        result: Result<Vec<Message>, ApiError>,
    },
    SearchLoaded {
        query: String,
        result: Result<Vec<Contact>, ApiError>,
    },

    // Chat
    ComposerInput(FieldEdit),
    Attach {
        path: String,
        target: AttachTarget,
    },
    AttachmentLoaded {
        target: AttachTarget,
        result: Result<String, String>,
    },
    ClearAttachment,
    SendMessage,
    MessageSent {
        peer_id: i64,
        result: Result<(), ApiError>,
    },
    DeleteMessage(i64),
    MessageDeleted {
        peer_id: i64,
        result: Result<(), ApiError>,
    },

    // Search
    SearchInput(FieldEdit),

    // Profile
    ProfileInput(FieldEdit),
    ProfileToggleFocus,
    SubmitProfile,
    ProfileSaved {
        update: ProfileUpdate,
        result: Result<(), ApiError>,
    },

    // Settings
    ToggleNotification(NotificationKind),

    Quit,
}

/// One-shot I/O requested by `update()`. Executed by the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Authenticate(AuthRequest),
    PersistSession(User),
    ClearSession,
    FetchChats {
        user_id: i64,
    },
    FetchMessages {
        user_id: i64,
        peer_id: i64,
    },
    /// Debounced: a newer search cancels the pending timer of an older one.
    SearchUsers(String),
    SendMessage {
        user_id: i64,
        request: SendMessageRequest,
    },
    DeleteMessage {
        user_id: i64,
        peer_id: i64,
        message_id: i64,
    },
    UpdateProfile {
        user_id: i64,
        update: ProfileUpdate,
    },
    LoadAttachment {
        path: String,
        target: AttachTarget,
    },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        // ── Auth ────────────────────────────────────────────────────────────
        Action::AuthInput(edit) => {
            let focus = app.auth.focus;
            edit.apply(app.auth.value_mut(focus));
            vec![]
        }
        Action::AuthFocus(step) => {
            app.auth.move_focus(step);
            vec![]
        }
        Action::AuthToggleMode => {
            app.auth.toggle_mode();
            vec![]
        }
        Action::SubmitAuth => {
            if app.auth.submitting {
                return vec![];
            }
            if app.auth.mode == AuthAction::Register && app.auth.phone.trim().is_empty() {
                app.auth.error = Some(PHONE_REQUIRED.to_string());
                return vec![];
            }
            app.auth.error = None;
            app.auth.submitting = true;
            vec![Effect::Authenticate(app.auth.to_request())]
        }
        Action::AuthCompleted(result) => {
            app.auth.submitting = false;
            match result {
                Ok(user) => {
                    info!("Authenticated as {} (id {})", user.username, user.id);
                    app.profile = ProfileForm::from_user(&user);
                    app.session = Some(user.clone());
                    app.auth = AuthForm::default();
                    app.view = View::Chats;
                    app.status_message = format!("Signed in as {}", user.display_name);
                    vec![Effect::PersistSession(user)]
                }
                Err(ApiError::Api { message, .. }) => {
                    app.auth.error = Some(message);
                    vec![]
                }
                Err(e) => {
                    warn!("Auth request failed: {}", e);
                    app.auth.error = Some(CONNECTION_ERROR.to_string());
                    vec![]
                }
            }
        }
        Action::Logout => {
            info!("Logging out");
            let notifications = app.notifications;
            *app = App::bootstrap(None, notifications);
            app.status_message = String::from("Signed out");
            vec![Effect::ClearSession]
        }

        // ── Navigation ──────────────────────────────────────────────────────
        Action::Navigate(tab) => {
            if app.session.is_none() {
                return vec![];
            }
            match tab {
                Tab::Messages => {
                    app.view = View::Chats;
                    vec![]
                }
                Tab::Search => {
                    let entering = app.view != View::Search;
                    app.view = View::Search;
                    if entering {
                        vec![Effect::SearchUsers(app.search.query.clone())]
                    } else {
                        vec![]
                    }
                }
                Tab::Profile => {
                    if app.view != View::Profile
                        && let Some(user) = &app.session
                    {
                        app.profile = ProfileForm::from_user(user);
                    }
                    app.view = View::Profile;
                    vec![]
                }
                Tab::Settings => {
                    app.view = View::Settings;
                    vec![]
                }
            }
        }
        Action::OpenChat(peer) => {
            if app.session.is_none() {
                return vec![];
            }
            debug!("Opening chat with {} ({})", peer.name, peer.id);
            app.messages.clear();
            if app.open_peer().is_none_or(|p| p.id != peer.id) {
                app.composer.clear();
            }
            app.view = View::Chat(peer);
            vec![]
        }
        Action::CloseChat => {
            if matches!(app.view, View::Chat(_)) {
                app.view = View::Chats;
                app.messages.clear();
            }
            vec![]
        }

        // ── Poll results (full replace) ─────────────────────────────────────
        Action::ChatsLoaded { user_id, result } => {
            match result {
                Ok(chats) if app.user_id() == Some(user_id) => app.chats = chats,
                Ok(_) => debug!("Dropping chat list fetched for user {}", user_id),
                Err(e) => warn!("Failed to load chats: {}", e),
            }
            vec![]
        }
        Action::MessagesLoaded {
            user_id,
            peer_id,
            result,
        } => {
            match result {
                Ok(messages) => {
                    if app.user_id() == Some(user_id)
                        && app.open_peer().is_some_and(|p| p.id == peer_id)
                    {
                        app.messages = messages;
                    } else {
                        debug!("Dropping messages for peer {} (chat not open)", peer_id);
                    }
                }
                Err(e) => warn!("Failed to load messages with {}: {}", peer_id, e),
            }
            vec![]
        }
        Action::SearchLoaded { query, result } => {
            match result {
                Ok(users) if app.session.is_some() => app.search.results = users,
                Ok(_) => {}
                Err(e) => warn!("Search '{}' failed: {}", query, e),
            }
            vec![]
        }

        // ── Chat ────────────────────────────────────────────────────────────
        Action::ComposerInput(edit) => {
            edit.apply(&mut app.composer.text);
            vec![]
        }
        Action::Attach { path, target } => {
            let path = path.trim().to_string();
            if path.is_empty() {
                return vec![];
            }
            vec![Effect::LoadAttachment { path, target }]
        }
        Action::AttachmentLoaded { target, result } => {
            match (target, result) {
                (AttachTarget::Composer, Ok(url)) => {
                    app.composer.attachment = Some(url);
                    app.status_message = String::from("Image attached");
                }
                (AttachTarget::Avatar, Ok(url)) => {
                    app.profile.avatar = url;
                    app.status_message = String::from("Avatar image loaded");
                }
                (_, Err(e)) => {
                    warn!("Attachment failed: {}", e);
                    app.status_message = format!("Attachment failed: {}", e);
                }
            }
            vec![]
        }
        Action::ClearAttachment => {
            app.composer.attachment = None;
            vec![]
        }
        Action::SendMessage => {
            let (Some(user_id), Some(peer_id)) = (app.user_id(), app.open_peer().map(|p| p.id))
            else {
                return vec![];
            };
            if app.composer.sending {
                return vec![];
            }
            let Some(message_text) = app.composer.outgoing() else {
                return vec![];
            };
            app.composer.sending = true;
            vec![Effect::SendMessage {
                user_id,
                request: SendMessageRequest {
                    receiver_id: peer_id,
                    message_text,
                },
            }]
        }
        Action::MessageSent { peer_id, result } => {
            if let Err(e) = result {
                warn!("Send to {} failed: {}", peer_id, e);
            }
            if app.open_peer().is_some_and(|p| p.id == peer_id) {
                app.composer.clear();
            } else {
                app.composer.sending = false;
            }
            match app.user_id() {
                Some(user_id) => vec![
                    Effect::FetchMessages { user_id, peer_id },
                    Effect::FetchChats { user_id },
                ],
                None => vec![],
            }
        }
        Action::DeleteMessage(message_id) => {
            let (Some(user_id), Some(peer_id)) = (app.user_id(), app.open_peer().map(|p| p.id))
            else {
                return vec![];
            };
            let own = app
                .messages
                .iter()
                .any(|m| m.id == message_id && m.sender_id == user_id);
            if !own {
                app.status_message = String::from("Only your own messages can be deleted");
                return vec![];
            }
            vec![Effect::DeleteMessage {
                user_id,
                peer_id,
                message_id,
            }]
        }
        Action::MessageDeleted { peer_id, result } => {
            if let Err(e) = result {
                warn!("Delete failed: {}", e);
                app.status_message = format!("Delete failed: {}", e);
            }
            match app.user_id() {
                Some(user_id) => vec![Effect::FetchMessages { user_id, peer_id }],
                None => vec![],
            }
        }

        // ── Search ──────────────────────────────────────────────────────────
        Action::SearchInput(edit) => {
            edit.apply(&mut app.search.query);
            vec![Effect::SearchUsers(app.search.query.clone())]
        }

        // ── Profile ─────────────────────────────────────────────────────────
        Action::ProfileInput(edit) => {
            edit.apply(app.profile.focused_mut());
            vec![]
        }
        Action::ProfileToggleFocus => {
            app.profile.toggle_focus();
            vec![]
        }
        Action::SubmitProfile => {
            let Some(user_id) = app.user_id() else {
                return vec![];
            };
            if app.profile.saving {
                return vec![];
            }
            app.profile.saving = true;
            vec![Effect::UpdateProfile {
                user_id,
                update: ProfileUpdate {
                    display_name: app.profile.display_name.trim().to_string(),
                    avatar: app.profile.avatar.clone(),
                },
            }]
        }
        Action::ProfileSaved { update, result } => {
            app.profile.saving = false;
            if let Err(e) = result {
                warn!("Profile update failed: {}", e);
                app.status_message = format!("Profile update failed: {}", e);
                return vec![];
            }
            let Some(user) = app.session.as_mut() else {
                return vec![];
            };
            user.display_name = update.display_name;
            user.avatar = Some(update.avatar);
            app.status_message = String::from("Profile saved");
            vec![Effect::PersistSession(user.clone())]
        }

        // ── Settings ────────────────────────────────────────────────────────
        Action::ToggleNotification(kind) => {
            app.notifications.toggle(kind);
            vec![]
        }

        Action::Quit => vec![Effect::Quit],
    }
}
