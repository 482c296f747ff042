//! # Application State
//!
//! Core business state for Courier. This module contains domain logic only -
//! no TUI-specific types. Presentation state (selection, scroll) lives in the
//! `tui` module.
//!
//! ```text
//! App
//! ├── session: Option<User>          // persisted user record (None = logged out)
//! ├── view: View                     // which of the screens is showing
//! ├── auth: AuthForm                 // login / register form
//! ├── chats: Vec<ChatSummary>        // replaced wholesale on each poll
//! ├── messages: Vec<Message>         // open thread, replaced on each poll
//! ├── composer: Composer             // text + pending image for the open chat
//! ├── search: SearchState            // query + last result set
//! ├── profile: ProfileForm           // display name + avatar being edited
//! ├── notifications: NotificationSettings
//! └── status_message: String         // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::api::{AuthAction, AuthRequest, ChatSummary, Contact, Message, User};

/// The peer of an open conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<&ChatSummary> for Peer {
    fn from(chat: &ChatSummary) -> Self {
        Peer {
            id: chat.id,
            name: chat.name.clone(),
            avatar: chat.avatar.clone(),
        }
    }
}

impl From<&Contact> for Peer {
    fn from(contact: &Contact) -> Self {
        Peer {
            id: contact.id,
            name: contact.name.clone(),
            avatar: contact.avatar.clone(),
        }
    }
}

/// Each view is a terminal display state reached by direct navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Auth,
    Chats,
    Chat(Peer),
    Search,
    Profile,
    Settings,
}

/// Navigation bar entries. `Chat` belongs to the `Messages` tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Messages,
    Search,
    Profile,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Messages, Tab::Search, Tab::Profile, Tab::Settings];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Messages => "Messages",
            Tab::Search => "Search",
            Tab::Profile => "Profile",
            Tab::Settings => "Settings",
        }
    }
}

impl View {
    /// The nav bar tab this view lives under (None for the auth form).
    pub fn tab(&self) -> Option<Tab> {
        match self {
            View::Auth => None,
            View::Chats | View::Chat(_) => Some(Tab::Messages),
            View::Search => Some(Tab::Search),
            View::Profile => Some(Tab::Profile),
            View::Settings => Some(Tab::Settings),
        }
    }
}

// ============================================================================
// Text editing
// ============================================================================

/// A single edit applied to whichever text field has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Insert(char),
    Paste(String),
    Backspace,
    Clear,
}

impl FieldEdit {
    pub fn apply(&self, field: &mut String) {
        match self {
            FieldEdit::Insert(c) => field.push(*c),
            FieldEdit::Paste(text) => field.push_str(text),
            FieldEdit::Backspace => {
                field.pop();
            }
            FieldEdit::Clear => field.clear(),
        }
    }
}

// ============================================================================
// Auth form
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Password,
    Phone,
    DisplayName,
    Avatar,
}

impl AuthField {
    pub fn label(self) -> &'static str {
        match self {
            AuthField::Username => "Username",
            AuthField::Password => "Password",
            AuthField::Phone => "Phone",
            AuthField::DisplayName => "Display name",
            AuthField::Avatar => "Avatar (emoji)",
        }
    }
}

const LOGIN_FIELDS: &[AuthField] = &[AuthField::Username, AuthField::Password];
const REGISTER_FIELDS: &[AuthField] = &[
    AuthField::Username,
    AuthField::Password,
    AuthField::Phone,
    AuthField::DisplayName,
    AuthField::Avatar,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthAction,
    pub username: String,
    pub password: String,
    pub phone: String,
    pub display_name: String,
    pub avatar: String,
    pub focus: AuthField,
    /// Validation or server message shown under the form.
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthAction::Login,
            username: String::new(),
            password: String::new(),
            phone: String::new(),
            display_name: String::new(),
            avatar: String::new(),
            focus: AuthField::Username,
            error: None,
            submitting: false,
        }
    }
}

impl AuthForm {
    /// Fields shown for the current mode, in focus order.
    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthAction::Login => LOGIN_FIELDS,
            AuthAction::Register => REGISTER_FIELDS,
        }
    }

    pub fn value(&self, field: AuthField) -> &str {
        match field {
            AuthField::Username => &self.username,
            AuthField::Password => &self.password,
            AuthField::Phone => &self.phone,
            AuthField::DisplayName => &self.display_name,
            AuthField::Avatar => &self.avatar,
        }
    }

    pub fn value_mut(&mut self, field: AuthField) -> &mut String {
        match field {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
            AuthField::Phone => &mut self.phone,
            AuthField::DisplayName => &mut self.display_name,
            AuthField::Avatar => &mut self.avatar,
        }
    }

    /// Moves focus by `step` fields, wrapping around.
    pub fn move_focus(&mut self, step: isize) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let len = fields.len() as isize;
        let next = (current as isize + step).rem_euclid(len) as usize;
        self.focus = fields[next];
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthAction::Login => AuthAction::Register,
            AuthAction::Register => AuthAction::Login,
        };
        if !self.fields().contains(&self.focus) {
            self.focus = AuthField::Username;
        }
        self.error = None;
    }

    /// Builds the request body. Register-only fields are sent only in
    /// register mode and only when non-empty.
    pub fn to_request(&self) -> AuthRequest {
        let optional = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        let register = self.mode == AuthAction::Register;
        AuthRequest {
            action: self.mode,
            username: self.username.clone(),
            password: self.password.clone(),
            phone: if register { optional(&self.phone) } else { None },
            display_name: if register { optional(&self.display_name) } else { None },
            avatar: if register { optional(&self.avatar) } else { None },
        }
    }
}

// ============================================================================
// Chat, search and profile state
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    pub text: String,
    /// A selected image as a data URL. Sent instead of the text when present.
    pub attachment: Option<String>,
    pub sending: bool,
}

impl Composer {
    /// The body that would be sent, if any.
    pub fn outgoing(&self) -> Option<String> {
        if let Some(image) = &self.attachment {
            return Some(image.clone());
        }
        let text = self.text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.attachment = None;
        self.sending = false;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<Contact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileField {
    #[default]
    DisplayName,
    Avatar,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub display_name: String,
    /// Emoji text or a data URL picked from a file.
    pub avatar: String,
    pub focus: ProfileField,
    pub saving: bool,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone().unwrap_or_default(),
            focus: ProfileField::DisplayName,
            saving: false,
        }
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            ProfileField::DisplayName => &mut self.display_name,
            ProfileField::Avatar => &mut self.avatar,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ProfileField::DisplayName => ProfileField::Avatar,
            ProfileField::Avatar => ProfileField::DisplayName,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Messages,
    Mentions,
    Sounds,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 3] = [
        NotificationKind::Messages,
        NotificationKind::Mentions,
        NotificationKind::Sounds,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::Messages => "Message notifications",
            NotificationKind::Mentions => "Mentions",
            NotificationKind::Sounds => "Sounds",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    pub messages: bool,
    pub mentions: bool,
    pub sounds: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            messages: true,
            mentions: true,
            sounds: false,
        }
    }
}

impl NotificationSettings {
    pub fn get(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Messages => self.messages,
            NotificationKind::Mentions => self.mentions,
            NotificationKind::Sounds => self.sounds,
        }
    }

    pub fn toggle(&mut self, kind: NotificationKind) {
        let flag = match kind {
            NotificationKind::Messages => &mut self.messages,
            NotificationKind::Mentions => &mut self.mentions,
            NotificationKind::Sounds => &mut self.sounds,
        };
        *flag = !*flag;
    }
}

// ============================================================================
// App
// ============================================================================

#[derive(Debug, Clone)]
pub struct App {
    pub session: Option<User>,
    pub view: View,
    pub auth: AuthForm,
    pub chats: Vec<ChatSummary>,
    pub messages: Vec<Message>,
    pub composer: Composer,
    pub search: SearchState,
    pub profile: ProfileForm,
    pub notifications: NotificationSettings,
    pub status_message: String,
}

impl App {
    /// Builds the initial state from whatever session record was found on disk.
    /// A session goes straight to the conversation list; none shows the auth form.
    pub fn bootstrap(session: Option<User>, notifications: NotificationSettings) -> Self {
        let view = if session.is_some() {
            View::Chats
        } else {
            View::Auth
        };
        let profile = session
            .as_ref()
            .map(ProfileForm::from_user)
            .unwrap_or_default();
        Self {
            session,
            view,
            auth: AuthForm::default(),
            chats: Vec::new(),
            messages: Vec::new(),
            composer: Composer::default(),
            search: SearchState::default(),
            profile,
            notifications,
            status_message: String::from("Welcome to Courier!"),
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.session.as_ref().map(|u| u.id)
    }

    /// The peer of the open conversation, if the chat view is showing.
    pub fn open_peer(&self) -> Option<&Peer> {
        match &self.view {
            View::Chat(peer) => Some(peer),
            _ => None,
        }
    }

    /// Sum of unread counts across the conversation list (nav bar badge).
    pub fn total_unread(&self) -> u32 {
        self.chats.iter().map(|c| c.unread).sum()
    }
}
