//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    ApiError, AuthRequest, ChatSummary, Contact, Message, MessengerApi, ProfileUpdate,
    SendMessageRequest, User,
};
use crate::core::session::SessionStore;
use crate::core::state::{App, NotificationSettings, Peer};

/// One call made against [`RecordingApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Authenticate(AuthRequest),
    SearchUsers(String),
    UpdateProfile { user_id: i64, update: ProfileUpdate },
    FetchChats { user_id: i64 },
    FetchMessages { user_id: i64, peer_id: i64 },
    SendMessage { user_id: i64, request: SendMessageRequest },
    DeleteMessage { user_id: i64, message_id: i64 },
}

/// An in-memory backend that records every call and answers with canned data.
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    pub chats: Mutex<Vec<ChatSummary>>,
    pub messages: Mutex<Vec<Message>>,
    pub contacts: Mutex<Vec<Contact>>,
}

impl RecordingApi {
    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }
}

#[async_trait]
impl MessengerApi for RecordingApi {
    async fn authenticate(&self, request: &AuthRequest) -> Result<User, ApiError> {
        self.record(ApiCall::Authenticate(request.clone()));
        Ok(User {
            username: request.username.clone(),
            ..sample_user()
        })
    }

    async fn search_users(&self, query: &str) -> Result<Vec<Contact>, ApiError> {
        self.record(ApiCall::SearchUsers(query.to_string()));
        Ok(self.contacts.lock().unwrap().clone())
    }

    async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.record(ApiCall::UpdateProfile {
            user_id,
            update: update.clone(),
        });
        Ok(())
    }

    async fn fetch_chats(&self, user_id: i64) -> Result<Vec<ChatSummary>, ApiError> {
        self.record(ApiCall::FetchChats { user_id });
        Ok(self.chats.lock().unwrap().clone())
    }

    async fn fetch_messages(&self, user_id: i64, peer_id: i64) -> Result<Vec<Message>, ApiError> {
        self.record(ApiCall::FetchMessages { user_id, peer_id });
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn send_message(&self, user_id: i64, request: &SendMessageRequest) -> Result<(), ApiError> {
        self.record(ApiCall::SendMessage {
            user_id,
            request: request.clone(),
        });
        Ok(())
    }

    async fn delete_message(&self, user_id: i64, message_id: i64) -> Result<(), ApiError> {
        self.record(ApiCall::DeleteMessage {
            user_id,
            message_id,
        });
        Ok(())
    }
}

/// Lets spawned tasks run to completion without moving a paused clock.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

pub fn sample_user() -> User {
    User {
        id: 1,
        username: "anna".to_string(),
        display_name: "Anna".to_string(),
        avatar: Some("🐱".to_string()),
        status: Some("Available".to_string()),
        phone: Some("+15550100".to_string()),
    }
}

/// An app signed in as [`sample_user`], showing the conversation list.
pub fn logged_in_app() -> App {
    App::bootstrap(Some(sample_user()), NotificationSettings::default())
}

pub fn peer(id: i64) -> Peer {
    Peer {
        id,
        name: format!("User {}", id),
        avatar: None,
    }
}

pub fn message(id: i64, sender_id: i64, receiver_id: i64, text: &str) -> Message {
    Message {
        id,
        sender_id,
        receiver_id,
        message_text: text.to_string(),
        is_read: false,
        created_at: "2024-05-01T12:30:00Z".to_string(),
        sender_name: None,
        sender_avatar: None,
        receiver_name: None,
        receiver_avatar: None,
    }
}

pub fn chat_summary(id: i64, name: &str, unread: u32) -> ChatSummary {
    ChatSummary {
        id,
        name: name.to_string(),
        avatar: None,
        status: None,
        last_message: Some("see you".to_string()),
        time: Some("2024-05-01T12:30:00Z".to_string()),
        unread,
    }
}

/// A unique path under the system temp dir. The parent is not created.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("courier-test-{}", uuid::Uuid::new_v4()))
        .join(name)
}

pub fn temp_session_store() -> SessionStore {
    SessionStore::new(temp_path("session.json"))
}

/// All cell symbols of a rendered test terminal, row-major.
pub fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}
