use std::fmt;

use async_trait::async_trait;

use super::types::{AuthRequest, ChatSummary, Contact, Message, ProfileUpdate, SendMessageRequest, User};

/// Errors that can occur while talking to the messenger backend.
///
/// None of these are retried. Reads log them; auth surfaces them to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Client misconfigured (bad endpoint URL).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// The endpoint answered with a non-2xx status.
    /// `message` is the `error` field of the body when present, else the raw body.
    Api { status: u16, message: String },
    /// The response body did not match the expected shape.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The three remote endpoints (`auth`, `users`, `messages`) as one seam.
///
/// `user_id` arguments identify the caller; implementations send them as
/// the `X-User-Id` header.
#[async_trait]
pub trait MessengerApi: Send + Sync {
    /// Login or register, returning the user record on success.
    async fn authenticate(&self, request: &AuthRequest) -> Result<User, ApiError>;

    /// Users whose name matches `query`; an empty query lists everyone.
    async fn search_users(&self, query: &str) -> Result<Vec<Contact>, ApiError>;

    async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<(), ApiError>;

    async fn fetch_chats(&self, user_id: i64) -> Result<Vec<ChatSummary>, ApiError>;

    /// The full thread between `user_id` and `peer_id`, oldest first.
    async fn fetch_messages(&self, user_id: i64, peer_id: i64) -> Result<Vec<Message>, ApiError>;

    async fn send_message(&self, user_id: i64, request: &SendMessageRequest) -> Result<(), ApiError>;

    /// Deletes a message the caller sent. The backend ignores ids sent by others.
    async fn delete_message(&self, user_id: i64, message_id: i64) -> Result<(), ApiError>;
}
