use serde::{Deserialize, Serialize};

/// Prefix that marks a message body or avatar as an embedded image.
const IMAGE_DATA_PREFIX: &str = "data:image";

/// The authenticated user. This is also the record persisted as the session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    /// Emoji or `data:image/...` URL.
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A user as returned by the search endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub online: bool,
}

/// Denormalized per-peer row in the conversation list.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    /// The peer's user id.
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "lastMessage", default)]
    pub last_message: Option<String>,
    /// ISO-8601 timestamp of the last message, formatted for display by the view.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub unread: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message_text: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_avatar: Option<String>,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub receiver_avatar: Option<String>,
}

impl Message {
    /// True when the body is an embedded image rather than text.
    pub fn is_image(&self) -> bool {
        is_image_data(&self.message_text)
    }
}

/// Returns true for `data:image/...` URLs (image messages and image avatars).
pub fn is_image_data(value: &str) -> bool {
    value.starts_with(IMAGE_DATA_PREFIX)
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Login,
    Register,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthRequest {
    pub action: AuthAction,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub receiver_id: i64,
    pub message_text: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub avatar: String,
}

// ============================================================================
// Response envelopes
// ============================================================================

#[derive(Deserialize, Debug)]
pub struct AuthResponse {
    pub user: User,
}

#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Deserialize, Debug)]
pub struct UsersResponse {
    pub users: Vec<Contact>,
}

#[derive(Deserialize, Debug)]
pub struct ChatsResponse {
    pub chats: Vec<ChatSummary>,
}

#[derive(Deserialize, Debug)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Contract test: the auth body omits optional fields that were not provided.
    #[test]
    fn test_login_request_serialization() {
        let req = AuthRequest {
            action: AuthAction::Login,
            username: "anna".to_string(),
            password: "secret".to_string(),
            phone: None,
            display_name: None,
            avatar: None,
        };
        let serialized = serde_json::to_string(&req).unwrap();
        assert_eq!(
            serialized,
            r#"{"action":"login","username":"anna","password":"secret"}"#
        );
    }

    #[test]
    fn test_register_request_serialization() {
        let req = AuthRequest {
            action: AuthAction::Register,
            username: "anna".to_string(),
            password: "secret".to_string(),
            phone: Some("+100".to_string()),
            display_name: Some("Anna".to_string()),
            avatar: Some("🎨".to_string()),
        };
        let serialized = serde_json::to_string(&req).unwrap();
        assert_eq!(
            serialized,
            r#"{"action":"register","username":"anna","password":"secret","phone":"+100","display_name":"Anna","avatar":"🎨"}"#
        );
    }

    #[test]
    fn test_chat_summary_uses_camel_case_fields() {
        let json = r#"{"id":2,"name":"Max","avatar":"🚀","status":null,
            "lastMessage":"Thanks!","time":"2024-05-01T11:20:00","unread":3}"#;
        let chat: ChatSummary = serde_json::from_str(json).unwrap();
        assert_eq!(chat.last_message.as_deref(), Some("Thanks!"));
        assert_eq!(chat.unread, 3);
        assert!(chat.status.is_none());
    }

    #[test]
    fn test_user_tolerates_missing_optional_fields() {
        let json = r#"{"id":7,"username":"olga","display_name":"Olga"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.avatar.is_none());
        assert!(user.phone.is_none());
    }

    #[test]
    fn test_image_message_detection() {
        let json = r#"{"id":1,"sender_id":1,"receiver_id":2,
            "message_text":"data:image/png;base64,AAAA","created_at":"2024-05-01T11:20:00"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert!(message.is_image());
        assert!(!message.is_read);
        assert!(!is_image_data("just text"));
    }
}
