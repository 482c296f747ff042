//! reqwest implementation of [`MessengerApi`].
//!
//! Every authenticated call carries the caller's id in `X-User-Id`. There is
//! no other credential, no timeout and no retry.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::messenger::{ApiError, MessengerApi};
use super::types::{
    AuthRequest, AuthResponse, ChatSummary, ChatsResponse, Contact, ErrorBody, Message,
    MessagesResponse, ProfileUpdate, SendMessageRequest, User, UsersResponse,
};

/// Header the backend reads the acting user id from.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Base URLs of the three endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth: String,
    pub users: String,
    pub messages: String,
}

pub struct HttpClient {
    endpoints: Endpoints,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

/// Turns a non-2xx response into `ApiError::Api`, preferring the `{error}` field.
async fn api_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);
    warn!("API error: {} - {}", status, message);
    ApiError::Api { status, message }
}

/// Checks the status and decodes the JSON body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn network(e: reqwest::Error) -> ApiError {
    if e.is_builder() {
        ApiError::Config(e.to_string())
    } else {
        ApiError::Network(e.to_string())
    }
}

#[async_trait]
impl MessengerApi for HttpClient {
    async fn authenticate(&self, request: &AuthRequest) -> Result<User, ApiError> {
        info!("Auth request: action={:?}, username={}", request.action, request.username);
        let response = self
            .client
            .post(&self.endpoints.auth)
            .json(request)
            .send()
            .await
            .map_err(network)?;
        debug!("Auth response status: {}", response.status());
        let body: AuthResponse = decode(response).await?;
        Ok(body.user)
    }

    async fn search_users(&self, query: &str) -> Result<Vec<Contact>, ApiError> {
        let mut request = self.client.get(&self.endpoints.users);
        if !query.is_empty() {
            request = request.query(&[("search", query)]);
        }
        let response = request.send().await.map_err(network)?;
        let body: UsersResponse = decode(response).await?;
        debug!("Search '{}' returned {} users", query, body.users.len());
        Ok(body.users)
    }

    /// The submitted fields are applied locally whatever the status, so an
    /// error status is only logged here.
    async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<(), ApiError> {
        let response = self
            .client
            .put(&self.endpoints.users)
            .header(USER_ID_HEADER, user_id.to_string())
            .json(update)
            .send()
            .await
            .map_err(network)?;
        if !response.status().is_success() {
            let err = api_error(response).await;
            warn!("Profile update not confirmed by server: {}", err);
        }
        Ok(())
    }

    async fn fetch_chats(&self, user_id: i64) -> Result<Vec<ChatSummary>, ApiError> {
        let response = self
            .client
            .get(&self.endpoints.messages)
            .header(USER_ID_HEADER, user_id.to_string())
            .send()
            .await
            .map_err(network)?;
        let body: ChatsResponse = decode(response).await?;
        debug!("Fetched {} chats", body.chats.len());
        Ok(body.chats)
    }

    async fn fetch_messages(&self, user_id: i64, peer_id: i64) -> Result<Vec<Message>, ApiError> {
        let response = self
            .client
            .get(&self.endpoints.messages)
            .query(&[("userId", peer_id.to_string())])
            .header(USER_ID_HEADER, user_id.to_string())
            .send()
            .await
            .map_err(network)?;
        let body: MessagesResponse = decode(response).await?;
        debug!("Fetched {} messages with peer {}", body.messages.len(), peer_id);
        Ok(body.messages)
    }

    async fn send_message(&self, user_id: i64, request: &SendMessageRequest) -> Result<(), ApiError> {
        info!(
            "Sending message to {} ({} bytes)",
            request.receiver_id,
            request.message_text.len()
        );
        let response = self
            .client
            .post(&self.endpoints.messages)
            .header(USER_ID_HEADER, user_id.to_string())
            .json(request)
            .send()
            .await
            .map_err(network)?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    async fn delete_message(&self, user_id: i64, message_id: i64) -> Result<(), ApiError> {
        info!("Deleting message {}", message_id);
        let response = self
            .client
            .delete(&self.endpoints.messages)
            .query(&[("messageId", message_id.to_string())])
            .header(USER_ID_HEADER, user_id.to_string())
            .send()
            .await
            .map_err(network)?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}
