pub mod client;
pub mod messenger;
pub mod types;

pub use client::{Endpoints, HttpClient, USER_ID_HEADER};
pub use messenger::{ApiError, MessengerApi};
pub use types::{
    AuthAction, AuthRequest, ChatSummary, Contact, Message, ProfileUpdate, SendMessageRequest,
    User, is_image_data,
};
