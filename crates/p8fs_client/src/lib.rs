//! Device-identity bootstrap and authenticated streaming client.
//!
//! The flow has four stages, each usable on its own:
//! 1. [`DeviceKeyPair::generate`] creates an Ed25519 device identity,
//! 2. [`RegistrationClient::exchange`] trades it (plus a bootstrap secret)
//!    for a bearer session,
//! 3. [`SessionRecord::save`] / [`SessionRecord::load`] persist and reload
//!    the session bundle,
//! 4. [`ChatClient::stream_chat_completion`] opens an SSE-framed completion
//!    stream authorized by the loaded token and decodes it incrementally.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod session;

pub use api::{ChatClient, ChatCompletionRequest, ChatDelta, ChatMessage};
pub use auth::{DeviceInfo, RegistrationClient};
pub use config::Config;
pub use error::ClientError;
pub use identity::{DeviceKeyEncodings, DeviceKeyPair};
pub use session::SessionRecord;
