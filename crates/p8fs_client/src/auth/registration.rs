//! Dev registration exchange.
//!
//! Sends the device public key and the bootstrap secret to the dev
//! registration endpoint in exactly one round trip and turns the response
//! into a [`SessionRecord`]. The server bypasses interactive email
//! verification when the bootstrap secret is valid, so a fixed placeholder
//! verification code is sent alongside it.

use chrono::Utc;
use log::{error, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ClientError;
use crate::identity::DeviceKeyPair;
use crate::session::{SessionRecord, TOKEN_TYPE_BEARER};

const REGISTER_PATH: &str = "/api/v1/auth/dev/register";
// Placeholder accepted by the server whenever the dev token is valid.
const DEV_VERIFICATION_CODE: &str = "123456";
// Applied when the server omits expires_in.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Metadata describing the registering device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub device_name: String,
    pub device_type: String,
    pub os_version: String,
    pub app_version: String,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        DeviceInfo {
            device_name: "p8fs dev client".to_string(),
            device_type: "desktop".to_string(),
            os_version: std::env::consts::OS.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    public_key: String,
    device_info: &'a DeviceInfo,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    tenant_id: Option<String>,
}

/// Client for the dev registration endpoint.
#[derive(Debug, Clone)]
pub struct RegistrationClient {
    client: Client,
    config: Config,
}

impl RegistrationClient {
    /// Build a client from an injected config. The registration round trip
    /// is bounded by `config.request_timeout`.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(RegistrationClient { client, config })
    }

    /// Exchange the device identity and bootstrap secret for a session.
    ///
    /// Performs exactly one network round trip; nothing is retried and
    /// nothing is persisted. Persistence of the returned record is the
    /// caller's responsibility.
    pub async fn exchange(
        &self,
        email: &str,
        keys: &DeviceKeyPair,
        device_info: &DeviceInfo,
    ) -> Result<SessionRecord, ClientError> {
        if self.config.dev_token.is_empty() {
            return Err(ClientError::MissingBootstrapSecret);
        }

        let url = format!("{}{}", self.config.base_url, REGISTER_PATH);
        let body = RegisterRequest {
            email,
            public_key: keys.to_public_raw_b64(),
            device_info,
        };

        info!("Registering device identity for {email}");
        let response = self
            .client
            .post(&url)
            .header("X-Dev-Token", &self.config.dev_token)
            .header("X-Dev-Email", email)
            .header("X-Dev-Code", DEV_VERIFICATION_CODE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("Registration rejected with status {status}: {body}");
            return Err(ClientError::AuthRejected { status, body });
        }

        let bytes = response.bytes().await?;
        let token_data = match serde_json::from_slice::<RegisterResponse>(&bytes) {
            Ok(token_data) => token_data,
            Err(e) => {
                error!(
                    "Registration response did not parse: {e}, body: {}",
                    String::from_utf8_lossy(&bytes)
                );
                return Err(ClientError::MissingToken);
            }
        };

        let access_token = token_data
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(ClientError::MissingToken)?;

        if let Some(tenant_id) = &token_data.tenant_id {
            info!("Registered with tenant {tenant_id}");
        }

        Ok(SessionRecord {
            access_token,
            refresh_token: token_data.refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: token_data.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
            tenant_id: token_data.tenant_id,
            created_at: Utc::now(),
            email: email.to_string(),
            device_keys: keys.encodings()?,
        })
    }
}
