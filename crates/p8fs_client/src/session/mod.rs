//! Durable session records.
//!
//! A successful registration exchange produces one record bundling the
//! bearer tokens with the device key material. The record is written as
//! pretty-printed JSON so it stays human-diffable; every save is a full
//! overwrite and every load is a full read.

use std::fs::{read_to_string, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::identity::DeviceKeyEncodings;

/// Token type constant for records produced by the dev exchange.
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// The persisted bundle of bearer tokens and device key material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque bearer credential. Non-empty for any record produced by a
    /// successful exchange; `load` rejects records where it is missing.
    #[serde(default)]
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_in: u64,
    pub tenant_id: Option<String>,
    /// Client-side issuance timestamp, informational only.
    pub created_at: DateTime<Utc>,
    /// Identity string used for registration.
    pub email: String,
    pub device_keys: DeviceKeyEncodings,
}

impl SessionRecord {
    /// Serialize the full record to `path`, overwriting any existing file.
    ///
    /// The file carries the private key, so on Unix it is restricted to
    /// owner read/write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        let path = path.as_ref();
        let persistence = |source: std::io::Error| ClientError::Persistence {
            path: path.to_path_buf(),
            source,
        };

        let serialized =
            serde_json::to_string_pretty(self).map_err(|e| persistence(e.into()))?;
        let mut file = File::create(path).map_err(persistence)?;
        file.write_all(serialized.as_bytes()).map_err(persistence)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut permissions = file.metadata().map_err(persistence)?.permissions();
            permissions.set_mode(0o600);
            file.set_permissions(permissions).map_err(persistence)?;
        }

        info!("Session record saved to {}", path.display());
        Ok(())
    }

    /// Read a record back from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<SessionRecord, ClientError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClientError::NotFound(path.to_path_buf()));
        }

        let raw = read_to_string(path).map_err(|source| ClientError::Persistence {
            path: path.to_path_buf(),
            source,
        })?;
        let record: SessionRecord =
            serde_json::from_str(&raw).map_err(|source| ClientError::CorruptRecord {
                path: path.to_path_buf(),
                source,
            })?;

        if record.access_token.is_empty() {
            return Err(ClientError::MissingToken);
        }
        debug!("Loaded session record from {}", path.display());
        Ok(record)
    }
}
