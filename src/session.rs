//! Session-scoped caching of the authorized client.
//!
//! The interactive front-ends this crate serves authenticate once and
//! then run many reports. Instead of ambient global state, the cached
//! client lives in an explicit [`Session`] value the caller owns, with
//! a create-once / invalidate / clear lifecycle. A SHA-256 fingerprint
//! of the credential material is kept alongside so a re-authorization
//! with identical credentials can be recognized without ever holding
//! the secret itself.

use sha2::{Digest, Sha256};

use crate::client::SearchAnalyticsClient;

/// Holds the authorized client for the lifetime of one interactive
/// session. There is no concurrent mutation: one active report
/// generation per session.
#[derive(Debug, Default)]
pub struct Session<C> {
    client: Option<C>,
    fingerprint: Option<String>,
}

impl<C: SearchAnalyticsClient> Session<C> {
    pub fn new() -> Self {
        Session {
            client: None,
            fingerprint: None,
        }
    }

    /// Store an authorized client, replacing any previous one.
    ///
    /// `credential_material` is the raw secret bytes (e.g. the client
    /// secrets file) used to build the client; only its fingerprint is
    /// retained.
    pub fn authorize(&mut self, client: C, credential_material: &[u8]) {
        self.fingerprint = Some(fingerprint(credential_material));
        self.client = Some(client);
    }

    pub fn is_authorized(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&C> {
        self.client.as_ref()
    }

    /// True if `credential_material` matches the credentials this
    /// session was authorized with (current or most recent).
    pub fn matches_credentials(&self, credential_material: &[u8]) -> bool {
        self.fingerprint.as_deref() == Some(fingerprint(credential_material).as_str())
    }

    /// Drop the client but remember which credentials it came from, so
    /// a repeat authorization with the same material is detectable.
    pub fn invalidate(&mut self) {
        self.client = None;
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.client = None;
        self.fingerprint = None;
    }
}

/// Lowercase hex SHA-256 of the credential bytes.
fn fingerprint(material: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(material);
    format!("{:x}", hasher.finalize())
}
