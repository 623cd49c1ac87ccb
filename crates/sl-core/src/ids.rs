//! Session and device identifiers.
//!
//! A session ID tags every row logged during one run of the host process; a
//! device ID is stable for the machine.  Both are opaque strings to the rest
//! of the framework.

use chrono::Local;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length (hex chars) of a hashed session ID.
const SESSION_ID_HEX_LEN: usize = 32;

/// Provider of session and device identifiers.
pub trait SessionIds: Send + Sync {
    /// A fresh identifier for a new logging session.
    fn new_session_id(&self) -> String;

    /// The stable identifier of this device.
    fn device_id(&self) -> String;
}

/// Session IDs derived deterministically from the device ID and the current
/// wall-clock time: `hex(sha256(device_id + yyyyMMddHHmmssffff))[..32]`.
#[derive(Clone, Debug)]
pub struct HashedSessionIds {
    device_id: String,
}

impl HashedSessionIds {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self { device_id: device_id.into() }
    }

    /// Hash `device_id` together with a compact timestamp.
    ///
    /// Exposed so callers can reproduce an ID from a known instant.
    pub fn session_id_at(&self, compact_stamp: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.device_id.as_bytes());
        hasher.update(compact_stamp.as_bytes());
        let mut id = hex::encode(hasher.finalize());
        id.truncate(SESSION_ID_HEX_LEN);
        id
    }
}

impl SessionIds for HashedSessionIds {
    fn new_session_id(&self) -> String {
        let now = Local::now();
        let stamp = format!(
            "{}{:04}",
            now.format("%Y%m%d%H%M%S"),
            now.timestamp_subsec_micros() / 100
        );
        self.session_id_at(&stamp)
    }

    fn device_id(&self) -> String {
        self.device_id.clone()
    }
}

/// A random GUID-shaped identifier (`8-4-4-4-12` lowercase hex).
///
/// Used when a log store is built without an explicit session ID.
pub fn random_session_id<R: Rng>(rng: &mut R) -> String {
    let v: u128 = rng.r#gen();
    let hex = format!("{v:032x}");
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
