// Legacy API wire types
//
// Request bodies and response payloads for the three calls a reap run
// makes. Response fields use `#[serde(default)]` because controllers omit
// zero-valued counters and unnamed clients' `name` depending on firmware.

use serde::{Deserialize, Deserializer, Serialize};

// ── Login ────────────────────────────────────────────────────────────

/// `POST /api/login` | `POST /api/auth/login` body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// The one field the login contract requires from the response body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub unique_id: Option<String>,
}

// ── Station manager ──────────────────────────────────────────────────

pub const FORGET_STA: &str = "forget-sta";

/// `POST /api/s/{site}/cmd/stamgr` body.
#[derive(Debug, Serialize)]
pub struct StamgrCommand<'a> {
    pub cmd: &'static str,
    pub macs: &'a [String],
}

impl<'a> StamgrCommand<'a> {
    pub fn forget(macs: &'a [String]) -> Self {
        Self {
            cmd: FORGET_STA,
            macs,
        }
    }
}

// ── Known clients ────────────────────────────────────────────────────

/// One entry from `stat/alluser`: every client the controller has ever
/// seen, connected or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(default)]
    pub mac: String,
    /// User-assigned alias. Absent or `null` for unnamed clients.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub tx_bytes: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub tx_packets: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub rx_bytes: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub rx_packets: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub wifi_tx_attempts: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub tx_retries: u64,
}

/// Counters the controller reports as `null` count as zero.
fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

impl ClientRecord {
    /// Byte length of the display name; zero when unnamed.
    pub fn name_len(&self) -> usize {
        self.name.as_deref().map_or(0, str::len)
    }
}
