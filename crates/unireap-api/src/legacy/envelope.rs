// Legacy response envelope
//
// Every legacy endpoint wraps its payload:
//   { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
// Decoding is typed end to end; validation looks only at `meta.rc`.

use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::error::Error;

/// Standard legacy API response envelope.
///
/// Missing `meta` or `data` decode to empty defaults so that [`validate`],
/// not the decoder, decides whether the reply is a success.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the envelope. `rc == "ok"` means success.
#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub rc: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Classify an envelope's `meta` block.
///
/// - `"ok"` succeeds.
/// - `"error"` fails with the controller's message.
/// - anything else, including a missing `rc`, fails with the raw body.
pub fn validate(meta: &Meta, raw_body: &str, identifier: &str) -> Result<(), Error> {
    match meta.rc.as_deref() {
        Some("ok") => Ok(()),
        Some("error") => Err(Error::ControllerReported {
            identifier: identifier.to_owned(),
            message: meta.msg.clone().unwrap_or_default(),
        }),
        _ => Err(Error::UnexpectedResponse {
            identifier: identifier.to_owned(),
            body: raw_body.to_owned(),
        }),
    }
}

/// Decode a body as a typed envelope.
pub fn decode<T: DeserializeOwned>(raw_body: &str, identifier: &str) -> Result<Envelope<T>, Error> {
    serde_json::from_str(raw_body).map_err(|e| Error::Decode {
        identifier: identifier.to_owned(),
        message: e.to_string(),
        body: raw_body.to_owned(),
    })
}

/// Decode, validate, and return `data`.
///
/// `meta` is checked before `data` is typed, so a controller error with an
/// oddly shaped payload still surfaces as [`Error::ControllerReported`].
pub fn unwrap<T: DeserializeOwned>(raw_body: &str, identifier: &str) -> Result<Vec<T>, Error> {
    let head: Envelope<IgnoredAny> = decode(raw_body, identifier)?;
    validate(&head.meta, raw_body, identifier)?;

    let envelope: Envelope<T> = decode(raw_body, identifier)?;
    Ok(envelope.data)
}
