// Raw HTTP transcript capture
//
// One file per HTTP call, named by local time at second granularity.
// Two calls landing in the same second overwrite each other.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::Local;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::Error;

const FILE_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S_%z";
const REDACTED: &str = "[REDACTED]";
const SENSITIVE_HEADERS: [&str; 3] = ["cookie", "set-cookie", "x-csrf-token"];

/// Everything captured about one request/response pair.
#[derive(Debug)]
pub struct Exchange<'a> {
    pub method: Method,
    pub url: &'a Url,
    pub request_headers: &'a HeaderMap,
    pub request_body: &'a str,
    pub status: StatusCode,
    pub response_headers: &'a HeaderMap,
    pub response_body: &'a str,
    /// `None` for plain HTTP; `Some(len)` with the peer certificate's DER
    /// length when TLS was negotiated.
    pub peer_certificate_len: Option<Option<usize>>,
}

/// Writes [`Exchange`]s into a directory.
#[derive(Debug, Clone)]
pub struct TranscriptRecorder {
    dir: PathBuf,
}

impl TranscriptRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write one exchange to `{dir}/{timestamp}.log`, returning the path.
    pub fn record(&self, exchange: &Exchange<'_>) -> Result<PathBuf, Error> {
        let name = format!("{}.log", Local::now().format(FILE_NAME_FORMAT));
        let path = self.dir.join(name);

        std::fs::write(&path, render(exchange)).map_err(|source| Error::Transcript {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), "wrote HTTP transcript");
        Ok(path)
    }
}

/// Render an exchange in the transcript text layout.
pub fn render(exchange: &Exchange<'_>) -> String {
    let mut out = String::new();

    let _ = write!(out, "Request\n\n{} {}\n", exchange.method, exchange.url);
    write_headers(&mut out, exchange.request_headers);

    let _ = write!(out, "\nRequest Body\n\n{}\n\n", exchange.request_body);

    let _ = write!(out, "Response\n\n{}\n", exchange.status);
    write_headers(&mut out, exchange.response_headers);

    let _ = write!(out, "\nResponse Body\n\n{}\n\n", exchange.response_body);

    out.push_str("TLS\n\n");
    match exchange.peer_certificate_len {
        None => out.push_str("none\n"),
        Some(None) => out.push_str("negotiated, no peer certificate\n"),
        Some(Some(len)) => {
            let _ = writeln!(out, "negotiated, peer certificate {len} bytes (DER)");
        }
    }

    out
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
            REDACTED
        } else {
            value.to_str().unwrap_or("<binary>")
        };
        let _ = writeln!(out, "{name}: {value}");
    }
}

/// The login body as it appears in a transcript: password masked.
pub(crate) fn redacted_login_body(username: &str) -> String {
    serde_json::json!({ "username": username, "password": REDACTED }).to_string()
}
