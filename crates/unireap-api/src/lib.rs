// unireap-api: session client for the UniFi controller legacy API
//
// Login (cookie + CSRF), `stat/alluser` listing, and batched `cmd/stamgr`
// forget, with optional raw HTTP transcript capture.

pub mod error;
pub mod legacy;
pub mod routing;
pub mod transcript;
pub mod transport;

pub use error::Error;
pub use legacy::models::ClientRecord;
pub use legacy::{ControllerSession, SessionState};
pub use routing::RoutingVariant;
pub use transcript::TranscriptRecorder;
pub use transport::{TlsMode, TransportConfig};
