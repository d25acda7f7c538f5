// Legacy API session modules
//
// Hand-written client for the three legacy endpoints a reap run touches:
// login, `stat/alluser`, and `cmd/stamgr`, all but login wrapped in the
// standard `{ meta: { rc, msg }, data: [...] }` envelope.

pub mod auth;
pub mod clients;
pub mod envelope;
pub mod models;
pub mod session;

pub use session::{ControllerSession, SessionState};
