//! Atrium Auth - the authorization gate core
//!
//! This crate holds everything between an incoming request and the decision to
//! let it through: the remote authorization client, the access decision gate,
//! the role elevation gate, session state, and resource identifier
//! construction. It is transport-decoupled: the gates operate on a plain
//! request descriptor and a typed session, never on a framework request.

pub mod client;
pub mod elevation;
pub mod gate;
pub mod resource;
pub mod session;
pub mod types;

pub use client::{AuthorizationApi, AuthzClientConfig, AuthzRpcClient};
pub use elevation::{ElevationConfig, ElevationGate};
pub use gate::{AccessDecision, AccessGate, GateConfig};
pub use resource::AFFILIATE_PLACEHOLDER;
pub use session::{Session, SessionHandle, SessionStore};
pub use types::*;
