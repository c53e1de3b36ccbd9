//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, error capture)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (recorded in the span and returned to the client)
//! 4. Session layer (tower-sessions)
//!
//! Authentication is an extractor, not a layer: handlers that take
//! [`RequireAuth`] reject anonymous requests with a 401 JSON body.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, clear_current_user, set_current_user};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer, session_layer};
