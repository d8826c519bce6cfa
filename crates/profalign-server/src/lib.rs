//! ProfAlign HTTP server library (router, handlers and wire types).
//!
//! The `profalign` binary wires these onto a real [`profalign::HttpEngine`]; the
//! integration tests wire them onto `MockEngine`.

pub mod gateway;

pub use gateway::{HandlerState, cors_layer, create_router_with_state};
