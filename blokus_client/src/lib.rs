//! Client side of a two-player polyomino game played over a websocket.
//!
//! A [`Session`] owns the connection and a [`Store`] with the current
//! [`GameState`](blokus::GameState). Server messages are reconciled into the
//! store in the order they arrive.
pub use error::*;
pub use session::*;
pub use store::*;

mod error;
mod session;
mod store;
pub mod transport;
