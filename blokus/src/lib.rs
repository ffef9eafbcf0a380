pub use board::*;
pub use errors::*;
pub use game_state::*;
pub use inventory::*;
pub use orientation::*;
pub use pieces::*;
pub use protocol::*;
pub use scoring::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod errors;
mod game_state;
mod inventory;
mod orientation;
mod pieces;
mod protocol;
mod scoring;
mod visualization;
