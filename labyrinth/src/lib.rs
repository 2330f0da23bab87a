pub use action::*;
pub use board::*;
pub use color::*;
pub use coordinate::*;
pub use errors::*;
pub use gem::*;
pub use player_state::*;
pub use protocol::*;
pub use random::*;
pub use slide::*;
pub use state::*;
pub use strategy::*;
pub use tile::*;
pub use visualization::*;

mod action;
#[cfg(test)]
mod arbitrary;
mod board;
mod color;
mod coordinate;
mod errors;
mod gem;
mod player_state;
mod protocol;
mod random;
pub mod rules;
mod slide;
mod state;
mod strategy;
mod tile;
mod visualization;
