mod config;
mod error;
mod game;
mod observer;
mod recording;
mod remote;
#[cfg(test)]
mod scenarios;
pub use config::*;
pub use error::*;
pub use game::*;
pub use observer::*;
pub use recording::*;
pub use remote::*;
