pub mod clock;
pub mod deck;
pub mod engine;
pub mod session;

pub use crate::domain::model::{BoardSnapshot, Command, Phase};
pub use crate::domain::ports::{GameView, HintOracle, ScoreReporter};
pub use crate::utils::error::Result;
