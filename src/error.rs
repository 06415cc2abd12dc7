/// Fatal error taxonomy.
///
/// Recoverable conditions (an unmapped key, a move into the wall) are not
/// errors; they surface as `GameEvent`s and the loop keeps going.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("No NKIs found.")]
    EmptyCorpus,

    #[error("{0}")]
    InvalidConfiguration(String),

    #[error("Screen too small to fit all objects! (need {needed} cells, have {available})")]
    ScreenTooSmall { needed: usize, available: usize },

    #[error("You crushed the simulation. And robot. And kitten.")]
    SimulationCrushed,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl GameError {
    /// Process exit code for this failure. Every variant is distinct.
    pub fn exit_code(&self) -> u8 {
        match self {
            GameError::Io(_) => 1,
            GameError::InvalidConfiguration(_) => 2,
            GameError::EmptyCorpus => 3,
            GameError::ScreenTooSmall { .. } => 4,
            GameError::SimulationCrushed => 5,
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;
