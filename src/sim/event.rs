/// Outcome of a single robot step.
/// The presentation layer decides what to redraw from these.

use crate::domain::entity::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Destination outside the interior. Ignored without a message.
    Blocked,
    /// Robot walked into its own cell. Nothing changes.
    Stayed,
    /// Robot moved onto an empty cell.
    Moved { from: Position, to: Position },
    /// Robot touched a bogus item and now stands on it.
    Revealed { from: Position, to: Position, item: usize },
    FoundKitten,
}

/// How a session ended without a fatal error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    FoundKitten,
    /// Ctrl-C. Counts as a graceful exit.
    Interrupted,
    /// The quit key. Robot gave up.
    Quit,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::FoundKitten | Outcome::Interrupted => 0,
            Outcome::Quit => 1,
        }
    }
}
