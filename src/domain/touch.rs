/// Touch resolution: what robot finds in a cell it is about to enter.

use super::entity::{Entity, Position, Role};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Touch {
    Empty,
    Robot,
    Kitten,
    /// Roster index of the bogus item.
    Bogus(usize),
}

/// Linear scan; the first entity on the cell wins.
pub fn classify_cell(roster: &[Entity], pos: Position) -> Touch {
    match roster.iter().position(|e| e.pos == pos) {
        None => Touch::Empty,
        Some(i) => match Role::of(i) {
            Role::Robot => Touch::Robot,
            Role::Kitten => Touch::Kitten,
            Role::Bogus => Touch::Bogus(i),
        },
    }
}
