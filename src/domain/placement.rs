/// Entity placement: random, pairwise-distinct cells inside the frame.
///
/// Screen layout, top to bottom:
///   row 0            title line
///   row 1            message line
///   row HEADER       top edge of the frame
///   ...              interior
///   row rows-1       bottom edge of the frame
///
/// Placement is rejection sampling. `check_capacity` must pass first so
/// that every sampling loop is guaranteed to find a free cell.

use rand::Rng;

use super::entity::Position;
use crate::error::{GameError, GameResult};

/// Rows above the frame (title + message line).
pub const HEADER: i32 = 2;
/// Frame thickness on every side.
pub const FRAME: i32 = 1;

/// Viewport dimensions and the interior they imply.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bounds {
    pub rows: u16,
    pub cols: u16,
}

impl Bounds {
    pub fn new(rows: u16, cols: u16) -> Self {
        Bounds { rows, cols }
    }

    pub fn min_x(&self) -> i32 {
        FRAME
    }

    /// Exclusive.
    pub fn max_x(&self) -> i32 {
        self.cols as i32 - FRAME
    }

    pub fn min_y(&self) -> i32 {
        HEADER + FRAME
    }

    /// Exclusive.
    pub fn max_y(&self) -> i32 {
        self.rows as i32 - FRAME
    }

    pub fn interior_width(&self) -> i32 {
        (self.max_x() - self.min_x()).max(0)
    }

    pub fn interior_height(&self) -> i32 {
        (self.max_y() - self.min_y()).max(0)
    }

    pub fn interior_area(&self) -> usize {
        self.interior_width() as usize * self.interior_height() as usize
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min_x() && pos.x < self.max_x()
            && pos.y >= self.min_y() && pos.y < self.max_y()
    }

    /// Uniform interior cell. Caller guarantees a non-empty interior.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let x = rng.gen_range(self.min_x()..self.max_x());
        let y = rng.gen_range(self.min_y()..self.max_y());
        Position::new(x, y)
    }
}

/// Refuse to start when the screen cannot hold robot, kitten and `count`
/// decoys. Runs before anything is placed or drawn.
pub fn check_capacity(bounds: Bounds, count: usize) -> GameResult<()> {
    let needed = count + 2;
    // Classic rule: rows below the header, times full width.
    let coarse = (bounds.rows as i64 - HEADER as i64 - FRAME as i64) * bounds.cols as i64;
    let available = bounds.interior_area();
    if coarse < needed as i64 || available < needed {
        return Err(GameError::ScreenTooSmall { needed, available });
    }
    Ok(())
}

pub fn place_robot<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Position {
    bounds.random_position(rng)
}

pub fn place_kitten<R: Rng + ?Sized>(bounds: Bounds, robot: Position, rng: &mut R) -> Position {
    loop {
        let pos = bounds.random_position(rng);
        if pos != robot {
            return pos;
        }
    }
}

/// Positions for `count` decoys, distinct from `occupied` and each other.
/// Quadratic in `count`, which stays in the tens.
pub fn place_decoys<R: Rng + ?Sized>(
    count: usize,
    bounds: Bounds,
    occupied: &[Position],
    rng: &mut R,
) -> Vec<Position> {
    let mut placed: Vec<Position> = Vec::with_capacity(count);
    for _ in 0..count {
        let pos = loop {
            let p = bounds.random_position(rng);
            if occupied.contains(&p) || placed.contains(&p) {
                continue;
            }
            break p;
        };
        placed.push(pos);
    }
    placed
}
