/// Entities: the robot, the kitten, and the bogus items.
/// Every entity is a screen object: a cell, a glyph, and its attributes.
/// Only decoys carry a message index.

use unicode_width::UnicodeWidthStr;

/// Roster index of the player's robot.
pub const ROBOT: usize = 0;
/// Roster index of the kitten.
pub const KITTEN: usize = 1;
/// First roster index used by bogus items.
pub const BOGUS: usize = 2;

/// The robot's glyph. Never handed out to kitten or decoys.
pub const ROBOT_GLYPH: &str = "#";

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Position { x: self.x + dx, y: self.y + dy }
    }
}

/// One accepted movement key: a unit step plus its effect on the
/// approach direction used by the win animation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Step {
    pub dx: i32,
    pub dy: i32,
    /// `Some(true)` marks an approach from the right, `Some(false)` from
    /// the left, `None` leaves the previous approach in place.
    pub from_right: Option<bool>,
}

impl Step {
    pub const fn new(dx: i32, dy: i32, from_right: Option<bool>) -> Self {
        Step { dx, dy, from_right }
    }
}

/// Color selector. Mirrors the classic eight-color palette minus black;
/// `White` is reserved for the robot, the frame and the text lines.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Palette {
    Green,
    Red,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Palette {
    /// Colors handed out to kitten and decoys (everything but white).
    pub const ITEM_COLORS: [Palette; 6] = [
        Palette::Green,
        Palette::Red,
        Palette::Yellow,
        Palette::Blue,
        Palette::Magenta,
        Palette::Cyan,
    ];
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Style {
    pub bold: bool,
    pub reverse: bool,
}

/// Which part an entity plays, derived from its roster index.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Robot,
    Kitten,
    Bogus,
}

impl Role {
    pub fn of(index: usize) -> Self {
        match index {
            ROBOT => Role::Robot,
            KITTEN => Role::Kitten,
            _ => Role::Bogus,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub pos: Position,
    pub glyph: String,
    pub color: Palette,
    pub style: Style,
    /// Index into the message pool. `None` for robot and kitten.
    pub message: Option<usize>,
}

impl Entity {
    /// We are a timid robot: white, never bold.
    pub fn robot(pos: Position) -> Self {
        Entity {
            pos,
            glyph: ROBOT_GLYPH.to_string(),
            color: Palette::White,
            style: Style::default(),
            message: None,
        }
    }

    pub fn item(pos: Position, glyph: &str, color: Palette, bold: bool, message: Option<usize>) -> Self {
        Entity {
            pos,
            glyph: glyph.to_string(),
            color,
            style: Style { bold, reverse: false },
            message,
        }
    }

    /// Display columns taken by the glyph.
    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.glyph.as_str()).max(1)
    }
}
