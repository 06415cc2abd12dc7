/// GameSession: everything one play-through owns.
///
/// Built once from the viewport, the shuffled pools and the random source;
/// afterwards only the robot moves. The roster order is fixed:
/// `ROBOT`, `KITTEN`, then the bogus items.
///
/// ## Touch policy
///
/// Touching a bogus item reveals its message AND moves robot onto the
/// item's cell. The renderer repaints the item once robot walks off.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::entity::{Entity, Palette, Position, Step, BOGUS, KITTEN, ROBOT};
use crate::domain::glyphs::GlyphPool;
use crate::domain::messages::MessagePool;
use crate::domain::placement::{self, Bounds, FRAME};
use crate::domain::touch::{classify_cell, Touch};
use crate::error::{GameError, GameResult};

use super::event::GameEvent;

pub struct GameSession {
    pub bounds: Bounds,
    pub has_color: bool,
    pub border: Palette,
    pub roster: Vec<Entity>,
    pub messages: MessagePool,
    /// Last horizontal approach, consumed by the win animation.
    pub from_right: bool,
    /// Text currently on the message line.
    pub banner: String,
}

impl GameSession {
    /// Place robot, kitten and up to `requested` bogus items.
    ///
    /// The count is clamped to what the message pool can describe. Fails
    /// with `ScreenTooSmall` before anything is placed.
    pub fn new<R: Rng + ?Sized>(
        bounds: Bounds,
        has_color: bool,
        requested: usize,
        messages: MessagePool,
        glyphs: &GlyphPool,
        rng: &mut R,
    ) -> GameResult<Self> {
        let count = if requested > messages.capacity() {
            warn!(
                requested,
                available = messages.capacity(),
                "not enough NKIs, clamping item count"
            );
            messages.capacity()
        } else {
            requested
        };

        placement::check_capacity(bounds, count)?;

        let robot_pos = placement::place_robot(bounds, rng);
        let kitten_pos = placement::place_kitten(bounds, robot_pos, rng);
        let decoy_pos = placement::place_decoys(count, bounds, &[robot_pos, kitten_pos], rng);

        let mut roster = Vec::with_capacity(BOGUS + count);
        roster.push(Entity::robot(robot_pos));
        roster.push(random_item(kitten_pos, glyphs, None, rng));
        for (i, pos) in decoy_pos.into_iter().enumerate() {
            // Item at roster index n reads message slot n.
            roster.push(random_item(pos, glyphs, Some(BOGUS + i), rng));
        }

        info!(
            rows = bounds.rows,
            cols = bounds.cols,
            items = count,
            "session placed"
        );
        debug!(robot = ?robot_pos, kitten = ?kitten_pos, "key positions");

        Ok(GameSession {
            bounds,
            has_color,
            border: Palette::White,
            roster,
            messages,
            from_right: false,
            banner: String::new(),
        })
    }

    pub fn robot(&self) -> &Entity {
        &self.roster[ROBOT]
    }

    pub fn kitten(&self) -> &Entity {
        &self.roster[KITTEN]
    }

    pub fn bogus_count(&self) -> usize {
        self.roster.len() - BOGUS
    }

    /// Description of a bogus item. Robot and kitten have none.
    pub fn message_for(&self, item: usize) -> &str {
        match self.roster.get(item).and_then(|e| e.message) {
            Some(slot) => self.messages.message_at(slot),
            None => "",
        }
    }

    /// The non-robot entity drawn on `pos`, if any.
    pub fn item_at(&self, pos: Position) -> Option<&Entity> {
        self.roster.iter().skip(1).find(|e| e.pos == pos)
    }

    /// Apply one movement key.
    pub fn step(&mut self, step: Step) -> GameEvent {
        if let Some(from_right) = step.from_right {
            self.from_right = from_right;
        }

        let from = self.robot().pos;
        let to = from.offset(step.dx, step.dy);
        if !self.bounds.contains(to) {
            return GameEvent::Blocked;
        }

        match classify_cell(&self.roster, to) {
            Touch::Empty => {
                self.roster[ROBOT].pos = to;
                GameEvent::Moved { from, to }
            }
            Touch::Robot => GameEvent::Stayed,
            Touch::Kitten => {
                info!(at = ?to, "robot found kitten");
                GameEvent::FoundKitten
            }
            Touch::Bogus(item) => {
                self.roster[ROBOT].pos = to;
                self.banner = self.message_for(item).to_string();
                debug!(item, "touched bogus item");
                GameEvent::Revealed { from, to, item }
            }
        }
    }

    /// Accept a new viewport, or fail if it would cut off any entity.
    pub fn resize(&mut self, rows: u16, cols: u16) -> GameResult<()> {
        let xbound = self.roster.iter().map(|e| e.pos.x).max().unwrap_or(0);
        let ybound = self.roster.iter().map(|e| e.pos.y).max().unwrap_or(0);

        if xbound >= cols as i32 - FRAME || ybound >= rows as i32 - FRAME {
            warn!(rows, cols, xbound, ybound, "resize hid entities");
            return Err(GameError::SimulationCrushed);
        }

        debug!(rows, cols, "viewport resized");
        self.bounds = Bounds::new(rows, cols);
        Ok(())
    }
}

fn random_item<R: Rng + ?Sized>(
    pos: Position,
    glyphs: &GlyphPool,
    message: Option<usize>,
    rng: &mut R,
) -> Entity {
    let glyph = glyphs.draw(rng).to_string();
    let color = Palette::ITEM_COLORS[rng.gen_range(0..Palette::ITEM_COLORS.len())];
    let bold = rng.gen_bool(0.5);
    Entity::item(pos, &glyph, color, bold, message)
}
