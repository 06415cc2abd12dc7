/// Presentation layer: turns session state into surface calls.
///
/// Nothing here owns state. Every function takes the surface and the
/// session it draws from, so the game loop decides when to paint.
///
/// Screen contract:
///   - `draw_screen` repaints everything (title, banner, frame, entities)
///   - `apply_event` paints only the cells a step touched
///   - `show_banner` rewrites the message line
///
/// The robot is painted last so it sits on top of an item it stands on,
/// and the cursor is parked on the robot after every update.

use std::io;

use unicode_width::UnicodeWidthChar;

use crate::domain::entity::{Entity, Position, Style};
use crate::domain::placement::HEADER;
use crate::sim::event::GameEvent;
use crate::sim::session::GameSession;

use super::surface::Surface;

pub const TITLE_ROW: u16 = 0;
pub const MESSAGE_ROW: u16 = 1;

pub const INVALID_INPUT: &str = "Invalid input: Use direction keys or q.";

pub fn title() -> String {
    format!("robotfindskitten {}", env!("CARGO_PKG_VERSION"))
}

const INSTRUCTIONS: &[&str] = &[
    "By the illustrious Leonard Richardson (C) 1997, 2000",
    "Written originally for the Nerth Pork robotfindskitten contest",
    "",
    "In this game, you are robot (#). Your job is to find kitten. This task",
    "is complicated by the existence of various things which are not kitten.",
    "Robot must touch items to determine if they are kitten or not. The game",
    "ends when robotfindskitten. Alternatively, you may end the game by hitting",
    "the q key or a good old-fashioned Ctrl-C.",
    "",
    "See the documentation for more information.",
    "",
    "Press any key to start.",
];

// ── Single cells ──

pub fn draw_entity<S: Surface + ?Sized>(
    surface: &mut S,
    session: &GameSession,
    entity: &Entity,
) -> io::Result<()> {
    let color = session.has_color.then_some(entity.color);
    surface.draw_glyph_at(
        entity.pos.y as u16,
        entity.pos.x as u16,
        &entity.glyph,
        color,
        entity.style,
    )
}

/// Blank `width` cells starting at `pos`.
pub fn erase<S: Surface + ?Sized>(
    surface: &mut S,
    session: &GameSession,
    pos: Position,
    width: usize,
) -> io::Result<()> {
    let color = session.has_color.then_some(session.border);
    surface.draw_glyph_at(pos.y as u16, pos.x as u16, &" ".repeat(width), color, Style::default())
}

/// Whatever belongs on `pos` once the robot has left it.
fn repaint_cell<S: Surface + ?Sized>(
    surface: &mut S,
    session: &GameSession,
    pos: Position,
) -> io::Result<()> {
    match session.item_at(pos) {
        Some(item) => draw_entity(surface, session, item),
        None => erase(surface, session, pos, 1),
    }
}

fn park_cursor<S: Surface + ?Sized>(surface: &mut S, session: &GameSession) -> io::Result<()> {
    let robot = session.robot().pos;
    surface.set_cursor(robot.y as u16, robot.x as u16)
}

/// Cut `text` so it fills at most `cols` display columns.
fn fit(text: &str, cols: u16) -> &str {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > cols as usize {
            return &text[..i];
        }
    }
    text
}

// ── Lines ──

pub fn show_banner<S: Surface + ?Sized>(surface: &mut S, session: &GameSession) -> io::Result<()> {
    surface.show_line(MESSAGE_ROW, fit(&session.banner, session.bounds.cols))?;
    park_cursor(surface, session)?;
    surface.refresh()
}

// ── Whole screen ──

pub fn draw_frame<S: Surface + ?Sized>(surface: &mut S, session: &GameSession) -> io::Result<()> {
    let rows = session.bounds.rows;
    let cols = session.bounds.cols;
    let top = HEADER as u16;
    if cols < 2 || rows <= top + 1 {
        return Ok(());
    }

    let color = session.has_color.then_some(session.border);
    let plain = Style::default();
    let span = "─".repeat(cols as usize - 2);

    surface.draw_glyph_at(top, 0, &format!("┌{span}┐"), color, plain)?;
    for row in top + 1..rows - 1 {
        surface.draw_glyph_at(row, 0, "│", color, plain)?;
        surface.draw_glyph_at(row, cols - 1, "│", color, plain)?;
    }
    surface.draw_glyph_at(rows - 1, 0, &format!("└{span}┘"), color, plain)
}

pub fn draw_screen<S: Surface + ?Sized>(surface: &mut S, session: &GameSession) -> io::Result<()> {
    surface.clear()?;
    draw_frame(surface, session)?;
    surface.show_line(TITLE_ROW, fit(&title(), session.bounds.cols))?;
    surface.show_line(MESSAGE_ROW, fit(&session.banner, session.bounds.cols))?;
    for entity in session.roster.iter().rev() {
        draw_entity(surface, session, entity)?;
    }
    park_cursor(surface, session)?;
    surface.refresh()
}

/// Paint the result of one step.
pub fn apply_event<S: Surface + ?Sized>(
    surface: &mut S,
    session: &GameSession,
    event: &GameEvent,
) -> io::Result<()> {
    match *event {
        GameEvent::Moved { from, to } | GameEvent::Revealed { from, to, .. } => {
            repaint_cell(surface, session, from)?;
            draw_entity(surface, session, session.robot())?;
            if let GameEvent::Revealed { item, .. } = *event {
                surface.show_line(MESSAGE_ROW, fit(session.message_for(item), session.bounds.cols))?;
            }
            surface.set_cursor(to.y as u16, to.x as u16)?;
            surface.refresh()
        }
        GameEvent::Blocked | GameEvent::Stayed | GameEvent::FoundKitten => Ok(()),
    }
}

pub fn show_instructions<S: Surface + ?Sized>(surface: &mut S, cols: u16) -> io::Result<()> {
    surface.clear()?;
    surface.show_line(0, fit(&title(), cols))?;
    for (i, line) in INSTRUCTIONS.iter().enumerate() {
        surface.show_line(i as u16 + 1, fit(line, cols))?;
    }
    surface.refresh()
}
