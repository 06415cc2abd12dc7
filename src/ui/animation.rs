/// Win animation: robot and kitten slide together on the message line.
///
/// Four frames, `i` counting down from 4. Each frame blanks both glyphs,
/// moves them to `meet ± i` on the message line, repaints the two
/// originals where the story started (robot in reverse video), then
/// pauses. Robot arrives from the side it last approached from.

use std::io;
use std::thread;
use std::time::Duration;

use crate::domain::entity::{KITTEN, ROBOT};
use crate::sim::session::GameSession;

use super::renderer::{self, MESSAGE_ROW};
use super::surface::Surface;

pub const WIN_MESSAGE: &str = "You found kitten! Way to go, robot!";

const FRAMES: i32 = 4;

/// Where robot and kitten stand on frame `i`.
pub fn frame_columns(meet: i32, i: i32, from_right: bool) -> (i32, i32) {
    if from_right {
        (meet + i, meet - i + 1)
    } else {
        (meet - i + 1, meet + i)
    }
}

pub fn play<S: Surface + ?Sized>(
    surface: &mut S,
    session: &mut GameSession,
    pause: Duration,
) -> io::Result<()> {
    surface.show_line(MESSAGE_ROW, "")?;

    let meet = session.bounds.cols as i32 / 2;
    let last_col = (session.bounds.cols as i32 - 1).max(0);
    let kitten_start = session.kitten().clone();
    let mut robot_start = session.robot().clone();
    robot_start.style.reverse = true;

    for i in (1..=FRAMES).rev() {
        for idx in [ROBOT, KITTEN] {
            let e = &session.roster[idx];
            renderer::erase(surface, session, e.pos, e.width())?;
        }

        let (robot_x, kitten_x) = frame_columns(meet, i, session.from_right);
        let robot_x = robot_x.clamp(0, last_col);
        let kitten_x = kitten_x.clamp(0, last_col);
        session.roster[ROBOT].pos.x = robot_x;
        session.roster[ROBOT].pos.y = MESSAGE_ROW as i32;
        session.roster[KITTEN].pos.x = kitten_x;
        session.roster[KITTEN].pos.y = MESSAGE_ROW as i32;

        renderer::draw_entity(surface, session, &kitten_start)?;
        renderer::draw_entity(surface, session, &robot_start)?;
        renderer::draw_entity(surface, session, session.robot())?;
        renderer::draw_entity(surface, session, session.kitten())?;

        surface.set_cursor(MESSAGE_ROW, robot_x as u16)?;
        surface.refresh()?;
        nap(pause);
    }

    session.banner = WIN_MESSAGE.to_string();
    renderer::show_banner(surface, session)?;
    surface.hide_cursor()?;
    surface.refresh()?;
    nap(pause);
    Ok(())
}

fn nap(pause: Duration) {
    if !pause.is_zero() {
        thread::sleep(pause);
    }
}
