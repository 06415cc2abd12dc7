/// Render surface: the only way the game touches the terminal.
///
/// `Surface` is the contract the renderer, the animation and the game
/// loop draw against. `TerminalSurface` implements it with crossterm;
/// tests use `testing::ScriptedSurface`, which records every call and
/// replays canned input.
///
/// Rows and columns are zero-based screen coordinates.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{self, Event, KeyEventKind},
    execute, queue,
    style::{self, Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Palette, Style};

use super::input::{InputEvent, Key};

pub trait Surface {
    fn clear(&mut self) -> io::Result<()>;

    /// Draw `glyph` at a cell. `color: None` means default attributes.
    fn draw_glyph_at(
        &mut self,
        row: u16,
        col: u16,
        glyph: &str,
        color: Option<Palette>,
        style: Style,
    ) -> io::Result<()>;

    fn set_cursor(&mut self, row: u16, col: u16) -> io::Result<()>;

    /// Clear one line and write `text` from column 0.
    fn show_line(&mut self, row: u16, text: &str) -> io::Result<()>;

    fn refresh(&mut self) -> io::Result<()>;

    fn beep(&mut self) -> io::Result<()>;

    fn hide_cursor(&mut self) -> io::Result<()>;

    /// `(rows, cols)`.
    fn dimensions(&self) -> io::Result<(u16, u16)>;

    fn has_color(&self) -> bool;

    /// Block until the next event the game cares about.
    fn read_event(&mut self) -> io::Result<InputEvent>;

    fn restore(&mut self) -> io::Result<()>;
}

// ══════════════════════════════════════════════════════════════
// crossterm backend
// ══════════════════════════════════════════════════════════════

pub struct TerminalSurface {
    writer: BufWriter<io::Stdout>,
    active: bool,
    color: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        TerminalSurface {
            writer: BufWriter::with_capacity(8192, io::stdout()),
            active: false,
            color: false,
        }
    }

    /// Raw mode + alternate screen. Ctrl-C stops raising SIGINT and
    /// arrives as a key instead.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        execute!(self.writer, terminal::EnterAlternateScreen, Clear(ClearType::All))?;
        self.color = style::available_color_count() >= 8;
        Ok(())
    }
}

fn to_color(p: Palette) -> Color {
    match p {
        Palette::Green => Color::DarkGreen,
        Palette::Red => Color::DarkRed,
        Palette::Yellow => Color::DarkYellow,
        Palette::Blue => Color::DarkBlue,
        Palette::Magenta => Color::DarkMagenta,
        Palette::Cyan => Color::DarkCyan,
        Palette::White => Color::Grey,
    }
}

impl Surface for TerminalSurface {
    fn clear(&mut self) -> io::Result<()> {
        queue!(self.writer, SetAttribute(Attribute::Reset), Clear(ClearType::All))
    }

    fn draw_glyph_at(
        &mut self,
        row: u16,
        col: u16,
        glyph: &str,
        color: Option<Palette>,
        style: Style,
    ) -> io::Result<()> {
        queue!(self.writer, MoveTo(col, row))?;
        if let Some(p) = color {
            queue!(self.writer, SetForegroundColor(to_color(p)), SetBackgroundColor(Color::Black))?;
            if style.bold {
                queue!(self.writer, SetAttribute(Attribute::Bold))?;
            }
            if style.reverse {
                queue!(self.writer, SetAttribute(Attribute::Reverse))?;
            }
        }
        queue!(self.writer, Print(glyph), SetAttribute(Attribute::Reset))
    }

    fn set_cursor(&mut self, row: u16, col: u16) -> io::Result<()> {
        queue!(self.writer, MoveTo(col, row))
    }

    fn show_line(&mut self, row: u16, text: &str) -> io::Result<()> {
        queue!(
            self.writer,
            SetAttribute(Attribute::Reset),
            MoveTo(0, row),
            Clear(ClearType::CurrentLine),
            Print(text)
        )
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn beep(&mut self) -> io::Result<()> {
        queue!(self.writer, Print('\x07'))
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.writer, cursor::Hide)
    }

    fn dimensions(&self) -> io::Result<(u16, u16)> {
        let (cols, rows) = terminal::size()?;
        Ok((rows, cols))
    }

    fn has_color(&self) -> bool {
        self.color
    }

    fn read_event(&mut self) -> io::Result<InputEvent> {
        loop {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    let key = Key::from_event(&k);
                    if key.is_interrupt() {
                        return Ok(InputEvent::Interrupt);
                    }
                    return Ok(InputEvent::Key(key));
                }
                Event::Resize(cols, rows) => return Ok(InputEvent::Resize { rows, cols }),
                _ => {}
            }
        }
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            self.writer,
            ResetColor,
            SetAttribute(Attribute::Reset),
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

// ══════════════════════════════════════════════════════════════
// Test double
// ══════════════════════════════════════════════════════════════
