/// Keyboard vocabulary.
///
/// Four key sets drive the same eight directions:
///   - Arrow keys, plus Home / PgUp / End / PgDn for the diagonals
///   - vi / NetHack letters `hjklyubn` (capitals too; running is a plain step)
///   - Emacs `C-n` `C-p` `C-f` `C-b` (no diagonals)
///   - Keypad digits with num-lock on: `1 2 3 4 6 7 8 9` (`5` unused)
///
/// The table is built once and looked up per key.

use std::collections::HashMap;
use std::sync::OnceLock;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::entity::Step;

/// A key as the game sees it: code plus whether Ctrl or Alt was held.
/// No binding uses Alt, so Meta-chords always read as invalid input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Key {
    pub code: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
}

impl Key {
    pub const fn plain(code: KeyCode) -> Self {
        Key { code, ctrl: false, alt: false }
    }

    pub const fn ch(c: char) -> Self {
        Key::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Key { code: KeyCode::Char(c), ctrl: true, alt: false }
    }

    pub fn from_event(ev: &KeyEvent) -> Self {
        let ctrl = ev.modifiers.contains(KeyModifiers::CONTROL);
        let alt = ev.modifiers.contains(KeyModifiers::ALT);
        let code = match ev.code {
            // Ctrl combos are case-insensitive, like the control byte they stand for.
            KeyCode::Char(c) if ctrl => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Key { code, ctrl, alt }
    }

    pub fn is_interrupt(&self) -> bool {
        *self == Key::ctrl('c')
    }
}

/// Everything the blocking read can hand to the game loop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    Key(Key),
    Resize { rows: u16, cols: u16 },
    Interrupt,
}

/// What a key means while playing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Step),
    Redraw,
    Quit,
    Invalid,
}

// ── Directions ──

const UP_LEFT: Step = Step::new(-1, -1, Some(true));
const UP: Step = Step::new(0, -1, Some(true));
const UP_RIGHT: Step = Step::new(1, -1, None);
const LEFT: Step = Step::new(-1, 0, Some(true));
const RIGHT: Step = Step::new(1, 0, Some(false));
const DOWN_LEFT: Step = Step::new(-1, 1, Some(true));
const DOWN: Step = Step::new(0, 1, None);
const DOWN_RIGHT: Step = Step::new(1, 1, None);

/// (keys, step) rows of the movement table.
const BINDINGS: &[(&[Key], Step)] = &[
    (&[Key::ch('y'), Key::ch('Y'), Key::ch('7'), Key::plain(KeyCode::Home)], UP_LEFT),
    (&[Key::ch('k'), Key::ch('K'), Key::ch('8'), Key::plain(KeyCode::Up), Key::ctrl('p')], UP),
    (&[Key::ch('u'), Key::ch('U'), Key::ch('9'), Key::plain(KeyCode::PageUp)], UP_RIGHT),
    (&[Key::ch('h'), Key::ch('H'), Key::ch('4'), Key::plain(KeyCode::Left), Key::ctrl('b')], LEFT),
    (&[Key::ch('l'), Key::ch('L'), Key::ch('6'), Key::plain(KeyCode::Right), Key::ctrl('f')], RIGHT),
    (&[Key::ch('b'), Key::ch('B'), Key::ch('1'), Key::plain(KeyCode::End)], DOWN_LEFT),
    (&[Key::ch('j'), Key::ch('J'), Key::ch('2'), Key::plain(KeyCode::Down), Key::ctrl('n')], DOWN),
    (&[Key::ch('n'), Key::ch('N'), Key::ch('3'), Key::plain(KeyCode::PageDown)], DOWN_RIGHT),
];

const REDRAW_KEY: Key = Key::ctrl('l');
const QUIT_KEYS: [Key; 2] = [Key::ch('q'), Key::ch('Q')];

fn keymap() -> &'static HashMap<Key, Command> {
    static KEYMAP: OnceLock<HashMap<Key, Command>> = OnceLock::new();
    KEYMAP.get_or_init(|| {
        let mut map = HashMap::with_capacity(48);
        for (keys, step) in BINDINGS {
            for key in keys.iter() {
                map.insert(*key, Command::Move(*step));
            }
        }
        map.insert(REDRAW_KEY, Command::Redraw);
        for key in QUIT_KEYS {
            map.insert(key, Command::Quit);
        }
        map
    })
}

pub fn command_for(key: Key) -> Command {
    keymap().get(&key).copied().unwrap_or(Command::Invalid)
}
