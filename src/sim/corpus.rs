/// NKI corpus loader.
///
/// ## Sources (all are read, in this order):
///   1. `/usr/share/games/robotfindskitten`
///   2. `$HOME/.robotfindskitten`
///   3. `./nki`
///   4. Extra directories from config and the command line
///
/// Falls back to the embedded `vanilla.nki` when nothing was found and
/// the built-in corpus is enabled.
///
/// ## NKI format:
///   One message per line (`\n` or `\r` terminated).
///   Blank lines and lines starting with `#` are skipped.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

const SYSTEM_NKI_DIR: &str = "/usr/share/games/robotfindskitten";
const USER_NKI_DIR: &str = ".robotfindskitten";
const LOCAL_NKI_DIR: &str = "nki";
const NKI_EXT: &str = "nki";

const BUILTIN_NKI: &str = include_str!("vanilla.nki");

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Collect every message from the standard and `extra` directories.
pub fn load(extra: &[PathBuf], builtin: bool) -> Vec<String> {
    let mut messages = Vec::new();
    for dir in search_dirs(extra) {
        read_dir_messages(&dir, &mut messages);
    }

    if messages.is_empty() && builtin {
        info!("no NKI files found, using built-in corpus");
        messages.extend(parse_nki(BUILTIN_NKI));
    } else {
        info!(count = messages.len(), "loaded NKIs");
    }
    messages
}

/// Messages from one NKI text.
pub fn parse_nki(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split(|c: char| c == '\n' || c == '\r')
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

// ══════════════════════════════════════════════════════════════
// Directory scanning
// ══════════════════════════════════════════════════════════════

fn search_dirs(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(SYSTEM_NKI_DIR)];

    if let Ok(home) = std::env::var("HOME") {
        dirs.push(PathBuf::from(home).join(USER_NKI_DIR));
    }

    dirs.push(PathBuf::from(LOCAL_NKI_DIR));

    for dir in extra {
        if !dirs.iter().any(|d| d == dir) {
            dirs.push(dir.clone());
        }
    }
    dirs
}

/// Append messages from every `*nki` regular file in `dir`.
/// Files are read in name order so a seed replays the same game.
fn read_dir_messages(dir: &Path, out: &mut Vec<String>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            debug!(dir = %dir.display(), "skipping NKI dir: {e}");
            return;
        }
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .map_or(false, |n| n.to_string_lossy().ends_with(NKI_EXT))
        })
        .collect();
    files.sort();

    for path in files {
        match std::fs::read(&path) {
            Ok(bytes) => {
                let before = out.len();
                out.extend(parse_nki(&String::from_utf8_lossy(&bytes)));
                debug!(file = %path.display(), count = out.len() - before, "read NKI file");
            }
            Err(e) => warn!(file = %path.display(), "could not read NKI file: {e}"),
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
