/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// The file is only ever read; the game keeps no state between runs.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub game: GameSettings,
    pub messages: MessageSettings,
    pub log_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct GameSettings {
    /// Default item count; `-n` overrides. Must be positive.
    pub num_bogus: i64,
    pub show_intro: bool,
    pub bell: bool,
    pub animation_frame_ms: u64,
    /// Custom item glyphs, one per char. Empty = printable ASCII.
    pub glyphs: String,
}

#[derive(Clone, Debug)]
pub struct MessageSettings {
    pub dirs: Vec<PathBuf>,
    pub builtin: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    messages: TomlMessages,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_num_bogus")]
    num_bogus: i64,
    #[serde(default = "default_true")]
    show_intro: bool,
    #[serde(default = "default_true")]
    bell: bool,
    #[serde(default = "default_frame_ms")]
    animation_frame_ms: u64,
    #[serde(default)]
    glyphs: String,
}

#[derive(Deserialize, Debug)]
struct TomlMessages {
    #[serde(default)]
    dirs: Vec<String>,
    #[serde(default = "default_true")]
    builtin: bool,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    log_dir: String,
}

// ── Defaults ──

fn default_num_bogus() -> i64 { 20 }
fn default_true() -> bool { true }
fn default_frame_ms() -> u64 { 1000 }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            num_bogus: default_num_bogus(),
            show_intro: true,
            bell: true,
            animation_frame_ms: default_frame_ms(),
            glyphs: String::new(),
        }
    }
}

impl Default for TomlMessages {
    fn default() -> Self {
        TomlMessages {
            dirs: Vec::new(),
            builtin: true,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        Self::from_toml(load_toml(&candidate_dirs()))
    }

    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Self::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let log_dir = if cfg.general.log_dir.trim().is_empty() {
            default_log_dir()
        } else {
            Some(PathBuf::from(cfg.general.log_dir))
        };

        GameConfig {
            game: GameSettings {
                num_bogus: cfg.game.num_bogus,
                show_intro: cfg.game.show_intro,
                bell: cfg.game.bell,
                animation_frame_ms: cfg.game.animation_frame_ms,
                glyphs: cfg.game.glyphs,
            },
            messages: MessageSettings {
                dirs: cfg.messages.dirs.into_iter().map(PathBuf::from).collect(),
                builtin: cfg.messages.builtin,
            },
            log_dir,
        }
    }
}

/// `$XDG_CACHE_HOME/robotfindskitten/logs`, else `~/.cache/...`.
fn default_log_dir() -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".cache")))?;
    Some(cache.join("robotfindskitten").join("logs"))
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so /usr/games/robotfindskitten finds its real home.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
