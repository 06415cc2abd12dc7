/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::glyphs::GlyphPool;
use domain::messages::MessagePool;
use domain::placement::Bounds;
use error::{GameError, GameResult};
use sim::corpus;
use sim::event::{GameEvent, Outcome};
use sim::session::GameSession;
use ui::animation;
use ui::input::{command_for, Command, InputEvent};
use ui::renderer;
use ui::surface::{Surface, TerminalSurface};

const LOG_FILE: &str = "robotfindskitten.log";

#[derive(Parser, Debug)]
#[command(name = "robotfindskitten", version, about = "Yet another zen simulation")]
struct Cli {
    /// Number of non-kitten items
    #[arg(short = 'n', long = "nitems", value_name = "N", allow_negative_numbers = true)]
    nitems: Option<i64>,

    /// Random seed (defaults to the current time)
    #[arg(short = 's', long = "seed", value_name = "SEED", allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Extra directory of .nki message files
    #[arg(long = "nki-dir", value_name = "DIR")]
    nki_dirs: Vec<PathBuf>,

    /// Skip the instructions screen
    #[arg(long)]
    no_intro: bool,
}

/// Everything the loop needs besides the session itself.
struct Setup {
    decoys: usize,
    show_intro: bool,
    bell: bool,
    frame_pause: Duration,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_exit(e),
    };

    let config = GameConfig::load();
    let _log_guard = config.log_dir.as_deref().and_then(setup_logging);

    match run(&cli, &config) {
        Ok(outcome) => {
            info!(?outcome, "session over");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            warn!(error = %e, "session failed");
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Help, version and unknown flags all exit 0. Bad values are fatal.
fn usage_exit(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
            let _ = e.print();
            ExitCode::from(GameError::InvalidConfiguration(String::new()).exit_code())
        }
        _ => {
            println!("{}", Cli::command().render_usage());
            ExitCode::SUCCESS
        }
    }
}

/// File-only logging: the terminal belongs to the game.
fn setup_logging(dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: could not create log dir {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn item_count(cli: Option<i64>, configured: i64) -> GameResult<usize> {
    let n = cli.unwrap_or(configured);
    if n <= 0 {
        return Err(GameError::InvalidConfiguration(
            "Argument must be positive.".to_string(),
        ));
    }
    Ok(n as usize)
}

fn default_seed() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Everything up to terminal setup, then one play-through.
fn run(cli: &Cli, config: &GameConfig) -> GameResult<Outcome> {
    let decoys = item_count(cli.nitems, config.game.num_bogus)?;
    let seed = cli.seed.unwrap_or_else(default_seed);
    info!(seed, decoys, "starting robotfindskitten");

    let mut dirs = config.messages.dirs.clone();
    dirs.extend(cli.nki_dirs.iter().cloned());

    let mut messages = MessagePool::new(corpus::load(&dirs, config.messages.builtin))?;
    let mut rng = StdRng::seed_from_u64(seed as u64);
    messages.shuffle(&mut rng);

    let mut glyphs = if config.game.glyphs.is_empty() {
        GlyphPool::printable()
    } else {
        GlyphPool::from_glyphs(config.game.glyphs.chars().map(String::from))
    };
    glyphs.shuffle(&mut rng);

    let setup = Setup {
        decoys,
        show_intro: config.game.show_intro && !cli.no_intro,
        bell: config.game.bell,
        frame_pause: Duration::from_millis(config.game.animation_frame_ms),
    };

    let mut surface = TerminalSurface::new();
    surface.init()?;
    let result = play(&mut surface, &setup, messages, &glyphs, &mut rng);
    // Report only once the terminal is back in cooked mode.
    finish(result, surface.restore())
}

/// A failed restore only matters when the game itself succeeded.
fn finish(result: GameResult<Outcome>, restored: std::io::Result<()>) -> GameResult<Outcome> {
    let outcome = result?;
    restored?;
    Ok(outcome)
}

/// Build the session against the live viewport and run it to the end.
fn play<S: Surface + ?Sized>(
    surface: &mut S,
    setup: &Setup,
    messages: MessagePool,
    glyphs: &GlyphPool,
    rng: &mut StdRng,
) -> GameResult<Outcome> {
    let (rows, cols) = surface.dimensions()?;
    let mut session = GameSession::new(
        Bounds::new(rows, cols),
        surface.has_color(),
        setup.decoys,
        messages,
        glyphs,
        rng,
    )?;
    debug!(items = session.bogus_count(), color = session.has_color, "session ready");

    if setup.show_intro {
        renderer::show_instructions(surface, session.bounds.cols)?;
        match surface.read_event()? {
            InputEvent::Interrupt => return Ok(Outcome::Interrupted),
            InputEvent::Resize { rows, cols } => session.resize(rows, cols)?,
            InputEvent::Key(_) => {}
        }
    }

    renderer::draw_screen(surface, &session)?;
    game_loop(surface, &mut session, setup)
}

/// Block on input until robot finds kitten or the player leaves.
fn game_loop<S: Surface + ?Sized>(
    surface: &mut S,
    session: &mut GameSession,
    setup: &Setup,
) -> GameResult<Outcome> {
    loop {
        let key = match surface.read_event()? {
            InputEvent::Interrupt => return Ok(Outcome::Interrupted),
            InputEvent::Resize { rows, cols } => {
                session.resize(rows, cols)?;
                renderer::draw_screen(surface, session)?;
                continue;
            }
            InputEvent::Key(key) => key,
        };

        match command_for(key) {
            Command::Quit => return Ok(Outcome::Quit),
            Command::Redraw => renderer::draw_screen(surface, session)?,
            Command::Invalid => {
                debug!(?key, "unmapped key");
                session.banner = renderer::INVALID_INPUT.to_string();
                if setup.bell {
                    surface.beep()?;
                }
                renderer::show_banner(surface, session)?;
            }
            Command::Move(step) => match session.step(step) {
                GameEvent::FoundKitten => {
                    animation::play(surface, session, setup.frame_pause)?;
                    return Ok(Outcome::FoundKitten);
                }
                event => renderer::apply_event(surface, session, &event)?,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Entity, Palette, Position, KITTEN, ROBOT};
    use crate::ui::input::Key;
    use crate::ui::surface::testing::{Op, ScriptedSurface};

    const ROWS: u16 = 24;
    const COLS: u16 = 80;

    fn setup(decoys: usize) -> Setup {
        Setup {
            decoys,
            show_intro: false,
            bell: true,
            frame_pause: Duration::ZERO,
        }
    }

    fn pool() -> MessagePool {
        MessagePool::new((0..40).map(|i| format!("a thing numbered {i}"))).unwrap()
    }

    fn session(decoys: usize, seed: u64) -> GameSession {
        GameSession::new(
            Bounds::new(ROWS, COLS),
            true,
            decoys,
            pool(),
            &GlyphPool::printable(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    /// vi keys that walk robot onto kitten along the shortest path.
    fn path_to_kitten(s: &GameSession) -> Vec<Key> {
        let mut at = s.robot().pos;
        let goal = s.kitten().pos;
        let mut keys = Vec::new();
        while at != goal {
            let dx = (goal.x - at.x).signum();
            let dy = (goal.y - at.y).signum();
            let c = match (dx, dy) {
                (-1, -1) => 'y',
                (0, -1) => 'k',
                (1, -1) => 'u',
                (-1, 0) => 'h',
                (1, 0) => 'l',
                (-1, 1) => 'b',
                (0, 1) => 'j',
                _ => 'n',
            };
            keys.push(Key::ch(c));
            at = at.offset(dx, dy);
        }
        keys
    }

    #[test]
    fn seeded_session_is_reproducible() {
        let a = session(10, 77);
        let b = session(10, 77);
        let pos = |s: &GameSession| s.roster.iter().map(|e| e.pos).collect::<Vec<_>>();
        assert_eq!(pos(&a), pos(&b));
    }

    #[test]
    fn shortest_walk_finds_kitten() {
        for seed in [1, 2, 3, 1234] {
            let mut s = session(0, seed);
            let keys = path_to_kitten(&s);
            let mut surf = ScriptedSurface::new(ROWS, COLS).with_keys(&keys);

            let outcome = game_loop(&mut surf, &mut s, &setup(0)).unwrap();
            assert_eq!(outcome, Outcome::FoundKitten);
            assert_eq!(outcome.exit_code(), 0);
            assert_eq!(s.banner, animation::WIN_MESSAGE);
            assert_eq!(surf.last_line(renderer::MESSAGE_ROW), Some(animation::WIN_MESSAGE));
        }
    }

    #[test]
    fn full_start_with_seeded_rng() {
        let seed = 99;
        let predicted = session(0, seed);
        let keys = path_to_kitten(&predicted);

        let mut surf = ScriptedSurface::new(ROWS, COLS).with_keys(&keys);
        let outcome = play(
            &mut surf,
            &setup(0),
            pool(),
            &GlyphPool::printable(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::FoundKitten);
        assert_eq!(surf.ops[0], Op::Clear);
    }

    #[test]
    fn tiny_screen_fails_before_drawing() {
        let mut surf = ScriptedSurface::new(5, 3);
        let err = play(
            &mut surf,
            &setup(500),
            pool(),
            &GlyphPool::printable(),
            &mut StdRng::seed_from_u64(4),
        )
        .unwrap_err();
        assert!(matches!(err, GameError::ScreenTooSmall { .. }));
        assert_eq!(err.exit_code(), 4);
        assert!(surf.ops.is_empty());
    }

    #[test]
    fn shrinking_past_an_entity_crushes() {
        let mut s = session(0, 5);
        s.roster[ROBOT].pos = Position::new(5, 5);
        s.roster[KITTEN] = Entity::item(Position::new(COLS as i32 - 2, ROWS as i32 - 2), "k", Palette::Red, false, None);

        let mut surf = ScriptedSurface::new(ROWS, COLS);
        surf.push(InputEvent::Resize { rows: 20, cols: 60 });
        let err = game_loop(&mut surf, &mut s, &setup(0)).unwrap_err();
        assert!(matches!(err, GameError::SimulationCrushed));
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn harmless_resize_redraws() {
        let mut s = session(0, 5);
        s.roster[ROBOT].pos = Position::new(5, 5);
        s.roster[KITTEN] = Entity::item(Position::new(10, 8), "k", Palette::Red, false, None);

        let mut surf = ScriptedSurface::new(ROWS, COLS);
        surf.push(InputEvent::Resize { rows: 15, cols: 30 });
        surf.push(InputEvent::Interrupt);
        let outcome = game_loop(&mut surf, &mut s, &setup(0)).unwrap();
        assert_eq!(outcome, Outcome::Interrupted);
        assert_eq!(s.bounds, Bounds::new(15, 30));
        assert_eq!(surf.count(&Op::Clear), 1);
    }

    #[test]
    fn unmapped_key_warns_and_stays() {
        let mut s = session(0, 6);
        let start = s.robot().pos;
        let mut surf = ScriptedSurface::new(ROWS, COLS).with_keys(&[Key::ch('z'), Key::ch('q')]);

        let outcome = game_loop(&mut surf, &mut s, &setup(0)).unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(s.robot().pos, start);
        assert_eq!(s.banner, renderer::INVALID_INPUT);
        assert_eq!(surf.last_line(renderer::MESSAGE_ROW), Some(renderer::INVALID_INPUT));
        assert_eq!(surf.count(&Op::Beep), 1);
    }

    #[test]
    fn bell_can_be_silenced() {
        let mut s = session(0, 6);
        let mut quiet = setup(0);
        quiet.bell = false;
        let mut surf = ScriptedSurface::new(ROWS, COLS).with_keys(&[Key::ch('5'), Key::ch('Q')]);
        game_loop(&mut surf, &mut s, &quiet).unwrap();
        assert_eq!(surf.count(&Op::Beep), 0);
    }

    #[test]
    fn quit_is_a_failure_exit() {
        let mut s = session(3, 8);
        let mut surf = ScriptedSurface::new(ROWS, COLS).with_keys(&[Key::ch('q')]);
        let outcome = game_loop(&mut surf, &mut s, &setup(3)).unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn interrupt_is_a_clean_exit() {
        let mut s = session(3, 8);
        let mut surf = ScriptedSurface::new(ROWS, COLS);
        surf.push(InputEvent::Interrupt);
        let outcome = game_loop(&mut surf, &mut s, &setup(3)).unwrap();
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn redraw_key_repaints_without_moving() {
        let mut s = session(3, 9);
        let start = s.robot().pos;
        let mut surf = ScriptedSurface::new(ROWS, COLS).with_keys(&[Key::ctrl('l'), Key::ch('q')]);
        game_loop(&mut surf, &mut s, &setup(3)).unwrap();
        assert_eq!(surf.count(&Op::Clear), 1);
        assert_eq!(s.robot().pos, start);
    }

    #[test]
    fn walking_into_the_left_wall_is_silent() {
        let mut s = session(0, 10);
        s.roster[ROBOT].pos = Position::new(1, 10);
        s.roster[KITTEN] = Entity::item(Position::new(40, 15), "k", Palette::Red, false, None);
        let mut surf = ScriptedSurface::new(ROWS, COLS).with_keys(&[Key::ch('h'), Key::ch('q')]);

        game_loop(&mut surf, &mut s, &setup(0)).unwrap();
        assert_eq!(s.robot().pos, Position::new(1, 10));
        assert!(s.banner.is_empty());
        assert!(surf.ops.is_empty());
    }

    #[test]
    fn intro_waits_for_a_key() {
        let mut intro = setup(2);
        intro.show_intro = true;
        let mut surf = ScriptedSurface::new(ROWS, COLS).with_keys(&[Key::ch(' '), Key::ch('q')]);
        let outcome = play(
            &mut surf,
            &intro,
            pool(),
            &GlyphPool::printable(),
            &mut StdRng::seed_from_u64(12),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Quit);
        // Instructions, then the playfield.
        assert_eq!(surf.count(&Op::Clear), 2);
    }

    #[test]
    fn interrupt_during_intro() {
        let mut intro = setup(2);
        intro.show_intro = true;
        let mut surf = ScriptedSurface::new(ROWS, COLS);
        surf.push(InputEvent::Interrupt);
        let outcome = play(
            &mut surf,
            &intro,
            pool(),
            &GlyphPool::printable(),
            &mut StdRng::seed_from_u64(12),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Interrupted);
    }

    #[test]
    fn item_count_must_be_positive() {
        assert_eq!(item_count(None, 20).unwrap(), 20);
        assert_eq!(item_count(Some(3), 20).unwrap(), 3);
        assert!(matches!(item_count(Some(0), 20), Err(GameError::InvalidConfiguration(_))));
        assert!(matches!(item_count(Some(-4), 20), Err(GameError::InvalidConfiguration(_))));
        assert!(item_count(None, 0).is_err());
    }

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::try_parse_from([
            "robotfindskitten", "-n", "5", "-s", "-3", "--nki-dir", "/a", "--nki-dir", "/b", "--no-intro",
        ])
        .unwrap();
        assert_eq!(cli.nitems, Some(5));
        assert_eq!(cli.seed, Some(-3));
        assert_eq!(cli.nki_dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(cli.no_intro);
    }

    #[test]
    fn unknown_flag_is_an_unknown_argument() {
        let err = Cli::try_parse_from(["robotfindskitten", "--frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    fn exit_for(args: &[&str]) -> ExitCode {
        let argv = std::iter::once("robotfindskitten").chain(args.iter().copied());
        usage_exit(Cli::try_parse_from(argv).unwrap_err())
    }

    #[test]
    fn usage_exit_codes() {
        assert_eq!(exit_for(&["--help"]), ExitCode::SUCCESS);
        assert_eq!(exit_for(&["-h"]), ExitCode::SUCCESS);
        assert_eq!(exit_for(&["-V"]), ExitCode::SUCCESS);
        assert_eq!(exit_for(&["--frobnicate"]), ExitCode::SUCCESS);
        assert_eq!(exit_for(&["-n", "lots"]), ExitCode::from(2));
        assert_eq!(exit_for(&["-s", "noon"]), ExitCode::from(2));
    }

    #[test]
    fn crushing_resize_during_intro() {
        let mut intro = setup(2);
        intro.show_intro = true;
        let mut surf = ScriptedSurface::new(ROWS, COLS);
        // Every interior row starts at 3, so four rows cannot hold anything.
        surf.push(InputEvent::Resize { rows: 4, cols: 4 });
        let err = play(
            &mut surf,
            &intro,
            pool(),
            &GlyphPool::printable(),
            &mut StdRng::seed_from_u64(12),
        )
        .unwrap_err();
        assert!(matches!(err, GameError::SimulationCrushed));
        assert_eq!(surf.count(&Op::Clear), 1);
    }

    #[test]
    fn growing_during_intro_draws_the_bigger_field() {
        let mut intro = setup(2);
        intro.show_intro = true;
        let mut surf = ScriptedSurface::new(ROWS, COLS);
        surf.push(InputEvent::Resize { rows: 30, cols: 100 });
        surf.push(InputEvent::Key(Key::ch('q')));
        let outcome = play(
            &mut surf,
            &intro,
            pool(),
            &GlyphPool::printable(),
            &mut StdRng::seed_from_u64(12),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(surf.count(&Op::Clear), 2);
        let top = surf.glyphs_at(2, 0);
        assert_eq!(top.last().map(|t| t.chars().count()), Some(100));
        assert!(surf.glyphs_at(29, 0).iter().any(|g| g.starts_with('└')));
    }

    #[test]
    fn restore_failure_keeps_the_game_error() {
        let broken = || Err(std::io::Error::new(std::io::ErrorKind::Other, "tty gone"));

        let err = finish(Err(GameError::SimulationCrushed), broken()).unwrap_err();
        assert!(matches!(err, GameError::SimulationCrushed));
        assert_eq!(err.exit_code(), 5);

        let err = finish(Ok(Outcome::FoundKitten), broken()).unwrap_err();
        assert!(matches!(err, GameError::Io(_)));

        assert_eq!(finish(Ok(Outcome::Quit), Ok(())).unwrap(), Outcome::Quit);
    }
}
