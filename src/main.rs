mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use display::Viewport;
use nova_descent::audio::{adjust_volume, VolumeChannel, VolumeTable};
use nova_descent::compute::{
    load_game, new_game, player_teleport, save_game, set_mouse_control, tick, toggle_pause,
};
use nova_descent::constants::TICK_MS;
use nova_descent::entities::{PlayerId, SimulationState};
use nova_descent::events::GameEvent;
use nova_descent::highscores::Ledger;
use nova_descent::storage::{self, LEDGER_FILE, SAVE_FILE};
use nova_descent::{GameConfig, TickInput};

const FRAME: Duration = Duration::from_millis(TICK_MS); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// How long a status message stays on the hint line.
const STATUS_TTL: Duration = Duration::from_secs(3);

const VOLUME_STEP: f32 = 0.1;

#[derive(Parser, Debug)]
#[command(name = "nova_descent", about = "Two-player descent shooter in your terminal")]
struct Args {
    /// Skip the menu and start a two-player game.
    #[arg(long)]
    two_player: bool,

    /// TOML file overriding gameplay defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where save games, high scores and the log live.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Everything the terminal front-end keeps across games.
struct Session {
    config: GameConfig,
    data_dir: PathBuf,
    ledger: Ledger,
    volume: VolumeTable,
    rng: StdRng,
}

impl Session {
    fn save_path(&self) -> PathBuf {
        self.data_dir.join(SAVE_FILE)
    }

    fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(LEDGER_FILE)
    }

    /// Offers every milestone in this tick's events to the ledger.
    fn record_milestones(&mut self, state: &SimulationState) {
        let mut changed = false;
        for event in &state.events {
            if let Some(rank) = self.ledger.record_milestone(event, unix_now()) {
                tracing::info!("high score entered at rank {}", rank + 1);
                changed = true;
            }
        }
        if changed {
            if let Err(err) = storage::save_ledger(&self.ledger_path(), &self.ledger) {
                tracing::warn!("could not save high scores: {err}");
            }
        }
    }

    fn load(&mut self) -> Result<SimulationState> {
        let snapshot = storage::load_snapshot(&self.save_path())?;
        let state = load_game(&snapshot, &self.config, &mut self.rng)?;
        Ok(state)
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start { two_player: bool },
    Load,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &Session,
) -> Result<MenuResult> {
    let has_save = session.save_path().exists();
    display::render_menu(out, &session.ledger, has_save)?;

    // Block until the user makes a choice
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start { two_player: false }),
                KeyCode::Char('2') => return Ok(MenuResult::Start { two_player: true }),
                KeyCode::Char('l') | KeyCode::Char('L') if has_save => {
                    return Ok(MenuResult::Load)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Event::Resize(..) => display::render_menu(out, &session.ledger, has_save)?,
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: a `key_frame` map records the frame of the last press/repeat
/// event for every key; each frame, every key still "fresh" contributes to
/// the tick input, so movement and fire combine freely for both players.
/// One-shot commands (pause, teleport, save, load) act on the press itself.
fn game_loop<W: Write>(
    out: &mut W,
    mut state: SimulationState,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session,
) -> Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut pointer: Option<Vec2> = None;
    let mut mouse_fire = false;
    let mut frame: u64 = 0;
    let mut status: Option<(String, Instant)> = None;

    let field = Vec2::new(state.config.width, state.config.height);
    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(cols, rows, field);

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        let over = state.phase.phase.is_terminal();
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(over);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') if over => return Ok(false),
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                state = toggle_pause(&state).0;
                            }
                            KeyCode::Char('t') | KeyCode::Char('T') => {
                                state = player_teleport(&state, PlayerId::One, &mut session.rng).0;
                            }
                            KeyCode::Char('0') => {
                                state = player_teleport(&state, PlayerId::Two, &mut session.rng).0;
                            }
                            KeyCode::Char('m') | KeyCode::Char('M') => {
                                let enabled = !state
                                    .player(PlayerId::One)
                                    .is_some_and(|p| p.mouse_control);
                                state = set_mouse_control(&state, PlayerId::One, enabled).0;
                            }
                            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('-') => {
                                let delta = if code == KeyCode::Char('-') {
                                    -VOLUME_STEP
                                } else {
                                    VOLUME_STEP
                                };
                                let level =
                                    adjust_volume(&mut session.volume, VolumeChannel::Master, delta);
                                status = Some((
                                    format!("Volume {:.0}%", level * 100.0),
                                    Instant::now(),
                                ));
                            }
                            KeyCode::Char('f') | KeyCode::Char('F') => {
                                let message = match storage::save_snapshot(
                                    &session.save_path(),
                                    &save_game(&state),
                                ) {
                                    Ok(()) => "Game saved".to_string(),
                                    Err(err) => format!("Save failed: {err}"),
                                };
                                status = Some((message, Instant::now()));
                            }
                            KeyCode::Char('l') | KeyCode::Char('L') => {
                                let message = match session.load() {
                                    Ok(loaded) => {
                                        state = loaded;
                                        "Game loaded".to_string()
                                    }
                                    Err(err) => {
                                        tracing::warn!("load failed: {err:#}");
                                        format!("Load failed: {err}")
                                    }
                                };
                                status = Some((message, Instant::now()));
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    pointer = Some(view.to_field(column, row));
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => mouse_fire = true,
                        MouseEventKind::Up(MouseButton::Left) => mouse_fire = false,
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => view = Viewport::new(cols, rows, field),
                _ => {}
            }
        }

        // ── Build this frame's input from held keys ───────────────────────────
        let mut input = TickInput::default();
        {
            let p1 = input.player_mut(PlayerId::One);
            p1.left = any_held(&key_frame, &[KeyCode::Char('a'), KeyCode::Char('A')], frame);
            p1.right = any_held(&key_frame, &[KeyCode::Char('d'), KeyCode::Char('D')], frame);
            p1.up = any_held(&key_frame, &[KeyCode::Char('w'), KeyCode::Char('W')], frame);
            p1.down = any_held(&key_frame, &[KeyCode::Char('s'), KeyCode::Char('S')], frame);
            p1.fire = is_held(&key_frame, &KeyCode::Char(' '), frame) || mouse_fire;
            p1.pointer = pointer;
        }
        {
            // Single-player also accepts the arrows for player one.
            let arrows = if state.two_player {
                PlayerId::Two
            } else {
                PlayerId::One
            };
            let p = input.player_mut(arrows);
            p.left |= is_held(&key_frame, &KeyCode::Left, frame);
            p.right |= is_held(&key_frame, &KeyCode::Right, frame);
            p.up |= is_held(&key_frame, &KeyCode::Up, frame);
            p.down |= is_held(&key_frame, &KeyCode::Down, frame);
            p.fire |= is_held(&key_frame, &KeyCode::Enter, frame);
        }

        state = tick(&state, &input, TICK_MS, &mut session.rng);
        for event in &state.events {
            if let GameEvent::PhaseChanged { from, to } = event {
                tracing::info!("phase {from:?} -> {to:?}");
            }
        }
        session.record_milestones(&state);

        if status
            .as_ref()
            .is_some_and(|(_, since)| since.elapsed() > STATUS_TTL)
        {
            status = None;
        }
        display::render(out, &state, &view, status.as_ref().map(|(m, _)| m.as_str()))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn data_dir(args: &Args) -> PathBuf {
    args.data_dir
        .clone()
        .or_else(|| dirs::data_dir().map(|d| d.join("nova_descent")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Logs go to a file: the terminal belongs to the game.
fn init_logging(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating data directory {}", dir.display()))?;
    let log_path = dir.join("nova_descent.log");
    let file = File::create(&log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = data_dir(&args);
    init_logging(&data_dir)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let ledger_path = data_dir.join(LEDGER_FILE);
    let ledger = storage::load_ledger(&ledger_path).unwrap_or_else(|err| {
        tracing::warn!("ignoring unreadable high scores: {err}");
        Ledger::new()
    });
    let mut session = Session {
        config,
        data_dir,
        ledger,
        volume: VolumeTable::default(),
        rng,
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &mut session, args.two_player);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!("exiting with error: {err:#}");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session,
    quick_start_two_player: bool,
) -> Result<()> {
    let mut quick_start = quick_start_two_player;
    loop {
        let choice = if quick_start {
            quick_start = false;
            MenuResult::Start { two_player: true }
        } else {
            show_menu(out, rx, session)?
        };
        let state = match choice {
            MenuResult::Quit => break,
            MenuResult::Start { two_player } => {
                new_game(two_player, session.config.clone(), &mut session.rng)
            }
            MenuResult::Load => match session.load() {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!("could not load saved game: {err:#}");
                    continue;
                }
            },
        };
        if game_loop(out, state, rx, session)? {
            break;
        }
    }
    Ok(())
}
