use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use poop_dodge::assets::GlyphAssets;
use poop_dodge::audio::{terminal_jukebox, Jukebox};
use poop_dodge::compute::{new_session, step};
use poop_dodge::config::GameConfig;
use poop_dodge::display::{self, Viewport};
use poop_dodge::entities::{FrameInput, SpriteMetrics};
use poop_dodge::text::{self, TextChoice, TextSet};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so 8 frames at 60 FPS (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Longest simulated step for a single frame, so a suspended terminal does
/// not dump a burst of spawns on resume.
const MAX_FRAME_DT: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "poop_dodge")]
#[command(about = "Dodge the falling poop in your terminal")]
struct Args {
    /// JSON config file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,
    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,
    /// Force English text
    #[arg(long)]
    english: bool,
    /// Log file (the terminal is busy drawing the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let path = path.unwrap_or_else(|| std::env::temp_dir().join("poop_dodge.log"));
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
    Ok(path)
}

fn load_config(args: &Args) -> anyhow::Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.target_fps = fps;
    }
    if args.mute {
        config.sound = false;
    }
    if args.english {
        config.text = TextChoice::English;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Drain all pending terminal events into one frame of input.
///
/// Movement keys are tracked in `key_frame` (frame of the last press or
/// repeat) so they behave as held on terminals with and without release
/// events. Everything else is edge-triggered.
fn poll_input(
    rx: &mpsc::Receiver<Event>,
    key_frame: &mut HashMap<KeyCode, u64>,
    frame: u64,
    view: &Viewport,
) -> FrameInput {
    let mut input = FrameInput::default();

    while let Ok(ev) = rx.try_recv() {
        match ev {
            Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => input.quit = true,
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            input.quit = true
                        }
                        KeyCode::Char(' ') | KeyCode::Enter => input.confirm = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                input.click = view.to_world(column, row);
            }
            _ => {}
        }
    }

    input.left = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]
        .iter()
        .any(|k| is_held(key_frame, k, frame));
    input.right = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]
        .iter()
        .any(|k| is_held(key_frame, k, frame));
    input
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    seed: Option<u64>,
    assets: &GlyphAssets,
    text: &TextSet,
    jukebox: &mut Jukebox,
) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let world_w = config.screen_width as f32;
    let world_h = config.screen_height as f32;
    let metrics = SpriteMetrics::from_provider(assets);
    let mut session = new_session(world_w, world_h, config.tuning(), metrics);

    let frame_time = config.frame_duration();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame).min(MAX_FRAME_DT);
        last_frame = frame_start;
        frame += 1;

        let (cols, rows) = terminal::size()?;
        let view = Viewport::fit(cols, rows, world_w, world_h);

        let input = poll_input(rx, &mut key_frame, frame, &view);
        if input.quit {
            log::info!("Quit requested");
            break;
        }

        let (next, events) = step(&session, &input, dt, &mut rng);
        session = next;
        for event in &events {
            jukebox.handle(event);
        }

        display::render(out, &session, &view, assets, text)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }

    jukebox.stop_music();
    Ok(())
}

/// Dedicate a thread to blocking event reads so the game loop never
/// blocks on I/O.
fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                log::error!("Terminal event read failed: {}", e);
                break;
            }
        }
    });
    rx
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_path = init_logging(args.log_file.clone())?;
    log::info!("Poop Dodge starting (log: {})", log_path.display());

    let config = load_config(&args)?;
    let unicode = text::locale_supports_unicode(|name| std::env::var(name).ok());
    let text = text::select(config.text, unicode);
    let screen = (config.screen_width as f32, config.screen_height as f32);
    let assets = GlyphAssets::load(screen, text, unicode);
    let mut jukebox = terminal_jukebox(config.sound);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    let result = display::with_game_screen(&mut out, |out| {
        let rx = spawn_event_reader();
        game_loop(out, &rx, &config, args.seed, &assets, text, &mut jukebox)
    });
    if let Err(e) = terminal::disable_raw_mode() {
        log::error!("Failed to leave raw mode: {}", e);
    }

    if let Err(e) = &result {
        log::error!("Exiting with error: {:#}", e);
    }
    log::info!("Bye");
    result
}
