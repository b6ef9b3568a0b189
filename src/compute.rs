//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current state
//! (and, where needed, an RNG handle) and returns a brand-new value. Sound
//! and music are requested through the returned [`GameEvent`]s; the only
//! side effect is the injected RNG.
//!
//! Timers (spawn cadence, difficulty ramp, hit cooldown) run on the
//! session's simulated clock, which advances by the `dt` handed to
//! [`tick`]. Obstacle and particle motion is per frame.

use std::time::Duration;

use rand::Rng;

use crate::assets::UiElement;
use crate::config::Tuning;
use crate::entities::{
    Button, FrameInput, GameEvent, GameSession, GameState, Heading, HitState, Obstacle,
    ObstacleSize, Player, Rect, SpriteMetrics,
};
use crate::particles::{spawn_burst, update_particles};

pub const STARTING_LIVES: u32 = 3;
/// Gap between the player's feet and the bottom of the playfield.
const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
/// The restart button sits this far below the screen centre.
const RESTART_BUTTON_DROP: f32 = 100.0;

/// How long the hit cooldown lasts.
pub const HIT_DURATION: Duration = Duration::from_millis(1000);
/// Visibility toggles at most this often while hit.
pub const FLASH_INTERVAL: Duration = Duration::from_millis(100);
/// Pixels the sprite jumps left/right while hit.
pub const SHAKE_AMPLITUDE: f32 = 2.0;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Player centred horizontally, standing just above the bottom edge.
pub fn spawn_player(width: f32, height: f32, metrics: &SpriteMetrics) -> Player {
    let (w, h) = metrics.player;
    Player {
        rect: Rect::new(width / 2.0 - w / 2.0, height - PLAYER_BOTTOM_MARGIN - h, w, h),
        heading: Heading::Idle,
        lives: STARTING_LIVES,
        hit: HitState::Normal,
        visible: true,
        shake_offset: 0.0,
        shake_sign: 1.0,
        pose: Heading::Idle.pose(),
        tinted: false,
    }
}

/// A fresh session sitting on the menu screen.
pub fn new_session(width: f32, height: f32, tuning: Tuning, metrics: SpriteMetrics) -> GameSession {
    let (sw, sh) = metrics.start_button;
    let (rw, rh) = metrics.restart_button;
    GameSession {
        state: GameState::Menu,
        player: spawn_player(width, height, &metrics),
        obstacles: Vec::new(),
        particles: Vec::new(),
        score: 0,
        best_score: 0,
        fall_speed: tuning.initial_fall_speed,
        clock: Duration::ZERO,
        last_spawn: Duration::ZERO,
        frame: 0,
        width,
        height,
        metrics,
        tuning,
        start_button: Button::new(UiElement::StartButton, width / 2.0, height / 2.0, sw, sh),
        restart_button: Button::new(
            UiElement::RestartButton,
            width / 2.0,
            height / 2.0 + RESTART_BUTTON_DROP,
            rw,
            rh,
        ),
    }
}

/// Enter `Playing` with everything but the best score reset.
pub fn start_game(state: &GameSession) -> GameSession {
    log::info!("Game started (best so far: {})", state.best_score);
    GameSession {
        state: GameState::Playing,
        player: spawn_player(state.width, state.height, &state.metrics),
        obstacles: Vec::new(),
        particles: Vec::new(),
        score: 0,
        fall_speed: state.tuning.initial_fall_speed,
        clock: Duration::ZERO,
        last_spawn: Duration::ZERO,
        frame: 0,
        ..state.clone()
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Start the hit cooldown. Ignored while a cooldown is already running.
pub fn hit_player(player: &Player, now: Duration) -> Player {
    if player.is_hit() {
        return player.clone();
    }
    Player {
        hit: HitState::Hit {
            since: now,
            last_flash: now,
        },
        visible: true,
        tinted: true,
        ..player.clone()
    }
}

/// Advance flicker and shake, and leave the hit state once it has run its
/// course.
pub fn update_hit_effect(player: &Player, now: Duration) -> Player {
    let HitState::Hit { since, last_flash } = player.hit else {
        return player.clone();
    };

    if now.saturating_sub(since) > HIT_DURATION {
        return Player {
            hit: HitState::Normal,
            visible: true,
            shake_offset: 0.0,
            tinted: false,
            pose: player.heading.pose(),
            ..player.clone()
        };
    }

    let (visible, last_flash) = if now.saturating_sub(last_flash) > FLASH_INTERVAL {
        (!player.visible, now)
    } else {
        (player.visible, last_flash)
    };

    Player {
        hit: HitState::Hit { since, last_flash },
        visible,
        shake_offset: player.shake_sign * SHAKE_AMPLITUDE,
        shake_sign: -player.shake_sign,
        ..player.clone()
    }
}

/// Apply held movement keys, pick the pose and clamp to the playfield.
/// When both keys are held, right wins the pose and the moves cancel out.
pub fn steer_player(player: &Player, left: bool, right: bool, speed: f32, width: f32) -> Player {
    let mut dx = 0.0;
    let mut heading = Heading::Idle;
    if left {
        dx -= speed;
        heading = Heading::Left;
    }
    if right {
        dx += speed;
        heading = Heading::Right;
    }

    let max_x = (width - player.rect.w).max(0.0);
    let x = (player.rect.x + dx).clamp(0.0, max_x);

    let pose = if player.is_hit() {
        player.pose
    } else {
        heading.pose()
    };

    Player {
        rect: Rect { x, ..player.rect },
        heading,
        pose,
        ..player.clone()
    }
}

/// Hit effects first, then movement.
pub fn update_player(
    player: &Player,
    input: &FrameInput,
    now: Duration,
    tuning: &Tuning,
    width: f32,
) -> Player {
    let player = update_hit_effect(player, now);
    steer_player(&player, input.left, input.right, tuning.player_speed, width)
}

// ── Obstacles ────────────────────────────────────────────────────────────────

/// A random-sized poop just above the top edge, falling at the current speed.
pub fn spawn_obstacle(state: &GameSession, rng: &mut impl Rng) -> Obstacle {
    let size = ObstacleSize::ALL[rng.gen_range(0..ObstacleSize::ALL.len())];
    let (w, h) = state.metrics.obstacle(size);
    let max_x = (state.width - w).max(0.0).floor() as u32;
    let x = rng.gen_range(0..=max_x) as f32;
    Obstacle {
        rect: Rect::new(x, -h, w, h),
        speed: state.fall_speed,
        size,
    }
}

pub fn fall(obstacle: &Obstacle) -> Obstacle {
    Obstacle {
        rect: Rect {
            y: obstacle.rect.y + obstacle.speed,
            ..obstacle.rect
        },
        ..obstacle.clone()
    }
}

/// Where the debris appears: halfway between the two centres horizontally,
/// halfway between the player's head and the poop's bottom vertically.
pub fn collision_point(player: &Rect, obstacle: &Rect) -> (f32, f32) {
    (
        ((player.center_x() + obstacle.center_x()) / 2.0).floor(),
        ((player.y + obstacle.bottom()) / 2.0).floor(),
    )
}

// ── Per-frame tick (RNG injected) ────────────────────────────────────────

/// Advance a `Playing` session by one frame of `dt` simulated time.
/// Sessions in any other state are returned unchanged.
pub fn tick(
    state: &GameSession,
    input: &FrameInput,
    dt: Duration,
    rng: &mut impl Rng,
) -> (GameSession, Vec<GameEvent>) {
    if state.state != GameState::Playing {
        return (state.clone(), Vec::new());
    }

    let mut events = Vec::new();
    let clock = state.clock + dt;

    // ── 1. Player ────────────────────────────────────────────────────────────
    let mut player = update_player(&state.player, input, clock, &state.tuning, state.width);

    // ── 2. Spawn on the simulated clock ──────────────────────────────────────
    let mut obstacles = state.obstacles.clone();
    let mut last_spawn = state.last_spawn;
    if clock.saturating_sub(last_spawn) >= state.tuning.spawn_interval {
        let obstacle = spawn_obstacle(state, rng);
        log::debug!(
            "Spawned {:?} poop at x={} speed={:.2}",
            obstacle.size,
            obstacle.rect.x,
            obstacle.speed
        );
        events.push(GameEvent::Spawned(obstacle.size));
        obstacles.push(obstacle);
        last_spawn = clock;
    }

    // ── 3. Move, score and collide in one compaction pass ────────────────────
    let mut status = GameState::Playing;
    let mut score = state.score;
    let mut particles = state.particles.clone();
    let mut survivors = Vec::with_capacity(obstacles.len());

    for obstacle in obstacles {
        if status == GameState::GameOver {
            survivors.push(obstacle);
            continue;
        }

        let obstacle = fall(&obstacle);

        if obstacle.is_offscreen(state.height) {
            score += 1;
            events.push(GameEvent::Dodged);
            continue;
        }

        if !player.rect.intersects(&obstacle.rect) {
            survivors.push(obstacle);
            continue;
        }

        let (x, y) = collision_point(&player.rect, &obstacle.rect);
        particles.extend(spawn_burst(x, y, obstacle.size.particle_count(), rng));
        player = hit_player(&player, clock);
        player.lives = player.lives.saturating_sub(1);
        log::debug!(
            "Hit by {:?} poop at ({}, {}); {} lives left",
            obstacle.size,
            x,
            y,
            player.lives
        );
        events.push(GameEvent::Collision {
            size: obstacle.size,
            x,
            y,
        });

        if player.lives == 0 {
            status = GameState::GameOver;
            log::info!("Game over with score {}", score);
            events.push(GameEvent::GameOver { score });
        }
    }

    // ── 4. Particles ─────────────────────────────────────────────────────────
    let particles = update_particles(&particles);

    // ── 5. Difficulty ramp ───────────────────────────────────────────────────
    let fall_speed = state.fall_speed + state.tuning.fall_acceleration * dt.as_secs_f32();

    let session = GameSession {
        state: status,
        player,
        obstacles: survivors,
        particles,
        score,
        best_score: state.best_score.max(score),
        fall_speed,
        clock,
        last_spawn,
        frame: state.frame + 1,
        ..state.clone()
    };
    (session, events)
}

/// One full frame: dispatch edge-triggered input, then simulate.
/// Quit is not handled here; the game loop checks it before stepping.
pub fn step(
    state: &GameSession,
    input: &FrameInput,
    dt: Duration,
    rng: &mut impl Rng,
) -> (GameSession, Vec<GameEvent>) {
    let clicked = match (state.active_button(), input.click) {
        (Some(button), Some((x, y))) => button.is_clicked(x, y),
        _ => false,
    };
    let wants_start = state.state != GameState::Playing && (input.confirm || clicked);

    if !wants_start {
        return tick(state, input, dt, rng);
    }

    let started = start_game(state);
    let (session, mut events) = tick(&started, input, dt, rng);
    events.insert(0, GameEvent::Started);
    (session, events)
}
