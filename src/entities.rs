//! All game entity types. Pure data, no game logic.

use std::time::Duration;

use crate::assets::UiElement;
use crate::config::Tuning;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in logical playfield pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Left/top edges are inside, right/bottom edges are outside.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    GameOver,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Horizontal movement direction for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Heading {
    Left,
    #[default]
    Idle,
    Right,
}

impl Heading {
    /// Sprite pose that matches this heading.
    pub fn pose(self) -> PlayerPose {
        match self {
            Heading::Left => PlayerPose::Left,
            Heading::Idle => PlayerPose::Normal,
            Heading::Right => PlayerPose::Right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerPose {
    Normal,
    Left,
    Right,
}

/// Hit cooldown sub-state. Timestamps are on the session's simulated clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HitState {
    #[default]
    Normal,
    Hit {
        /// When the hit started.
        since: Duration,
        /// When visibility last toggled.
        last_flash: Duration,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub heading: Heading,
    pub lives: u32,
    pub hit: HitState,
    /// `false` during the dimmed half of the hit flicker.
    pub visible: bool,
    /// Horizontal render offset applied while shaking.
    pub shake_offset: f32,
    /// Sign of the next shake step (+1.0 / -1.0).
    pub shake_sign: f32,
    /// Sprite currently shown. Frozen while in `HitState::Hit`.
    pub pose: PlayerPose,
    /// Brown overlay applied while hit.
    pub tinted: bool,
}

impl Player {
    pub fn is_hit(&self) -> bool {
        matches!(self.hit, HitState::Hit { .. })
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleSize {
    Small,
    Medium,
    Large,
}

impl ObstacleSize {
    pub const ALL: [ObstacleSize; 3] = [
        ObstacleSize::Small,
        ObstacleSize::Medium,
        ObstacleSize::Large,
    ];

    /// Particles released when an obstacle of this size hits the player.
    pub fn particle_count(self) -> usize {
        match self {
            ObstacleSize::Small => 10,
            ObstacleSize::Medium => 15,
            ObstacleSize::Large => 20,
        }
    }

    pub fn index(self) -> usize {
        match self {
            ObstacleSize::Small => 0,
            ObstacleSize::Medium => 1,
            ObstacleSize::Large => 2,
        }
    }
}

/// A falling poop.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    /// Pixels per frame, fixed at spawn time.
    pub speed: f32,
    pub size: ObstacleSize,
}

impl Obstacle {
    /// True once the top edge has dropped below the playfield.
    pub fn is_offscreen(&self, screen_height: f32) -> bool {
        self.rect.y > screen_height
    }
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Frames left to live.
    pub life: u32,
}

// ── UI ────────────────────────────────────────────────────────────────────────

/// Static clickable region drawn with a UI sprite.
#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub element: UiElement,
}

impl Button {
    pub fn new(element: UiElement, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::centered(cx, cy, w, h),
            element,
        }
    }

    pub fn is_clicked(&self, x: f32, y: f32) -> bool {
        self.rect.contains(x, y)
    }
}

// ── Input & events ────────────────────────────────────────────────────────────

/// Input collected for one frame. Movement keys are level-triggered,
/// everything else is edge-triggered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub quit: bool,
    /// Pointer click in logical playfield coordinates.
    pub click: Option<(f32, f32)>,
}

/// Side effects requested by the simulation, executed by the game loop.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Menu/GameOver → Playing.
    Started,
    Spawned(ObstacleSize),
    /// An obstacle left the screen unhit.
    Dodged,
    Collision { size: ObstacleSize, x: f32, y: f32 },
    /// Playing → GameOver.
    GameOver { score: u32 },
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Sizes of the sprites the simulation needs for hitboxes and layout,
/// captured from the asset provider once at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteMetrics {
    pub player: (f32, f32),
    /// Indexed by `ObstacleSize::index`.
    pub obstacles: [(f32, f32); 3],
    pub start_button: (f32, f32),
    pub restart_button: (f32, f32),
}

impl SpriteMetrics {
    pub fn obstacle(&self, size: ObstacleSize) -> (f32, f32) {
        self.obstacles[size.index()]
    }
}

/// Everything the game loop owns. Cloneable so update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub state: GameState,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    pub score: u32,
    /// Highest score of this process run. Never written to disk.
    pub best_score: u32,
    /// Fall speed given to newly spawned obstacles (pixels per frame).
    pub fall_speed: f32,
    /// Simulated time since the current game started.
    pub clock: Duration,
    pub last_spawn: Duration,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
    pub metrics: SpriteMetrics,
    pub tuning: Tuning,
    pub start_button: Button,
    pub restart_button: Button,
}

impl GameSession {
    /// The button that is clickable in the current state, if any.
    pub fn active_button(&self) -> Option<&Button> {
        match self.state {
            GameState::Menu => Some(&self.start_button),
            GameState::GameOver => Some(&self.restart_button),
            GameState::Playing => None,
        }
    }
}
