//! Sprite lookup
//!
//! The simulation only needs each sprite's size; the renderer also needs
//! its glyph art. Both come from an [`AssetProvider`] keyed by a typed
//! [`AssetId`], so every lookup is statically known to exist.

use std::collections::HashMap;

use crate::entities::{ObstacleSize, PlayerPose, SpriteMetrics};
use crate::text::TextSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiElement {
    StartButton,
    RestartButton,
    LifeIcon,
    ScoreIcon,
    Background,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    Player(PlayerPose),
    Obstacle(ObstacleSize),
    Ui(UiElement),
}

impl AssetId {
    pub const ALL: [AssetId; 11] = [
        AssetId::Player(PlayerPose::Normal),
        AssetId::Player(PlayerPose::Left),
        AssetId::Player(PlayerPose::Right),
        AssetId::Obstacle(ObstacleSize::Small),
        AssetId::Obstacle(ObstacleSize::Medium),
        AssetId::Obstacle(ObstacleSize::Large),
        AssetId::Ui(UiElement::StartButton),
        AssetId::Ui(UiElement::RestartButton),
        AssetId::Ui(UiElement::LifeIcon),
        AssetId::Ui(UiElement::ScoreIcon),
        AssetId::Ui(UiElement::Background),
    ];
}

/// Logical size plus the glyph art the terminal renderer draws.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub width: f32,
    pub height: f32,
    /// Rows of glyphs, drawn centred on the sprite's rect.
    pub art: Vec<String>,
    pub color: [u8; 3],
}

impl Sprite {
    fn new(width: f32, height: f32, art: &[&str], color: [u8; 3]) -> Self {
        Self {
            width,
            height,
            art: art.iter().map(|row| row.to_string()).collect(),
            color,
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

pub trait AssetProvider {
    /// Every id in `AssetId::ALL` must resolve.
    fn sprite(&self, id: AssetId) -> &Sprite;
}

impl SpriteMetrics {
    pub fn from_provider(assets: &dyn AssetProvider) -> Self {
        let size = |id| assets.sprite(id).size();
        SpriteMetrics {
            player: size(AssetId::Player(PlayerPose::Normal)),
            obstacles: [
                size(AssetId::Obstacle(ObstacleSize::Small)),
                size(AssetId::Obstacle(ObstacleSize::Medium)),
                size(AssetId::Obstacle(ObstacleSize::Large)),
            ],
            start_button: size(AssetId::Ui(UiElement::StartButton)),
            restart_button: size(AssetId::Ui(UiElement::RestartButton)),
        }
    }
}

// ── Colour palette ────────────────────────────────────────────────────────────

pub const POOP_BROWN: [u8; 3] = [139, 69, 19];
const CAT_ORANGE: [u8; 3] = [255, 170, 60];
const BUTTON_GREEN: [u8; 3] = [80, 200, 120];
const HEART_RED: [u8; 3] = [230, 40, 40];
const STAR_YELLOW: [u8; 3] = [250, 210, 50];
const GRASS_GREEN: [u8; 3] = [60, 140, 60];

// ── Terminal glyph sprites ────────────────────────────────────────────────────

/// Built-in glyph-art sprites for the terminal renderer.
pub struct GlyphAssets {
    sprites: HashMap<AssetId, Sprite>,
}

impl GlyphAssets {
    /// Build every sprite. Without `unicode` the art falls back to plain
    /// ASCII shapes.
    pub fn load(screen: (f32, f32), text: &TextSet, unicode: bool) -> Self {
        if !unicode {
            log::warn!("Terminal locale is not UTF-8; using ASCII sprites");
        }
        let sprites: HashMap<AssetId, Sprite> = AssetId::ALL
            .into_iter()
            .map(|id| (id, glyph_sprite(id, screen, text, unicode)))
            .collect();
        log::info!(
            "Loaded {} sprites ({} glyphs)",
            sprites.len(),
            if unicode { "unicode" } else { "ascii" }
        );
        Self { sprites }
    }
}

impl AssetProvider for GlyphAssets {
    fn sprite(&self, id: AssetId) -> &Sprite {
        // `load` fills every id in `AssetId::ALL`.
        &self.sprites[&id]
    }
}

fn glyph_sprite(id: AssetId, screen: (f32, f32), text: &TextSet, unicode: bool) -> Sprite {
    match id {
        AssetId::Player(pose) => {
            let face = match (pose, unicode) {
                (PlayerPose::Normal, true) => "=(^・ω・^)=",
                (PlayerPose::Left, true) => "<(^・ω・^)=",
                (PlayerPose::Right, true) => "=(^・ω・^)>",
                (PlayerPose::Normal, false) => "=(^.^)=",
                (PlayerPose::Left, false) => "<(^.^)=",
                (PlayerPose::Right, false) => "=(^.^)>",
            };
            Sprite::new(50.0, 50.0, &[face], CAT_ORANGE)
        }
        AssetId::Obstacle(size) => {
            let art: &[&str] = match size {
                ObstacleSize::Small => &["@"],
                ObstacleSize::Medium => &["(@)"],
                ObstacleSize::Large => &[" (@) ", "(@@@)"],
            };
            let px = match size {
                ObstacleSize::Small => 30.0,
                ObstacleSize::Medium => 40.0,
                ObstacleSize::Large => 50.0,
            };
            Sprite::new(px, px, art, POOP_BROWN)
        }
        AssetId::Ui(UiElement::StartButton) => {
            Sprite::new(200.0, 60.0, &[text.start_label], BUTTON_GREEN)
        }
        AssetId::Ui(UiElement::RestartButton) => {
            Sprite::new(200.0, 60.0, &[text.restart_label], BUTTON_GREEN)
        }
        AssetId::Ui(UiElement::LifeIcon) => {
            Sprite::new(30.0, 30.0, &[if unicode { "♥" } else { "<3" }], HEART_RED)
        }
        AssetId::Ui(UiElement::ScoreIcon) => {
            Sprite::new(30.0, 30.0, &[if unicode { "★" } else { "*" }], STAR_YELLOW)
        }
        AssetId::Ui(UiElement::Background) => {
            Sprite::new(screen.0, screen.1, &[if unicode { "ʷ" } else { "," }], GRASS_GREEN)
        }
    }
}
