use poop_dodge::assets::*;
use poop_dodge::entities::{ObstacleSize, PlayerPose, SpriteMetrics};
use poop_dodge::text::{ENGLISH, KOREAN};

fn assets(unicode: bool) -> GlyphAssets {
    GlyphAssets::load((800.0, 600.0), &ENGLISH, unicode)
}

#[test]
fn every_asset_resolves() {
    for unicode in [true, false] {
        let a = assets(unicode);
        for id in AssetId::ALL {
            let sprite = a.sprite(id);
            assert!(!sprite.art.is_empty(), "{:?} has no art", id);
            assert!(sprite.width > 0.0 && sprite.height > 0.0);
        }
    }
}

#[test]
fn obstacle_sizes_grow() {
    let a = assets(true);
    assert_eq!(a.sprite(AssetId::Obstacle(ObstacleSize::Small)).size(), (30.0, 30.0));
    assert_eq!(a.sprite(AssetId::Obstacle(ObstacleSize::Medium)).size(), (40.0, 40.0));
    assert_eq!(a.sprite(AssetId::Obstacle(ObstacleSize::Large)).size(), (50.0, 50.0));
}

#[test]
fn obstacles_are_brown() {
    let a = assets(true);
    for size in ObstacleSize::ALL {
        assert_eq!(a.sprite(AssetId::Obstacle(size)).color, POOP_BROWN);
    }
}

#[test]
fn poses_have_distinct_art() {
    let a = assets(false);
    let normal = &a.sprite(AssetId::Player(PlayerPose::Normal)).art;
    let left = &a.sprite(AssetId::Player(PlayerPose::Left)).art;
    let right = &a.sprite(AssetId::Player(PlayerPose::Right)).art;
    assert_ne!(normal, left);
    assert_ne!(normal, right);
    assert_ne!(left, right);
}

#[test]
fn ascii_mode_has_no_wide_glyphs() {
    let a = assets(false);
    for id in AssetId::ALL {
        for line in &a.sprite(id).art {
            assert!(line.is_ascii(), "{:?} art {:?} is not ascii", id, line);
        }
    }
}

#[test]
fn button_labels_follow_text_set() {
    let a = GlyphAssets::load((800.0, 600.0), &KOREAN, true);
    assert_eq!(a.sprite(AssetId::Ui(UiElement::StartButton)).art, vec!["시작"]);
    assert_eq!(a.sprite(AssetId::Ui(UiElement::RestartButton)).art, vec!["다시 시작"]);
}

#[test]
fn background_covers_screen() {
    let a = GlyphAssets::load((640.0, 480.0), &ENGLISH, true);
    assert_eq!(a.sprite(AssetId::Ui(UiElement::Background)).size(), (640.0, 480.0));
}

#[test]
fn metrics_come_from_sprites() {
    let m = SpriteMetrics::from_provider(&assets(true));
    assert_eq!(m.player, (50.0, 50.0));
    assert_eq!(m.obstacles, [(30.0, 30.0), (40.0, 40.0), (50.0, 50.0)]);
    assert_eq!(m.start_button, (200.0, 60.0));
    assert_eq!(m.restart_button, (200.0, 60.0));
}
