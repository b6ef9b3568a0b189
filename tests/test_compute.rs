use std::time::Duration;

use poop_dodge::compute::*;
use poop_dodge::config::Tuning;
use poop_dodge::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME: Duration = Duration::from_millis(16);

fn metrics() -> SpriteMetrics {
    SpriteMetrics {
        player: (50.0, 50.0),
        obstacles: [(30.0, 30.0), (40.0, 40.0), (50.0, 50.0)],
        start_button: (200.0, 60.0),
        restart_button: (200.0, 60.0),
    }
}

fn make_session() -> GameSession {
    new_session(800.0, 600.0, Tuning::default(), metrics())
}

fn playing() -> GameSession {
    start_game(&make_session())
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> FrameInput {
    FrameInput::default()
}

/// An obstacle that will overlap the player (375..425, 530..580) after
/// one frame of falling.
fn obstacle_on_player(size: ObstacleSize) -> Obstacle {
    let (w, h) = metrics().obstacle(size);
    Obstacle {
        rect: Rect::new(380.0, 500.0, w, h),
        speed: 3.0,
        size,
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

#[test]
fn new_session_starts_on_menu() {
    let s = make_session();
    assert_eq!(s.state, GameState::Menu);
    assert!(s.obstacles.is_empty());
    assert!(s.particles.is_empty());
    assert_eq!(s.score, 0);
}

#[test]
fn spawn_player_bottom_centre() {
    let p = spawn_player(800.0, 600.0, &metrics());
    assert_eq!(p.rect.center_x(), 400.0);
    assert_eq!(p.rect.bottom(), 580.0); // 20 px above the bottom
    assert_eq!(p.lives, STARTING_LIVES);
    assert_eq!(p.pose, PlayerPose::Normal);
    assert!(!p.is_hit());
}

#[test]
fn buttons_are_laid_out_around_centre() {
    let s = make_session();
    assert!(s.start_button.is_clicked(400.0, 300.0));
    assert!(s.restart_button.is_clicked(400.0, 400.0));
    assert!(!s.restart_button.is_clicked(400.0, 300.0));
}

// ── Player movement ──────────────────────────────────────────────────────────

#[test]
fn steer_left_moves_by_speed() {
    let p = spawn_player(800.0, 600.0, &metrics());
    let p2 = steer_player(&p, true, false, 5.0, 800.0);
    assert_eq!(p2.rect.x, p.rect.x - 5.0);
    assert_eq!(p2.heading, Heading::Left);
    assert_eq!(p2.pose, PlayerPose::Left);
}

#[test]
fn steer_right_moves_by_speed() {
    let p = spawn_player(800.0, 600.0, &metrics());
    let p2 = steer_player(&p, false, true, 5.0, 800.0);
    assert_eq!(p2.rect.x, p.rect.x + 5.0);
    assert_eq!(p2.pose, PlayerPose::Right);
}

#[test]
fn steer_clamps_at_left_edge() {
    let mut p = spawn_player(800.0, 600.0, &metrics());
    p.rect.x = 2.0;
    let p2 = steer_player(&p, true, false, 5.0, 800.0);
    assert_eq!(p2.rect.x, 0.0);
}

#[test]
fn steer_clamps_at_right_edge() {
    let mut p = spawn_player(800.0, 600.0, &metrics());
    p.rect.x = 748.0;
    let p2 = steer_player(&p, false, true, 5.0, 800.0);
    assert_eq!(p2.rect.x, 750.0); // width - player width
}

#[test]
fn steer_both_keys_cancel_but_face_right() {
    let p = spawn_player(800.0, 600.0, &metrics());
    let p2 = steer_player(&p, true, true, 5.0, 800.0);
    assert_eq!(p2.rect.x, p.rect.x);
    assert_eq!(p2.heading, Heading::Right);
}

#[test]
fn steer_no_keys_returns_to_normal_pose() {
    let p = spawn_player(800.0, 600.0, &metrics());
    let moving = steer_player(&p, true, false, 5.0, 800.0);
    let stopped = steer_player(&moving, false, false, 5.0, 800.0);
    assert_eq!(stopped.pose, PlayerPose::Normal);
    assert_eq!(stopped.heading, Heading::Idle);
}

#[test]
fn pose_frozen_while_hit() {
    let p = hit_player(&spawn_player(800.0, 600.0, &metrics()), Duration::ZERO);
    let p2 = steer_player(&p, true, false, 5.0, 800.0);
    assert_eq!(p2.pose, PlayerPose::Normal);
    assert_eq!(p2.heading, Heading::Left);
    assert_eq!(p2.rect.x, p.rect.x - 5.0); // still moves
}

// ── Hit response ─────────────────────────────────────────────────────────────

#[test]
fn hit_enters_hit_state() {
    let p = spawn_player(800.0, 600.0, &metrics());
    let now = Duration::from_millis(250);
    let p2 = hit_player(&p, now);
    assert_eq!(
        p2.hit,
        HitState::Hit {
            since: now,
            last_flash: now
        }
    );
    assert!(p2.visible);
    assert!(p2.tinted);
}

#[test]
fn repeated_hit_does_not_reset_timer() {
    let p = hit_player(&spawn_player(800.0, 600.0, &metrics()), Duration::from_millis(100));
    let p2 = hit_player(&p, Duration::from_millis(600));
    assert_eq!(p2.hit, p.hit);
}

#[test]
fn hit_effect_noop_when_normal() {
    let p = spawn_player(800.0, 600.0, &metrics());
    let p2 = update_hit_effect(&p, Duration::from_secs(5));
    assert_eq!(p2, p);
}

#[test]
fn flicker_waits_for_interval() {
    let p = hit_player(&spawn_player(800.0, 600.0, &metrics()), Duration::ZERO);
    let at_interval = update_hit_effect(&p, FLASH_INTERVAL);
    assert!(at_interval.visible);

    let past = update_hit_effect(&p, FLASH_INTERVAL + Duration::from_millis(1));
    assert!(!past.visible);
    assert_eq!(
        past.hit,
        HitState::Hit {
            since: Duration::ZERO,
            last_flash: FLASH_INTERVAL + Duration::from_millis(1)
        }
    );
}

#[test]
fn shake_alternates_each_update() {
    let p = hit_player(&spawn_player(800.0, 600.0, &metrics()), Duration::ZERO);
    let p1 = update_hit_effect(&p, Duration::from_millis(16));
    let p2 = update_hit_effect(&p1, Duration::from_millis(32));
    assert_eq!(p1.shake_offset, SHAKE_AMPLITUDE);
    assert_eq!(p2.shake_offset, -SHAKE_AMPLITUDE);
}

#[test]
fn hit_state_expires_after_duration() {
    let mut p = hit_player(&spawn_player(800.0, 600.0, &metrics()), Duration::ZERO);
    p.heading = Heading::Right;
    p.visible = false;
    p.shake_offset = -2.0;

    let still_hit = update_hit_effect(&p, HIT_DURATION);
    assert!(still_hit.is_hit());

    let recovered = update_hit_effect(&p, HIT_DURATION + Duration::from_millis(1));
    assert!(!recovered.is_hit());
    assert!(recovered.visible);
    assert!(!recovered.tinted);
    assert_eq!(recovered.shake_offset, 0.0);
    assert_eq!(recovered.pose, PlayerPose::Right);
}

// ── Obstacles ────────────────────────────────────────────────────────────────

#[test]
fn spawned_obstacle_is_above_screen_and_in_bounds() {
    let s = playing();
    let mut rng = seeded_rng();
    for _ in 0..100 {
        let o = spawn_obstacle(&s, &mut rng);
        assert_eq!(o.rect.bottom(), 0.0);
        assert!(o.rect.x >= 0.0);
        assert!(o.rect.right() <= 800.0);
        assert_eq!(o.speed, s.fall_speed);
        assert_eq!((o.rect.w, o.rect.h), metrics().obstacle(o.size));
    }
}

#[test]
fn fall_moves_by_own_speed() {
    let o = Obstacle {
        rect: Rect::new(10.0, 20.0, 30.0, 30.0),
        speed: 4.5,
        size: ObstacleSize::Small,
    };
    assert_eq!(fall(&o).rect.y, 24.5);
    assert_eq!(fall(&o).rect.x, 10.0);
}

#[test]
fn collision_point_between_player_and_obstacle() {
    let player = Rect::new(375.0, 530.0, 50.0, 50.0);
    let poop = Rect::new(380.0, 500.0, 50.0, 50.0);
    // x: (400 + 405) / 2, y: (530 + 550) / 2
    assert_eq!(collision_point(&player, &poop), (402.0, 540.0));
}

// ── tick: bookkeeping ────────────────────────────────────────────────────────

#[test]
fn tick_ignored_outside_playing() {
    let s = make_session();
    let (s2, events) = tick(&s, &idle(), FRAME, &mut seeded_rng());
    assert_eq!(s2.frame, 0);
    assert_eq!(s2.clock, Duration::ZERO);
    assert!(events.is_empty());
}

#[test]
fn tick_advances_clock_and_frame() {
    let s = playing();
    let (s2, _) = tick(&s, &idle(), FRAME, &mut seeded_rng());
    assert_eq!(s2.frame, 1);
    assert_eq!(s2.clock, FRAME);
}

#[test]
fn tick_moves_player_from_input() {
    let s = playing();
    let input = FrameInput {
        left: true,
        ..FrameInput::default()
    };
    let (s2, _) = tick(&s, &input, FRAME, &mut seeded_rng());
    assert_eq!(s2.player.rect.x, s.player.rect.x - 5.0);
}

#[test]
fn difficulty_ramps_with_simulated_time() {
    let mut s = playing();
    let mut rng = seeded_rng();
    for _ in 0..4 {
        s = tick(&s, &idle(), Duration::from_millis(250), &mut rng).0;
    }
    assert!((s.fall_speed - 3.1).abs() < 1e-4);
}

// ── tick: spawning ───────────────────────────────────────────────────────────

#[test]
fn no_spawn_before_interval() {
    let mut s = playing();
    let mut rng = seeded_rng();
    for _ in 0..9 {
        s = tick(&s, &idle(), Duration::from_millis(100), &mut rng).0;
    }
    assert!(s.obstacles.is_empty());
}

#[test]
fn spawn_cadence_independent_of_frame_rate() {
    // 20 fps and 100 fps both spawn exactly two in two seconds
    for (frames, dt) in [(40, 50), (200, 10)] {
        let mut s = playing();
        s.tuning.spawn_interval = Duration::from_secs(1);
        let mut rng = seeded_rng();
        let mut spawned = 0;
        for _ in 0..frames {
            let (next, events) = tick(&s, &idle(), Duration::from_millis(dt), &mut rng);
            spawned += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Spawned(_)))
                .count();
            s = next;
        }
        assert_eq!(spawned, 2);
    }
}

#[test]
fn one_obstacle_after_one_second_then_dodged() {
    let mut s = playing();
    let mut rng = seeded_rng();
    let dt = Duration::from_millis(100);
    for _ in 0..10 {
        s = tick(&s, &idle(), dt, &mut rng).0;
    }
    assert_eq!(s.obstacles.len(), 1);
    assert_eq!(s.score, 0);

    // No more spawns; keep the player out of the poop's column.
    s.tuning.spawn_interval = Duration::from_secs(3600);
    s.player.rect.x = if s.obstacles[0].rect.center_x() < 400.0 { 750.0 } else { 0.0 };

    let mut frames = 0;
    while !s.obstacles.is_empty() && frames < 1000 {
        s = tick(&s, &idle(), dt, &mut rng).0;
        frames += 1;
    }
    assert!(s.obstacles.is_empty());
    assert_eq!(s.score, 1);
    assert_eq!(s.player.lives, 3);
}

#[test]
fn obstacle_removed_only_once_past_bottom() {
    let mut s = playing();
    s.obstacles.push(Obstacle {
        rect: Rect::new(0.0, 597.0, 30.0, 30.0),
        speed: 3.0,
        size: ObstacleSize::Small,
    });
    // y = 600: top edge on the bottom line, still on screen
    let (s2, events) = tick(&s, &idle(), FRAME, &mut seeded_rng());
    assert_eq!(s2.obstacles.len(), 1);
    assert!(events.is_empty());

    let (s3, events) = tick(&s2, &idle(), FRAME, &mut seeded_rng());
    assert!(s3.obstacles.is_empty());
    assert_eq!(s3.score, 1);
    assert_eq!(events, vec![GameEvent::Dodged]);

    let (s4, _) = tick(&s3, &idle(), FRAME, &mut seeded_rng());
    assert_eq!(s4.score, 1);
}

// ── tick: collisions ─────────────────────────────────────────────────────────

#[test]
fn collision_costs_life_and_removes_obstacle() {
    let mut s = playing();
    s.obstacles.push(obstacle_on_player(ObstacleSize::Medium));
    let (s2, events) = tick(&s, &idle(), FRAME, &mut seeded_rng());

    assert!(s2.obstacles.is_empty());
    assert_eq!(s2.player.lives, 2);
    assert_eq!(s2.score, 0);
    assert_eq!(s2.particles.len(), 15);
    assert!(s2.player.is_hit());
    assert_eq!(s2.state, GameState::Playing);
    assert!(matches!(
        events.as_slice(),
        [GameEvent::Collision { size: ObstacleSize::Medium, .. }]
    ));
}

#[test]
fn particle_count_scales_with_size() {
    for size in ObstacleSize::ALL {
        let mut s = playing();
        s.obstacles.push(obstacle_on_player(size));
        let (s2, _) = tick(&s, &idle(), FRAME, &mut seeded_rng());
        assert_eq!(s2.particles.len(), size.particle_count());
    }
}

#[test]
fn last_life_lost_to_large_obstacle_ends_game() {
    let mut s = playing();
    s.player.lives = 1;
    s.obstacles.push(obstacle_on_player(ObstacleSize::Large));
    let before = s.particles.len();

    let (s2, events) = tick(&s, &idle(), FRAME, &mut seeded_rng());

    assert_eq!(s2.player.lives, 0);
    assert_eq!(s2.state, GameState::GameOver);
    assert_eq!(s2.particles.len(), before + 20);
    assert_eq!(
        events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count(),
        1
    );
}

#[test]
fn simultaneous_hits_end_game_only_once() {
    let mut s = playing();
    s.player.lives = 1;
    s.obstacles.push(obstacle_on_player(ObstacleSize::Small));
    s.obstacles.push(obstacle_on_player(ObstacleSize::Large));
    s.obstacles.push(obstacle_on_player(ObstacleSize::Medium));

    let (s2, events) = tick(&s, &idle(), FRAME, &mut seeded_rng());

    assert_eq!(s2.player.lives, 0);
    assert_eq!(s2.state, GameState::GameOver);
    let collisions = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Collision { .. }))
        .count();
    let game_overs = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .count();
    assert_eq!(collisions, 1);
    assert_eq!(game_overs, 1);
    // The untouched obstacles are kept, not scored
    assert_eq!(s2.obstacles.len(), 2);
    assert_eq!(s2.score, 0);
}

#[test]
fn hit_during_cooldown_keeps_timer_but_costs_life() {
    let mut s = playing();
    s.obstacles.push(obstacle_on_player(ObstacleSize::Small));
    let (mut s2, _) = tick(&s, &idle(), FRAME, &mut seeded_rng());
    let first_hit = s2.player.hit;
    assert_eq!(s2.player.lives, 2);

    s2.obstacles.push(obstacle_on_player(ObstacleSize::Small));
    let (s3, events) = tick(&s2, &idle(), FRAME, &mut seeded_rng());

    let HitState::Hit { since, .. } = s3.player.hit else {
        panic!("player should still be in cooldown");
    };
    let HitState::Hit { since: first_since, .. } = first_hit else {
        panic!("first collision should start cooldown");
    };
    assert_eq!(since, first_since);
    assert_eq!(s3.player.lives, 1);
    assert!(matches!(events.as_slice(), [GameEvent::Collision { .. }]));
}

#[test]
fn game_over_freezes_session() {
    let mut s = playing();
    s.player.lives = 1;
    s.obstacles.push(obstacle_on_player(ObstacleSize::Small));
    let (over, _) = tick(&s, &idle(), FRAME, &mut seeded_rng());
    let (after, events) = tick(&over, &idle(), FRAME, &mut seeded_rng());
    assert_eq!(after.frame, over.frame);
    assert!(events.is_empty());
}

// ── step: input dispatch ─────────────────────────────────────────────────────

#[test]
fn confirm_starts_game_from_menu() {
    let s = make_session();
    let input = FrameInput {
        confirm: true,
        ..FrameInput::default()
    };
    let (s2, events) = step(&s, &input, FRAME, &mut seeded_rng());
    assert_eq!(s2.state, GameState::Playing);
    assert_eq!(events.first(), Some(&GameEvent::Started));
}

#[test]
fn click_on_start_button_starts_game() {
    let s = make_session();
    let input = FrameInput {
        click: Some((400.0, 300.0)),
        ..FrameInput::default()
    };
    let (s2, _) = step(&s, &input, FRAME, &mut seeded_rng());
    assert_eq!(s2.state, GameState::Playing);
}

#[test]
fn click_outside_button_does_nothing() {
    let s = make_session();
    let input = FrameInput {
        click: Some((10.0, 10.0)),
        ..FrameInput::default()
    };
    let (s2, events) = step(&s, &input, FRAME, &mut seeded_rng());
    assert_eq!(s2.state, GameState::Menu);
    assert!(events.is_empty());
}

#[test]
fn menu_click_on_restart_position_does_nothing() {
    // The restart button is only live on the game-over screen
    let s = make_session();
    let input = FrameInput {
        click: Some((400.0, 400.0)),
        ..FrameInput::default()
    };
    let (s2, _) = step(&s, &input, FRAME, &mut seeded_rng());
    assert_eq!(s2.state, GameState::Menu);
}

#[test]
fn confirm_while_playing_does_not_restart() {
    let mut s = playing();
    s.score = 7;
    let input = FrameInput {
        confirm: true,
        ..FrameInput::default()
    };
    let (s2, events) = step(&s, &input, FRAME, &mut seeded_rng());
    assert_eq!(s2.score, 7);
    assert!(!events.contains(&GameEvent::Started));
}

#[test]
fn restart_after_game_over_resets_everything() {
    let mut s = playing();
    let mut rng = seeded_rng();
    for _ in 0..120 {
        s = tick(&s, &idle(), Duration::from_millis(50), &mut rng).0;
    }
    s.score = 12;
    s.player.lives = 1;
    s.obstacles.push(obstacle_on_player(ObstacleSize::Large));
    s = tick(&s, &idle(), FRAME, &mut rng).0;
    assert_eq!(s.state, GameState::GameOver);
    assert!(!s.particles.is_empty());
    assert!(s.fall_speed > 3.0);

    let restart = FrameInput {
        click: Some((400.0, 400.0)),
        ..FrameInput::default()
    };
    let started = start_game(&s);
    let (s2, events) = step(&s, &restart, Duration::ZERO, &mut rng);

    assert_eq!(events.first(), Some(&GameEvent::Started));
    assert_eq!(started.state, GameState::Playing);
    assert_eq!(started.score, 0);
    assert_eq!(started.player.lives, 3);
    assert!(started.obstacles.is_empty());
    assert!(started.particles.is_empty());
    assert_eq!(started.fall_speed, 3.0);
    assert_eq!(started.best_score, 12);
    assert_eq!(s2.state, GameState::Playing);
    assert_eq!(s2.score, 0);
}

#[test]
fn best_score_tracks_highest_score() {
    let mut s = playing();
    s.score = 4;
    s.best_score = 2;
    s.obstacles.push(Obstacle {
        rect: Rect::new(0.0, 599.0, 30.0, 30.0),
        speed: 3.0,
        size: ObstacleSize::Small,
    });
    let (s2, _) = tick(&s, &idle(), FRAME, &mut seeded_rng());
    assert_eq!(s2.score, 5);
    assert_eq!(s2.best_score, 5);
}
