//! Collision debris
//!
//! Short-lived brown particles thrown up where a poop lands on the cat.
//! Motion is integrated per frame, not per second: velocities are in
//! pixels per frame and lifetime counts frames.

use rand::Rng;

use crate::entities::Particle;

/// Frames a particle lives.
pub const PARTICLE_LIFETIME: u32 = 30;
/// Added to vertical velocity every frame.
pub const GRAVITY: f32 = 0.3;
pub const RADIUS_DECAY: f32 = 0.1;
/// Radius never shrinks below this.
pub const RADIUS_FLOOR: f32 = 0.2;

pub fn spawn_particle(x: f32, y: f32, rng: &mut impl Rng) -> Particle {
    Particle {
        x,
        y,
        vx: rng.gen_range(-3.0..=3.0),
        vy: rng.gen_range(-7.0..=-2.0),
        radius: rng.gen_range(2..=5) as f32,
        life: PARTICLE_LIFETIME,
    }
}

/// `count` particles starting at the same point.
pub fn spawn_burst(x: f32, y: f32, count: usize, rng: &mut impl Rng) -> Vec<Particle> {
    (0..count).map(|_| spawn_particle(x, y, rng)).collect()
}

/// One frame of motion.
pub fn advance(p: &Particle) -> Particle {
    let radius = if p.radius > RADIUS_FLOOR {
        (p.radius - RADIUS_DECAY).max(RADIUS_FLOOR)
    } else {
        p.radius
    };
    Particle {
        x: p.x + p.vx,
        y: p.y + p.vy,
        vy: p.vy + GRAVITY,
        radius,
        life: p.life.saturating_sub(1),
        ..p.clone()
    }
}

/// Advance every particle and drop the ones whose lifetime ran out.
pub fn update_particles(particles: &[Particle]) -> Vec<Particle> {
    particles
        .iter()
        .map(advance)
        .filter(|p| p.life > 0)
        .collect()
}
