//! Fireworks: a rocket that climbs against gravity, then bursts into debris
//!
//! The rocket explodes exactly once, at the apex (first tick its vertical
//! velocity is no longer upward). Debris reuses the burst primitive.

use glam::Vec2;
use rand::Rng;

use super::particle::{BurstProfile, Particle, ParticleKind, ParticleSystem, Rgba, StepContext};
use crate::consts::*;

/// Rocket draw radius
pub const ROCKET_RADIUS: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct Firework {
    /// Present until the explosion
    rocket: Option<Particle>,
    debris: ParticleSystem,
    color: Rgba,
}

impl Firework {
    pub fn new(pos: Vec2, vel: Vec2, color: Rgba) -> Self {
        Self {
            rocket: Some(Particle::new(
                ParticleKind::RocketTrail,
                pos,
                vel,
                ROCKET_RADIUS,
                color,
            )),
            debris: ParticleSystem::new(BurstProfile::DEBRIS),
            color,
        }
    }

    /// Launch from the bottom edge with an upward-biased velocity
    pub fn launch<R: Rng + ?Sized>(bounds: Vec2, rng: &mut R) -> Self {
        let margin = FIREWORK_LAUNCH_MARGIN.min(bounds.x / 2.0);
        let x = if bounds.x - margin > margin {
            rng.random_range(margin..bounds.x - margin)
        } else {
            bounds.x / 2.0
        };
        let vel = Vec2::new(rng.random_range(-2.0..=2.0), rng.random_range(-12.0..=-6.0));
        Self::new(Vec2::new(x, bounds.y), vel, Rgba::random_bright(rng))
    }

    /// Advance one tick. Returns true on the tick the rocket explodes.
    pub fn step<R: Rng + ?Sized>(&mut self, ctx: &StepContext, rng: &mut R) -> bool {
        let mut exploded_now = false;

        if let Some(rocket) = self.rocket.as_mut() {
            rocket.step(self.debris.profile(), ctx);
            if rocket.vel.y >= 0.0 {
                let apex = rocket.pos;
                self.rocket = None;
                self.debris.spawn_burst_at(apex, FIREWORK_DEBRIS, self.color, rng);
                exploded_now = true;
                log::debug!("Firework exploded at ({:.0}, {:.0})", apex.x, apex.y);
            }
        }

        self.debris.step(ctx);
        exploded_now
    }

    pub fn is_exploded(&self) -> bool {
        self.rocket.is_none()
    }

    /// Exploded and every debris particle has faded
    pub fn is_done(&self) -> bool {
        self.is_exploded() && self.debris.is_empty()
    }

    pub fn rocket(&self) -> Option<&Particle> {
        self.rocket.as_ref()
    }

    pub fn debris(&self) -> &ParticleSystem {
        &self.debris
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Rocket (while ascending) followed by debris
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.rocket.iter().chain(self.debris.iter())
    }
}

/// Live fireworks, launched at random while the celebration gate is open
#[derive(Debug, Clone, Default)]
pub struct FireworkSystem {
    fireworks: Vec<Firework>,
}

impl FireworkSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// One uniform draw per call; launches a firework when it lands under
    /// `probability`. Returns whether one was launched.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        enabled: bool,
        probability: f32,
        bounds: Vec2,
        rng: &mut R,
    ) -> bool {
        if !enabled {
            return false;
        }
        if rng.random::<f32>() < probability {
            self.fireworks.push(Firework::launch(bounds, rng));
            log::debug!("Firework launched ({} live)", self.fireworks.len());
            true
        } else {
            false
        }
    }

    pub fn push(&mut self, firework: Firework) {
        self.fireworks.push(firework);
    }

    /// Step every firework and drop the finished ones
    pub fn step<R: Rng + ?Sized>(&mut self, ctx: &StepContext, rng: &mut R) {
        for firework in &mut self.fireworks {
            firework.step(ctx, rng);
        }
        self.fireworks.retain(|f| !f.is_done());
    }

    pub fn clear(&mut self) {
        self.fireworks.clear();
    }

    pub fn len(&self) -> usize {
        self.fireworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fireworks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Firework> {
        self.fireworks.iter()
    }

    /// Every rocket and debris particle across all fireworks
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.fireworks.iter().flat_map(|f| f.particles())
    }
}
