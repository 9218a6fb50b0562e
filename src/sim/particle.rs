//! Point-mass particles with semi-implicit Euler integration
//!
//! One `Particle` shape serves every effect; `ParticleKind` selects the
//! per-tick policy (wrap, decay, or plain ballistic flight).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::unit_from_angle;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Feedback burst for a correct answer
    pub const CORRECT: Rgba = Rgba::rgb(60, 180, 80);
    /// Feedback burst for a wrong answer
    pub const WRONG: Rgba = Rgba::rgb(220, 50, 50);

    /// Bright random color (each channel 60-255)
    pub fn random_bright<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rgb(
            rng.random_range(60..=255),
            rng.random_range(60..=255),
            rng.random_range(60..=255),
        )
    }
}

/// Particle behavior class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Background drift; never expires, wraps at the viewport edges
    Ambient,
    /// Decaying burst fragment (answer feedback, firework debris)
    Burst,
    /// Ascending firework rocket; lives until its firework explodes
    RocketTrail,
}

/// Tuning for how burst particles are created and decay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstProfile {
    pub speed_min: f32,
    pub speed_max: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Lifespan lost per reference tick
    pub decay: f32,
    /// Velocity multiplier per reference tick
    pub damping: f32,
    /// Fraction of global gravity felt
    pub gravity_scale: f32,
}

impl BurstProfile {
    /// Small, fast-fading answer feedback particles
    pub const FEEDBACK: BurstProfile = BurstProfile {
        speed_min: 1.0,
        speed_max: 5.0,
        radius_min: 2.0,
        radius_max: 5.0,
        decay: 6.0,
        damping: BURST_DAMPING,
        gravity_scale: 0.2,
    };

    /// Larger, slower-fading firework debris
    pub const DEBRIS: BurstProfile = BurstProfile {
        speed_min: 2.0,
        speed_max: 8.0,
        radius_min: 2.0,
        radius_max: 4.0,
        decay: 3.0,
        damping: BURST_DAMPING,
        gravity_scale: 1.0,
    };

    /// Background drift. Ambient particles never decay or feel gravity, so
    /// only the spawn radius applies.
    pub const AMBIENT: BurstProfile = BurstProfile {
        speed_min: 0.0,
        speed_max: 0.5,
        radius_min: 2.0,
        radius_max: 8.0,
        decay: 0.0,
        damping: 1.0,
        gravity_scale: 0.0,
    };
}

/// Per-tick environment shared by every particle in a step
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    pub gravity: Vec2,
    /// Reference ticks elapsed per simulation tick
    pub scale: f32,
    /// Viewport size for ambient wrapping
    pub bounds: Vec2,
}

impl StepContext {
    /// Reference 60 Hz tick with the default gravity
    pub fn reference(bounds: Vec2) -> Self {
        Self {
            gravity: GRAVITY,
            scale: 1.0,
            bounds,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub lifespan: f32,
    pub radius: f32,
    pub color: Rgba,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn new(kind: ParticleKind, pos: Vec2, vel: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            pos,
            vel,
            acc: Vec2::ZERO,
            lifespan: PARTICLE_LIFESPAN,
            radius,
            color,
            kind,
        }
    }

    /// Accumulate a force for the next integration
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.acc += force;
    }

    /// velocity += acceleration; position += velocity; acceleration cleared
    #[inline]
    pub fn integrate(&mut self, scale: f32) {
        self.vel += self.acc * scale;
        self.pos += self.vel * scale;
        self.acc = Vec2::ZERO;
    }

    /// Advance one tick under the policy for this particle's kind
    pub fn step(&mut self, profile: &BurstProfile, ctx: &StepContext) {
        match self.kind {
            ParticleKind::Ambient => {
                self.integrate(ctx.scale);
                self.wrap(ctx.bounds);
            }
            ParticleKind::Burst => {
                self.apply_force(ctx.gravity * profile.gravity_scale);
                self.integrate(ctx.scale);
                self.vel *= profile.damping.powf(ctx.scale);
                self.lifespan -= profile.decay * ctx.scale;
            }
            ParticleKind::RocketTrail => {
                self.apply_force(ctx.gravity);
                self.integrate(ctx.scale);
            }
        }
    }

    /// Re-enter from the opposite edge once past the wrap margin
    fn wrap(&mut self, bounds: Vec2) {
        let m = AMBIENT_WRAP_MARGIN;
        if self.pos.x < -m {
            self.pos.x = bounds.x + m;
        } else if self.pos.x > bounds.x + m {
            self.pos.x = -m;
        }
        if self.pos.y < -m {
            self.pos.y = bounds.y + m;
        } else if self.pos.y > bounds.y + m {
            self.pos.y = -m;
        }
    }

    /// Only burst particles expire
    #[inline]
    pub fn is_done(&self) -> bool {
        self.kind == ParticleKind::Burst && self.lifespan <= 0.0
    }

    /// Draw alpha; bursts fade with remaining lifespan
    pub fn alpha(&self) -> u8 {
        match self.kind {
            ParticleKind::Burst => self.lifespan.clamp(0.0, 255.0) as u8,
            _ => self.color.a,
        }
    }
}

/// Owned set of live particles sharing one burst profile
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    profile: BurstProfile,
}

impl ParticleSystem {
    pub fn new(profile: BurstProfile) -> Self {
        Self {
            particles: Vec::new(),
            profile,
        }
    }

    pub fn profile(&self) -> &BurstProfile {
        &self.profile
    }

    /// Spawn `count` burst particles around `origin`, flying out in random
    /// directions at speeds from the profile
    pub fn spawn_burst<R: Rng + ?Sized>(
        &mut self,
        origin: Vec2,
        count: usize,
        color: Rgba,
        rng: &mut R,
    ) {
        let p = self.profile;
        self.particles.reserve(count);
        for _ in 0..count {
            let jitter = Vec2::new(
                rng.random_range(-BURST_JITTER..=BURST_JITTER),
                rng.random_range(-BURST_JITTER..=BURST_JITTER),
            );
            let dir = unit_from_angle(rng.random_range(0.0..std::f32::consts::TAU));
            let speed = rng.random_range(p.speed_min..=p.speed_max);
            let radius = rng.random_range(p.radius_min..=p.radius_max);
            self.particles.push(Particle::new(
                ParticleKind::Burst,
                origin + jitter,
                dir * speed,
                radius,
                color,
            ));
        }
    }

    /// Spawn an exact-position burst with no jitter (firework explosions)
    pub fn spawn_burst_at<R: Rng + ?Sized>(
        &mut self,
        origin: Vec2,
        count: usize,
        color: Rgba,
        rng: &mut R,
    ) {
        let p = self.profile;
        self.particles.reserve(count);
        for _ in 0..count {
            let dir = unit_from_angle(rng.random_range(0.0..std::f32::consts::TAU));
            let speed = rng.random_range(p.speed_min..=p.speed_max);
            let radius = rng.random_range(p.radius_min..=p.radius_max);
            self.particles
                .push(Particle::new(ParticleKind::Burst, origin, dir * speed, radius, color));
        }
    }

    /// Fill with `count` drifting background particles inside `bounds`
    pub fn spawn_ambient<R: Rng + ?Sized>(&mut self, count: usize, bounds: Vec2, rng: &mut R) {
        self.particles.reserve(count);
        for _ in 0..count {
            let pos = Vec2::new(rng.random_range(0.0..bounds.x), rng.random_range(0.0..bounds.y));
            let drift = self.profile.speed_max;
            let vel = Vec2::new(
                rng.random_range(-drift..=drift),
                rng.random_range(-drift..=drift),
            );
            let color = Rgba {
                r: 255,
                g: rng.random_range(120..=220),
                b: rng.random_range(120..=220),
                a: 70,
            };
            let radius = rng.random_range(self.profile.radius_min..=self.profile.radius_max);
            self.particles
                .push(Particle::new(ParticleKind::Ambient, pos, vel, radius, color));
        }
    }

    /// Integrate every particle once and drop the expired ones
    pub fn step(&mut self, ctx: &StepContext) {
        let profile = self.profile;
        for particle in &mut self.particles {
            particle.step(&profile, ctx);
        }
        self.particles.retain(|p| !p.is_done());
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}
