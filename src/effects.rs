//! Particle bursts
//!
//! Purely visual: the controller fires bursts at score and death positions,
//! the renderer ages and draws them. Nothing here feeds back into gameplay.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Kind of burst, which picks count, speed, and color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    Food,
    LevelUp,
    Death,
}

impl Burst {
    fn count(self) -> usize {
        match self {
            Burst::Food => 12,
            Burst::LevelUp => 24,
            Burst::Death => 40,
        }
    }

    /// Initial speed range (playfield units per second)
    fn speed(self) -> (f32, f32) {
        match self {
            Burst::Food => (40.0, 120.0),
            Burst::LevelUp => (60.0, 160.0),
            Burst::Death => (80.0, 240.0),
        }
    }

    fn color(self) -> [u8; 3] {
        match self {
            Burst::Food => [0xff, 0x6b, 0x6b],
            Burst::LevelUp => [0xff, 0xd9, 0x3d],
            Burst::Death => [0x4e, 0xcd, 0xc4],
        }
    }
}

/// Receives "emit particles at P" notifications
pub trait ParticleSink {
    fn emit(&mut self, at: Vec2, burst: Burst);
}

/// Sink that discards every burst
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParticles;

impl ParticleSink for NoParticles {
    fn emit(&mut self, _at: Vec2, _burst: Burst) {}
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    /// 1.0 when spawned, removed at 0.0
    pub life: f32,
    pub size: f32,
}

/// Live particles with a cap
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    rng: Pcg32,
    max: usize,
}

impl ParticleField {
    /// Lifetime of a particle in seconds
    const LIFETIME: f32 = 0.6;
    /// Velocity damping per second
    const DRAG: f32 = 2.5;

    pub fn new(seed: u64, max: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max),
            rng: Pcg32::seed_from_u64(seed),
            max,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Change the cap (0 disables particles), dropping the oldest overflow
    pub fn set_limit(&mut self, max: usize) {
        self.max = max;
        if self.particles.len() > max {
            let excess = self.particles.len() - max;
            self.particles.drain(..excess);
        }
    }

    /// Age every particle by `dt_ms` milliseconds
    pub fn update(&mut self, dt_ms: f64) {
        let dt = (dt_ms / 1000.0) as f32;
        let damping = (1.0 - Self::DRAG * dt).max(0.0);
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel * dt;
            particle.vel *= damping;
            particle.life -= dt / Self::LIFETIME;
            particle.size *= 0.99;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

impl ParticleSink for ParticleField {
    fn emit(&mut self, at: Vec2, burst: Burst) {
        let (min_speed, max_speed) = burst.speed();
        for _ in 0..burst.count() {
            if self.particles.len() >= self.max {
                break;
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(min_speed..max_speed);
            self.particles.push(Particle {
                pos: at,
                vel: Vec2::from_angle(angle) * speed,
                color: burst.color(),
                life: 1.0,
                size: self.rng.random_range(2.0..4.5),
            });
        }
    }
}

/// Shared field: the renderer draws it while the controller emits into it
impl<T: ParticleSink> ParticleSink for Rc<RefCell<T>> {
    fn emit(&mut self, at: Vec2, burst: Burst) {
        self.borrow_mut().emit(at, burst);
    }
}
