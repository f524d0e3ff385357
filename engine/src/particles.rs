//! Ballistic particle field fed by [`BurstSpec`]s.
//!
//! Coordinates are normalized to the viewport (0.0..1.0 on both axes); the
//! renderer maps them to cells. The simulation steps at a fixed rate regardless
//! of frame cadence.

use std::time::Duration;

use midnight_types::{BurstSink, BurstSpec, Rgb};

/// Simulation steps per second.
pub const SIM_HZ: u32 = 60;
const SIM_STEP: Duration = Duration::from_nanos(1_000_000_000 / SIM_HZ as u64);

/// Converts a burst's start velocity into viewport units per step.
const VELOCITY_SCALE: f32 = 0.0012;
/// Per-step velocity retention.
const DECAY: f32 = 0.9;
/// Downward acceleration per step.
const GRAVITY: f32 = 0.0015;
const MAX_PARTICLES: usize = 4_000;

/// Source of uniform randomness in `[0, 1)`.
pub trait Jitter {
    fn unit(&mut self) -> f32;

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.unit() * (max - min)
    }
}

/// Thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadJitter;

impl Jitter for ThreadJitter {
    fn unit(&mut self) -> f32 {
        rand::random::<f32>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    age: u32,
    life: u32,
    color: Rgb,
}

impl Particle {
    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// 1.0 when freshly spawned, falling to 0.0 at end of life.
    #[must_use]
    pub fn brightness(&self) -> f32 {
        if self.life == 0 {
            return 0.0;
        }
        1.0 - (self.age as f32 / self.life as f32).clamp(0.0, 1.0)
    }

    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= DECAY;
        self.vy = self.vy * DECAY + GRAVITY;
        self.age = self.age.saturating_add(1);
    }

    fn is_alive(&self) -> bool {
        self.age < self.life
    }
}

pub struct ParticleField {
    particles: Vec<Particle>,
    jitter: Box<dyn Jitter>,
    /// Time not yet consumed by whole simulation steps.
    carry: Duration,
}

impl std::fmt::Debug for ParticleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleField")
            .field("particles", &self.particles.len())
            .field("carry", &self.carry)
            .finish_non_exhaustive()
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(Box::new(ThreadJitter))
    }
}

impl ParticleField {
    #[must_use]
    pub fn new(jitter: Box<dyn Jitter>) -> Self {
        Self {
            particles: Vec::new(),
            jitter,
            carry: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.carry = Duration::ZERO;
    }

    /// Advance by `delta`, running as many fixed steps as fit.
    pub fn step(&mut self, delta: Duration) {
        self.carry = self.carry.saturating_add(delta);
        while self.carry >= SIM_STEP {
            self.carry -= SIM_STEP;
            for particle in &mut self.particles {
                particle.step();
            }
        }
        self.particles.retain(Particle::is_alive);
    }
}

impl BurstSink for ParticleField {
    fn burst(&mut self, spec: &BurstSpec) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        let count = (spec.particle_count as usize).min(room);
        if count < spec.particle_count as usize {
            tracing::trace!(
                requested = spec.particle_count,
                spawned = count,
                "particle field full"
            );
        }

        let spread = spec.spread_degrees.to_radians();
        let base_speed = spec.start_velocity * VELOCITY_SCALE;
        for _ in 0..count {
            // Straight up, widened by the spread cone.
            let angle = std::f32::consts::FRAC_PI_2 + spread * (self.jitter.unit() - 0.5);
            let speed = base_speed * (0.5 + self.jitter.unit());
            let color = if spec.colors.is_empty() {
                Rgb(255, 255, 255)
            } else {
                let idx = (self.jitter.unit() * spec.colors.len() as f32) as usize;
                spec.colors[idx.min(spec.colors.len() - 1)]
            };
            self.particles.push(Particle {
                x: spec.origin.x,
                y: spec.origin.y,
                vx: angle.cos() * speed,
                // Screen y grows downwards.
                vy: -angle.sin() * speed,
                age: 0,
                life: spec.ticks,
                color,
            });
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Jitter, MAX_PARTICLES, ParticleField, SIM_HZ};
    use midnight_types::{BurstSink, BurstSpec, GOLD_PALETTE, Origin};
    use std::time::Duration;

    /// Replays a fixed sequence of values, cycling.
    pub(crate) struct SequenceJitter {
        values: Vec<f32>,
        next: usize,
    }

    impl SequenceJitter {
        pub(crate) fn new(values: &[f32]) -> Self {
            Self {
                values: values.to_vec(),
                next: 0,
            }
        }
    }

    impl Jitter for SequenceJitter {
        fn unit(&mut self) -> f32 {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }
    }

    fn centered(count: u32) -> BurstSpec {
        BurstSpec::firework(Origin { x: 0.5, y: 0.5 }, count)
    }

    #[test]
    fn burst_spawns_requested_count_at_origin() {
        let mut field = ParticleField::new(Box::new(SequenceJitter::new(&[0.5])));
        field.burst(&centered(25));
        assert_eq!(field.len(), 25);
        for p in field.particles() {
            assert!((p.x() - 0.5).abs() < f32::EPSILON);
            assert!((p.y() - 0.5).abs() < f32::EPSILON);
            assert!(GOLD_PALETTE.contains(&p.color()));
            assert!((p.brightness() - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn centered_jitter_launches_upwards() {
        // 0.5 jitter puts the angle at straight up.
        let mut field = ParticleField::new(Box::new(SequenceJitter::new(&[0.5])));
        field.burst(&centered(1));
        field.step(Duration::from_millis(100));
        let p = field.particles()[0];
        assert!(p.y() < 0.5, "particle should rise, got y={}", p.y());
        assert!((p.x() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn particles_expire_after_lifetime() {
        let mut field = ParticleField::new(Box::new(SequenceJitter::new(&[0.1, 0.7, 0.3])));
        field.burst(&centered(10));
        // 60 ticks at 60 Hz is one second.
        field.step(Duration::from_millis(500));
        assert_eq!(field.len(), 10);
        assert!(field.particles()[0].brightness() < 1.0);
        field.step(Duration::from_millis(600));
        assert!(field.is_empty());
    }

    #[test]
    fn partial_steps_carry_over() {
        let mut field = ParticleField::new(Box::new(SequenceJitter::new(&[0.5])));
        field.burst(&centered(1));
        let step = Duration::from_secs(1) / SIM_HZ;
        field.step(step / 2);
        assert!((field.particles()[0].y() - 0.5).abs() < f32::EPSILON);
        field.step(step / 2 + Duration::from_micros(10));
        assert!(field.particles()[0].y() < 0.5);
    }

    #[test]
    fn population_is_capped() {
        let mut field = ParticleField::new(Box::new(SequenceJitter::new(&[0.2, 0.8])));
        for _ in 0..10 {
            field.burst(&centered(1_000));
        }
        assert_eq!(field.len(), MAX_PARTICLES);
        field.clear();
        assert!(field.is_empty());
    }
}
