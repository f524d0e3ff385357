//! Particle burst requests.
//!
//! The engine decides *when* and *where* to burst; whatever implements
//! [`BurstSink`] decides how the particles look and move.

/// A plain 24-bit color, kept free of any rendering crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const GOLD_PALETTE: &[Rgb] = &[
    Rgb(255, 215, 0),
    Rgb(251, 191, 36),
    Rgb(253, 230, 138),
    Rgb(217, 119, 6),
    Rgb(255, 255, 255),
];

/// Burst origin in normalized viewport coordinates.
///
/// `x` runs 0.0 (left) to 1.0 (right), `y` 0.0 (top) to 1.0 (bottom). Values
/// outside that range are allowed; particles may start off-screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurstSpec {
    pub origin: Origin,
    pub particle_count: u32,
    /// Emission cone in degrees; 360 emits in every direction.
    pub spread_degrees: f32,
    /// Initial speed in viewport cells per tick.
    pub start_velocity: f32,
    /// Particle lifetime in simulation ticks.
    pub ticks: u32,
    pub colors: &'static [Rgb],
}

impl BurstSpec {
    /// Defaults for a fireworks burst at `origin`.
    #[must_use]
    pub fn firework(origin: Origin, particle_count: u32) -> Self {
        Self {
            origin,
            particle_count,
            spread_degrees: 360.0,
            start_velocity: 30.0,
            ticks: 60,
            colors: GOLD_PALETTE,
        }
    }
}

/// Fire-and-forget receiver of bursts.
pub trait BurstSink {
    fn burst(&mut self, spec: &BurstSpec);
}
