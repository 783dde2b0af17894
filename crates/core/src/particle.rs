//! Particle pool: spawn, evolve, and trail rendering.
//!
//! A [`ParticleSystem`] owns a fixed pool of particles sized from the
//! viewport area and a density constant. Every tick each particle is aged,
//! moved along the interpolated velocity under it, and respawned when it
//! expires, runs out of data, or would step onto land. Respawn replaces
//! every mutable field at once so a particle never holds a half-reset state.

use crate::buffer::FrameBuffer;
use crate::config::FlowConfig;
use crate::field::VectorField;
use crate::prng::Xorshift64;
use crate::scale::ColorScale;

/// Bounded number of random placements tried per spawn before giving up and
/// accepting the last candidate.
const MAX_SPAWN_ATTEMPTS: usize = 10;

/// Trail segments shorter than this many pixels are not stroked, avoiding
/// flicker from near-stationary particles.
const VISIBILITY_EPS: f64 = 0.25;

/// One particle of the pool. Mutated in place every tick, never shared.
#[derive(Debug, Clone, Copy)]
struct Particle {
    /// Committed screen position.
    x: f64,
    y: f64,
    /// Next position target, committed by `draw`.
    xt: f64,
    yt: f64,
    /// Ticks lived since the last respawn.
    age: u32,
    /// Last interpolated magnitude, for color mapping.
    magnitude: f64,
}

impl Particle {
    /// Resets every mutable field to a fresh state at (x, y).
    fn respawn(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.xt = x;
        self.yt = y;
        self.age = 0;
        self.magnitude = 0.0;
    }
}

/// A pool of particles tracing a [`VectorField`], rendered as fading trails.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Xorshift64,
    max_age: u32,
}

impl ParticleSystem {
    /// Creates a pool sized for the field's viewport and spawns every
    /// particle at a valid position (best effort).
    ///
    /// Initial ages are staggered randomly across `[0, max_age)` so the pool
    /// does not expire in lockstep.
    pub fn new(field: &VectorField, config: &FlowConfig) -> Self {
        let count = Self::pool_size(field.width(), field.height(), config.particle_density);
        let mut rng = Xorshift64::new(config.seed);
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let (x, y) = Self::pick_position(&mut rng, field);
            let mut p = Particle {
                x: 0.0,
                y: 0.0,
                xt: 0.0,
                yt: 0.0,
                age: 0,
                magnitude: 0.0,
            };
            p.respawn(x, y);
            p.age = (rng.next_f64() * config.max_age as f64) as u32;
            particles.push(p);
        }
        Self {
            particles,
            rng,
            max_age: config.max_age,
        }
    }

    /// Pool size for a viewport: area times density, at least one particle.
    pub fn pool_size(width: usize, height: usize, density: f64) -> usize {
        (((width * height) as f64) * density).ceil().max(1.0) as usize
    }

    /// Number of particles in the pool.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false: the pool holds at least one particle.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Picks a spawn position: up to [`MAX_SPAWN_ATTEMPTS`] uniform draws
    /// biased toward traversable area, falling back to the last candidate.
    /// A particle spawned on land is corrected by the respawn on its next
    /// tick.
    fn pick_position(rng: &mut Xorshift64, field: &VectorField) -> (f64, f64) {
        let (w, h) = (field.width() as f64, field.height() as f64);
        let mut x = rng.next_range(0.0, w);
        let mut y = rng.next_range(0.0, h);
        for _ in 1..MAX_SPAWN_ATTEMPTS {
            if field.is_valid(x, y) {
                break;
            }
            x = rng.next_range(0.0, w);
            y = rng.next_range(0.0, h);
        }
        (x, y)
    }

    /// Advances every particle one simulation tick.
    ///
    /// Per particle: age and expire; respawn on undefined velocity; step by
    /// the interpolated (u, v); respawn instead of crossing onto land or out
    /// of the viewport. A particle respawned mid-tick keeps `xt = x`, so the
    /// subsequent `draw` never strokes it at a position it was denied.
    pub fn evolve(&mut self, field: &VectorField) {
        let rng = &mut self.rng;
        for p in &mut self.particles {
            p.age += 1;
            if p.age > self.max_age {
                let (x, y) = Self::pick_position(rng, field);
                p.respawn(x, y);
                continue;
            }
            let vel = field.interpolate(p.x, p.y);
            if vel.is_zero() {
                // No data or land under the particle.
                let (x, y) = Self::pick_position(rng, field);
                p.respawn(x, y);
                continue;
            }
            let xt = p.x + vel.u;
            let yt = p.y + vel.v;
            if field.is_valid(xt.round(), yt.round()) {
                p.xt = xt;
                p.yt = yt;
                p.magnitude = vel.magnitude;
            } else {
                // The particle dies at the coastline instead of sliding
                // along it.
                let (x, y) = Self::pick_position(rng, field);
                p.respawn(x, y);
            }
        }
    }

    /// Renders one frame: fades the previous frame into a trail, strokes
    /// each particle's pre-tick to post-tick segment colored by magnitude,
    /// and commits the new positions.
    pub fn draw(&mut self, buffer: &mut FrameBuffer, scale: &ColorScale, fade_opacity: f64) {
        buffer.fade(fade_opacity);
        for p in &mut self.particles {
            let dx = p.xt - p.x;
            let dy = p.yt - p.y;
            if dx * dx + dy * dy >= VISIBILITY_EPS * VISIBILITY_EPS {
                buffer.draw_line(p.x, p.y, p.xt, p.yt, scale.bucket(p.magnitude));
            }
            p.x = p.xt;
            p.y = p.yt;
        }
    }
}
