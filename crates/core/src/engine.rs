//! The owned animation context: collaborators, field, pool, and frame.
//!
//! [`FlowEngine`] bundles everything one animation needs — field source,
//! land mask, projection, the current velocity grid, the particle pool, and
//! the frame buffer — into a single owned value passed to the driver. No
//! module-level state anywhere.

use crate::buffer::FrameBuffer;
use crate::config::FlowConfig;
use crate::error::FlowError;
use crate::field::VectorField;
use crate::particle::ParticleSystem;
use crate::projection::Projection;
use crate::scale::ColorScale;
use crate::source::{FieldSource, LandMask};

/// A complete flow animation over one data source, land mask, and
/// projection.
///
/// The projection is a generic parameter so hosts keep typed access to their
/// own implementation: mutate it (pan/zoom/resize) through
/// [`projection_mut`](Self::projection_mut), then call
/// [`viewport_changed`](Self::viewport_changed) to rebuild.
pub struct FlowEngine<P: Projection> {
    source: Box<dyn FieldSource>,
    mask: Box<dyn LandMask>,
    projection: P,
    field: VectorField,
    particles: ParticleSystem,
    buffer: FrameBuffer,
    scale: ColorScale,
    config: FlowConfig,
    time_index: usize,
}

impl<P: Projection> FlowEngine<P> {
    /// Creates an engine for time index 0.
    ///
    /// Validates the configuration, builds the initial velocity field, sizes
    /// the particle pool from the viewport area, and allocates the frame
    /// buffer.
    pub fn new(
        source: Box<dyn FieldSource>,
        mask: Box<dyn LandMask>,
        projection: P,
        config: FlowConfig,
    ) -> Result<Self, FlowError> {
        config.validate()?;
        let scale = ColorScale::from_hex(&config.color_stops, config.max_magnitude)?;
        let field = VectorField::build(source.as_ref(), mask.as_ref(), &projection, 0, &config)?;
        let particles = ParticleSystem::new(&field, &config);
        let (width, height) = projection.size();
        let buffer = FrameBuffer::new(width, height)?;
        Ok(Self {
            source,
            mask,
            projection,
            field,
            particles,
            buffer,
            scale,
            config,
            time_index: 0,
        })
    }

    /// Runs one simulation tick: evolve every particle, then render the
    /// frame (fade + stroke + commit).
    pub fn tick(&mut self) {
        self.particles.evolve(&self.field);
        self.particles
            .draw(&mut self.buffer, &self.scale, self.config.fade_opacity);
    }

    /// Switches to a new time index, rebuilding the velocity field.
    ///
    /// The old grid is replaced only once the new one is fully built;
    /// particles keep their positions and flow into the new field. A no-op
    /// when the index is unchanged.
    pub fn set_time_index(&mut self, time_index: usize) -> Result<(), FlowError> {
        if time_index == self.time_index {
            return Ok(());
        }
        self.field = VectorField::build(
            self.source.as_ref(),
            self.mask.as_ref(),
            &self.projection,
            time_index,
            &self.config,
        )?;
        self.time_index = time_index;
        Ok(())
    }

    /// Rebuilds for the projection's current viewport after a pan, zoom, or
    /// resize: new field, new pool (sized for the new area), new frame
    /// buffer. Racing changes supersede each other — the last rebuild wins.
    pub fn viewport_changed(&mut self) -> Result<(), FlowError> {
        self.field = VectorField::build(
            self.source.as_ref(),
            self.mask.as_ref(),
            &self.projection,
            self.time_index,
            &self.config,
        )?;
        self.particles = ParticleSystem::new(&self.field, &self.config);
        let (width, height) = self.projection.size();
        self.buffer = FrameBuffer::new(width, height)?;
        Ok(())
    }

    /// Replaces the configuration (speed, density, colors, ...) and rebuilds
    /// everything that depends on it.
    pub fn set_config(&mut self, config: FlowConfig) -> Result<(), FlowError> {
        config.validate()?;
        self.scale = ColorScale::from_hex(&config.color_stops, config.max_magnitude)?;
        self.config = config;
        self.viewport_changed()
    }

    /// The current frame's pixel buffer.
    pub fn frame(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// The current time index.
    pub fn time_index(&self) -> usize {
        self.time_index
    }

    /// The active configuration.
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Number of particles in the current pool.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Read access to the projection.
    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Mutable access to the projection for pan/zoom/resize.
    ///
    /// Call [`viewport_changed`](Self::viewport_changed) after mutating, or
    /// the field and buffer will keep the stale viewport.
    pub fn projection_mut(&mut self) -> &mut P {
        &mut self.projection
    }

    /// The current velocity field (for hosts drawing overlays).
    pub fn field(&self) -> &VectorField {
        &self.field
    }
}
