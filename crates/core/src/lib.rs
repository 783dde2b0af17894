#![deny(unsafe_code)]
//! Particle flow animation over geographic wave data.
//!
//! Converts sparse magnitude+direction samples into a dense, bilinearly
//! interpolated velocity field in screen space ([`VectorField`]), evolves a
//! pool of particles through it ([`ParticleSystem`]), and renders fading
//! trails into an RGBA buffer, all driven at a fixed rate by an
//! [`AnimationDriver`].
//!
//! Data, land geometry, and the map projection enter through the narrow
//! [`FieldSource`], [`LandMask`], and [`Projection`] seams; the host
//! consumes only the frame buffer.

pub mod buffer;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod field;
pub mod particle;
pub mod prng;
pub mod projection;
pub mod sample;
pub mod scale;
pub mod source;

pub use buffer::FrameBuffer;
pub use config::FlowConfig;
pub use driver::AnimationDriver;
pub use engine::FlowEngine;
pub use error::FlowError;
pub use field::VectorField;
pub use particle::ParticleSystem;
pub use projection::{Equirectangular, GeoBounds, Projection};
pub use sample::{Sample, VelocityVector};
pub use scale::ColorScale;
pub use source::{BoxLandMask, FieldSource, GriddedSwell, LandMask, SyntheticSwell};
