//! Core simulation types: particles, the pivoted rotor, and the system tick.

pub mod particle;
pub mod rotor;
pub mod sim;

pub use particle::Particle;
pub use rotor::{Rotor, RotorFrame};
pub use sim::ParticleSystem;
