//! Elastic collisions of circular particles in the unit square, coupled to a
//! rigid rod ("rotor") pivoted at the square's center.
//!
//! The crate is a physics core only: it detects and resolves
//! particle–particle, particle–rotor, and particle–wall collisions, one
//! fixed-size tick at a time. Rendering and the frame loop belong to an
//! external driver, which needs nothing beyond [`ParticleSystem::step`] and
//! the read-only observables (particle positions and radii, the rotor's
//! pivot and free endpoint, and its angle / angular-velocity histories).
//!
//! All angles are measured from the +y axis toward +x; the geometry formulas
//! throughout depend on this convention.
//!
//! ```
//! use rotorsim::{ParticleSystem, Rotor};
//!
//! # fn main() -> rotorsim::Result<()> {
//! let rotor = Rotor::new(0.25, 100.0)?;
//! let mut sim = ParticleSystem::new(50, 1.0, 0.01, rotor, Some(1))?;
//! for _ in 0..100 {
//!     sim.step(0.01);
//! }
//! assert_eq!(sim.rotor().theta_history().len(), 101);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;

pub use crate::core::{Particle, ParticleSystem, Rotor, RotorFrame};
pub use crate::error::{Error, Result};
