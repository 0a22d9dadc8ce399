use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// A circular particle in the unit square.
///
/// Fields:
/// - `id`: stable identifier assigned by the system initializer (display only)
/// - `r`: position vector [x, y]
/// - `v`: velocity vector [vx, vy]
/// - `radius`: disc radius (> 0)
/// - `mass`: particle mass (> 0)
///
/// `radius` and `mass` are fixed for the particle's lifetime; `r` and `v`
/// mutate every tick.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable particle identifier.
    pub id: u32,
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    /// Disc radius (> 0).
    pub radius: f64,
    /// Mass (> 0).
    pub mass: f64,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is non-positive or any component is NaN/inf.
    pub fn new(id: u32, r: [f64; DIM], v: [f64; DIM], radius: f64, mass: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            r,
            v,
            radius,
            mass,
        })
    }

    /// Advance the position by one linear step: r += v * dt. No bounds checks.
    #[inline]
    pub fn translate(&mut self, dt: f64) {
        for k in 0..DIM {
            self.r[k] += self.v[k] * dt;
        }
    }

    /// Reflect off the unit-square walls, each axis independently.
    ///
    /// A position below 0 is mirrored to `-r/2` (half-mirror, so the particle
    /// never lands exactly on the boundary); a position above 1 is mirrored to
    /// `2 - r`. In both cases the axis velocity is negated. No-op within [0, 1].
    pub fn reflect_off_walls(&mut self) {
        for k in 0..DIM {
            if self.r[k] < 0.0 {
                self.r[k] = -self.r[k] / 2.0;
                self.v[k] = -self.v[k];
            } else if self.r[k] > 1.0 {
                self.r[k] = 2.0 - self.r[k];
                self.v[k] = -self.v[k];
            }
        }
    }

    /// Center-to-center distance to another particle.
    #[inline]
    pub fn distance_to(&self, other: &Particle) -> f64 {
        (self.r[0] - other.r[0]).hypot(self.r[1] - other.r[1])
    }

    /// True when the discs are in contact (center distance within the radius
    /// sum) and the pair is approaching.
    ///
    /// The approach test compares the separation one velocity step forward
    /// against one step backward and reports overlap only when the forward
    /// distance is strictly smaller. Without it, two discs that already
    /// interpenetrate but are separating would re-collide every tick.
    pub fn overlaps(&self, other: &Particle) -> bool {
        if self.distance_to(other) > self.radius + other.radius {
            return false;
        }
        self.approaching(other)
    }

    /// Approach test: does one velocity step shrink the separation?
    fn approaching(&self, other: &Particle) -> bool {
        let forward = ((self.r[0] + self.v[0]) - (other.r[0] + other.v[0]))
            .hypot((self.r[1] + self.v[1]) - (other.r[1] + other.v[1]));
        let backward = ((self.r[0] - self.v[0]) - (other.r[0] - other.v[0]))
            .hypot((self.r[1] - self.v[1]) - (other.r[1] - other.v[1]));
        forward < backward
    }

    /// Resolve an elastic collision with another particle.
    ///
    /// The 1-D elastic-collision formula is applied independently on each
    /// axis, both axes computed from pre-collision values. This per-axis
    /// exchange (rather than a normal/tangential decomposition) is the
    /// documented collision model.
    pub fn collide(&mut self, other: &mut Particle) {
        log::trace!(
            "particle collision: {} <-> {} at ({:.3}, {:.3})",
            self.id,
            other.id,
            self.r[0],
            self.r[1]
        );
        for k in 0..DIM {
            let (v_a, v_b) = (self.v[k], other.v[k]);
            self.v[k] = collision_speed(self.mass, other.mass, v_a, v_b);
            other.v[k] = collision_speed(other.mass, self.mass, v_b, v_a);
        }
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.v.iter().map(|&c| c * c).sum();
        0.5 * self.mass * vsq
    }

    /// Returns the particle's linear momentum vector m * v.
    #[inline]
    pub fn momentum(&self) -> [f64; DIM] {
        [self.mass * self.v[0], self.mass * self.v[1]]
    }
}

/// Post-collision speed of body `a` in a 1-D elastic collision.
#[inline]
pub(crate) fn collision_speed(m_a: f64, m_b: f64, v_a: f64, v_b: f64) -> f64 {
    (m_a - m_b) / (m_a + m_b) * v_a + 2.0 * m_b / (m_a + m_b) * v_b
}
