use std::f64::consts::{PI, TAU};

use crate::core::particle::{collision_speed, Particle, DIM};
use crate::error::{Error, Result};

/// Tolerance below which a pivot distance is treated as degenerate.
const EPS: f64 = 1e-12;

/// Pivot of the rotor: the center of the unit square.
const FIXED_POINT: [f64; DIM] = [0.5, 0.5];

/// A particle projected into the rotor's pivot-relative frame.
///
/// All angles follow the rotor convention: measured from the +y axis toward
/// +x, so the angular position is `atan2(dx, dy)` with that axis order.
/// The bundle is transient; it is computed per overlap check and passed
/// explicitly into [`Rotor::collide`], never stored on the particle.
#[derive(Debug, Clone, Copy)]
pub struct RotorFrame {
    /// Radial distance from the pivot.
    pub r: f64,
    /// Radial distance from the rod's free endpoint.
    pub r_free: f64,
    /// Angular position in [0, 2π).
    pub theta: f64,
    /// Radial velocity component.
    pub v_r: f64,
    /// Angular velocity component.
    pub v_theta: f64,
}

/// A rigid rod pivoted at the center of the unit square.
///
/// The rod exchanges angular momentum with particles that intersect its
/// swept segment. Angle and angular velocity are recorded in append-only
/// history sequences, one entry per [`Rotor::step`], seeded with the initial
/// values; the two histories always have equal length `ticks + 1`.
#[derive(Debug, Clone)]
pub struct Rotor {
    length: f64,
    mass: f64,
    moment_of_inertia: f64,
    theta: f64,
    v_theta: f64,
    theta_history: Vec<f64>,
    v_theta_history: Vec<f64>,
}

impl Rotor {
    /// Create a rotor of the given rod length and mass, at rest at θ = 0.
    ///
    /// The moment of inertia uses the thin-rod-about-end formula
    /// `I = m L² / 3`.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `length` or `mass` is non-positive or NaN/inf.
    pub fn new(length: f64, mass: f64) -> Result<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(Error::InvalidParam("length must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        Ok(Self {
            length,
            mass,
            moment_of_inertia: mass * length * length / 3.0,
            theta: 0.0,
            v_theta: 0.0,
            theta_history: vec![0.0],
            v_theta_history: vec![0.0],
        })
    }

    /// The fixed pivot point.
    #[inline]
    pub fn fixed_point(&self) -> [f64; DIM] {
        FIXED_POINT
    }

    /// Rod length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Rod mass.
    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Moment of inertia about the pivot.
    #[inline]
    pub fn moment_of_inertia(&self) -> f64 {
        self.moment_of_inertia
    }

    /// Current angle in [0, 2π), measured from +y toward +x.
    #[inline]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Current angular velocity.
    #[inline]
    pub fn v_theta(&self) -> f64 {
        self.v_theta
    }

    /// Position of the rod's free endpoint: pivot + length · (sin θ, cos θ).
    #[inline]
    pub fn free_point(&self) -> [f64; DIM] {
        [
            FIXED_POINT[0] + self.length * self.theta.sin(),
            FIXED_POINT[1] + self.length * self.theta.cos(),
        ]
    }

    /// Angle history, re-wrapped for display continuity. Length `ticks + 1`.
    #[inline]
    pub fn theta_history(&self) -> &[f64] {
        &self.theta_history
    }

    /// Angular-velocity history. Length `ticks + 1`.
    #[inline]
    pub fn v_theta_history(&self) -> &[f64] {
        &self.v_theta_history
    }

    /// Advance the rotor's angular state by one tick and append to both
    /// histories. The history angle is re-wrapped so that values stay near
    /// zero across the 2π seam: `θ if θ < π else θ − 2π`.
    pub fn step(&mut self, dt: f64) {
        self.theta = (self.theta + self.v_theta * dt).rem_euclid(TAU);
        let wrapped = if self.theta < PI {
            self.theta
        } else {
            self.theta - TAU
        };
        self.theta_history.push(wrapped);
        self.v_theta_history.push(self.v_theta);
    }

    /// Project a particle into the rotor frame.
    ///
    /// Returns `None` when the particle sits at the pivot (within `EPS`),
    /// where the radial denominators vanish; callers treat that as
    /// no-overlap rather than producing non-finite components.
    pub fn project(&self, particle: &Particle) -> Option<RotorFrame> {
        let dx = particle.r[0] - FIXED_POINT[0];
        let dy = particle.r[1] - FIXED_POINT[1];
        let r = dx.hypot(dy);
        if r <= EPS {
            return None;
        }
        let free = self.free_point();
        let r_free = (particle.r[0] - free[0]).hypot(particle.r[1] - free[1]);
        // Axis order matches the rotor's angle convention (from +y toward +x).
        let theta = dx.atan2(dy).rem_euclid(TAU);
        let v_r = (dx * particle.v[0] + dy * particle.v[1]) / r;
        let v_theta = (dy * particle.v[0] - dx * particle.v[1]) / (r * r);
        Some(RotorFrame {
            r,
            r_free,
            theta,
            v_r,
            v_theta,
        })
    }

    /// Test whether a particle is in contact with the rod and approaching it.
    ///
    /// Three conditions must hold:
    /// 1. span: both the pivot distance and the free-endpoint distance are
    ///    within the rod length (the particle is beside the rod, not past
    ///    its tip);
    /// 2. proximity: the perpendicular distance from the particle center to
    ///    the pivot–free-point line is within the particle radius;
    /// 3. direction: the particle on the clockwise-ahead side must carry a
    ///    negative angular velocity (and symmetrically on the other side),
    ///    i.e. it is moving into the rod rather than away from it.
    ///
    /// Returns the rotor-frame projection on overlap so it can be handed to
    /// [`Rotor::collide`] without recomputation.
    pub fn overlaps(&self, particle: &Particle) -> Option<RotorFrame> {
        let frame = self.project(particle)?;
        if frame.r > self.length || frame.r_free > self.length {
            return None;
        }
        // Point-to-line distance from the particle center to the infinite
        // line through pivot and free point.
        let free = self.free_point();
        let distance = ((free[1] - FIXED_POINT[1]) * particle.r[0]
            - (free[0] - FIXED_POINT[0]) * particle.r[1]
            + free[0] * FIXED_POINT[1]
            - free[1] * FIXED_POINT[0])
            .abs()
            / self.length;
        if distance > particle.radius {
            return None;
        }
        let d_theta = frame.theta - self.theta;
        let clockwise_ahead = (d_theta > 0.0 && d_theta < PI) || d_theta < -PI;
        let incoming = (clockwise_ahead && frame.v_theta < 0.0)
            || (!clockwise_ahead && frame.v_theta > 0.0);
        incoming.then_some(frame)
    }

    /// Resolve an elastic collision between the rod and a particle.
    ///
    /// The particle at radius `r` is treated as a point mass with moment of
    /// inertia `m r²`; the 1-D elastic exchange is applied in the
    /// angular-velocity domain with moments of inertia in place of masses.
    /// The particle's radial velocity component passes through unchanged;
    /// only the tangential component is exchanged, then converted back to
    /// Cartesian velocity.
    pub fn collide(&mut self, particle: &mut Particle, frame: &RotorFrame) {
        let i_r = self.moment_of_inertia;
        let i_p = particle.mass * frame.r * frame.r;
        let w_r = self.v_theta;
        let w_p = frame.v_theta;
        self.v_theta = collision_speed(i_r, i_p, w_r, w_p);
        let w_p_final = collision_speed(i_p, i_r, w_p, w_r);
        let (sin_t, cos_t) = frame.theta.sin_cos();
        particle.v[0] = frame.v_r * sin_t + frame.r * w_p_final * cos_t;
        particle.v[1] = frame.v_r * cos_t - frame.r * w_p_final * sin_t;
        log::debug!(
            "rotor collision with particle {}: w_r {w_r:.4} -> {:.4}",
            particle.id,
            self.v_theta
        );
    }
}
