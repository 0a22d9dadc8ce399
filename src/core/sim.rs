use rand::{rng, rngs::StdRng, Rng, SeedableRng};

use crate::core::particle::DIM;
use crate::core::{Particle, Rotor};
use crate::error::{Error, Result};

/// Placement attempts allowed per particle before the configuration is
/// declared infeasible.
const MAX_PLACEMENT_ATTEMPTS: usize = 1_000_000;

/// The particle collection plus the rotor it exchanges momentum with.
///
/// Particle order is fixed at initialization and doubles as the iteration
/// order of the tick: each particle is paired only against particles later
/// in the sequence, so a run is fully deterministic given the seed.
#[derive(Debug)]
pub struct ParticleSystem {
    /// Particles in stable iteration order.
    pub particles: Vec<Particle>,
    rotor: Rotor,
    ticks: u64,
}

impl ParticleSystem {
    /// Create a system of `count` particles of identical `mass` and `radius`,
    /// placed by rejection sampling in `[radius, 1 - radius]²` with initial
    /// velocities uniform in `[-1, 1]²`.
    ///
    /// A candidate is rejected when its center lies within the radius sum of
    /// any already-placed particle (current-distance test only). Each
    /// particle gets a bounded attempt budget; exhausting it means the
    /// requested density cannot fit and `Error::Infeasible` is returned.
    ///
    /// Passing `None` for `seed` draws one from entropy; any `Some` seed
    /// makes the whole run reproducible.
    pub fn new(
        count: usize,
        mass: f64,
        radius: f64,
        rotor: Rotor,
        seed: Option<u64>,
    ) -> Result<Self> {
        if count == 0 {
            return Err(Error::InvalidParam("count must be > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if 2.0 * radius >= 1.0 {
            return Err(Error::InvalidParam(
                "radius must be < 0.5 to fit inside the unit square".into(),
            ));
        }

        let mut rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        let mut particles: Vec<Particle> = Vec::with_capacity(count);
        for id in 0..(count as u32) {
            let mut attempts = 0usize;
            let (r, v) = loop {
                if attempts >= MAX_PLACEMENT_ATTEMPTS {
                    return Err(Error::Infeasible(format!(
                        "failed to place particle {id} without overlap; \
                         try fewer particles or a smaller radius"
                    )));
                }
                attempts += 1;
                let mut r = [0.0_f64; DIM];
                for r_k in &mut r {
                    *r_k = rng.random_range(radius..=(1.0 - radius));
                }
                let mut v = [0.0_f64; DIM];
                for v_k in &mut v {
                    *v_k = rng.random_range(-1.0..=1.0);
                }
                if !overlaps_existing(&particles, &r, radius) {
                    break (r, v);
                }
            };
            particles.push(Particle::new(id, r, v, radius, mass)?);
        }

        Ok(Self {
            particles,
            rotor,
            ticks: 0,
        })
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Ticks elapsed since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    /// Shared access to the rotor (for the display collaborator).
    pub fn rotor(&self) -> &Rotor {
        &self.rotor
    }

    /// Mutable access to the rotor.
    pub fn rotor_mut(&mut self) -> &mut Rotor {
        &mut self.rotor
    }

    /// Advance the simulation by exactly one tick.
    ///
    /// Per particle, in sequence order: translate by `v·dt`; resolve
    /// collisions against every particle later in the order; resolve a rotor
    /// collision if one is due; reflect off the walls. The rotor's own
    /// angular state advances only after every particle has been processed,
    /// so all rotor checks within a tick see the start-of-tick angle.
    pub fn step(&mut self, dt: f64) {
        let n = self.particles.len();
        for i in 0..n {
            self.particles[i].translate(dt);
            for j in (i + 1)..n {
                let (head, tail) = self.particles.split_at_mut(j);
                let (p, q) = (&mut head[i], &mut tail[0]);
                if p.overlaps(q) {
                    p.collide(q);
                }
            }
            if let Some(frame) = self.rotor.overlaps(&self.particles[i]) {
                self.rotor.collide(&mut self.particles[i], &frame);
            }
            self.particles[i].reflect_off_walls();
        }
        self.rotor.step(dt);
        self.ticks += 1;
    }

    /// Total kinetic energy of the particles (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Total linear momentum of the particles (diagnostic).
    pub fn momentum(&self) -> [f64; DIM] {
        let mut total = [0.0_f64; DIM];
        for p in &self.particles {
            let m = p.momentum();
            for k in 0..DIM {
                total[k] += m[k];
            }
        }
        total
    }
}

// ============ Internal helpers ============

fn overlaps_existing(existing: &[Particle], r: &[f64; DIM], radius: f64) -> bool {
    existing
        .iter()
        .any(|p| (r[0] - p.r[0]).hypot(r[1] - p.r[1]) <= radius + p.radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotor() -> Rotor {
        Rotor::new(0.25, 100.0).expect("valid test rotor")
    }

    #[test]
    fn make_small_system_ok() -> Result<()> {
        let sim = ParticleSystem::new(10, 1.0, 0.01, rotor(), Some(1234))?;
        assert_eq!(sim.num_particles(), 10);
        assert_eq!(sim.ticks(), 0);
        for p in &sim.particles {
            for k in 0..DIM {
                assert!(p.r[k] >= 0.01 && p.r[k] <= 0.99, "placed outside margin");
                assert!(p.v[k] >= -1.0 && p.v[k] <= 1.0);
            }
        }
        // No placed pair may be in contact.
        for i in 0..sim.particles.len() {
            for j in (i + 1)..sim.particles.len() {
                let d = sim.particles[i].distance_to(&sim.particles[j]);
                assert!(d > 0.02, "initial overlap between {i} and {j}: d = {d}");
            }
        }
        Ok(())
    }

    #[test]
    fn ids_are_sequential() -> Result<()> {
        let sim = ParticleSystem::new(5, 1.0, 0.01, rotor(), Some(7))?;
        for (i, p) in sim.particles.iter().enumerate() {
            assert_eq!(p.id, i as u32);
        }
        Ok(())
    }

    #[test]
    fn zero_count_rejected() {
        let err = ParticleSystem::new(0, 1.0, 0.01, rotor(), Some(1)).unwrap_err();
        assert!(err.to_string().contains("count"));
    }

    #[test]
    fn oversized_radius_rejected() {
        let err = ParticleSystem::new(1, 1.0, 0.5, rotor(), Some(1)).unwrap_err();
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn infeasible_density_surfaces_error() {
        // Two discs of radius 0.45 can never be 0.9 apart inside
        // [0.45, 0.55]^2, so the second placement must exhaust its budget.
        let err = ParticleSystem::new(2, 1.0, 0.45, rotor(), Some(99)).unwrap_err();
        assert!(matches!(err, Error::Infeasible(_)), "got: {err}");
    }

    #[test]
    fn step_advances_rotor_history_and_ticks() -> Result<()> {
        let mut sim = ParticleSystem::new(8, 1.0, 0.01, rotor(), Some(42))?;
        for ticks in 1..=20 {
            sim.step(0.01);
            assert_eq!(sim.ticks(), ticks);
            assert_eq!(sim.rotor().theta_history().len(), ticks as usize + 1);
            assert_eq!(sim.rotor().v_theta_history().len(), ticks as usize + 1);
        }
        Ok(())
    }

    #[test]
    fn particles_stay_reflected_into_bounds() -> Result<()> {
        // One step cannot carry a particle further than |v|*dt past a wall,
        // so after reflection every coordinate must be back in [0, 1].
        let mut sim = ParticleSystem::new(20, 1.0, 0.01, rotor(), Some(5))?;
        for _ in 0..200 {
            sim.step(0.01);
            for p in &sim.particles {
                for k in 0..DIM {
                    assert!(
                        (0.0..=1.0).contains(&p.r[k]),
                        "particle {} escaped: r[{k}] = {}",
                        p.id,
                        p.r[k]
                    );
                }
            }
        }
        Ok(())
    }
}
