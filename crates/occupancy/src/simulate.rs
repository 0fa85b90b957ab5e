//! Survey data simulation from known parameters.

use ndarray::Array2;
use rand_distr::{Bernoulli, Distribution};

use crate::design::SurveyDesign;
use crate::error::OccupancyError;
use crate::history::HistoryMatrix;
use crate::probs::OccupancyProbs;
use crate::state::OccupancyState;

/// Simulates per-site seasonal occupancy states.
///
/// Each site starts occupied with probability `psi` and then evolves
/// between seasons: an unoccupied site is colonized with probability
/// `gamma`, an occupied site goes extinct with probability `epsilon`.
/// Within a season the state does not change.
///
/// Returns one state sequence of length `design.n_seasons()` per site.
///
/// # Errors
///
/// Returns [`OccupancyError::EmptyData`] if `n_sites` is zero.
pub fn simulate_states(
    design: &SurveyDesign,
    probs: &OccupancyProbs,
    n_sites: usize,
    rng: &mut impl rand::Rng,
) -> Result<Vec<Vec<OccupancyState>>, OccupancyError> {
    if n_sites == 0 {
        return Err(OccupancyError::EmptyData);
    }
    let init = bernoulli("psi", probs.psi())?;
    let colonize = bernoulli("gamma", probs.gamma())?;
    let go_extinct = bernoulli("epsilon", probs.epsilon())?;

    let mut sites = Vec::with_capacity(n_sites);
    for _ in 0..n_sites {
        let mut states = Vec::with_capacity(design.n_seasons());
        let mut occupied = init.sample(rng);
        states.push(as_state(occupied));
        for _ in 1..design.n_seasons() {
            occupied = if occupied {
                !go_extinct.sample(rng)
            } else {
                colonize.sample(rng)
            };
            states.push(as_state(occupied));
        }
        sites.push(states);
    }
    Ok(sites)
}

/// Simulates a full detection-history matrix.
///
/// Latent states are drawn with [`simulate_states`]; each survey of an
/// occupied site then records a detection with probability `p`, and
/// surveys of unoccupied sites always record 0 (no false positives).
/// Every row carries weight 1; call [`HistoryMatrix::pool`] afterwards to
/// collapse identical histories.
///
/// # Errors
///
/// Returns [`OccupancyError::EmptyData`] if `n_sites` is zero.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use sora_occupancy::{OccupancyProbs, SurveyDesign, simulate_histories};
///
/// let design = SurveyDesign::new(5, 3).unwrap();
/// let probs = OccupancyProbs::new(0.6, 0.7, 0.2, 0.3).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let hist = simulate_histories(&design, &probs, 100, &mut rng).unwrap();
/// assert_eq!(hist.n_sites(), 100);
/// assert_eq!(hist.n_occasions(), 15);
/// ```
pub fn simulate_histories(
    design: &SurveyDesign,
    probs: &OccupancyProbs,
    n_sites: usize,
    rng: &mut impl rand::Rng,
) -> Result<HistoryMatrix, OccupancyError> {
    let states = simulate_states(design, probs, n_sites, rng)?;
    let detect = bernoulli("p", probs.p())?;

    let n_occasions = design.n_occasions();
    let mut flat = Vec::with_capacity(n_sites * n_occasions);
    for site_states in &states {
        for &state in site_states {
            for _ in 0..design.n_surveys() {
                let detected = state == OccupancyState::Occupied && detect.sample(rng);
                flat.push(u8::from(detected));
            }
        }
    }

    let data = Array2::from_shape_vec((n_sites, n_occasions), flat)
        .expect("flat buffer sized from n_sites and the design");
    Ok(HistoryMatrix::from_parts(data, vec![1; n_sites]))
}

fn as_state(occupied: bool) -> OccupancyState {
    if occupied {
        OccupancyState::Occupied
    } else {
        OccupancyState::Unoccupied
    }
}

fn bernoulli(name: &'static str, p: f64) -> Result<Bernoulli, OccupancyError> {
    Bernoulli::new(p).map_err(|_| OccupancyError::InvalidProbability { name, value: p })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn probs(psi: f64, p: f64, gamma: f64, epsilon: f64) -> OccupancyProbs {
        OccupancyProbs::new(psi, p, gamma, epsilon).unwrap()
    }

    #[test]
    fn states_shape() {
        let design = SurveyDesign::new(4, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let states = simulate_states(&design, &probs(0.5, 0.5, 0.2, 0.3), 50, &mut rng).unwrap();
        assert_eq!(states.len(), 50);
        assert!(states.iter().all(|s| s.len() == 4));
    }

    #[test]
    fn zero_sites_error() {
        let design = SurveyDesign::new(2, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let err =
            simulate_histories(&design, &probs(0.5, 0.5, 0.2, 0.3), 0, &mut rng).unwrap_err();
        assert!(matches!(err, OccupancyError::EmptyData));
    }

    #[test]
    fn deterministic_with_seed() {
        let design = SurveyDesign::new(5, 3).unwrap();
        let p = probs(0.6, 0.7, 0.2, 0.3);

        let mut rng1 = StdRng::seed_from_u64(123);
        let a = simulate_histories(&design, &p, 200, &mut rng1).unwrap();
        let mut rng2 = StdRng::seed_from_u64(123);
        let b = simulate_histories(&design, &p, 200, &mut rng2).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn certain_occupancy_and_detection() {
        // psi = 1, p = 1, epsilon = 0: every symbol must be 1.
        let design = SurveyDesign::new(3, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let hist =
            simulate_histories(&design, &probs(1.0, 1.0, 0.0, 0.0), 20, &mut rng).unwrap();
        for (row, _) in hist.iter() {
            assert!(row.iter().all(|&y| y == 1));
        }
    }

    #[test]
    fn unoccupied_sites_never_detect() {
        // psi = 0, gamma = 0: no site is ever occupied, so no detections.
        let design = SurveyDesign::new(4, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let hist =
            simulate_histories(&design, &probs(0.0, 0.9, 0.0, 0.5), 20, &mut rng).unwrap();
        for (row, _) in hist.iter() {
            assert!(row.iter().all(|&y| y == 0));
        }
    }

    #[test]
    fn first_occasion_detection_frequency() {
        // P(detect at first occasion) = psi * p.
        let design = SurveyDesign::new(2, 2).unwrap();
        let psi = 0.6;
        let p = 0.7;
        let n = 20_000;
        let mut rng = StdRng::seed_from_u64(99);
        let hist = simulate_histories(&design, &probs(psi, p, 0.2, 0.3), n, &mut rng).unwrap();

        let detections = (0..hist.n_sites()).filter(|&i| hist.site(i)[0] == 1).count();
        let freq = detections as f64 / n as f64;
        let expected = psi * p;
        assert!(
            (freq - expected).abs() < 0.02,
            "first-occasion detection frequency {freq}, expected ~{expected}"
        );
    }

    #[test]
    fn extinction_empties_later_seasons() {
        // psi = 1, epsilon = 1, gamma = 0: occupied in season 0 only.
        let design = SurveyDesign::new(3, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let states = simulate_states(&design, &probs(1.0, 1.0, 0.0, 1.0), 30, &mut rng).unwrap();
        for site in &states {
            assert_eq!(site[0], OccupancyState::Occupied);
            assert_eq!(site[1], OccupancyState::Unoccupied);
            assert_eq!(site[2], OccupancyState::Unoccupied);
        }
    }
}
