//! Weight-conserving splitting and Russian roulette

// crate modules
use crate::track::{ParentFate, Secondary, SplitRecord, Track};

// external crates
use log::{trace, warn};
use nalgebra::Vector3;
use rand::Rng;

/// Outcome of a split or roulette decision for one track
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitDecision {
    /// Track continues as it was
    Unchanged,
    /// Track becomes `copies` tracks of `weight` each
    Split { copies: u32, weight: f64 },
    /// Track survived roulette and carries `weight`
    Survive { weight: f64 },
    Kill,
}

impl SplitDecision {
    /// Expand into a record, placing any copies at `position`
    ///
    /// The parent is kept as one of the copies.
    pub fn into_record(self, track: &Track, position: Vector3<f64>) -> SplitRecord {
        match self {
            Self::Unchanged => SplitRecord::unchanged(),
            Self::Kill => SplitRecord::killed(),
            Self::Survive { weight } => SplitRecord {
                parent: ParentFate::Reweighted(weight),
                secondaries: Vec::new(),
            },
            Self::Split { copies, weight } => SplitRecord {
                parent: ParentFate::Reweighted(weight),
                secondaries: (1..copies)
                    .map(|_| track.to_secondary(position, weight))
                    .collect::<Vec<Secondary>>(),
            },
        }
    }
}

/// Split or roulette a track moving from `pre` to `post` importance
///
/// With `ratio = post / pre`:
///
/// - `ratio == 1` is a no-op and draws no random number
/// - `ratio > 1` splits into `floor(ratio)` copies of `weight / n`, at most
///   `ceiling` of them
/// - `ratio < 1` plays roulette, surviving with probability `ratio` and
///   weight `weight / ratio`
///
/// The expected total weight is always the original weight.
///
/// ```rust
/// # use vrtools_biasing::{split_or_roulette, SplitDecision};
/// # use rand::SeedableRng;
/// let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(1);
///
/// assert_eq!(
///     split_or_roulette(1.0, 3.7, 1.5, 100, &mut rng),
///     SplitDecision::Split { copies: 3, weight: 0.5 }
/// );
/// assert_eq!(
///     split_or_roulette(2.0, 2.0, 1.5, 100, &mut rng),
///     SplitDecision::Unchanged
/// );
/// ```
pub fn split_or_roulette<R: Rng + ?Sized>(
    pre: f64,
    post: f64,
    weight: f64,
    ceiling: u32,
    rng: &mut R,
) -> SplitDecision {
    let ratio = post / pre;

    if ratio == 1.0 {
        return SplitDecision::Unchanged;
    }

    if ratio > 1.0 {
        return split(ratio, weight, ceiling);
    }

    match roulette(ratio, weight, rng) {
        Some(weight) => SplitDecision::Survive { weight },
        None => SplitDecision::Kill,
    }
}

/// Deterministic split into `floor(ratio)` copies, clamped to `ceiling`
pub fn split(ratio: f64, weight: f64, ceiling: u32) -> SplitDecision {
    let mut copies = ratio.floor().max(1.0);
    if copies > f64::from(ceiling) {
        warn!("Split count {copies} clamped to the maximum of {ceiling}");
        copies = f64::from(ceiling.max(1));
    }

    // floor(ratio) is an integer no larger than the ceiling here
    let copies = copies as u32;
    if copies == 1 {
        trace!("Split ratio {ratio} gives a single track");
        return SplitDecision::Unchanged;
    }

    SplitDecision::Split {
        copies,
        weight: weight / f64::from(copies),
    }
}

/// Russian roulette with the given survival probability
///
/// Returns the compensated weight `weight / survival` of a survivor, or
/// `None` if the track is killed. Survival probabilities of one or more
/// always survive unchanged without drawing a random number.
///
/// ```rust
/// # use vrtools_biasing::roulette;
/// # use rand::SeedableRng;
/// let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(7);
/// assert_eq!(roulette(1.0, 2.0, &mut rng), Some(2.0));
///
/// if let Some(weight) = roulette(0.25, 2.0, &mut rng) {
///     assert_eq!(weight, 8.0);
/// }
/// ```
pub fn roulette<R: Rng + ?Sized>(survival: f64, weight: f64, rng: &mut R) -> Option<f64> {
    if survival >= 1.0 {
        return Some(weight);
    }

    let u: f64 = rng.gen();
    if u > survival {
        return None;
    }
    Some(weight / survival)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn split_of_3_7_gives_three() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let decision = split_or_roulette(1.0, 3.7, 0.9, 100, &mut rng);
        match decision {
            SplitDecision::Split { copies, weight } => {
                assert_eq!(copies, 3);
                assert!((weight - 0.3).abs() < 1e-15);
            }
            other => panic!("expected a split, got {other:?}"),
        }
    }

    #[test]
    fn equal_importance_draws_nothing() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let mut untouched = rng.clone();

        assert_eq!(
            split_or_roulette(0.4, 0.4, 1.0, 100, &mut rng),
            SplitDecision::Unchanged
        );
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn ratio_below_two_is_unchanged() {
        assert_eq!(split(1.5, 1.0, 100), SplitDecision::Unchanged);
    }

    #[test]
    fn ceiling_clamps_copies() {
        assert_eq!(
            split(1.0e6, 1.0, 10),
            SplitDecision::Split {
                copies: 10,
                weight: 0.1
            }
        );
    }

    #[test]
    fn record_keeps_parent_as_a_copy() {
        let track = Track::primary(Species::Neutron, 1.0, Vector3::zeros(), Vector3::x());
        let record = SplitDecision::Split {
            copies: 4,
            weight: 0.25,
        }
        .into_record(&track, Vector3::new(1.0, 0.0, 0.0));

        assert_eq!(record.parent, ParentFate::Reweighted(0.25));
        assert_eq!(record.secondaries.len(), 3);
        assert_eq!(record.population(), 4);
        assert!((record.total_weight(1.0) - 1.0).abs() < 1e-15);
        assert!(record.secondaries.iter().all(|s| s.position.x == 1.0));
    }
}
