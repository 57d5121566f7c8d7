//! Per-history state owned by a single worker

// external crates
use log::debug;
use rand_pcg::Pcg64Mcg;

/// State of the history currently being transported by one worker
///
/// Holds the random number stream of the history and the scratch counters
/// used by stateful policies. A context is never shared between threads, so
/// the coordinator itself stays immutable.
///
/// Streams depend only on the run seed and the history id, never on which
/// worker runs the history or in what order.
///
/// ```rust
/// # use vrtools_biasing::HistoryContext;
/// # use rand::Rng;
/// let mut a = HistoryContext::new(42, 7);
/// let mut b = HistoryContext::new(42, 7);
/// assert_eq!(a.rng().gen::<u64>(), b.rng().gen::<u64>());
///
/// // a new history gets a fresh, independent stream
/// b.begin_history(8);
/// assert_eq!(b.history_id(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct HistoryContext {
    run_seed: u64,
    history_id: u64,
    rng: Pcg64Mcg,
    biased_interactions: u32,
    aborted: bool,
}

impl HistoryContext {
    pub fn new(run_seed: u64, history_id: u64) -> Self {
        Self {
            run_seed,
            history_id,
            rng: Pcg64Mcg::new(stream_seed(run_seed, history_id)),
            biased_interactions: 0,
            aborted: false,
        }
    }

    /// Start a new history, reseeding the stream and clearing all state
    pub fn begin_history(&mut self, history_id: u64) {
        *self = Self::new(self.run_seed, history_id);
    }

    /// Start tracking a new track within the current history
    pub fn begin_track(&mut self) {
        self.biased_interactions = 0;
    }

    /// Abandon the current history, every further query becomes a no-op
    pub fn abort(&mut self) {
        debug!("History {} aborted", self.history_id);
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn history_id(&self) -> u64 {
        self.history_id
    }

    /// Random number stream of this history
    pub fn rng(&mut self) -> &mut Pcg64Mcg {
        &mut self.rng
    }

    /// Interactions of the current track biased so far
    pub fn biased_interactions(&self) -> u32 {
        self.biased_interactions
    }

    pub(crate) fn record_biased_interaction(&mut self) {
        self.biased_interactions += 1;
    }
}

fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// 128-bit generator state for a history
fn stream_seed(run_seed: u64, history_id: u64) -> u128 {
    let high = splitmix64(run_seed);
    let low = splitmix64(high ^ history_id.wrapping_mul(0xC2B2_AE3D_27D4_EB4F));
    (u128::from(high) << 64) | u128::from(low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn histories_get_distinct_streams() {
        let mut a = HistoryContext::new(1, 1);
        let mut b = HistoryContext::new(1, 2);
        assert_ne!(a.rng().gen::<u64>(), b.rng().gen::<u64>());
    }

    #[test]
    fn begin_history_resets_state() {
        let mut context = HistoryContext::new(5, 1);
        context.record_biased_interaction();
        context.abort();

        context.begin_history(2);
        assert_eq!(context.biased_interactions(), 0);
        assert!(!context.is_aborted());

        let mut fresh = HistoryContext::new(5, 2);
        assert_eq!(context.rng().gen::<f64>(), fresh.rng().gen::<f64>());
    }

    #[test]
    fn begin_track_clears_counter() {
        let mut context = HistoryContext::new(5, 1);
        context.record_biased_interaction();
        context.record_biased_interaction();
        assert_eq!(context.biased_interactions(), 2);

        context.begin_track();
        assert_eq!(context.biased_interactions(), 0);
    }
}
