//! The reference SEIR cell model.

use epicell_cell::{CellModel, NeighbourView, DEFAULT_OUTPUT_DELAY};
use epicell_core::{CellId, CompartmentState, ConfigError, ParamBlock, Population, RateParameters};

/// Deterministic SEIR transition driven by weighted neighbour infection.
///
/// Each evaluation computes, from a single entry snapshot `(S, E, I, R)`:
///
/// ```text
/// force  = Σ neighbour.I × weight
/// new_E  = min(S, β × force)
/// new_I  = σ × E
/// new_R  = γ × I
///
/// S' = S − new_E
/// E' = E + new_E − new_I
/// I' = I + new_I − new_R
/// R' = R + new_R
/// ```
///
/// With discrete populations each delta is truncated toward zero before
/// the clamp; with continuous populations no rounding is applied.
///
/// # Examples
///
/// ```
/// use epicell_cell::{CellModel, NeighbourView};
/// use epicell_core::{CellId, CompartmentState, RateParameters};
/// use epicell_models::SeirCell;
///
/// let rates = RateParameters::validated(&CellId::from("x"), 0.0, 0.2, 0.1).unwrap();
/// let cell = SeirCell::new(rates);
/// let next = cell.local_computation(
///     CompartmentState::new(990i64, 0, 10, 0),
///     &NeighbourView::empty(),
/// );
/// assert_eq!(next, CompartmentState::new(990, 0, 9, 1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeirCell {
    rates: RateParameters,
    output_delay: f64,
}

impl SeirCell {
    /// Registry name of this model.
    pub const NAME: &'static str = "seir";

    /// Optional parameter overriding the output delay.
    pub const OUTPUT_DELAY: &'static str = "output_delay";

    /// A cell with the given rates and the default output delay.
    pub fn new(rates: RateParameters) -> Self {
        Self {
            rates,
            output_delay: DEFAULT_OUTPUT_DELAY,
        }
    }

    /// Build from a cell's parameter block.
    ///
    /// Requires the three rates (canonical names or `beta`/`sigma`/`gamma`).
    /// `output_delay`, if present, must be finite and positive.
    pub fn from_params(cell: &CellId, params: &ParamBlock) -> Result<Self, ConfigError> {
        let rates = RateParameters::from_params(cell, params)?;
        let mut seir = Self::new(rates);
        if let Some(delay) = params.get(Self::OUTPUT_DELAY) {
            if !delay.is_finite() || delay <= 0.0 {
                return Err(ConfigError::invalid(
                    cell,
                    Self::OUTPUT_DELAY,
                    format!("output delay must be finite and positive, got {delay}"),
                ));
            }
            seir.output_delay = delay;
        }
        Ok(seir)
    }

    /// The cell's rates.
    pub fn rates(&self) -> &RateParameters {
        &self.rates
    }

    /// Apply one transition given a precomputed force of infection.
    pub fn transition<P: Population>(
        &self,
        state: CompartmentState<P>,
        force: f64,
    ) -> CompartmentState<P> {
        let CompartmentState {
            susceptible: s,
            exposed: e,
            infectious: i,
            recovered: r,
        } = state;

        // An overflowed force times a zero rate is NaN; no transmission.
        let flow = self.rates.transmission_rate() * force;
        let flow = if flow.is_nan() { 0.0 } else { flow };
        let new_e = s.min_of(P::from_rate_product(flow));
        let new_i = e.scale(self.rates.incubation_rate());
        let new_r = i.scale(self.rates.recovery_rate());

        CompartmentState {
            susceptible: s - new_e,
            exposed: e + new_e - new_i,
            infectious: i + new_i - new_r,
            recovered: r + new_r,
        }
    }
}

impl<P: Population> CellModel<P> for SeirCell {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn local_computation(
        &self,
        state: CompartmentState<P>,
        neighbours: &NeighbourView<'_, P>,
    ) -> CompartmentState<P> {
        self.transition(state, neighbours.force_of_infection())
    }

    fn output_delay(&self, _state: &CompartmentState<P>) -> f64 {
        self.output_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicell_cell::NeighbourSet;
    use proptest::prelude::*;

    fn rates(beta: f64, sigma: f64, gamma: f64) -> RateParameters {
        RateParameters::validated(&CellId::from("t"), beta, sigma, gamma).unwrap()
    }

    // ── Worked scenarios ───────────────────────────────────────

    #[test]
    fn isolated_discrete_cell_recovers_one() {
        let cell = SeirCell::new(rates(0.0, 0.2, 0.1));
        let next = cell.transition(CompartmentState::new(990i64, 0, 10, 0), 0.0);
        assert_eq!(next, CompartmentState::new(990, 0, 9, 1));
    }

    #[test]
    fn single_neighbour_exposes_half() {
        let cell = SeirCell::new(rates(0.5, 0.2, 0.1));
        let nb = NeighbourSet::new().with("A", 1.0, CompartmentState::new(99.0, 0.0, 1.0, 0.0));
        let next = cell.local_computation(CompartmentState::new(100.0, 0.0, 0.0, 0.0), &nb.view());
        assert_eq!(next, CompartmentState::new(99.5, 0.5, 0.0, 0.0));
    }

    #[test]
    fn exposure_clamped_to_susceptible() {
        let cell = SeirCell::new(rates(10.0, 0.0, 0.0));
        let next = cell.transition(CompartmentState::new(3.0, 0.0, 0.0, 0.0), 5.0);
        assert_eq!(next, CompartmentState::new(0.0, 3.0, 0.0, 0.0));
    }

    #[test]
    fn overflowed_force_without_transmission_exposes_nobody() {
        let cell = SeirCell::new(rates(0.0, 0.2, 0.1));
        let nb = NeighbourSet::new()
            .with("A", 1e308, CompartmentState::new(0.0, 0.0, 10.0, 0.0))
            .with("B", 1e308, CompartmentState::new(0.0, 0.0, 10.0, 0.0));
        assert_eq!(nb.view().force_of_infection(), f64::INFINITY);
        let next = cell.local_computation(CompartmentState::new(100.0, 0.0, 0.0, 0.0), &nb.view());
        assert_eq!(next, CompartmentState::new(100.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn overflowed_force_exposes_every_susceptible() {
        let cell = SeirCell::new(rates(0.5, 0.0, 0.0));
        let next = cell.transition(CompartmentState::new(100.0, 0.0, 0.0, 0.0), f64::INFINITY);
        assert_eq!(next, CompartmentState::new(0.0, 100.0, 0.0, 0.0));
    }

    #[test]
    fn discrete_deltas_truncate() {
        let cell = SeirCell::new(rates(0.3, 0.5, 0.25));
        // new_E = trunc(0.3 * 5) = 1, new_I = trunc(0.5 * 3) = 1, new_R = trunc(0.25 * 3) = 0
        let next = cell.transition(CompartmentState::new(10i64, 3, 3, 0), 5.0);
        assert_eq!(next, CompartmentState::new(9, 3, 4, 0));
    }

    #[test]
    fn all_deltas_read_entry_snapshot() {
        // E is empty on entry, so new exposures cannot progress to I in the same step.
        let cell = SeirCell::new(rates(1.0, 1.0, 1.0));
        let next = cell.transition(CompartmentState::new(4.0, 0.0, 2.0, 0.0), 2.0);
        assert_eq!(next, CompartmentState::new(2.0, 2.0, 0.0, 2.0));
    }

    // ── Parameters ─────────────────────────────────────────────

    #[test]
    fn from_params_reads_aliases_and_delay() {
        let cell = CellId::from("c");
        let params = ParamBlock::new()
            .with("beta", 0.4)
            .with("sigma", 0.3)
            .with("gamma", 0.2)
            .with(SeirCell::OUTPUT_DELAY, 2.5);
        let seir = SeirCell::from_params(&cell, &params).unwrap();
        assert_eq!(seir.rates().transmission_rate(), 0.4);
        assert_eq!(CellModel::<f64>::output_delay(&seir, &CompartmentState::empty()), 2.5);
    }

    #[test]
    fn from_params_rejects_bad_delay() {
        let cell = CellId::from("c");
        let params = ParamBlock::new()
            .with("beta", 0.4)
            .with("sigma", 0.3)
            .with("gamma", 0.2)
            .with(SeirCell::OUTPUT_DELAY, 0.0);
        let err = SeirCell::from_params(&cell, &params).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "output_delay"));
    }

    #[test]
    fn from_params_reports_missing_rate() {
        let cell = CellId::from("Tampines");
        let params = ParamBlock::new().with("beta", 0.4).with("gamma", 0.2);
        let err = SeirCell::from_params(&cell, &params).unwrap_err();
        assert_eq!(err, ConfigError::missing(&cell, RateParameters::INCUBATION));
    }

    #[test]
    fn default_delay_is_one() {
        let seir = SeirCell::new(rates(0.1, 0.1, 0.1));
        assert_eq!(CellModel::<i64>::output_delay(&seir, &CompartmentState::empty()), 1.0);
        assert_eq!(CellModel::<i64>::name(&seir), "seir");
    }

    // ── Properties ─────────────────────────────────────────────

    fn arb_rates() -> impl Strategy<Value = RateParameters> {
        (0.0f64..5.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(b, s, g)| rates(b, s, g))
    }

    fn arb_discrete() -> impl Strategy<Value = CompartmentState<i64>> {
        (0i64..100_000, 0i64..100_000, 0i64..100_000, 0i64..100_000)
            .prop_map(|(s, e, i, r)| CompartmentState::new(s, e, i, r))
    }

    fn arb_continuous() -> impl Strategy<Value = CompartmentState<f64>> {
        (0.0f64..1e5, 0.0f64..1e5, 0.0f64..1e5, 0.0f64..1e5)
            .prop_map(|(s, e, i, r)| CompartmentState::new(s, e, i, r))
    }

    type Neighbours = Vec<(usize, f64, f64)>;

    /// Indexed `(weight, infectious)` neighbours and a shuffled copy.
    fn arb_neighbours_and_permutation() -> impl Strategy<Value = (Neighbours, Neighbours)> {
        proptest::collection::vec((0.0f64..10.0, 0.0f64..1e4), 0..12).prop_flat_map(|raw| {
            let nbs: Neighbours = raw.into_iter().enumerate().map(|(k, (w, i))| (k, w, i)).collect();
            (Just(nbs.clone()), Just(nbs).prop_shuffle())
        })
    }

    proptest! {
        #[test]
        fn discrete_conserves_total_exactly(
            r in arb_rates(),
            s in arb_discrete(),
            force in 0.0f64..1e5,
        ) {
            let next = SeirCell::new(r).transition(s, force);
            prop_assert_eq!(next.total(), s.total());
        }

        #[test]
        fn continuous_conserves_total(
            r in arb_rates(),
            s in arb_continuous(),
            force in 0.0f64..1e5,
        ) {
            let next = SeirCell::new(r).transition(s, force);
            let tol = 1e-9 * s.total().max(1.0);
            prop_assert!((next.total() - s.total()).abs() <= tol);
        }

        #[test]
        fn never_negative(
            r in arb_rates(),
            d in arb_discrete(),
            c in arb_continuous(),
            force in 0.0f64..1e5,
        ) {
            let cell = SeirCell::new(r);
            let nd = cell.transition(d, force);
            let nc = cell.transition(c, force);
            for (_, v) in nd.labelled() {
                prop_assert!(v >= 0);
            }
            for (_, v) in nc.labelled() {
                prop_assert!(v >= 0.0);
            }
        }

        #[test]
        fn susceptible_never_grows_recovered_never_shrinks(
            r in arb_rates(),
            s in arb_discrete(),
            force in 0.0f64..1e5,
        ) {
            let next = SeirCell::new(r).transition(s, force);
            prop_assert!(next.susceptible <= s.susceptible);
            prop_assert!(next.recovered >= s.recovered);
        }

        #[test]
        fn no_infection_anywhere_is_stable(
            r in arb_rates(),
            susceptible in 0i64..100_000,
            recovered in 0i64..100_000,
        ) {
            let s = CompartmentState::new(susceptible, 0, 0, recovered);
            prop_assert_eq!(SeirCell::new(r).transition(s, 0.0), s);
        }

        #[test]
        fn neighbour_order_is_irrelevant(
            r in arb_rates(),
            s in arb_continuous(),
            (nbs, shuffled) in arb_neighbours_and_permutation(),
        ) {
            let cell = SeirCell::new(r);
            let mut in_order = NeighbourSet::new();
            for &(k, w, i) in &nbs {
                in_order.insert(format!("n{k}"), w, CompartmentState::new(0.0, 0.0, i, 0.0));
            }
            let mut permuted = NeighbourSet::new();
            for &(k, w, i) in &shuffled {
                permuted.insert(format!("n{k}"), w, CompartmentState::new(0.0, 0.0, i, 0.0));
            }
            let a = cell.local_computation(s, &in_order.view());
            let b = cell.local_computation(s, &permuted.view());
            prop_assert_eq!(a, b);
        }
    }
}
