//! Benchmark profiles for the Epicell simulation framework.
//!
//! - [`reference_profile`]: 100x100 Moore grid (10K cells), one seeded cell
//! - [`stress_profile`]: 316x316 Moore grid (~100K cells)
//! - [`grid_profile`]: the general builder both use

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use epicell_core::{CompartmentState, ModelDescriptor, ParamBlock};
use epicell_engine::NetworkConfig;
use epicell_space::{EdgeBehavior, Grid2D, Neighbourhood, Topology};

/// Descriptor for the SEIR model with moderate, realistic rates.
pub fn seir_descriptor() -> ModelDescriptor {
    ModelDescriptor::new(
        "seir",
        ParamBlock::new()
            .with("beta", 0.02)
            .with("sigma", 0.2)
            .with("gamma", 0.1),
    )
}

/// Build a `side`×`side` wrapped Moore grid of SEIR cells with
/// `population` susceptibles each, except the centre cell, which starts
/// with 10 infectious.
///
/// # Panics
///
/// Panics if `side` is 0.
pub fn grid_profile(side: u32, population: f64, workers: usize) -> NetworkConfig<f64> {
    let grid = Grid2D::new(side, side, EdgeBehavior::Wrap, Neighbourhood::moore(1))
        .expect("benchmark grid must be non-empty");
    let centre = Grid2D::cell_id((side / 2) as i32, (side / 2) as i32);
    let healthy = CompartmentState::new(population, 0.0, 0.0, 0.0);
    let seeded = CompartmentState::new(population, 0.0, 10.0, 0.0);

    let ids = grid.cell_ids();
    let mut config = NetworkConfig::new(Box::new(grid)).with_workers(workers);
    for id in ids {
        let initial = if id == centre { seeded } else { healthy };
        config = config.with_cell(id, seir_descriptor(), initial);
    }
    config
}

/// 100x100 grid (10K cells).
pub fn reference_profile(workers: usize) -> NetworkConfig<f64> {
    grid_profile(100, 1000.0, workers)
}

/// 316x316 grid (~100K cells).
pub fn stress_profile(workers: usize) -> NetworkConfig<f64> {
    grid_profile(316, 1000.0, workers)
}
