//! JSON scenario builders for loader and CLI tests.

use serde_json::{json, Map, Value};

/// Incrementally assembles a scenario document.
///
/// ```
/// use epicell_test_utils::ScenarioBuilder;
///
/// let doc = ScenarioBuilder::new()
///     .numeric("discrete")
///     .cell("A", ScenarioBuilder::seir_cell([10.0, 0.0, 1.0, 0.0], 0.5, 0.2, 0.1))
///     .build();
/// assert_eq!(doc["cells"]["A"]["model"], "seir");
/// ```
#[derive(Clone, Debug)]
pub struct ScenarioBuilder {
    root: Map<String, Value>,
    cells: Map<String, Value>,
}

impl ScenarioBuilder {
    /// An empty continuous graph scenario.
    pub fn new() -> Self {
        let mut root = Map::new();
        root.insert("topology".into(), json!({ "kind": "graph" }));
        Self {
            root,
            cells: Map::new(),
        }
    }

    pub fn numeric(mut self, mode: &str) -> Self {
        self.root.insert("numeric".into(), json!(mode));
        self
    }

    pub fn default_delay(mut self, delay: f64) -> Self {
        self.root.insert("default_delay".into(), json!(delay));
        self
    }

    pub fn workers(mut self, workers: u64) -> Self {
        self.root.insert("workers".into(), json!(workers));
        self
    }

    /// Replace the topology object verbatim.
    pub fn topology(mut self, topology: Value) -> Self {
        self.root.insert("topology".into(), topology);
        self
    }

    /// A `rows × cols` grid topology.
    pub fn grid(self, rows: u32, cols: u32, edge: &str, neighbourhood: Value) -> Self {
        self.topology(json!({
            "kind": "grid",
            "rows": rows,
            "cols": cols,
            "edge": edge,
            "neighbourhood": neighbourhood,
        }))
    }

    /// Set the `default` block merged under every cell.
    pub fn default_cell(self, block: Value) -> Self {
        self.cell("default", block)
    }

    pub fn cell(mut self, id: &str, block: Value) -> Self {
        self.cells.insert(id.into(), block);
        self
    }

    pub fn build(self) -> Value {
        let mut root = self.root;
        root.insert("cells".into(), Value::Object(self.cells));
        Value::Object(root)
    }

    pub fn to_json(self) -> String {
        self.build().to_string()
    }

    /// `{"S":s,"E":e,"I":i,"R":r}`.
    pub fn state([s, e, i, r]: [f64; 4]) -> Value {
        json!({ "S": s, "E": e, "I": i, "R": r })
    }

    /// A complete `seir` cell block with no neighbours.
    pub fn seir_cell(state: [f64; 4], beta: f64, sigma: f64, gamma: f64) -> Value {
        json!({
            "model": "seir",
            "state": Self::state(state),
            "config": { "beta": beta, "sigma": sigma, "gamma": gamma },
            "neighborhood": {},
        })
    }
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One isolated discrete cell `X` at `<990,0,10,0>` with β=0, σ=0.2, γ=0.1.
///
/// After one step it reads `<990,0,9,1>`.
pub fn scenario_a() -> ScenarioBuilder {
    ScenarioBuilder::new().numeric("discrete").cell(
        "X",
        ScenarioBuilder::seir_cell([990.0, 0.0, 10.0, 0.0], 0.0, 0.2, 0.1),
    )
}

/// Continuous cells `A` (`<99,0,1,0>`) and `B` (`<100,0,0,0>`); `A`
/// influences `B` with weight 1 and β=0.5.
///
/// After one step `B` reads `<99.5,0.5,0,0>`.
pub fn scenario_b() -> ScenarioBuilder {
    ScenarioBuilder::new()
        .numeric("continuous")
        .default_cell(json!({
            "model": "seir",
            "config": { "beta": 0.5, "sigma": 0.2, "gamma": 0.1 },
            "neighborhood": {},
        }))
        .cell("A", json!({ "state": ScenarioBuilder::state([99.0, 0.0, 1.0, 0.0]) }))
        .cell(
            "B",
            json!({
                "state": ScenarioBuilder::state([100.0, 0.0, 0.0, 0.0]),
                "neighborhood": { "A": 1.0 },
            }),
        )
}
