use sim_core::{MonthlyResult, ParamField, SimulationParams, ValidationError};
use sim_econ::Summary;
use tracing::{debug, info};

/// Parameter store with the latest projection.
///
/// Every accepted change triggers exactly one full recompute. Nothing is
/// cached across parameter values and no partial update is attempted.
#[derive(Debug)]
pub struct Session {
    params: SimulationParams,
    results: Vec<MonthlyResult>,
    summary: Summary,
    strict: bool,
    recomputations: u64,
}

impl Session {
    /// Permissive session: any numeric input is accepted and simulated.
    pub fn new(params: SimulationParams) -> Self {
        let mut s = Self {
            params,
            results: Vec::new(),
            summary: Summary::default(),
            strict: false,
            recomputations: 0,
        };
        s.recompute();
        s
    }

    /// Session that rejects parameters failing [`SimulationParams::validate`].
    /// A rejected change leaves the previous state untouched.
    pub fn strict(params: SimulationParams) -> Result<Self, ValidationError> {
        params.validate()?;
        let mut s = Self::new(params);
        s.strict = true;
        Ok(s)
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn results(&self) -> &[MonthlyResult] {
        &self.results
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Number of recomputes run so far, including the initial one.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Update one field and recompute.
    pub fn set(&mut self, field: ParamField, value: f64) -> Result<&[MonthlyResult], ValidationError> {
        let next = self.params.with(field, value)?;
        debug!(%field, value, "parameter change");
        self.replace(next)
    }

    /// Replace all parameters and recompute.
    pub fn replace(&mut self, params: SimulationParams) -> Result<&[MonthlyResult], ValidationError> {
        if self.strict {
            params.validate()?;
        }
        self.params = params;
        self.recompute();
        Ok(&self.results)
    }

    fn recompute(&mut self) {
        self.results = sim_econ::simulate(&self.params);
        self.summary = sim_econ::aggregate(&self.results);
        self.recomputations += 1;
        info!(
            months = self.params.months,
            total_revenue = self.summary.total_revenue,
            margin_percent = self.summary.margin_percent,
            "projection recomputed"
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SimulationParams::default())
    }
}
