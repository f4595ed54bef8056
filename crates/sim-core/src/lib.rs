#![deny(warnings)]

//! Core data model for the revenue simulator.
//!
//! This crate defines the serializable parameter and result types shared by
//! the engine, the exporters and the CLI, together with an opt-in strict
//! validation pass. The engine itself never validates: out-of-range inputs
//! are allowed to flow through the arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Inputs of one simulation run.
///
/// Percentages are expressed on a 0-100 scale and apply to the current pool
/// on every step, so growth and decay compound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// New users entering the free tier each month (>= 0).
    #[serde(alias = "acquisitionRate")]
    pub acquisition_rate: f64,
    /// Percent of the paid pool lost each month, in [0, 100].
    #[serde(alias = "churnRate")]
    pub churn_rate: f64,
    /// Percent of the free pool converting to paid each month, in [0, 100].
    #[serde(alias = "conversionRate")]
    pub conversion_rate: f64,
    /// Price charged per paid user per month (> 0).
    pub arpu: f64,
    /// Starting free-tier population (>= 0).
    #[serde(alias = "initialUsers")]
    pub initial_users: f64,
    /// Horizon length in months (> 0).
    pub months: u32,
}

impl Default for SimulationParams {
    /// The preset the interactive tool opens with: a two year horizon for a
    /// $9.99 subscription.
    fn default() -> Self {
        Self {
            acquisition_rate: 500.0,
            churn_rate: 5.0,
            conversion_rate: 3.0,
            arpu: 9.99,
            initial_users: 0.0,
            months: 24,
        }
    }
}

/// One emitted month of the projection. All figures are rounded snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyResult {
    /// 1-indexed period.
    pub month: u32,
    /// Monthly recurring revenue.
    pub revenue: i64,
    /// Paid plus free users at period end.
    pub users: i64,
    /// Operating cost for the period.
    pub expenses: i64,
}

impl MonthlyResult {
    /// Revenue minus expenses for this month, saturating at the i64 bounds.
    pub fn profit(&self) -> i64 {
        self.revenue.saturating_sub(self.expenses)
    }
}

/// Validation errors for strict parameter checking.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// The horizon must contain at least one month.
    #[error("months must be >= 1")]
    EmptyHorizon,
    /// Numeric field must be finite.
    #[error("{0} must be a finite number")]
    NonFinite(ParamField),
    /// Population counts must be non-negative.
    #[error("{0} must be >= 0, got {1}")]
    Negative(ParamField, f64),
    /// Percentages must lie within [0, 100].
    #[error("{0} must be within [0, 100], got {1}")]
    PercentOutOfRange(ParamField, f64),
    /// Price must be strictly positive.
    #[error("arpu must be > 0, got {0}")]
    NonPositivePrice(f64),
    /// Month count must be a whole number representable as u32.
    #[error("months must be a whole number, got {0}")]
    InvalidMonths(f64),
    /// Unrecognized field name.
    #[error("unknown parameter: {0}")]
    UnknownField(String),
}

impl SimulationParams {
    /// Strict validation against the documented domain.
    ///
    /// The engine does not call this; callers that want to refuse nonsensical
    /// inputs opt in explicitly.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.months == 0 {
            return Err(ValidationError::EmptyHorizon);
        }
        for field in ParamField::RATES {
            let v = field.get(self);
            if !v.is_finite() {
                return Err(ValidationError::NonFinite(field));
            }
        }
        for field in [ParamField::Acquisition, ParamField::InitialUsers] {
            let v = field.get(self);
            if v < 0.0 {
                return Err(ValidationError::Negative(field, v));
            }
        }
        for field in [ParamField::Churn, ParamField::Conversion] {
            let v = field.get(self);
            if !(0.0..=100.0).contains(&v) {
                return Err(ValidationError::PercentOutOfRange(field, v));
            }
        }
        if self.arpu <= 0.0 {
            return Err(ValidationError::NonPositivePrice(self.arpu));
        }
        Ok(())
    }

    /// Returns a copy with one field replaced.
    pub fn with(&self, field: ParamField, value: f64) -> Result<Self, ValidationError> {
        let mut next = self.clone();
        field.set(&mut next, value)?;
        Ok(next)
    }
}

/// Names of the tunable simulation inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamField {
    Acquisition,
    Churn,
    Conversion,
    Arpu,
    InitialUsers,
    Months,
}

impl ParamField {
    /// Every field, in display order.
    pub const ALL: [ParamField; 6] = [
        ParamField::Acquisition,
        ParamField::Churn,
        ParamField::Conversion,
        ParamField::Arpu,
        ParamField::InitialUsers,
        ParamField::Months,
    ];

    /// Floating-point fields.
    const RATES: [ParamField; 5] = [
        ParamField::Acquisition,
        ParamField::Churn,
        ParamField::Conversion,
        ParamField::Arpu,
        ParamField::InitialUsers,
    ];

    /// CLI-style name of the field.
    pub fn name(self) -> &'static str {
        match self {
            ParamField::Acquisition => "acquisition",
            ParamField::Churn => "churn",
            ParamField::Conversion => "conversion",
            ParamField::Arpu => "arpu",
            ParamField::InitialUsers => "initial-users",
            ParamField::Months => "months",
        }
    }

    /// Reads the field as a float.
    pub fn get(self, p: &SimulationParams) -> f64 {
        match self {
            ParamField::Acquisition => p.acquisition_rate,
            ParamField::Churn => p.churn_rate,
            ParamField::Conversion => p.conversion_rate,
            ParamField::Arpu => p.arpu,
            ParamField::InitialUsers => p.initial_users,
            ParamField::Months => f64::from(p.months),
        }
    }

    /// Writes the field. Rates are stored unmodified; months must be a whole
    /// number within u32.
    pub fn set(self, p: &mut SimulationParams, value: f64) -> Result<(), ValidationError> {
        match self {
            ParamField::Acquisition => p.acquisition_rate = value,
            ParamField::Churn => p.churn_rate = value,
            ParamField::Conversion => p.conversion_rate = value,
            ParamField::Arpu => p.arpu = value,
            ParamField::InitialUsers => p.initial_users = value,
            ParamField::Months => {
                if !value.is_finite()
                    || value.fract() != 0.0
                    || value < 0.0
                    || value > f64::from(u32::MAX)
                {
                    return Err(ValidationError::InvalidMonths(value));
                }
                p.months = value as u32;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "acquisition" | "acquisition-rate" | "acquisition_rate" => Ok(ParamField::Acquisition),
            "churn" | "churn-rate" | "churn_rate" => Ok(ParamField::Churn),
            "conversion" | "conversion-rate" | "conversion_rate" => Ok(ParamField::Conversion),
            "arpu" | "price" => Ok(ParamField::Arpu),
            "initial-users" | "initial_users" => Ok(ParamField::InitialUsers),
            "months" => Ok(ParamField::Months),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_the_interactive_preset() {
        let p = SimulationParams::default();
        assert_eq!(p.acquisition_rate, 500.0);
        assert_eq!(p.churn_rate, 5.0);
        assert_eq!(p.conversion_rate, 3.0);
        assert_eq!(p.arpu, 9.99);
        assert_eq!(p.initial_users, 0.0);
        assert_eq!(p.months, 24);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn camel_case_keys_are_accepted() {
        let json = r#"{"acquisitionRate": 100, "churnRate": 2.5, "months": 6}"#;
        let p: SimulationParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.acquisition_rate, 100.0);
        assert_eq!(p.churn_rate, 2.5);
        assert_eq!(p.months, 6);
        // Missing keys fall back to the preset.
        assert_eq!(p.arpu, 9.99);
    }

    #[test]
    fn yaml_scenario_loads() {
        let yaml = "acquisition_rate: 1000\nconversion_rate: 4\narpu: 19\nmonths: 12\n";
        let p: SimulationParams = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(p.acquisition_rate, 1000.0);
        assert_eq!(p.conversion_rate, 4.0);
        assert_eq!(p.arpu, 19.0);
        assert_eq!(p.months, 12);
    }

    #[test]
    fn strict_validation_rejects_out_of_domain() {
        let base = SimulationParams::default();
        let zero_months = SimulationParams { months: 0, ..base.clone() };
        assert_eq!(zero_months.validate(), Err(ValidationError::EmptyHorizon));

        let churn = SimulationParams { churn_rate: 120.0, ..base.clone() };
        assert_eq!(
            churn.validate(),
            Err(ValidationError::PercentOutOfRange(ParamField::Churn, 120.0))
        );

        let neg = SimulationParams { initial_users: -1.0, ..base.clone() };
        assert_eq!(
            neg.validate(),
            Err(ValidationError::Negative(ParamField::InitialUsers, -1.0))
        );

        let free = SimulationParams { arpu: 0.0, ..base.clone() };
        assert_eq!(free.validate(), Err(ValidationError::NonPositivePrice(0.0)));

        let nan = SimulationParams { conversion_rate: f64::NAN, ..base };
        assert_eq!(
            nan.validate(),
            Err(ValidationError::NonFinite(ParamField::Conversion))
        );
    }

    #[test]
    fn field_names_parse_and_apply() {
        let f: ParamField = "initial-users".parse().unwrap();
        assert_eq!(f, ParamField::InitialUsers);
        assert!("bogus".parse::<ParamField>().is_err());

        let p = SimulationParams::default()
            .with(ParamField::Churn, 7.5)
            .unwrap()
            .with(ParamField::Months, 36.0)
            .unwrap();
        assert_eq!(p.churn_rate, 7.5);
        assert_eq!(p.months, 36);
        assert_eq!(
            SimulationParams::default().with(ParamField::Months, 1.5),
            Err(ValidationError::InvalidMonths(1.5))
        );
    }

    #[test]
    fn monthly_profit() {
        let r = MonthlyResult { month: 1, revenue: 142, users: 451, expenses: 73 };
        assert_eq!(r.profit(), 69);
    }

    #[test]
    fn profit_saturates_on_extreme_rows() {
        let low = MonthlyResult { month: 16, revenue: i64::MIN, users: 0, expenses: 110_834_032_120_765_008 };
        assert_eq!(low.profit(), i64::MIN);
        let high = MonthlyResult { month: 1, revenue: i64::MAX, users: 0, expenses: -1 };
        assert_eq!(high.profit(), i64::MAX);
    }

    proptest! {
        #[test]
        fn in_range_params_validate(acq in 0.0f64..5000.0,
                                    churn in 0.0f64..=100.0,
                                    conv in 0.0f64..=100.0,
                                    arpu in 0.01f64..1000.0,
                                    months in 1u32..600) {
            let p = SimulationParams {
                acquisition_rate: acq,
                churn_rate: churn,
                conversion_rate: conv,
                arpu,
                initial_users: 0.0,
                months,
            };
            prop_assert!(p.validate().is_ok());
        }

        #[test]
        fn every_field_roundtrips_through_name(idx in 0usize..6) {
            let f = ParamField::ALL[idx];
            prop_assert_eq!(f.name().parse::<ParamField>().unwrap(), f);
        }
    }
}
