#![deny(warnings)]

//! Subscription economics: the monthly cohort projection and its summary.
//!
//! This module provides:
//! - A deterministic free/paid cohort recurrence (`simulate`)
//! - Summary metrics over a projection (`aggregate`)
//! - The rounding policy used for every emitted integer

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sim_core::{MonthlyResult, SimulationParams};
use tracing::debug;

/// Fraction of the free tier that leaves every month. Not tunable.
pub const FREE_TIER_ATTRITION: f64 = 0.10;
/// Fixed operating cost per month.
pub const BASE_MONTHLY_EXPENSE: f64 = 50.0;
/// Scaling cost per user (free + paid) per month.
pub const COST_PER_USER: f64 = 0.05;

/// Round to the nearest integer, with halves going toward positive infinity.
///
/// This matches the reference tool: `2.5 -> 3` and `-2.5 -> -2`. Non-finite
/// inputs saturate the way `as` casts do (NaN becomes 0).
///
/// Example:
/// assert_eq!(round_half_up(142.3575), 142);
/// assert_eq!(round_half_up(-0.5), 0);
pub fn round_half_up(x: f64) -> i64 {
    let floor = x.floor();
    // x - floor is exact whenever it is close to 0.5, so ties are seen exactly
    let r = if x - floor >= 0.5 { floor + 1.0 } else { floor };
    r as i64
}

/// Running state carried between months. Never rounded.
#[derive(Clone, Copy, Debug)]
struct Cohorts {
    free: f64,
    paid: f64,
}

impl Cohorts {
    /// Advance one month, updating the running populations.
    fn step(&mut self, p: &SimulationParams) {
        let new_users = p.acquisition_rate;
        // conversion sees this month's arrivals, churn comes after
        let newly_paid = (self.free + new_users) * (p.conversion_rate / 100.0);
        let mut total_free = self.free + new_users - newly_paid;
        let mut total_paid = self.paid + newly_paid;

        total_paid -= total_paid * (p.churn_rate / 100.0);
        total_free -= total_free * FREE_TIER_ATTRITION;

        self.free = total_free;
        self.paid = total_paid;
    }

    fn snapshot(&self, month: u32, arpu: f64) -> MonthlyResult {
        let users = self.free + self.paid;
        MonthlyResult {
            month,
            revenue: round_half_up(self.paid * arpu),
            users: round_half_up(users),
            expenses: round_half_up(BASE_MONTHLY_EXPENSE + users * COST_PER_USER),
        }
    }
}

/// Project monthly revenue, users and expenses.
///
/// Starts with `initial_users` on the free tier and nobody paying, then
/// applies the cohort recurrence once per month. Inputs are not clamped:
/// a churn above 100% drives the paid pool negative and the output follows.
/// `months == 0` yields an empty projection.
///
/// Example:
/// let p = SimulationParams { months: 1, ..Default::default() };
/// assert_eq!(simulate(&p)[0].revenue, 142);
pub fn simulate(params: &SimulationParams) -> Vec<MonthlyResult> {
    let mut cohorts = Cohorts {
        free: params.initial_users,
        paid: 0.0,
    };
    let mut out = Vec::with_capacity(params.months as usize);
    for month in 1..=params.months {
        cohorts.step(params);
        out.push(cohorts.snapshot(month, params.arpu));
    }
    debug!(
        months = params.months,
        final_free = cohorts.free,
        final_paid = cohorts.paid,
        "simulation complete"
    );
    out
}

/// Totals over a projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_revenue: i64,
    pub total_expenses: i64,
    pub total_profit: i64,
    /// Profit as a whole percentage of revenue; 0 when there is no revenue.
    pub margin_percent: i64,
}

impl Summary {
    /// Exact profit / revenue ratio, or None without revenue.
    pub fn margin_ratio(&self) -> Option<Decimal> {
        if self.total_revenue <= 0 {
            return None;
        }
        Some(Decimal::from(self.total_profit) / Decimal::from(self.total_revenue))
    }
}

/// Sum revenue and expenses in a single pass and derive profit and margin.
///
/// Example:
/// let s = aggregate(&[]);
/// assert_eq!(s.margin_percent, 0);
pub fn aggregate(results: &[MonthlyResult]) -> Summary {
    let (total_revenue, total_expenses) = results.iter().fold((0i64, 0i64), |(r, e), m| {
        (r.saturating_add(m.revenue), e.saturating_add(m.expenses))
    });
    let mut summary = Summary {
        total_revenue,
        total_expenses,
        total_profit: total_revenue.saturating_sub(total_expenses),
        margin_percent: 0,
    };
    summary.margin_percent = summary
        .margin_ratio()
        .map(|ratio| percent_half_up(ratio * Decimal::ONE_HUNDRED))
        .unwrap_or(0);
    summary
}

fn percent_half_up(pct: Decimal) -> i64 {
    let strategy = if pct.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    pct.round_dp_with_strategy(0, strategy).to_i64().unwrap_or(0)
}
