//! Scenario files and command-line overrides.

use anyhow::{Context, Result};
use sim_core::{ParamField, SimulationParams};
use std::fs;
use std::path::Path;

/// Load parameters from a YAML or JSON scenario. Missing keys keep the
/// interactive preset.
pub fn load(path: &Path) -> Result<SimulationParams> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    parse(&text, path.extension().and_then(|e| e.to_str()))
        .with_context(|| format!("parsing scenario {}", path.display()))
}

fn parse(text: &str, extension: Option<&str>) -> Result<SimulationParams> {
    let params = match extension {
        Some("json") => serde_json::from_str(text)?,
        _ => serde_yaml::from_str(text)?,
    };
    Ok(params)
}

/// Apply the flags that were given, in field order.
pub fn apply_overrides(
    mut params: SimulationParams,
    overrides: &[(ParamField, Option<f64>)],
) -> Result<SimulationParams> {
    for (field, value) in overrides {
        if let Some(v) = value {
            field
                .set(&mut params, *v)
                .with_context(|| format!("--{field}"))?;
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_and_json_scenarios() {
        let y = parse("acquisitionRate: 800\nmonths: 36\n", Some("yaml")).unwrap();
        assert_eq!(y.acquisition_rate, 800.0);
        assert_eq!(y.months, 36);
        let j = parse(r#"{"churn_rate": 2.0}"#, Some("json")).unwrap();
        assert_eq!(j.churn_rate, 2.0);
        assert_eq!(j.months, 24);
        assert!(parse("months: many", None).is_err());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let p = apply_overrides(
            SimulationParams::default(),
            &[
                (ParamField::Churn, Some(8.0)),
                (ParamField::Arpu, None),
                (ParamField::Months, Some(12.0)),
            ],
        )
        .unwrap();
        assert_eq!(p.churn_rate, 8.0);
        assert_eq!(p.arpu, 9.99);
        assert_eq!(p.months, 12);
    }
}
