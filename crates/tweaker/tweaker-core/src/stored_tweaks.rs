use serde::{Deserialize, Serialize};

use crate::config::{LOAD_FALLBACK_DURATION_SECONDS, LOAD_FALLBACK_STEPS_PER_SECOND};
use crate::error::TweakerError;
use crate::interp::Interpolator;
use crate::keyframes::KeyframeStore;
use crate::variable::Variable;

pub const FORMAT_TYPE: &str = "Tweaker";
pub const FORMAT_VERSION: &str = "1.0";
pub const FORMAT_META_INFO: &str = "Data file for the Tweaker application, \
    used for defining time-variable variables.";

/// Name given to variables whose entry has no `name`.
pub const UNKNOWN_NAME: &str = "UnknownName";

/// Engine-level contents of a tweak file after parsing and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTweaks {
    pub steps_per_second: f64,
    pub duration_seconds: f64,
    /// In file order.
    pub variables: Vec<Variable>,
}

/// Public API: parse a tweak file into engine-ready data.
///
/// Notes:
/// - Missing `stepsPerSecond` / `durationSeconds` fall back to the load constants in `config`.
/// - Missing or unknown interpolator names resolve to cosine.
/// - A variable without a `steps` section fails the whole document.
/// - A variable without a `name` is kept under [`UNKNOWN_NAME`] with a warning.
/// - Step entries missing `step` or `value`, or with a step outside `i32`, are skipped.
pub fn parse_stored_tweaks_json(s: &str) -> Result<LoadedTweaks, TweakerError> {
    let st: StoredTweaks = serde_json::from_str(s)?;

    if let Some(kind) = st.format_type.as_deref() {
        if kind != FORMAT_TYPE {
            log::warn!("unexpected format_type '{kind}', reading as {FORMAT_TYPE}");
        }
    }

    let vars = st.vars.unwrap_or_default();
    let mut variables = Vec::with_capacity(vars.len());
    for sv in vars {
        variables.push(to_variable(sv)?);
    }

    Ok(LoadedTweaks {
        steps_per_second: st
            .steps_per_second
            .unwrap_or(LOAD_FALLBACK_STEPS_PER_SECOND),
        duration_seconds: st
            .duration_seconds
            .unwrap_or(LOAD_FALLBACK_DURATION_SECONDS),
        variables,
    })
}

/// Public API: serialize engine state into a pretty-printed tweak file.
///
/// JSON has no NaN or infinity, so a non-finite setting, default or keyframe
/// value is a [`TweakerError::Serialization`] instead of being written as `null`.
pub fn write_stored_tweaks_json<'a>(
    steps_per_second: f64,
    duration_seconds: f64,
    variables: impl IntoIterator<Item = &'a Variable>,
) -> Result<String, TweakerError> {
    let vars = variables
        .into_iter()
        .map(from_variable)
        .collect::<Result<Vec<_>, _>>()?;
    let st = StoredTweaks {
        format_type: Some(FORMAT_TYPE.to_string()),
        format_version: Some(FORMAT_VERSION.to_string()),
        format_meta_info: Some(FORMAT_META_INFO.to_string()),
        steps_per_second: Some(ensure_finite(steps_per_second, || {
            "stepsPerSecond".to_string()
        })?),
        duration_seconds: Some(ensure_finite(duration_seconds, || {
            "durationSeconds".to_string()
        })?),
        vars: Some(vars),
    };
    Ok(serde_json::to_string_pretty(&st)?)
}

fn ensure_finite(value: f64, field: impl FnOnce() -> String) -> Result<f64, TweakerError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TweakerError::Serialization {
            reason: format!("{} is not a finite number ({value})", field()),
        })
    }
}

fn to_variable(sv: StoredVariable) -> Result<Variable, TweakerError> {
    let name = sv.name.unwrap_or_else(|| {
        log::warn!("variable entry without a name, using '{UNKNOWN_NAME}'");
        UNKNOWN_NAME.to_string()
    });

    let steps = sv.steps.ok_or_else(|| TweakerError::MissingSteps {
        variable: name.clone(),
    })?;

    let interpolator =
        Interpolator::from_name(sv.interpolator.as_deref().unwrap_or(""), sv.exponent);
    let mut variable =
        Variable::with_interpolator(name, sv.default_value.unwrap_or(0.0), interpolator);

    let mut store = KeyframeStore::new();
    for entry in steps {
        match (entry.step.and_then(|s| i32::try_from(s).ok()), entry.value) {
            (Some(step), Some(value)) => store.set(step, value),
            _ => log::debug!("skipping incomplete step entry in '{}'", variable.name()),
        }
    }
    variable.replace_steps(store);
    Ok(variable)
}

fn from_variable(v: &Variable) -> Result<StoredVariable, TweakerError> {
    let default_value = ensure_finite(v.default_value(), || {
        format!("defaultValue of '{}'", v.name())
    })?;
    let steps = v
        .steps()
        .iter()
        .map(|(step, value)| {
            let value = ensure_finite(value, || format!("step {step} of '{}'", v.name()))?;
            Ok(StoredStep {
                step: Some(i64::from(step)),
                value: Some(value),
            })
        })
        .collect::<Result<Vec<_>, TweakerError>>()?;

    Ok(StoredVariable {
        name: Some(v.name().to_string()),
        default_value: Some(default_value),
        interpolator: Some(v.interpolator().name().to_string()),
        exponent: v.interpolator().exponent(),
        steps: Some(steps),
    })
}

// ----- JSON schema (serde) -----

#[derive(Debug, Serialize, Deserialize)]
struct StoredTweaks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_meta_info: Option<String>,
    #[serde(rename = "stepsPerSecond")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_per_second: Option<f64>,
    #[serde(rename = "durationSeconds")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<Vec<StoredVariable>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredVariable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "defaultValue")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolator: Option<String>,
    /// Only meaningful for `PowInterpolator`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exponent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StoredStep>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredStep {
    #[serde(default)]
    pub step: Option<i64>,
    #[serde(default)]
    pub value: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_fallbacks() {
        let loaded = parse_stored_tweaks_json(r#"{ "format_type": "Tweaker" }"#).unwrap();
        assert_eq!(loaded.steps_per_second, LOAD_FALLBACK_STEPS_PER_SECOND);
        assert_eq!(loaded.duration_seconds, LOAD_FALLBACK_DURATION_SECONDS);
        assert!(loaded.variables.is_empty());
    }

    #[test]
    fn missing_steps_names_the_variable() {
        let err = parse_stored_tweaks_json(r#"{ "vars": [ { "name": "glow" } ] }"#).unwrap_err();
        assert_eq!(
            err,
            TweakerError::MissingSteps {
                variable: "glow".to_string()
            }
        );
    }

    #[test]
    fn empty_steps_array_is_accepted() {
        let loaded =
            parse_stored_tweaks_json(r#"{ "vars": [ { "name": "glow", "steps": [] } ] }"#).unwrap();
        assert_eq!(loaded.variables.len(), 1);
        assert!(loaded.variables[0].steps().is_empty());
        assert_eq!(loaded.variables[0].interpolator(), Interpolator::Cosine);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = parse_stored_tweaks_json("{ \"vars\": [").unwrap_err();
        assert!(matches!(err, TweakerError::Serialization { .. }));
    }

    #[test]
    fn out_of_range_step_is_skipped() {
        let loaded = parse_stored_tweaks_json(
            r#"{ "vars": [ { "name": "a", "steps": [
                { "step": 9999999999, "value": 1.0 },
                { "step": 2, "value": 3.0 }
            ] } ] }"#,
        )
        .unwrap();
        let steps: Vec<_> = loaded.variables[0].steps().iter().collect();
        assert_eq!(steps, vec![(2, 3.0)]);
    }

    #[test]
    fn written_document_has_header_and_names() {
        let mut v = Variable::with_interpolator("flash", 0.0, Interpolator::Pow { exponent: 3.0 });
        v.set(1, 2.0);
        let text = write_stored_tweaks_json(4.0, 20.0, [&v]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["format_type"], FORMAT_TYPE);
        assert_eq!(json["format_version"], FORMAT_VERSION);
        assert_eq!(json["stepsPerSecond"], 4.0);
        assert_eq!(json["durationSeconds"], 20.0);
        assert_eq!(json["vars"][0]["interpolator"], "PowInterpolator");
        assert_eq!(json["vars"][0]["exponent"], 3.0);
        assert_eq!(json["vars"][0]["steps"][0]["step"], 1);
        assert_eq!(json["vars"][0]["steps"][0]["value"], 2.0);
    }

    #[test]
    fn non_finite_values_are_not_written() {
        let mut v = Variable::new("glow", 0.0);
        v.set(3, f64::INFINITY);
        v.set(4, 1.0);
        let err = write_stored_tweaks_json(1.0, 1.0, [&v]).unwrap_err();
        assert!(matches!(err, TweakerError::Serialization { .. }));
        assert!(err.to_string().contains("step 3 of 'glow'"));

        let nan_default = Variable::new("fog", f64::NAN);
        assert!(write_stored_tweaks_json(1.0, 1.0, [&nan_default]).is_err());
        assert!(write_stored_tweaks_json(f64::NAN, 1.0, Vec::<&Variable>::new()).is_err());
        assert!(write_stored_tweaks_json(1.0, f64::NEG_INFINITY, Vec::<&Variable>::new()).is_err());
    }

    #[test]
    fn non_pow_variables_omit_exponent() {
        let v = Variable::new("plain", 1.0);
        let text = write_stored_tweaks_json(1.0, 1.0, [&v]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(json["vars"][0].get("exponent").is_none());
        assert_eq!(json["vars"][0]["interpolator"], "CosineInterpolator");
    }
}
