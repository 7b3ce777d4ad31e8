//! Condition evaluation for weather alert rules.
//!
//! Rules store their condition as free text (`"temperature above 30°C"`).
//! [`Condition::parse`] turns that string into a structured
//! (metric, comparator, threshold) triple, and [`Condition::evaluate`]
//! checks it against a fetched [`WeatherObservation`]. Both are pure and
//! perform no I/O.


use std::str::FromStr;
use stormwatch_common::types::WeatherObservation;

/// Errors produced while parsing or evaluating a stored condition.
///
/// Both variants indicate bad stored data. They are recorded against the
/// offending rule and never abort a batch run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    /// The condition string does not split into `<metric> <comparator> <threshold>`.
    #[error("malformed condition '{raw}': {reason}")]
    Malformed { raw: String, reason: String },

    /// The condition names a metric the evaluator does not support.
    #[error("unsupported metric '{0}', only 'temperature' is evaluated")]
    UnsupportedMetric(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Above,
    Below,
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "above" => Ok(Self::Above),
            "below" => Ok(Self::Below),
            _ => Err(format!("unknown comparator: {s}")),
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
        }
    }
}

impl Comparator {
    fn check(&self, observed: f64, threshold: f64) -> bool {
        match self {
            Self::Above => observed > threshold,
            Self::Below => observed < threshold,
        }
    }
}

/// A parsed alert condition: metric, comparator and numeric threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub metric: String,
    pub comparator: Comparator,
    pub threshold: f64,
}

impl Condition {
    /// Parses a stored condition string like `"temperature above 30°C"`.
    ///
    /// The threshold token may carry a trailing unit; only its leading
    /// numeric run (sign, digits, decimal point) is read.
    pub fn parse(raw: &str) -> Result<Self, ConditionError> {
        let malformed = |reason: &str| ConditionError::Malformed {
            raw: raw.to_string(),
            reason: reason.to_string(),
        };

        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(malformed(
                "expected '<metric> <comparator> <threshold>'",
            ));
        }

        let comparator = tokens[1]
            .parse::<Comparator>()
            .map_err(|_| malformed("comparator must be 'above' or 'below'"))?;

        let threshold = leading_number(tokens[2])
            .ok_or_else(|| malformed("threshold is not a number"))?;

        Ok(Self {
            metric: tokens[0].to_string(),
            comparator,
            threshold,
        })
    }

    /// Checks the condition against an observation.
    ///
    /// Returns `true` when the observed metric is above/below the threshold.
    pub fn evaluate(&self, observation: &WeatherObservation) -> Result<bool, ConditionError> {
        let observed = match self.metric.as_str() {
            "temperature" => observation.temperature_c,
            other => return Err(ConditionError::UnsupportedMetric(other.to_string())),
        };
        Ok(self.comparator.check(observed, self.threshold))
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parses the leading numeric run of a token (`"30°C"` → `30.0`).
fn leading_number(token: &str) -> Option<f64> {
    let mut end = 0;
    for (i, c) in token.char_indices() {
        let numeric = c.is_ascii_digit() || c == '.' || (i == 0 && (c == '+' || c == '-'));
        if !numeric {
            break;
        }
        end = i + c.len_utf8();
    }
    token[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
