use serde::{Deserialize, Serialize};

/// Delivery channel configured on an alert rule.
///
/// # Examples
///
/// ```
/// use stormwatch_common::types::DeliveryMethod;
///
/// let method: DeliveryMethod = "sms".parse().unwrap();
/// assert_eq!(method, DeliveryMethod::Sms);
/// assert_eq!(method.to_string(), "sms");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Sms,
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMethod::Email => write!(f, "email"),
            DeliveryMethod::Sms => write!(f, "sms"),
        }
    }
}

impl std::str::FromStr for DeliveryMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(DeliveryMethod::Email),
            "sms" => Ok(DeliveryMethod::Sms),
            _ => Err(format!("unknown delivery method: {s}")),
        }
    }
}

/// A user's standing watch condition, as stored by the external rule store.
///
/// The engine only ever reads rules; creation and deletion happen upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: String,
    pub user_id: String,
    /// Free-text location, used verbatim as the weather lookup key.
    pub location: String,
    /// Stored condition string, e.g. `"temperature above 30°C"`.
    pub condition: String,
    pub method: DeliveryMethod,
}

/// Contact info of the rule's owner, joined in by the rule store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone_number: Option<String>,
}

/// An alert rule joined with its owner's contact info, ready for evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedAlert {
    pub rule: AlertRule,
    pub contact: ContactInfo,
}

/// Current conditions for one location, as reported by the weather provider.
///
/// Only `temperature_c` participates in evaluation; the optional fields are
/// available for message composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature_c: f64,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub description: Option<String>,
}

/// Pipeline stage at which a rule's processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    WeatherFetch,
    Evaluate,
    Dispatch,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureStage::WeatherFetch => write!(f, "weather_fetch"),
            FailureStage::Evaluate => write!(f, "evaluate"),
            FailureStage::Dispatch => write!(f, "dispatch"),
        }
    }
}

/// One rule's recorded failure within a batch run. Never fatal to the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule_id: String,
    pub stage: FailureStage,
    pub message: String,
}

/// Per-rule result of one batch run. Ephemeral; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub rule_id: String,
    pub condition_met: bool,
    /// Observed metric value, when the weather fetch succeeded.
    pub current_value: Option<f64>,
    pub failure: Option<RuleFailure>,
}

/// Summary of one full pass over the rule set.
///
/// A rule counts as `notifications_sent` when its condition was met and no
/// stage failed, since dispatch is always attempted for a met condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub rules_processed: usize,
    pub conditions_met: usize,
    pub notifications_sent: usize,
    pub failures: Vec<RuleFailure>,
}

impl BatchReport {
    /// Fold per-rule outcomes into the run summary.
    ///
    /// # Examples
    ///
    /// ```
    /// use stormwatch_common::types::{BatchReport, EvaluationOutcome};
    ///
    /// let outcomes = vec![
    ///     EvaluationOutcome {
    ///         rule_id: "r1".into(),
    ///         condition_met: true,
    ///         current_value: Some(32.0),
    ///         failure: None,
    ///     },
    ///     EvaluationOutcome {
    ///         rule_id: "r2".into(),
    ///         condition_met: false,
    ///         current_value: Some(5.0),
    ///         failure: None,
    ///     },
    /// ];
    /// let report = BatchReport::from_outcomes(outcomes);
    /// assert_eq!(report.rules_processed, 2);
    /// assert_eq!(report.notifications_sent, 1);
    /// assert!(report.failures.is_empty());
    /// ```
    pub fn from_outcomes(outcomes: Vec<EvaluationOutcome>) -> Self {
        let rules_processed = outcomes.len();
        let conditions_met = outcomes.iter().filter(|o| o.condition_met).count();
        let notifications_sent = outcomes
            .iter()
            .filter(|o| o.condition_met && o.failure.is_none())
            .count();
        let failures = outcomes.into_iter().filter_map(|o| o.failure).collect();
        Self {
            rules_processed,
            conditions_met,
            notifications_sent,
            failures,
        }
    }
}
