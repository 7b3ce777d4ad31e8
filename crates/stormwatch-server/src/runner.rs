use std::sync::Arc;
use stormwatch_alert::Condition;
use stormwatch_common::types::{
    AlertRule, BatchReport, EvaluationOutcome, FailureStage, LoadedAlert, RuleFailure,
    WeatherObservation,
};
use stormwatch_notify::{AlertMessage, Dispatcher};
use stormwatch_store::error::StoreError;
use stormwatch_store::RuleStore;
use stormwatch_weather::WeatherSource;
use tokio::sync::Semaphore;

/// Orchestrates one batch run: load every rule, evaluate each against
/// current weather, dispatch notifications for met conditions.
///
/// Rules are processed under a bounded concurrency fan-out. Each rule's
/// task owns its outcome; a failure in one task is folded into the report
/// and can never abort the batch or touch another rule's result. Only a
/// rule-store failure is fatal.
pub struct BatchRunner {
    store: Arc<dyn RuleStore>,
    weather: Arc<dyn WeatherSource>,
    dispatcher: Arc<Dispatcher>,
    max_concurrent: usize,
}

impl BatchRunner {
    pub fn new(
        store: Arc<dyn RuleStore>,
        weather: Arc<dyn WeatherSource>,
        dispatcher: Arc<Dispatcher>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            store,
            weather,
            dispatcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Runs one full pass over the rule set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only when the rule store itself is
    /// unreachable; every per-rule failure is recorded in the report.
    pub async fn run(&self) -> Result<BatchReport, StoreError> {
        let alerts = self.store.load_alerts().await?;
        tracing::info!(count = alerts.len(), "Starting alert batch run");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(alerts.len());

        for alert in alerts {
            // The semaphore is never closed, so acquisition only fails if
            // the batch is torn down; stop spawning in that case.
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let weather = self.weather.clone();
            let dispatcher = self.dispatcher.clone();
            let rule_id = alert.rule.id.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                process_alert(weather, dispatcher, alert).await
            });
            handles.push((rule_id, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (rule_id, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!(rule_id = %rule_id, error = %e, "Rule task failed to complete");
                    outcomes.push(EvaluationOutcome {
                        rule_id: rule_id.clone(),
                        condition_met: false,
                        current_value: None,
                        failure: Some(RuleFailure {
                            rule_id,
                            stage: FailureStage::Evaluate,
                            message: format!("rule task aborted: {e}"),
                        }),
                    });
                }
            }
        }

        let report = BatchReport::from_outcomes(outcomes);
        tracing::info!(
            rules_processed = report.rules_processed,
            conditions_met = report.conditions_met,
            notifications_sent = report.notifications_sent,
            failures = report.failures.len(),
            "Alert batch run finished"
        );
        Ok(report)
    }
}

/// Processes a single rule end to end. Never returns an error: every
/// failure is folded into the outcome so the batch keeps going.
async fn process_alert(
    weather: Arc<dyn WeatherSource>,
    dispatcher: Arc<Dispatcher>,
    alert: LoadedAlert,
) -> EvaluationOutcome {
    let rule = alert.rule;

    let observation = match weather.current(&rule.location).await {
        Ok(observation) => observation,
        Err(e) => {
            tracing::warn!(rule_id = %rule.id, location = %rule.location, error = %e, "Weather lookup failed");
            return failed(&rule.id, FailureStage::WeatherFetch, false, None, e.to_string());
        }
    };
    let observed = observation.temperature_c;

    let met = match Condition::parse(&rule.condition)
        .and_then(|condition| condition.evaluate(&observation))
    {
        Ok(met) => met,
        Err(e) => {
            tracing::warn!(rule_id = %rule.id, condition = %rule.condition, error = %e, "Condition evaluation failed");
            return failed(&rule.id, FailureStage::Evaluate, false, Some(observed), e.to_string());
        }
    };

    if !met {
        tracing::debug!(rule_id = %rule.id, observed, "Condition not met");
        return EvaluationOutcome {
            rule_id: rule.id,
            condition_met: false,
            current_value: Some(observed),
            failure: None,
        };
    }

    let message = alert_message(&rule, &observation);
    match dispatcher.send(rule.method, &alert.contact, &message).await {
        Ok(receipt) => {
            tracing::info!(
                rule_id = %rule.id,
                channel = %receipt.channel,
                "Notification sent"
            );
            EvaluationOutcome {
                rule_id: rule.id,
                condition_met: true,
                current_value: Some(observed),
                failure: None,
            }
        }
        Err(e) => {
            tracing::warn!(rule_id = %rule.id, method = %rule.method, error = %e, "Notification dispatch failed");
            failed(&rule.id, FailureStage::Dispatch, true, Some(observed), e.to_string())
        }
    }
}

fn failed(
    rule_id: &str,
    stage: FailureStage,
    condition_met: bool,
    current_value: Option<f64>,
    message: String,
) -> EvaluationOutcome {
    EvaluationOutcome {
        rule_id: rule_id.to_string(),
        condition_met,
        current_value,
        failure: Some(RuleFailure {
            rule_id: rule_id.to_string(),
            stage,
            message,
        }),
    }
}

fn alert_message(rule: &AlertRule, observation: &WeatherObservation) -> AlertMessage {
    AlertMessage {
        subject: format!("Weather Alert for {}", rule.location),
        body: format!(
            "Weather Alert: Current temperature in {} is {}°C ({})",
            rule.location, observation.temperature_c, rule.condition
        ),
    }
}
