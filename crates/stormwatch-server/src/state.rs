use crate::runner::BatchRunner;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<BatchRunner>,
    pub start_time: DateTime<Utc>,
}
