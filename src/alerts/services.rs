//! The daily threshold-check job.
//!
//! One invocation walks a linear sequence of decision points with early
//! exits: acquire token, query yesterday's logs, aggregate, compare to the
//! threshold, check the dedupe record, send the alert, record it.

use thiserror::Error;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::alerts::dto::CheckOutcome;
use crate::email::{self, EmailError};
use crate::firestore::token::TokenError;
use crate::firestore::types::Document;
use crate::firestore::{AlertRecord, FirestoreClient, FirestoreError};
use crate::state::AppState;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("token acquisition failed: {0}")]
    Token(#[from] TokenError),
    #[error("document store request failed: {0}")]
    Store(#[from] FirestoreError),
    #[error("failed to send alert email: {0}")]
    Send(#[from] EmailError),
}

/// Yesterday in the job's own UTC clock, `YYYY-MM-DD`. The tracked user's
/// local day may differ by their timezone offset; that mismatch is a known
/// limitation, kept as-is.
pub fn yesterday_utc() -> String {
    let date = OffsetDateTime::now_utc().date() - Duration::days(1);
    date.format(DATE_FORMAT)
        .expect("YYYY-MM-DD formatting cannot fail")
}

/// Sum of the `calories` field, coercing missing or malformed values to 0.
pub fn total_calories(documents: &[Document]) -> i64 {
    documents
        .iter()
        .map(|doc| doc.integer_field("calories").unwrap_or(0))
        .sum()
}

/// Strict comparison: a total exactly at the threshold is within the limit.
pub fn over_threshold(total: i64, threshold: i64) -> bool {
    total > threshold
}

pub async fn run_daily_check(state: &AppState) -> Result<CheckOutcome, CheckError> {
    let config = &state.config;
    let date = yesterday_utc();

    let token = crate::firestore::token::fetch_access_token(&state.http, &config.firestore).await?;
    let store = FirestoreClient::new(&state.http, &config.firestore, token);

    let logs = store.query_logs(&config.alerts.uid, &date).await?;
    if logs.is_empty() {
        info!(%date, "no logs for yesterday");
        return Ok(CheckOutcome::NoLogs { date });
    }

    let total = total_calories(&logs);
    let threshold = config.alerts.threshold;
    if !over_threshold(total, threshold) {
        info!(total, threshold, "within calorie limit");
        return Ok(CheckOutcome::UnderThreshold {
            total_calories: total,
            threshold,
        });
    }

    // Check-then-act: this read and the put_alert below are not atomic, so
    // overlapping invocations can both pass the check and double-send.
    if let Some(record) = store.get_alert(&config.alerts.uid).await? {
        if record.string_field("lastAlertDate") == Some(date.as_str()) {
            info!(%date, "alert already sent");
            return Ok(CheckOutcome::AlreadyAlerted { date });
        }
    }

    email::send_alert(&state.http, &config.email, total, threshold).await?;

    let record = AlertRecord {
        last_alert_date: date.clone(),
        total_calories: total,
    };
    if let Err(e) = store.put_alert(&config.alerts.uid, &record).await {
        // The alert went out; without the record the next run will re-send.
        warn!(error = %e, %date, "alert sent but dedupe record write failed");
    }

    Ok(CheckOutcome::AlertSent {
        total_calories: total,
        threshold,
        date,
    })
}
