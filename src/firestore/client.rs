//! Thin client for the Firestore REST API, scoped to the two collections the
//! job touches: the `logs` collection (read-only) and the per-user `alerts`
//! dedupe document.

use serde_json::json;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use crate::config::FirestoreConfig;
use crate::firestore::types::{Document, QueryRow, Value};

const LOGS_COLLECTION: &str = "logs";
const ALERTS_COLLECTION: &str = "alerts";

#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("firestore returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("firestore request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// The single per-user dedupe marker. Overwritten on every alert, never
/// appended; the write stamps `lastAlertTime` with the current wall clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecord {
    pub last_alert_date: String,
    pub total_calories: i64,
}

pub struct FirestoreClient<'a> {
    http: &'a reqwest::Client,
    config: &'a FirestoreConfig,
    token: String,
}

impl<'a> FirestoreClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a FirestoreConfig, token: String) -> Self {
        Self {
            http,
            config,
            token,
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.config.base_url, self.config.project_id
        )
    }

    /// All log entries for the given user and calendar date.
    pub async fn query_logs(&self, uid: &str, date: &str) -> Result<Vec<Document>, FirestoreError> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": LOGS_COLLECTION }],
                "where": {
                    "compositeFilter": {
                        "op": "AND",
                        "filters": [
                            field_equals("uid", uid),
                            field_equals("dateString", date),
                        ],
                    },
                },
            },
        });

        let response = self
            .http
            .post(format!("{}:runQuery", self.documents_url()))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let rows: Vec<QueryRow> = response.json().await?;
        let documents: Vec<Document> = rows.into_iter().filter_map(|row| row.document).collect();
        debug!(uid, date, count = documents.len(), "queried log entries");
        Ok(documents)
    }

    /// The user's alert record, or `None` if no alert was ever sent.
    pub async fn get_alert(&self, uid: &str) -> Result<Option<Document>, FirestoreError> {
        let response = self
            .http
            .get(format!(
                "{}/{}/{}",
                self.documents_url(),
                ALERTS_COLLECTION,
                uid
            ))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        Ok(Some(response.json().await?))
    }

    /// Overwrite the user's alert record.
    pub async fn put_alert(&self, uid: &str, record: &AlertRecord) -> Result<(), FirestoreError> {
        let now = OffsetDateTime::now_utc().format(&Rfc3339)?;
        let body = json!({
            "fields": {
                "lastAlertDate": Value::string(record.last_alert_date.as_str()),
                "lastAlertTime": Value::timestamp(now),
                "totalCalories": Value::integer(record.total_calories),
            },
        });

        let response = self
            .http
            .patch(format!(
                "{}/{}/{}",
                self.documents_url(),
                ALERTS_COLLECTION,
                uid
            ))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;
        debug!(uid, date = %record.last_alert_date, "alert record written");
        Ok(())
    }
}

fn field_equals(field: &str, value: &str) -> serde_json::Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": field },
            "op": "EQUAL",
            "value": { "stringValue": value },
        },
    })
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FirestoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".into());
    Err(FirestoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_filter_shape_matches_the_rest_api() {
        let filter = field_equals("uid", "user-1");
        assert_eq!(filter["fieldFilter"]["field"]["fieldPath"], "uid");
        assert_eq!(filter["fieldFilter"]["op"], "EQUAL");
        assert_eq!(filter["fieldFilter"]["value"]["stringValue"], "user-1");
    }

    #[test]
    fn alert_record_is_comparable() {
        let a = AlertRecord {
            last_alert_date: "2024-05-01".into(),
            total_calories: 2100,
        };
        assert_eq!(a, a.clone());
    }
}
