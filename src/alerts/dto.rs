use serde::Serialize;

/// Terminal outcome of one job invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    NoLogs {
        date: String,
    },
    UnderThreshold {
        total_calories: i64,
        threshold: i64,
    },
    AlreadyAlerted {
        date: String,
    },
    AlertSent {
        total_calories: i64,
        threshold: i64,
        date: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
}

impl From<CheckOutcome> for CheckResponse {
    fn from(outcome: CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::NoLogs { date } => Self {
                message: "No logs for yesterday",
                date: Some(date),
                total_calories: None,
                threshold: None,
            },
            CheckOutcome::UnderThreshold {
                total_calories,
                threshold,
            } => Self {
                message: "Within calorie limit",
                date: None,
                total_calories: Some(total_calories),
                threshold: Some(threshold),
            },
            CheckOutcome::AlreadyAlerted { date } => Self {
                message: "Alert already sent",
                date: Some(date),
                total_calories: None,
                threshold: None,
            },
            CheckOutcome::AlertSent {
                total_calories,
                threshold,
                date,
            } => Self {
                message: "Alert sent!",
                date: Some(date),
                total_calories: Some(total_calories),
                threshold: Some(threshold),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub env: HealthEnv,
}

/// Which configuration values are present, never their contents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEnv {
    pub has_alert_uid: bool,
    pub has_firebase_project_id: bool,
    pub has_firebase_client_email: bool,
    pub has_firebase_private_key: bool,
    pub has_cron_secret: bool,
    pub has_alert_to_email: bool,
    pub has_emailjs_service_id: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_sent_payload_has_all_fields() {
        let response = CheckResponse::from(CheckOutcome::AlertSent {
            total_calories: 2100,
            threshold: 1800,
            date: "2024-05-01".into(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Alert sent!");
        assert_eq!(json["totalCalories"], 2100);
        assert_eq!(json["threshold"], 1800);
        assert_eq!(json["date"], "2024-05-01");
    }

    #[test]
    fn no_logs_payload_omits_totals() {
        let response = CheckResponse::from(CheckOutcome::NoLogs {
            date: "2024-05-01".into(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "No logs for yesterday");
        assert_eq!(json["date"], "2024-05-01");
        assert!(json.get("totalCalories").is_none());
        assert!(json.get("threshold").is_none());
    }

    #[test]
    fn under_threshold_payload_omits_date() {
        let response = CheckResponse::from(CheckOutcome::UnderThreshold {
            total_calories: 1500,
            threshold: 1800,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Within calorie limit");
        assert_eq!(json["totalCalories"], 1500);
        assert!(json.get("date").is_none());
    }

    #[test]
    fn error_details_are_optional() {
        let bare = serde_json::to_value(ErrorResponse::new("Unauthorized")).unwrap();
        assert_eq!(bare["error"], "Unauthorized");
        assert!(bare.get("details").is_none());

        let detailed =
            serde_json::to_value(ErrorResponse::with_details("Failed to send email", "boom"))
                .unwrap();
        assert_eq!(detailed["details"], "boom");
    }
}
