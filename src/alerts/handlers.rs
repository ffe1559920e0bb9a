use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{error, instrument, warn};

use crate::alerts::dto::{CheckResponse, ErrorResponse, HealthEnv, HealthResponse};
use crate::alerts::services::{self, CheckError};
use crate::state::AppState;

/// Scheduler marker set by the invoking platform on cron-triggered requests.
const SCHEDULER_HEADER: &str = "x-vercel-cron";

/// The job endpoint. Only access control is the scheduler marker or the
/// shared-secret bearer token; there is no request body.
#[instrument(skip(state, headers))]
pub async fn daily_check(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !is_authorized(&headers, &state.config.alerts.cron_secret) {
        warn!("daily check invoked without scheduler marker or valid secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Unauthorized")),
        )
            .into_response();
    }

    match services::run_daily_check(&state).await {
        Ok(outcome) => (StatusCode::OK, Json(CheckResponse::from(outcome))).into_response(),
        Err(CheckError::Send(e)) => {
            error!(error = %e, "alert email send failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_details(
                    "Failed to send email",
                    e.to_string(),
                )),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "daily check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Liveness plus a presence report of the configuration the job needs.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config;
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(HealthResponse {
        status: "ok",
        timestamp,
        env: HealthEnv {
            has_alert_uid: !config.alerts.uid.is_empty(),
            has_firebase_project_id: !config.firestore.project_id.is_empty(),
            has_firebase_client_email: !config.firestore.client_email.is_empty(),
            has_firebase_private_key: !config.firestore.private_key.is_empty(),
            has_cron_secret: !config.alerts.cron_secret.is_empty(),
            has_alert_to_email: !config.email.to_email.is_empty(),
            has_emailjs_service_id: !config.email.service_id.is_empty(),
        },
    })
}

pub(crate) fn is_authorized(headers: &HeaderMap, cron_secret: &str) -> bool {
    let from_scheduler = headers
        .get(SCHEDULER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "1")
        .unwrap_or(false);

    let manual = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| !cron_secret.is_empty() && token == cron_secret)
        .unwrap_or(false);

    from_scheduler || manual
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlertConfig, AppConfig, EmailConfig, FirestoreConfig};
    use axum::http::HeaderValue;
    use std::sync::Arc;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn scheduler_marker_is_accepted() {
        assert!(is_authorized(&headers(&[("x-vercel-cron", "1")]), "secret"));
    }

    #[test]
    fn matching_bearer_secret_is_accepted() {
        assert!(is_authorized(
            &headers(&[("authorization", "Bearer secret")]),
            "secret"
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        assert!(!is_authorized(
            &headers(&[("authorization", "Bearer nope")]),
            "secret"
        ));
    }

    #[test]
    fn missing_credentials_are_rejected() {
        assert!(!is_authorized(&headers(&[]), "secret"));
        assert!(!is_authorized(&headers(&[("x-vercel-cron", "0")]), "secret"));
    }

    #[test]
    fn empty_configured_secret_never_authorizes() {
        assert!(!is_authorized(&headers(&[("authorization", "Bearer ")]), ""));
    }

    #[tokio::test]
    async fn health_reports_which_config_is_present() {
        let config = AppConfig {
            firestore: FirestoreConfig {
                project_id: "p".into(),
                client_email: "svc@p.iam.gserviceaccount.com".into(),
                private_key: String::new(),
                base_url: "https://firestore.local/v1".into(),
                token_url: "https://oauth.local/token".into(),
            },
            alerts: AlertConfig {
                uid: "user-1".into(),
                threshold: 1800,
                cron_secret: "secret".into(),
            },
            email: EmailConfig {
                api_url: "https://email.local/send".into(),
                service_id: "service_1".into(),
                template_id: "template_1".into(),
                public_key: "public_1".into(),
                to_email: "partner@example.com".into(),
                cc_email: String::new(),
                to_name: String::new(),
            },
        };
        let state = crate::state::AppState::from_parts(Arc::new(config), reqwest::Client::new());

        let Json(body) = health(State(state)).await;

        assert_eq!(body.status, "ok");
        assert!(body.env.has_alert_uid);
        assert!(body.env.has_firebase_project_id);
        assert!(body.env.has_firebase_client_email);
        assert!(!body.env.has_firebase_private_key);
        assert!(body.env.has_cron_secret);
        assert!(body.env.has_alert_to_email);
        assert!(body.env.has_emailjs_service_id);
    }
}
