//! Transactional email delivery through the EmailJS HTTP API.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::EmailConfig;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email api returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("email request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    to_email: &'a str,
    cc_email: &'a str,
    to_name: &'a str,
    total_calories: i64,
    calorie_threshold: i64,
    calories_over: i64,
}

/// Send the threshold-breach alert. Non-2xx is a hard failure; the caller
/// must not write the dedupe record so a later run can retry.
pub async fn send_alert(
    http: &reqwest::Client,
    cfg: &EmailConfig,
    total_calories: i64,
    threshold: i64,
) -> Result<(), EmailError> {
    let request = SendRequest {
        service_id: &cfg.service_id,
        template_id: &cfg.template_id,
        user_id: &cfg.public_key,
        template_params: TemplateParams {
            to_email: &cfg.to_email,
            cc_email: &cfg.cc_email,
            to_name: &cfg.to_name,
            total_calories,
            calorie_threshold: threshold,
            calories_over: total_calories - threshold,
        },
    };

    debug!(to = %cfg.to_email, total_calories, "sending calorie alert email");
    let response = http.post(&cfg.api_url).json(&request).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".into());
        return Err(EmailError::Status {
            status: status.as_u16(),
            body,
        });
    }

    info!(to = %cfg.to_email, total_calories, threshold, "calorie alert sent");
    Ok(())
}
