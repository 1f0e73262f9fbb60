use media_capture::{FormSubmitter, SubmitError};
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::AppError;

const USER_AGENT: &str = "CivicReport/0.1.0";

/// Posts the finished report form-urlencoded to the report endpoint
pub struct HttpReportSubmitter {
    client: reqwest::Client,
    url: String,
}

impl HttpReportSubmitter {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            url: config.submit_url(),
        })
    }

    #[cfg(test)]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FormSubmitter for HttpReportSubmitter {
    async fn submit(&self, payload: Vec<(String, String)>) -> Result<(), SubmitError> {
        log::debug!("Submitting report with {} field(s) to {}", payload.len(), self.url);
        let response = self
            .client
            .post(&self.url)
            .form(&payload)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Report rejected: HTTP {}", status);
            return Err(SubmitError::Rejected(status.as_u16()));
        }
        log::info!("Report submitted");
        Ok(())
    }
}
