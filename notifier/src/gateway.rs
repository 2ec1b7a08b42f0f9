use std::time::Duration;

use async_trait::async_trait;
use common::{
    env_config::SmsConfig,
    error::{AppError, Res},
    http::mask_phone,
};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};

use crate::phone;

/// Delivers a text message to a customer's phone.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Res<()>;
}

#[derive(Debug, Serialize)]
struct SendSmsRequest<'a> {
    message: &'a str,
    recipients: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SendSmsResponse {
    status: Option<String>,
}

/// Client for the hosted SMS gateway.
pub struct SmsGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    country_code: String,
}

impl SmsGateway {
    pub fn new(config: &SmsConfig) -> Res<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(SmsGateway {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            country_code: config.country_code.clone(),
        })
    }
}

#[async_trait]
impl SmsSender for SmsGateway {
    /// Sends one message to one recipient.
    ///
    /// Fails on a non-2xx status and on any payload whose `status` is not
    /// `"success"`.
    async fn send_sms(&self, phone_number: &str, message: &str) -> Res<()> {
        let recipient = phone::normalize(phone_number, &self.country_code);
        log::info!("Sending SMS to {}", mask_phone(&recipient));

        let response = self
            .client
            .post(&self.api_url)
            .header("X-API-Key", &self.api_key)
            .header(ACCEPT, "application/json")
            .json(&SendSmsRequest {
                message,
                recipients: vec![recipient],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Internal(format!(
                "SMS gateway returned error status: {}",
                status
            )));
        }

        let body: SendSmsResponse = response.json().await.map_err(|e| {
            AppError::Internal(format!("Failed to parse SMS gateway response: {}", e))
        })?;

        match body.status.as_deref() {
            Some("success") => Ok(()),
            other => Err(AppError::Internal(format!(
                "SMS gateway did not accept the message (status: {})",
                other.unwrap_or("missing")
            ))),
        }
    }
}
