//! HTTP client for the passport identity API.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;
use worklog_core::error::{WorklogError, WorklogResult};
use worklog_core::models::user::IdentityInfo;
use worklog_core::repository::IdentityResolver;

use crate::config::TrackerConfig;
use crate::error::IdentityError;

/// Resolves passports with `GET {host}/info?passportSerie=..&passportNumber=..`.
#[derive(Debug, Clone)]
pub struct HttpIdentityResolver {
    client: reqwest::Client,
    host: String,
}

impl HttpIdentityResolver {
    pub fn new(config: &TrackerConfig) -> WorklogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| WorklogError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            host: config.passport_api_host.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, serie: u16, number: u32) -> Result<IdentityInfo, IdentityError> {
        let endpoint = format!("{}/info", self.host);
        debug!(endpoint = %endpoint, serie, number, "Resolving passport");

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("passportSerie", serie.to_string()),
                ("passportNumber", number.to_string()),
            ])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<IdentityInfo>().await?),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                Err(IdentityError::NotFound { serie, number })
            }
            status => Err(IdentityError::Status(status.as_u16())),
        }
    }
}

impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, serie: u16, number: u32) -> WorklogResult<IdentityInfo> {
        Ok(self.fetch(serie, number).await?)
    }
}
