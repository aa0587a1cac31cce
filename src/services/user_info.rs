//! Client for the user-info service that resolves passports to people.

use async_trait::async_trait;
use reqwest::StatusCode;
use crate::config::UserInfoConfig;
use crate::errors::{UserInfoError, UserInfoResult};
use crate::models::{Passport, PersonInfo};

#[async_trait]
pub trait UserInfoLookup: Send + Sync {
    async fn lookup(&self, passport: Passport) -> UserInfoResult<PersonInfo>;
}

#[derive(Debug, Clone)]
pub struct UserInfoClient {
    http: reqwest::Client,
    base_url: String,
}

impl UserInfoClient {
    pub fn new(config: &UserInfoConfig) -> UserInfoResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl UserInfoLookup for UserInfoClient {
    async fn lookup(&self, passport: Passport) -> UserInfoResult<PersonInfo> {
        let url = format!("{}/userinfo", self.base_url);
        tracing::debug!("Requesting user info for passport {} from {}", passport, url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("passportSerie", passport.serie),
                ("passportNumber", passport.number),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("User info request to {} failed: {}", url, e);
                UserInfoError::Http(e)
            })?;

        match response.status() {
            StatusCode::OK => {
                let info: PersonInfo = response.json().await?;
                tracing::debug!("Received user info: {:?}", info);
                Ok(info)
            }
            StatusCode::NOT_FOUND => Err(UserInfoError::NotFound(passport.to_string())),
            status => {
                tracing::error!("User info service answered {} for passport {}", status, passport);
                Err(UserInfoError::Status(status.as_u16()))
            }
        }
    }
}
