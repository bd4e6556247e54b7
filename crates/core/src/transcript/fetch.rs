use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;

use crate::{
    error::{Result, ScholarSyncError},
    transcript::{CaptionFetcher, Credentials},
};

/// Caption fetcher backed by `reqwest`.
///
/// A configured session cookie is only attached to credentialed requests.
#[derive(Clone)]
pub struct HttpCaptionFetcher {
    client: reqwest::Client,
    session_cookie: Option<String>,
}

impl HttpCaptionFetcher {
    pub fn new(timeout: Duration, session_cookie: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            session_cookie,
        })
    }
}

#[async_trait]
impl CaptionFetcher for HttpCaptionFetcher {
    async fn fetch(&self, url: &str, credentials: Credentials) -> Result<String> {
        let mut request = self.client.get(url);
        if credentials == Credentials::Include
            && let Some(cookie) = &self.session_cookie
        {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScholarSyncError::HttpStatus {
                status,
                body: String::new(),
            });
        }

        Ok(response.text().await?)
    }
}
