use crate::config::Config;
use crate::models::{
    CreateDeadlineRequest, Deadline, DeadlineResponse, DeadlinesResponse, NewDeadline,
    PossibleSubmission, SubmissionsResponse,
};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    retry_delay: Duration,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .default_headers(build_headers(token)?)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_delay: RETRY_DELAY,
        })
    }

    /// Pause between attempts of a retried request.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_url.clone(), config.api_token.as_deref())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        let response_text = response.text().await.context("Failed to get response text")?;

        if !status.is_success() {
            anyhow::bail!(
                "API request failed with status {} for URL {}\nResponse body: {}",
                status,
                url,
                response_text
            );
        }

        parse_body(&response_text, url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        self.send(self.client.request(Method::GET, &url), &url).await
    }

    pub async fn list_deadlines(&self, cohort_year: Option<i32>) -> Result<Vec<Deadline>> {
        let path = match cohort_year {
            Some(year) => format!("/deadlines?cohortYear={}", year),
            None => "/deadlines".to_string(),
        };
        let response: DeadlinesResponse = self.get(&path).await?;
        Ok(response.deadlines)
    }

    pub async fn get_deadline(&self, deadline_id: u64) -> Result<Deadline> {
        let path = format!("/deadlines/{}", deadline_id);
        let response: DeadlineResponse = self.get(&path).await?;
        Ok(response.deadline)
    }

    pub async fn list_submissions(&self, deadline_id: u64) -> Result<Vec<PossibleSubmission>> {
        let path = format!("/deadlines/{}/submissions", deadline_id);

        let mut attempt = 1;
        let response: SubmissionsResponse = loop {
            match self.get(&path).await {
                Ok(result) => break result,
                Err(e) if attempt >= MAX_RETRIES => {
                    return Err(e).with_context(|| {
                        format!(
                            "Failed to fetch submissions for deadline_id={} after {} attempts",
                            deadline_id, MAX_RETRIES
                        )
                    });
                }
                Err(e) => {
                    tracing::warn!(deadline_id, attempt, error = %e, "retrying submissions fetch");
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        };

        Ok(response.submissions)
    }

    pub async fn create_deadline(&self, deadline: &NewDeadline) -> Result<Deadline> {
        let url = self.url("/deadlines");
        tracing::info!(name = %deadline.name, due_by = %deadline.due_by, "creating deadline");

        let request = self
            .client
            .request(Method::POST, &url)
            .json(&CreateDeadlineRequest { deadline });
        let response: DeadlineResponse = self.send(request, &url).await?;
        Ok(response.deadline)
    }
}

fn build_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .context("API token contains characters not allowed in a header")?,
        );
    }
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static("milestone-tracker"));
    Ok(headers)
}

fn parse_body<T: DeserializeOwned>(body: &str, url: &str) -> Result<T> {
    serde_json::from_str(body).with_context(|| {
        format!(
            "Failed to parse JSON response from {}. Response body (first 500 chars): {}",
            url,
            &body.chars().take(500).collect::<String>()
        )
    })
}
