use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub cohort_year: Option<i32>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_vars(
            env::var("TRACKER_API_URL").ok(),
            env::var("TRACKER_API_TOKEN").ok(),
            env::var("TRACKER_COHORT_YEAR").ok(),
        )
    }

    fn from_vars(
        api_url: Option<String>,
        api_token: Option<String>,
        cohort_year: Option<String>,
    ) -> Result<Self> {
        let api_url = api_url
            .context("TRACKER_API_URL not found. Please set it in .env file or environment")?;
        let api_url = api_url.trim().trim_end_matches('/').to_string();

        if api_url.is_empty() {
            anyhow::bail!("TRACKER_API_URL is empty");
        }

        let api_token = api_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let cohort_year = cohort_year
            .filter(|y| !y.trim().is_empty())
            .map(|y| {
                y.trim()
                    .parse::<i32>()
                    .with_context(|| format!("TRACKER_COHORT_YEAR '{}' is not a year", y))
            })
            .transpose()?;

        Ok(Config {
            api_url,
            api_token,
            cohort_year,
        })
    }
}
