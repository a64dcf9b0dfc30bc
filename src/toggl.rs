use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{SecondsFormat, Utc};
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{StartRequest, TimeEntry, Workspace};

pub const BASE_URL: &str = "https://api.track.toggl.com/api/v9";
pub const CREATED_WITH: &str = "toggler";

const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum TogglError {
    #[error("API error: {status} - {body}")]
    Api { status: StatusCode, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(String),
}

pub struct TogglClient {
    client: Client,
    token: String,
    base_url: String,
}

impl TogglClient {
    pub fn new(token: String, base_url: &str) -> Result<Self, TogglError> {
        let client = Client::builder()
            .user_agent(concat!("toggler/", env!("CARGO_PKG_VERSION")))
            .timeout(TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn get_workspaces(&self) -> Result<Vec<Workspace>, TogglError> {
        let response = self.send(Method::GET, self.url("/workspaces"), None)?;
        decode(expect_status(response, &[StatusCode::OK])?)
    }

    pub fn start_timer(&self, workspace_id: u64, description: &str) -> Result<TimeEntry, TogglError> {
        let request = StartRequest {
            description: description.to_string(),
            created_with: CREATED_WITH.to_string(),
            workspace_id,
            start: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            duration: -1,
        };
        let body = serde_json::to_string(&request)?;
        let url = self.url(&format!("/workspaces/{workspace_id}/time_entries"));
        let response = self.send(Method::POST, url, Some(body))?;
        decode(expect_status(
            response,
            &[StatusCode::OK, StatusCode::CREATED],
        )?)
    }

    /// Stops the running entry, if any. Nothing running is not an error.
    pub fn stop_timer(&self, workspace_id: u64) -> Result<Option<TimeEntry>, TogglError> {
        let Some(current) = self.get_current_timer(workspace_id)? else {
            log::debug!("no running entry, skipping stop");
            return Ok(None);
        };

        let url = self.url(&format!(
            "/workspaces/{workspace_id}/time_entries/{}/stop",
            current.id
        ));
        let response = self.send(Method::PATCH, url, None)?;
        decode(expect_status(response, &[StatusCode::OK])?).map(Some)
    }

    /// The service answers "nothing running" with 404, 204 or a literal
    /// `null` body depending on the account; all of them map to `None`.
    pub fn get_current_timer(&self, _workspace_id: u64) -> Result<Option<TimeEntry>, TogglError> {
        let response = self.send(Method::GET, self.url("/me/time_entries/current"), None)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text()?;
        if body.trim() == "null" {
            return Ok(None);
        }
        if status != StatusCode::OK {
            return Err(TogglError::Api { status, body });
        }

        let entry: TimeEntry = serde_json::from_str(&body)?;
        if entry.id == 0 {
            return Ok(None);
        }
        Ok(Some(entry))
    }

    /// `start_date` and `end_date` are inclusive `YYYY-MM-DD` dates.
    pub fn get_time_entries(
        &self,
        _workspace_id: u64,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<TimeEntry>, TogglError> {
        let url = reqwest::Url::parse_with_params(
            &self.url("/me/time_entries"),
            &[("start_date", start_date), ("end_date", end_date)],
        )
        .map_err(|err| TogglError::Url(err.to_string()))?;
        let response = self.send(Method::GET, url.to_string(), None)?;
        decode(expect_status(response, &[StatusCode::OK])?)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn send(&self, method: Method, url: String, body: Option<String>) -> Result<Response, TogglError> {
        log::debug!("{method} {url}");
        let credentials = STANDARD.encode(format!("{}:api_token", self.token));
        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Basic {credentials}"));
        if let Some(body) = body {
            request = request.body(body);
        }
        let response = request.send()?;
        log::trace!("response status {}", response.status());
        Ok(response)
    }
}

fn expect_status(response: Response, accepted: &[StatusCode]) -> Result<String, TogglError> {
    let status = response.status();
    let body = response.text()?;
    if !accepted.contains(&status) {
        return Err(TogglError::Api { status, body });
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(body: String) -> Result<T, TogglError> {
    Ok(serde_json::from_str(&body)?)
}
