//! HTTP client for the diary and schedule REST surface.
//!
//! Every call is a single round trip: no retries, no backoff, nothing is
//! cancelled. Transport failures, non-2xx statuses and undecodable bodies all
//! surface as one [`ClientError`].

use std::fmt;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::models::{DiaryEntry, DiaryEntryUpdate, NewDiaryEntry, ScheduleEntry, ScheduleEntryInput};

#[derive(Debug)]
pub enum ClientError {
    /// Request never produced a response.
    Transport(reqwest::Error),
    /// Server answered with a non-success status. The body is not inspected.
    Status(StatusCode),
    /// Response body was not the expected JSON.
    Body(reqwest::Error),
    /// Rejected locally before any request was made.
    MissingFields(&'static str),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "operation failed: {e}"),
            ClientError::Status(status) => write!(f, "operation failed: server returned {status}"),
            ClientError::Body(e) => write!(f, "operation failed: malformed response: {e}"),
            ClientError::MissingFields(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(e) | ClientError::Body(e) => Some(e),
            ClientError::Status(_) | ClientError::MissingFields(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` points at the API root, e.g. `http://127.0.0.1:3000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /entries
    pub async fn list_entries(&self) -> Result<Vec<DiaryEntry>, ClientError> {
        let resp = self.http.get(self.url("/entries")).send().await;
        read_json(resp).await
    }

    /// POST /entries
    pub async fn create_entry(&self, entry: &NewDiaryEntry) -> Result<DiaryEntry, ClientError> {
        let resp = self.http.post(self.url("/entries")).json(entry).send().await;
        read_json(resp).await
    }

    /// PUT /entries/{id}
    pub async fn update_entry(
        &self,
        id: &str,
        update: &DiaryEntryUpdate,
    ) -> Result<DiaryEntry, ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/entries/{id}")))
            .json(update)
            .send()
            .await;
        read_json(resp).await
    }

    /// DELETE /entries/{id}
    pub async fn delete_entry(&self, id: &str) -> Result<(), ClientError> {
        let resp = self.http.delete(self.url(&format!("/entries/{id}"))).send().await;
        expect_success(resp).map(|_| ())
    }

    /// GET /schedule
    pub async fn list_schedule(&self) -> Result<Vec<ScheduleEntry>, ClientError> {
        let resp = self.http.get(self.url("/schedule")).send().await;
        read_json(resp).await
    }

    /// POST /schedule
    pub async fn create_schedule(
        &self,
        entry: &ScheduleEntryInput,
    ) -> Result<ScheduleEntry, ClientError> {
        let resp = self.http.post(self.url("/schedule")).json(entry).send().await;
        read_json(resp).await
    }

    /// PUT /schedule/{id}
    pub async fn update_schedule(
        &self,
        id: &str,
        entry: &ScheduleEntryInput,
    ) -> Result<ScheduleEntry, ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/schedule/{id}")))
            .json(entry)
            .send()
            .await;
        read_json(resp).await
    }

    /// DELETE /schedule/{id}
    pub async fn delete_schedule(&self, id: &str) -> Result<(), ClientError> {
        let resp = self.http.delete(self.url(&format!("/schedule/{id}"))).send().await;
        expect_success(resp).map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn expect_success(
    resp: Result<reqwest::Response, reqwest::Error>,
) -> Result<reqwest::Response, ClientError> {
    let resp = resp.map_err(ClientError::Transport)?;
    if !resp.status().is_success() {
        return Err(ClientError::Status(resp.status()));
    }
    Ok(resp)
}

async fn read_json<T: DeserializeOwned>(
    resp: Result<reqwest::Response, reqwest::Error>,
) -> Result<T, ClientError> {
    expect_success(resp)?.json().await.map_err(ClientError::Body)
}
