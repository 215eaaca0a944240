//! HTTP client for the analysis server
//!
//! Thin wrapper over the four endpoints the workflow uses. Uploads are
//! multipart (`tab` file plus optional `tracks`/`title`/`artist`
//! fields); analysis responses are JSON decoded into the canonical
//! payload types. Failures map onto the shared error taxonomy:
//! transport problems become `Network`, non-2xx statuses become `Api`,
//! undecodable bodies become `MalformedResponse`.

use fretmark_common::api::{TabInfo, TrackAnalysis};
use fretmark_common::{Error, Result};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = concat!("fretmark/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the tab-analysis server
pub struct AnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// `POST /tabinfo` - metadata-only probe: upload the tab file and
    /// get back its instrument tracks without triggering analysis.
    pub async fn probe_tab(&self, tab: &Path) -> Result<TabInfo> {
        tracing::info!(tab = %tab.display(), "Probing tab file");
        let form = tab_form(tab).await?;
        let response = self
            .http_client
            .post(format!("{}/tabinfo", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        decode_json(response).await
    }

    /// `POST /upload` - full analysis of the selected tracks. The
    /// response body is ignored; the server's stored state is the
    /// source of truth afterwards.
    pub async fn analyze_tab(
        &self,
        tab: &Path,
        track_ids: &[String],
        title: Option<&str>,
        artist: Option<&str>,
    ) -> Result<()> {
        tracing::info!(
            tab = %tab.display(),
            tracks = track_ids.len(),
            "Uploading tab for analysis"
        );
        let tracks_json =
            serde_json::to_string(track_ids).map_err(|e| Error::Internal(e.to_string()))?;
        let mut form = tab_form(tab).await?.text("tracks", tracks_json);
        if let Some(title) = title {
            form = form.text("title", title.to_string());
        }
        if let Some(artist) = artist {
            form = form.text("artist", artist.to_string());
        }

        let response = self
            .http_client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        expect_success(response).await?;
        Ok(())
    }

    /// `GET /tracks/{id}` - per-track musical analysis
    pub async fn track_analysis(&self, track_id: u64) -> Result<TrackAnalysis> {
        tracing::debug!(track_id, "Fetching track analysis");
        let response = self
            .http_client
            .get(format!("{}/tracks/{}", self.base_url, track_id))
            .send()
            .await
            .map_err(network)?;
        decode_json(response).await
    }

    /// `DELETE /songs/{id}` - remove a stored song
    pub async fn delete_song(&self, song_id: u64) -> Result<()> {
        tracing::info!(song_id, "Deleting song");
        let response = self
            .http_client
            .delete(format!("{}/songs/{}", self.base_url, song_id))
            .send()
            .await
            .map_err(network)?;
        expect_success(response).await?;
        Ok(())
    }
}

/// Multipart form with the tab file under the `tab` field
async fn tab_form(tab: &Path) -> Result<multipart::Form> {
    let bytes = tokio::fs::read(tab).await?;
    let file_name = tab
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tab".to_string());
    let part = multipart::Part::bytes(bytes).file_name(file_name);
    Ok(multipart::Form::new().part("tab", part))
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Api(status.as_u16(), body));
    }
    Ok(response)
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = expect_success(response).await?;
    let body = response.text().await.map_err(network)?;
    serde_json::from_str(&body).map_err(|e| Error::MalformedResponse(e.to_string()))
}

fn network(e: reqwest::Error) -> Error {
    Error::Network(e.to_string())
}
