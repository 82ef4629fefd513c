// src/services/faceit_client.rs
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::config::settings::FaceitSettings;
use crate::models::faceit::{
    DemocracyHistory, HistoryEntry, ItemsPage, MatchStats, PlayerProfile, RawMatch,
    TeamProfile, TeamSearchItem, TeamStats,
};

#[derive(Debug, thiserror::Error)]
pub enum FaceitError {
    #[error("FACEIT request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("FACEIT returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Client for the FACEIT Open API plus the (unauthenticated) democracy API
/// that serves veto histories.
#[derive(Debug, Clone)]
pub struct FaceitClient {
    client: Client,
    api_base: String,
    democracy_base: String,
    api_key: String,
    game: String,
    page_size: usize,
    history_limit: usize,
}

impl FaceitClient {
    pub fn new(settings: &FaceitSettings) -> Self {
        Self {
            client: Client::new(),
            api_base: settings.api_base_url.trim_end_matches('/').to_string(),
            democracy_base: settings.democracy_base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.expose_secret().to_string(),
            game: settings.game.clone(),
            page_size: settings.page_size,
            history_limit: settings.history_limit,
        }
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FaceitError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FaceitError::Status { status, body });
        }

        Ok(response.json::<T>().await?)
    }

    /// Every match of a championship, fetched page by page until the first
    /// partial or empty page. The API sometimes answers a request past the
    /// last valid offset with 400 instead of an empty page; that is an end
    /// condition, not a failure, unless it happens on the very first page.
    pub async fn championship_matches(
        &self,
        championship_id: &str,
    ) -> Result<Vec<RawMatch>, FaceitError> {
        let url = format!("{}/championships/{}/matches", self.api_base, championship_id);
        let mut all = Vec::new();
        let mut offset = 0usize;

        loop {
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.api_key)
                .query(&[
                    ("type", "all".to_string()),
                    ("offset", offset.to_string()),
                    ("limit", self.page_size.to_string()),
                ])
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::BAD_REQUEST && offset > 0 {
                tracing::warn!(
                    "Championship {} returned 400 at offset {}, treating as end of pages",
                    championship_id,
                    offset
                );
                break;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::error!(
                    "Championship {} matches page failed at offset {}: {} {}",
                    championship_id,
                    offset,
                    status,
                    body
                );
                return Err(FaceitError::Status { status, body });
            }

            let items = response.json::<ItemsPage<RawMatch>>().await?.into_items();
            let count = items.len();
            if count == 0 {
                break;
            }
            all.extend(items);
            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        tracing::info!(
            "Fetched {} matches for championship {}",
            all.len(),
            championship_id
        );
        Ok(all)
    }

    pub async fn team(&self, team_id: &str) -> Result<TeamProfile, FaceitError> {
        let url = format!("{}/teams/{}", self.api_base, team_id);
        self.get_json(&url, &[]).await
    }

    pub async fn player(&self, player_id: &str) -> Result<PlayerProfile, FaceitError> {
        let url = format!("{}/players/{}", self.api_base, player_id);
        self.get_json(&url, &[]).await
    }

    pub async fn player_history(&self, player_id: &str) -> Result<Vec<HistoryEntry>, FaceitError> {
        let url = format!("{}/players/{}/history", self.api_base, player_id);
        let page: ItemsPage<HistoryEntry> = self
            .get_json(
                &url,
                &[
                    ("game", self.game.clone()),
                    ("limit", self.history_limit.to_string()),
                    ("offset", "0".to_string()),
                ],
            )
            .await?;
        Ok(page.into_items())
    }

    pub async fn match_by_id(&self, match_id: &str) -> Result<RawMatch, FaceitError> {
        let url = format!("{}/matches/{}", self.api_base, match_id);
        self.get_json(&url, &[]).await
    }

    /// Round-level statistics; `None` when stats were never recorded.
    pub async fn match_stats(&self, match_id: &str) -> Result<Option<MatchStats>, FaceitError> {
        let url = format!("{}/matches/{}/stats", self.api_base, match_id);
        match self.get_json::<MatchStats>(&url, &[]).await {
            Ok(stats) => Ok(Some(stats)),
            Err(FaceitError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Best-effort veto history lookup. Not-found, error responses and
    /// unparseable bodies all come back as `None`; this source is an
    /// enrichment, never a reason to fail a query.
    pub async fn match_veto_history(&self, match_id: &str) -> Option<DemocracyHistory> {
        let url = format!("{}/match/{}/history", self.democracy_base, match_id);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Veto history fetch error for {}: {}", match_id, e);
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return None;
        }
        if !status.is_success() {
            tracing::warn!("Veto history fetch for {} failed: {}", match_id, status);
            return None;
        }

        match response.json::<DemocracyHistory>().await {
            Ok(history) => Some(history),
            Err(e) => {
                tracing::warn!("Veto history for {} did not parse: {}", match_id, e);
                None
            }
        }
    }

    pub async fn search_teams(&self, nickname: &str) -> Result<Vec<TeamSearchItem>, FaceitError> {
        if nickname.trim().is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/search/teams", self.api_base);
        let page: ItemsPage<TeamSearchItem> = self
            .get_json(
                &url,
                &[
                    ("nickname", nickname.to_string()),
                    ("game", self.game.clone()),
                    ("limit", "10".to_string()),
                ],
            )
            .await?;
        Ok(page.into_items())
    }

    /// Lifetime team statistics; `None` when the team has none recorded.
    pub async fn team_stats(&self, team_id: &str) -> Result<Option<TeamStats>, FaceitError> {
        let url = format!("{}/teams/{}/stats/{}", self.api_base, team_id, self.game);
        match self.get_json::<TeamStats>(&url, &[]).await {
            Ok(stats) => Ok(Some(stats)),
            Err(FaceitError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }
}
