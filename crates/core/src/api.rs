//! HTTP gateway for the game-collection REST backend.
//!
//! One method per backend operation, each a single request/response cycle.
//! List responses arrive in several shapes depending on the backend version
//! (bare array, `{games: [...]}`, or a HAL envelope); [`extract_games`]
//! normalizes them all into a plain `Vec<Game>`.

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{CreateGameInput, Game};

/// Failure raised by gateway calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("server returned HTTP {0}")]
    Status(StatusCode),
    /// The request never completed (connection, DNS, body decode).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result alias for gateway operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Thin typed client over the backend's game endpoints.
#[derive(Debug, Clone)]
pub struct GameApi {
    client: Client,
    base_url: String,
}

impl GameApi {
    /// Build a gateway against the given base URL (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `/game/v2` — the full collection.
    pub async fn fetch_all(&self) -> ApiResult<Vec<Game>> {
        let url = self.url("/game/v2");
        debug!(%url, "fetching all games");
        let value: Value = check_status(self.client.get(&url).send().await?)?
            .json()
            .await?;
        Ok(extract_games(value))
    }

    /// GET `/game/v2/{id}` — a single record.
    pub async fn get_by_id(&self, id: u64) -> ApiResult<Game> {
        let url = self.url(&format!("/game/v2/{id}"));
        let game = check_status(self.client.get(&url).send().await?)?
            .json()
            .await?;
        Ok(game)
    }

    /// GET `/game/v2/findGameByName/{name}` — server-side name search.
    pub async fn find_by_name(&self, name: &str) -> ApiResult<Vec<Game>> {
        let url = self.url(&format!(
            "/game/v2/findGameByName/{}",
            urlencoding::encode(name)
        ));
        let value: Value = check_status(self.client.get(&url).send().await?)?
            .json()
            .await?;
        Ok(extract_games(value))
    }

    /// POST `/game/v2` — create a record; the backend assigns the id.
    pub async fn create(&self, input: &CreateGameInput) -> ApiResult<Game> {
        let url = self.url("/game/v2");
        debug!(%url, name = %input.name, "creating game");
        let game = check_status(self.client.post(&url).json(input).send().await?)?
            .json()
            .await?;
        Ok(game)
    }

    /// PUT `/game/v2` — update a record; the id travels in the body, not the URL.
    pub async fn update(&self, game: &Game) -> ApiResult<Game> {
        let url = self.url("/game/v2");
        debug!(%url, id = game.id, "updating game");
        let updated = check_status(self.client.put(&url).json(game).send().await?)?
            .json()
            .await?;
        Ok(updated)
    }

    /// DELETE `/game/v1/{id}` — no payload on success.
    ///
    /// The backend only exposes delete under the v1 path; every other
    /// operation lives under v2.
    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        let url = self.url(&format!("/game/v1/{id}"));
        debug!(%url, id, "deleting game");
        check_status(self.client.delete(&url).send().await?)?;
        Ok(())
    }
}

fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status))
    }
}

/// Normalize a list response into records, probing candidate shapes in
/// priority order: bare array, `{games: [...]}`, HAL `_embedded.gameDTOV2List`,
/// HAL `_embedded.games`. Unrecognized shapes yield an empty list rather than
/// an error; malformed elements are skipped.
pub fn extract_games(value: Value) -> Vec<Game> {
    let items = if value.is_array() {
        value
    } else if let Some(games) = value.get("games").filter(|v| v.is_array()) {
        games.clone()
    } else if let Some(list) = value
        .get("_embedded")
        .and_then(|embedded| {
            embedded
                .get("gameDTOV2List")
                .or_else(|| embedded.get("games"))
        })
        .filter(|v| v.is_array())
    {
        list.clone()
    } else {
        warn!("unrecognized list response shape; treating as empty");
        return Vec::new();
    };

    let Value::Array(items) = items else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Game>(item) {
            Ok(game) => Some(game),
            Err(err) => {
                warn!(%err, "skipping malformed game record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_records() -> Value {
        json!([
            {"id": 1, "name": "Celeste", "developer": "Matt Makes Games", "year": 2018, "star_rating": 5.0, "finished": true},
            {"id": 2, "name": "Tunic", "developer": "Isometricorp", "year": 2022, "star_rating": null, "finished": false}
        ])
    }

    #[test]
    fn all_supported_shapes_normalize_identically() {
        let bare = extract_games(sample_records());
        let wrapped = extract_games(json!({ "games": sample_records() }));
        let hal_v2 = extract_games(json!({
            "_embedded": { "gameDTOV2List": sample_records() },
            "_links": { "self": { "href": "/game/v2" } }
        }));
        let hal_games = extract_games(json!({
            "_embedded": { "games": sample_records() }
        }));

        assert_eq!(bare.len(), 2);
        assert_eq!(bare, wrapped);
        assert_eq!(bare, hal_v2);
        assert_eq!(bare, hal_games);
        assert_eq!(bare[0].name, "Celeste");
        assert_eq!(bare[1].star_rating, None);
    }

    #[test]
    fn unrecognized_shapes_produce_an_empty_list() {
        assert!(extract_games(json!({"page": {"size": 20}})).is_empty());
        assert!(extract_games(json!("not a collection")).is_empty());
        assert!(extract_games(json!(null)).is_empty());
        assert!(extract_games(json!({"games": "not an array"})).is_empty());
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let games = extract_games(json!([
            {"id": 1, "name": "Hades", "developer": "Supergiant", "year": 2020},
            {"name": "missing id"},
            42
        ]));
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Hades");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = GameApi::new("http://localhost:8080/api/");
        assert_eq!(api.url("/game/v2"), "http://localhost:8080/api/game/v2");
    }
}
