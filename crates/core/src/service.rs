//! Loading/error bookkeeping around the HTTP gateway.
//!
//! The service mirrors the gateway one-to-one but never propagates failures:
//! each action records the error message and resolves to a neutral value
//! (empty list, `None`, or `false`). Callers detect failure by inspecting the
//! returned value and read the message through [`GameService::last_error`].

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::{
    api::{ApiResult, GameApi},
    models::{CreateGameInput, Game},
};

#[derive(Debug, Default)]
struct RequestState {
    loading: bool,
    error: Option<String>,
}

/// Cheaply clonable adapter shared between the shell and spawned request tasks.
///
/// No mutual exclusion is imposed between overlapping actions; each manages
/// the shared flags independently, so the last writer wins. The UI drives one
/// action at a time in practice.
#[derive(Debug, Clone)]
pub struct GameService {
    api: Arc<GameApi>,
    state: Arc<RwLock<RequestState>>,
}

impl GameService {
    /// Wrap a gateway.
    pub fn new(api: GameApi) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::new(RwLock::new(RequestState::default())),
        }
    }

    /// Whether a request is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Message from the most recent failed action, if any.
    pub fn last_error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Dismiss the recorded error.
    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    fn begin(&self) {
        let mut state = self.state.write();
        state.loading = true;
        state.error = None;
    }

    fn settle<T>(&self, result: ApiResult<T>, action: &str) -> Option<T> {
        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(action, %err, "gateway call failed");
                state.error = Some(err.to_string());
                None
            }
        }
    }

    /// Load the full collection; empty on failure.
    pub async fn fetch_games(&self) -> Vec<Game> {
        self.begin();
        let result = self.api.fetch_all().await;
        self.settle(result, "fetch").unwrap_or_default()
    }

    /// Load a single record; `None` on failure.
    pub async fn get_game(&self, id: u64) -> Option<Game> {
        self.begin();
        let result = self.api.get_by_id(id).await;
        self.settle(result, "get")
    }

    /// Server-side name search; empty on failure.
    pub async fn search_games(&self, name: &str) -> Vec<Game> {
        self.begin();
        let result = self.api.find_by_name(name).await;
        self.settle(result, "search").unwrap_or_default()
    }

    /// Create a record; `None` on failure.
    pub async fn create_game(&self, input: &CreateGameInput) -> Option<Game> {
        self.begin();
        let result = self.api.create(input).await;
        self.settle(result, "create")
    }

    /// Update a record; `None` on failure.
    pub async fn update_game(&self, game: &Game) -> Option<Game> {
        self.begin();
        let result = self.api.update(game).await;
        self.settle(result, "update")
    }

    /// Delete a record by id; `false` on failure.
    pub async fn delete_game(&self, id: u64) -> bool {
        self.begin();
        let result = self.api.delete(id).await;
        self.settle(result, "delete").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_service() -> GameService {
        // Nothing listens on this port, so every call fails fast with a
        // transport error.
        GameService::new(GameApi::new("http://127.0.0.1:9"))
    }

    #[tokio::test]
    async fn failed_fetch_returns_empty_and_records_error() {
        let service = unreachable_service();
        assert!(service.last_error().is_none());

        let games = service.fetch_games().await;
        assert!(games.is_empty());
        assert!(!service.is_loading());
        assert!(service.last_error().is_some());
    }

    #[tokio::test]
    async fn failed_mutations_resolve_to_neutral_values() {
        let service = unreachable_service();
        let input = CreateGameInput {
            name: "Celeste".to_string(),
            developer: "Matt Makes Games".to_string(),
            year: 2018,
            star_rating: Some(5.0),
            finished: true,
        };

        assert!(service.create_game(&input).await.is_none());
        assert!(service.update_game(&input.clone().into_game(1)).await.is_none());
        assert!(!service.delete_game(1).await);
        assert!(service.get_game(1).await.is_none());
        assert!(!service.is_loading());
    }

    #[tokio::test]
    async fn new_action_clears_the_previous_error() {
        let service = unreachable_service();
        service.fetch_games().await;
        assert!(service.last_error().is_some());

        service.clear_error();
        assert!(service.last_error().is_none());

        service.fetch_games().await;
        assert!(service.last_error().is_some());
    }
}
