//! Shared domain models.

use serde::{Deserialize, Serialize};

/// A catalogued game as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Server-assigned identifier, unique within the collection.
    pub id: u64,
    /// Display name of the game.
    pub name: String,
    /// Studio or developer credit.
    pub developer: String,
    /// Release year.
    pub year: i32,
    /// Rating in `[0, 5]`; `None` means the game is unrated.
    #[serde(default)]
    pub star_rating: Option<f64>,
    /// Completion flag.
    #[serde(default)]
    pub finished: bool,
}

impl Game {
    /// Rating with "unrated" collapsed to zero, for aggregates and sorting.
    pub fn rating_or_zero(&self) -> f64 {
        self.star_rating.unwrap_or(0.0)
    }
}

/// Client-supplied fields when creating a game; the backend assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGameInput {
    /// Display name of the game.
    pub name: String,
    /// Studio or developer credit.
    pub developer: String,
    /// Release year.
    pub year: i32,
    /// Rating in `[0, 5]`, or `None` for unrated.
    pub star_rating: Option<f64>,
    /// Completion flag.
    pub finished: bool,
}

impl CreateGameInput {
    /// Reattach an identifier, producing a full record for update calls.
    pub fn into_game(self, id: u64) -> Game {
        Game {
            id,
            name: self.name,
            developer: self.developer,
            year: self.year,
            star_rating: self.star_rating,
            finished: self.finished,
        }
    }
}

impl From<&Game> for CreateGameInput {
    fn from(game: &Game) -> Self {
        Self {
            name: game.name.clone(),
            developer: game.developer.clone(),
            year: game.year,
            star_rating: game.star_rating,
            finished: game.finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_decode_with_defaults() {
        let game: Game = serde_json::from_str(
            r#"{"id": 3, "name": "Outer Wilds", "developer": "Mobius", "year": 2019}"#,
        )
        .expect("decode");
        assert_eq!(game.star_rating, None);
        assert!(!game.finished);
        assert_eq!(game.rating_or_zero(), 0.0);
    }

    #[test]
    fn create_input_round_trips_through_into_game() {
        let input = CreateGameInput {
            name: "Hades".to_string(),
            developer: "Supergiant".to_string(),
            year: 2020,
            star_rating: Some(5.0),
            finished: true,
        };
        let game = input.clone().into_game(9);
        assert_eq!(game.id, 9);
        assert_eq!(CreateGameInput::from(&game), input);
    }

    #[test]
    fn create_input_serializes_without_id() {
        let input = CreateGameInput {
            name: "Celeste".to_string(),
            developer: "Matt Makes Games".to_string(),
            year: 2018,
            star_rating: Some(5.0),
            finished: true,
        };
        let value = serde_json::to_value(&input).expect("serialize");
        assert!(value.get("id").is_none());
        assert_eq!(value["name"], "Celeste");
    }
}
