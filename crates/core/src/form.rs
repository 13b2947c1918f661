//! Draft state for the create/edit game form.

use chrono::{Datelike, Local};

use crate::models::{CreateGameInput, Game};

const DEFAULT_RATING: f64 = 5.0;
const MAX_RATING: f64 = 5.0;

/// Payload produced by a successful form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    /// A new record to send through the gateway's create call.
    Create(CreateGameInput),
    /// An existing record, id reattached, for the update call.
    Update(Game),
}

/// Mutable draft backing the form.
///
/// Fresh drafts default the year to the current calendar year, the rating to
/// 5, and finished to false. Editing drafts seed every field from the record;
/// a missing rating seeds as 5 here, unlike the catalog's unrated-as-zero
/// rule.
#[derive(Debug, Clone, PartialEq)]
pub struct GameDraft {
    /// Display name field.
    pub name: String,
    /// Developer field.
    pub developer: String,
    /// Release year field.
    pub year: i32,
    /// Rating field, kept within `[0, 5]` by the adjustment helpers.
    pub star_rating: f64,
    /// Completion flag field.
    pub finished: bool,
    editing: Option<u64>,
}

impl Default for GameDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            developer: String::new(),
            year: Local::now().year(),
            star_rating: DEFAULT_RATING,
            finished: false,
            editing: None,
        }
    }
}

impl GameDraft {
    /// Fresh draft with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft seeded from an existing record for editing.
    pub fn edit(game: &Game) -> Self {
        Self {
            name: game.name.clone(),
            developer: game.developer.clone(),
            year: game.year,
            star_rating: game.star_rating.unwrap_or(DEFAULT_RATING),
            finished: game.finished,
            editing: Some(game.id),
        }
    }

    /// Id of the record being edited, if any.
    pub fn editing_id(&self) -> Option<u64> {
        self.editing
    }

    /// Whether this draft edits an existing record.
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Nudge the rating, clamped to `[0, 5]`.
    pub fn adjust_rating(&mut self, delta: f64) {
        self.star_rating = (self.star_rating + delta).clamp(0.0, MAX_RATING);
    }

    /// Nudge the year.
    pub fn adjust_year(&mut self, delta: i32) {
        self.year = self.year.saturating_add(delta);
    }

    /// Flip the completion flag.
    pub fn toggle_finished(&mut self) {
        self.finished = !self.finished;
    }

    /// Whether the draft would currently be accepted by [`Self::submit`].
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.developer.trim().is_empty()
    }

    /// Validate and build the submission payload.
    ///
    /// Returns `None` without side effects when name or developer is blank
    /// after trimming. On a successful create submission the draft resets to
    /// its defaults; on update the caller is responsible for leaving edit
    /// mode.
    pub fn submit(&mut self) -> Option<FormSubmission> {
        if !self.is_valid() {
            return None;
        }

        let input = CreateGameInput {
            name: self.name.trim().to_string(),
            developer: self.developer.trim().to_string(),
            year: self.year,
            star_rating: Some(self.star_rating),
            finished: self.finished,
        };

        match self.editing {
            Some(id) => Some(FormSubmission::Update(input.into_game(id))),
            None => {
                *self = Self::default();
                Some(FormSubmission::Create(input))
            }
        }
    }
}
