//! Derived catalog view: name search, status filter, sorting, pagination,
//! and collection-wide statistics.
//!
//! [`build_page`] is a pure projection of the authoritative record list plus
//! the transient [`CatalogState`]; it owns no record data of its own and is
//! recomputed in full on every state change.

use std::cmp::Ordering;

use crate::models::Game;

/// Number of records rendered per catalog page.
pub const PAGE_SIZE: usize = 12;

/// Completion-status filter applied after the name search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Keep every record.
    #[default]
    All,
    /// Keep only finished games.
    Finished,
    /// Keep everything that is not finished.
    Unfinished,
}

impl StatusFilter {
    /// Next filter in cycling order, for single-key UI toggles.
    pub fn cycled(self) -> Self {
        match self {
            Self::All => Self::Finished,
            Self::Finished => Self::Unfinished,
            Self::Unfinished => Self::All,
        }
    }

    /// Short user-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Finished => "finished",
            Self::Unfinished => "unfinished",
        }
    }

    fn keeps(self, game: &Game) -> bool {
        match self {
            Self::All => true,
            Self::Finished => game.finished,
            Self::Unfinished => !game.finished,
        }
    }
}

/// Sort key for the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Lexicographic by name, case-insensitive, ascending.
    #[default]
    Name,
    /// Descending by rating, unrated treated as zero.
    Rating,
    /// Descending by release year.
    Year,
}

impl SortKey {
    /// Next key in cycling order, for single-key UI toggles.
    pub fn cycled(self) -> Self {
        match self {
            Self::Name => Self::Rating,
            Self::Rating => Self::Year,
            Self::Year => Self::Name,
        }
    }

    /// Short user-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Rating => "rating",
            Self::Year => "year",
        }
    }
}

/// Transient UI state driving the catalog projection.
///
/// Mutating the search term, filter, or sort key resets the page to 1, so a
/// narrowed result set is never viewed through a stale page number.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    search: String,
    filter: StatusFilter,
    sort: SortKey,
    page: usize,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: StatusFilter::All,
            sort: SortKey::Name,
            page: 1,
        }
    }
}

impl CatalogState {
    /// Current search term.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Current status filter.
    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Current sort key.
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Requested page number (1-based, clamped during projection).
    pub fn page(&self) -> usize {
        self.page
    }

    /// Replace the search term and reset to the first page.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Append a character to the search term and reset to the first page.
    pub fn push_search_char(&mut self, ch: char) {
        self.search.push(ch);
        self.page = 1;
    }

    /// Remove the last search character and reset to the first page.
    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.page = 1;
    }

    /// Replace the status filter and reset to the first page.
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Advance the status filter to its next value.
    pub fn cycle_filter(&mut self) {
        self.set_filter(self.filter.cycled());
    }

    /// Replace the sort key and reset to the first page.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    /// Advance the sort key to its next value.
    pub fn cycle_sort(&mut self) {
        self.set_sort(self.sort.cycled());
    }

    /// Request a specific page. Out-of-range values are tolerated and clamp
    /// during projection.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Move one page forward; the projection clamps to the last page.
    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Move one page back, stopping at page 1.
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

/// One render-ready slice of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    /// Records visible on the current page, in display order.
    pub items: Vec<Game>,
    /// Effective page number after clamping.
    pub page: usize,
    /// Total page count, at least 1 even for an empty result.
    pub total_pages: usize,
    /// Number of records matching the search and filter before pagination.
    pub total_matches: usize,
}

/// Project the record list through the catalog state.
///
/// Fixed order: name filter, status filter, stable sort, paginate.
pub fn build_page(games: &[Game], state: &CatalogState) -> CatalogPage {
    let needle = state.search.to_lowercase();
    let mut matches: Vec<&Game> = games
        .iter()
        .filter(|game| needle.is_empty() || game.name.to_lowercase().contains(&needle))
        .filter(|game| state.filter.keeps(game))
        .collect();

    match state.sort {
        SortKey::Name => {
            matches.sort_by(|a, b| compare_names(&a.name, &b.name));
        }
        SortKey::Rating => {
            matches.sort_by(|a, b| {
                b.rating_or_zero()
                    .partial_cmp(&a.rating_or_zero())
                    .unwrap_or(Ordering::Equal)
            });
        }
        SortKey::Year => {
            matches.sort_by(|a, b| b.year.cmp(&a.year));
        }
    }

    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(PAGE_SIZE).max(1);
    let page = state.page.clamp(1, total_pages);
    let start = (page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(total_matches);
    let items = matches[start..end].iter().map(|game| (*game).clone()).collect();

    CatalogPage {
        items,
        page,
        total_pages,
        total_matches,
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Aggregate statistics over the unfiltered collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionStats {
    /// Total number of records.
    pub total: usize,
    /// Records marked finished.
    pub finished: usize,
    /// Records not marked finished.
    pub unfinished: usize,
    /// Mean rating with unrated counted as zero; 0.0 for an empty collection.
    pub average_rating: f64,
}

/// Compute statistics over the full record list, ignoring any active filter.
pub fn collection_stats(games: &[Game]) -> CollectionStats {
    let total = games.len();
    let finished = games.iter().filter(|game| game.finished).count();
    let average_rating = if total == 0 {
        0.0
    } else {
        games.iter().map(Game::rating_or_zero).sum::<f64>() / total as f64
    };
    CollectionStats {
        total,
        finished,
        unfinished: total - finished,
        average_rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: u64, name: &str, year: i32, rating: Option<f64>, finished: bool) -> Game {
        Game {
            id,
            name: name.to_string(),
            developer: "Studio".to_string(),
            year,
            star_rating: rating,
            finished,
        }
    }

    fn collection() -> Vec<Game> {
        vec![
            game(1, "Celeste", 2018, Some(5.0), true),
            game(2, "Hollow Knight", 2017, Some(4.5), false),
            game(3, "hades", 2020, Some(5.0), true),
            game(4, "Tunic", 2022, None, false),
            game(5, "Outer Wilds", 2019, Some(4.0), true),
        ]
    }

    #[test]
    fn empty_search_matches_everything() {
        let games = collection();
        let page = build_page(&games, &CatalogState::default());
        assert_eq!(page.total_matches, games.len());
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let games = collection();
        let mut state = CatalogState::default();
        state.set_search("HaD");
        let page = build_page(&games, &state);
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.items[0].name, "hades");
    }

    #[test]
    fn status_filter_splits_finished_and_unfinished() {
        let games = collection();
        let mut state = CatalogState::default();

        state.set_filter(StatusFilter::Finished);
        assert_eq!(build_page(&games, &state).total_matches, 3);

        state.set_filter(StatusFilter::Unfinished);
        let page = build_page(&games, &state);
        assert_eq!(page.total_matches, 2);
        assert!(page.items.iter().all(|game| !game.finished));
    }

    #[test]
    fn name_sort_is_case_insensitive_ascending() {
        let games = collection();
        let page = build_page(&games, &CatalogState::default());
        let names: Vec<&str> = page.items.iter().map(|game| game.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Celeste", "hades", "Hollow Knight", "Outer Wilds", "Tunic"]
        );
    }

    #[test]
    fn rating_sort_is_descending_with_unrated_as_zero() {
        let games = collection();
        let mut state = CatalogState::default();
        state.set_sort(SortKey::Rating);
        let page = build_page(&games, &state);
        let ratings: Vec<f64> = page.items.iter().map(Game::rating_or_zero).collect();
        assert_eq!(ratings, vec![5.0, 5.0, 4.5, 4.0, 0.0]);
        assert_eq!(page.items.last().map(|game| game.name.as_str()), Some("Tunic"));
    }

    #[test]
    fn year_sort_is_descending() {
        let games = collection();
        let mut state = CatalogState::default();
        state.set_sort(SortKey::Year);
        let years: Vec<i32> = build_page(&games, &state)
            .items
            .iter()
            .map(|game| game.year)
            .collect();
        assert_eq!(years, vec![2022, 2020, 2019, 2018, 2017]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let games = collection();
        for sort in [SortKey::Name, SortKey::Rating, SortKey::Year] {
            let mut state = CatalogState::default();
            state.set_sort(sort);
            let first = build_page(&games, &state);
            let resorted = build_page(&first.items, &state);
            assert_eq!(first.items, resorted.items, "sort {sort:?} not idempotent");
        }
    }

    #[test]
    fn pagination_clamps_and_covers_every_record_once() {
        let games: Vec<Game> = (0..30)
            .map(|i| game(i, &format!("Game {i:02}"), 2000 + i as i32, None, false))
            .collect();
        let mut state = CatalogState::default();

        state.set_page(0);
        let page = build_page(&games, &state);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), PAGE_SIZE);

        state.set_page(999);
        let last = build_page(&games, &state);
        assert_eq!(last.page, 3);
        assert_eq!(last.items.len(), 6);

        let mut seen = Vec::new();
        for number in 1..=page.total_pages {
            state.set_page(number);
            seen.extend(build_page(&games, &state).items);
        }
        assert_eq!(seen.len(), games.len());
        let mut ids: Vec<u64> = seen.iter().map(|game| game.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), games.len());
    }

    #[test]
    fn empty_collection_still_reports_one_page() {
        let page = build_page(&[], &CatalogState::default());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_matches, 0);
    }

    #[test]
    fn state_mutations_reset_the_page() {
        let mut state = CatalogState::default();
        state.set_page(4);
        state.push_search_char('c');
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.cycle_filter();
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.cycle_sort();
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.pop_search_char();
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn deleting_the_only_record_on_the_last_page_clamps_down() {
        let mut games: Vec<Game> = (0..13)
            .map(|i| game(i, &format!("Game {i:02}"), 2000, None, false))
            .collect();
        let mut state = CatalogState::default();
        state.set_page(2);
        assert_eq!(build_page(&games, &state).total_pages, 2);

        games.pop();
        let page = build_page(&games, &state);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), PAGE_SIZE);
    }

    #[test]
    fn stats_count_unrated_as_zero() {
        let games = vec![
            game(1, "A", 2000, None, false),
            game(2, "B", 2001, Some(4.0), true),
        ];
        let stats = collection_stats(&games);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.finished, 1);
        assert_eq!(stats.unfinished, 1);
        assert_eq!(stats.average_rating, 2.0);
    }

    #[test]
    fn stats_over_empty_collection_are_zero() {
        let stats = collection_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_rating, 0.0);
    }

    #[test]
    fn finished_count_tracks_a_single_update() {
        let mut games = collection();
        let before = collection_stats(&games).finished;
        if let Some(entry) = games.iter_mut().find(|game| game.id == 2) {
            entry.finished = true;
        }
        assert_eq!(collection_stats(&games).finished, before + 1);
    }
}
