//! In-memory catalog store. It owns the full movie list plus the displayed
//! subset, and rebuilds that subset from scratch after every mutation so the
//! two lists can never drift apart.

use clap::ValueEnum;
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::{FilterCriteria, MovieRecord};

/// How a blank rating filter is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BlankRatingFilter {
    /// A blank rating filter parses to NaN and hides every record.
    #[default]
    MatchNone,
    /// A blank rating filter means "no lower bound".
    MatchAll,
}

/// Return the ordered subsequence of `movies` that passes both filters.
///
/// The title filter is a case-insensitive substring test (an empty filter
/// matches every title). The rating filter is parsed as a number and applied
/// as an inclusive lower bound; blank or unparseable text becomes NaN, which
/// no rating satisfies.
pub fn recompute(title_filter: &str, rating_filter: &str, movies: &[MovieRecord]) -> Vec<MovieRecord> {
    apply_criteria(&FilterCriteria::from_raw(title_filter, rating_filter), movies)
}

/// Same projection as [`recompute`] for criteria that are already parsed.
pub fn apply_criteria(criteria: &FilterCriteria, movies: &[MovieRecord]) -> Vec<MovieRecord> {
    movies
        .iter()
        .filter(|movie| criteria.matches(movie))
        .cloned()
        .collect()
}

/// Single owner of the catalog state.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<MovieRecord>,
    displayed: Vec<MovieRecord>,
    title_filter: String,
    rating_filter: String,
    blank_rating: BlankRatingFilter,
    initialized: bool,
}

impl Catalog {
    pub fn new(blank_rating: BlankRatingFilter) -> Self {
        Self {
            blank_rating,
            ..Self::default()
        }
    }

    /// Seed the catalog and show the seed unfiltered. Only the first call has
    /// any effect; it returns `false` afterwards.
    pub fn initialize(&mut self, seed: Vec<MovieRecord>) -> bool {
        if self.initialized {
            debug!("catalog already initialized; ignoring seed");
            return false;
        }
        self.initialized = true;
        info!(count = seed.len(), "seeding catalog");
        self.displayed = seed.clone();
        self.movies = seed;
        true
    }

    /// Append a record and re-apply the current filters.
    pub fn add_movie(&mut self, movie: MovieRecord) {
        info!(title = %movie.title, rating = movie.rating, "adding movie");
        self.movies.push(movie);
        self.refresh();
    }

    pub fn set_title_filter(&mut self, value: impl Into<String>) {
        self.title_filter = value.into();
        debug!(title_filter = %self.title_filter, "title filter changed");
        self.refresh();
    }

    pub fn set_rating_filter(&mut self, value: impl Into<String>) {
        self.rating_filter = value.into();
        debug!(rating_filter = %self.rating_filter, "rating filter changed");
        self.refresh();
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn displayed(&self) -> &[MovieRecord] {
        &self.displayed
    }

    pub fn title_filter(&self) -> &str {
        &self.title_filter
    }

    pub fn rating_filter(&self) -> &str {
        &self.rating_filter
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Criteria currently in force, with the blank-rating policy applied.
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::from_raw(&self.title_filter, &self.rating_filter);
        if self.blank_rating == BlankRatingFilter::MatchAll && self.rating_filter.trim().is_empty() {
            criteria.min_rating = f64::NEG_INFINITY;
        }
        criteria
    }

    fn refresh(&mut self) {
        self.displayed = apply_criteria(&self.criteria(), &self.movies);
        debug!(
            shown = self.displayed.len(),
            total = self.movies.len(),
            "displayed view recomputed"
        );
    }
}
