//! Domain models passed between the catalog store and the TUI. These stay
//! light-weight data holders; the filtering rules live in `catalog` and the
//! presentation lives in `ui`.

#[derive(Debug, Clone, PartialEq)]
/// One catalog entry. There is no identity field: list position is the only
/// handle, so two records with identical fields are both kept.
pub struct MovieRecord {
    /// Title shown on the card and matched by the title filter.
    pub title: String,
    /// Free-form synopsis.
    pub description: String,
    /// Poster reference kept as raw text. It is never fetched or validated.
    pub poster_url: String,
    /// Numeric rating. May be NaN when the entry form received text that is
    /// not a number; such records fail every rating comparison.
    pub rating: f64,
}

impl MovieRecord {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        poster_url: impl Into<String>,
        rating: f64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            poster_url: poster_url.into(),
            rating,
        }
    }

    /// Rating text as shown on a card, e.g. `8.8`, `9` or `NaN`.
    pub fn rating_label(&self) -> String {
        format_rating(self.rating)
    }
}

/// The pair of predicates applied to the catalog. Derived from the raw filter
/// strings every time the displayed view is recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub title_substring: String,
    pub min_rating: f64,
}

impl FilterCriteria {
    /// Build criteria from the raw strings typed into the filter panel.
    pub fn from_raw(title_filter: &str, rating_filter: &str) -> Self {
        Self {
            title_substring: title_filter.to_lowercase(),
            min_rating: parse_rating(rating_filter),
        }
    }

    /// Case-insensitive substring match on the title combined with an
    /// inclusive lower bound on the rating. A NaN bound or NaN rating never
    /// matches.
    pub fn matches(&self, movie: &MovieRecord) -> bool {
        movie.title.to_lowercase().contains(&self.title_substring)
            && movie.rating >= self.min_rating
    }
}

/// Coerce user text into a rating. Blank or unparseable input yields NaN
/// instead of an error.
pub fn parse_rating(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Render a rating without a trailing `.0` for whole numbers.
pub fn format_rating(rating: f64) -> String {
    if rating.is_nan() {
        "NaN".to_string()
    } else if rating.is_infinite() {
        if rating > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        // f64 Display already prints `9` for 9.0 and `8.8` for 8.8.
        format!("{rating}")
    }
}

/// The two example records every fresh catalog starts with.
pub fn seed_movies() -> Vec<MovieRecord> {
    vec![
        MovieRecord::new(
            "Inception",
            "A thief who steals corporate secrets through the use of dream-sharing \
             technology is given the inverse task of planting an idea into the mind of a C.E.O.",
            "https://example.com/inception-poster.jpg",
            8.8,
        ),
        MovieRecord::new(
            "The Shawshank Redemption",
            "Two imprisoned men bond over a number of years, finding solace and eventual \
             redemption through acts of common decency.",
            "https://example.com/shawshank-redemption-poster.jpg",
            9.3,
        ),
    ]
}
