use movie_catalog::{
    recompute, seed_movies, BlankRatingFilter, Catalog, MovieRecord,
};

fn seeded() -> Catalog {
    let mut catalog = Catalog::new(BlankRatingFilter::MatchNone);
    catalog.initialize(seed_movies());
    catalog
}

fn titles(movies: &[MovieRecord]) -> Vec<String> {
    movies.iter().map(|movie| movie.title.clone()).collect()
}

fn sample_catalog() -> Vec<MovieRecord> {
    let mut movies = seed_movies();
    movies.push(MovieRecord::new("Dune", "", "", 7.5));
    movies.push(MovieRecord::new("The Thing", "", "", 8.2));
    movies.push(MovieRecord::new("Blank", "", "", f64::NAN));
    movies.push(MovieRecord::new("Inception", "again", "", 8.8));
    movies
}

/// `sub` appears in `full` in the same relative order.
fn is_subsequence(sub: &[MovieRecord], full: &[MovieRecord]) -> bool {
    let mut rest = full.iter();
    sub.iter().all(|wanted| rest.any(|movie| movie == wanted))
}

#[test]
fn filtered_view_is_an_ordered_subsequence() {
    let movies = sample_catalog();
    for title in ["", "the", "IN", "zzz", "e"] {
        for rating in ["", "0", "7.5", "8.8", "9.3", "x", "-1"] {
            let view = recompute(title, rating, &movies);
            assert!(
                is_subsequence(&view, &movies),
                "title={title:?} rating={rating:?}"
            );
        }
    }
}

#[test]
fn recompute_twice_gives_same_answer() {
    let movies = sample_catalog();
    assert_eq!(recompute("the", "8", &movies), recompute("the", "8", &movies));
}

#[test]
fn title_filter_only_shrinks() {
    let movies = sample_catalog();
    let all = recompute("", "0", &movies);
    assert_eq!(all.len(), 5);
    for title in ["t", "the", "the shawshank", "nothing like this"] {
        let narrowed = recompute(title, "0", &movies);
        assert!(narrowed.len() <= all.len());
        assert!(is_subsequence(&narrowed, &all));
    }
}

#[test]
fn rating_boundary_is_inclusive_for_new_records() {
    let mut catalog = seeded();
    catalog.set_rating_filter("7.5");
    catalog.add_movie(MovieRecord::new("Dune", "", "", 7.5));
    assert!(titles(catalog.displayed()).contains(&"Dune".to_string()));
}

#[test]
fn unusable_rating_filter_hides_everything() {
    for raw in ["", "   ", "nine", "9/10"] {
        let mut catalog = seeded();
        catalog.set_rating_filter(raw);
        assert!(catalog.displayed().is_empty(), "rating filter {raw:?}");
    }
}

#[test]
fn seed_scenario_rating_then_title() {
    let mut catalog = seeded();
    catalog.set_rating_filter("9");
    assert_eq!(titles(catalog.displayed()), ["The Shawshank Redemption"]);
    catalog.set_title_filter("the");
    assert_eq!(titles(catalog.displayed()), ["The Shawshank Redemption"]);
}

#[test]
fn nan_rated_record_never_passes_a_rating_filter() {
    let mut catalog = seeded();
    catalog.add_movie(MovieRecord::new("", "", "", f64::NAN));
    for raw in ["0", "-1000", "1e-9"] {
        catalog.set_rating_filter(raw);
        assert_eq!(catalog.displayed().len(), 2, "rating filter {raw:?}");
    }
}

#[test]
fn match_all_policy_shows_everything_for_blank_filter() {
    let mut catalog = Catalog::new(BlankRatingFilter::MatchAll);
    catalog.initialize(seed_movies());
    catalog.add_movie(MovieRecord::new("Dune", "", "", 7.5));
    assert_eq!(catalog.displayed().len(), 3);
    catalog.add_movie(MovieRecord::new("Unrated", "", "", f64::NAN));
    assert_eq!(catalog.displayed().len(), 3);
}
