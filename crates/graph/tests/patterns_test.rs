//! Integration tests for the in-memory read patterns.
//!
//! A small hand-built graph is queried through the public `GraphStore`
//! seam, the same way the recommender does it.

use data_loader::{DataIndex, Movie, Rating, Tag};
use graph::{
    GraphError, GraphStore, InMemoryGraph, MAX_WITNESSES, Pattern, QueryParams, Role, Row,
    columns,
};
use std::sync::Arc;

fn movie(id: u32, title: &str, genres: &[&str]) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

fn rating(user_id: u32, movie_id: u32, rating: f32, timestamp: i64) -> Rating {
    Rating {
        user_id,
        movie_id,
        rating,
        timestamp,
    }
}

fn tag(user_id: u32, movie_id: u32, text: &str) -> Tag {
    Tag {
        user_id,
        movie_id,
        tag: text.to_string(),
        timestamp: 1,
    }
}

/// Users 7 and 9 share movie A with user 2; user 11 shares nothing.
fn create_test_graph() -> InMemoryGraph {
    let mut index = DataIndex::new();
    index.insert_movie(movie(1, "A", &["Comedy"]));
    index.insert_movie(movie(2, "B", &["Drama", "Comedy"]));
    index.insert_movie(movie(3, "C", &["Horror"]));
    index.insert_movie(movie(4, "D", &["Comedy", "Romance"]));
    index.insert_movie(movie(5, "E", &["Thriller"]));

    index.insert_rating(rating(2, 1, 4.0, 100));
    index.insert_rating(rating(7, 1, 3.0, 110));
    index.insert_rating(rating(7, 2, 5.0, 120));
    index.insert_rating(rating(9, 1, 5.0, 100));
    index.insert_rating(rating(9, 2, 4.0, 130));
    index.insert_rating(rating(9, 3, 2.0, 100));
    index.insert_rating(rating(11, 5, 1.0, 100));

    index.insert_tag(tag(2, 1, "funny"));
    index.insert_tag(tag(9, 3, "funny"));
    index.insert_tag(tag(7, 4, "sweet"));

    InMemoryGraph::new(Arc::new(index))
}

fn query(store: &InMemoryGraph, pattern: Pattern, params: QueryParams) -> Vec<Row> {
    let mut session = store.open_session().unwrap();
    session.run_read_query(pattern, &params).unwrap()
}

fn movie_ids(rows: &[Row]) -> Vec<i64> {
    rows.iter().map(|r| r.int(columns::MOVIE_ID).unwrap()).collect()
}

#[test]
fn test_peer_pattern_aggregates() {
    let store = create_test_graph();
    let rows = query(&store, Pattern::PeerCollaborative, QueryParams::for_user(2, 0));

    // Movie 1 is already rated, movie 5 has no path from user 2
    assert_eq!(movie_ids(&rows), vec![2, 3]);

    let b = &rows[0];
    assert_eq!(b.str(columns::TITLE).unwrap(), "B");
    assert_eq!(b.float(columns::AVG_RATING).unwrap(), 4.5);
    assert_eq!(b.int(columns::CONTRIBUTORS).unwrap(), 2);

    let c = &rows[1];
    assert_eq!(c.float(columns::AVG_RATING).unwrap(), 2.0);
    assert_eq!(c.int(columns::CONTRIBUTORS).unwrap(), 1);
}

#[test]
fn test_peer_pattern_witnesses() {
    let store = create_test_graph();
    let rows = query(&store, Pattern::PeerCollaborative, QueryParams::for_user(2, 0));
    let paths = rows[0].paths(columns::PATHS).unwrap();

    assert_eq!(paths.len(), 2);
    let first = &paths[0];
    assert!(first.is_well_formed());
    assert_eq!(first.hops(), 3);
    assert_eq!(first.node(Role::SeedUser).unwrap().int("userId"), Some(2));
    assert_eq!(first.node(Role::PeerUser).unwrap().int("userId"), Some(7));
    assert_eq!(first.node(Role::SharedMovie).unwrap().str("title"), Some("A"));
    assert_eq!(first.node(Role::CandidateMovie).unwrap().str("title"), Some("B"));
    assert_eq!(
        first.relationship(Role::CandidateRating).unwrap().float("rating"),
        Some(5.0)
    );
    assert_eq!(paths[1].node(Role::PeerUser).unwrap().int("userId"), Some(9));
}

#[test]
fn test_witnesses_are_capped() {
    let mut index = DataIndex::new();
    index.insert_movie(movie(1, "Seed", &["Drama"]));
    index.insert_movie(movie(2, "Popular", &["Drama"]));
    index.insert_rating(rating(1, 1, 4.0, 1));
    for peer in 10..20 {
        index.insert_rating(rating(peer, 1, 4.0, 1));
        index.insert_rating(rating(peer, 2, 3.0, 1));
    }
    let store = InMemoryGraph::new(Arc::new(index));

    let rows = query(&store, Pattern::PeerCollaborative, QueryParams::for_user(1, 0));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].int(columns::CONTRIBUTORS).unwrap(), 10);
    assert_eq!(rows[0].paths(columns::PATHS).unwrap().len(), MAX_WITNESSES);

    let rows = query(&store, Pattern::SeedMovie, QueryParams::for_movies(vec![1], 0));
    assert_eq!(rows[0].paths(columns::PATHS).unwrap().len(), MAX_WITNESSES);
}

#[test]
fn test_unknown_user_has_no_candidates() {
    let store = create_test_graph();
    let rows = query(&store, Pattern::PeerCollaborative, QueryParams::for_user(404, 0));
    assert!(rows.is_empty());
}

#[test]
fn test_seed_movie_pattern() {
    let store = create_test_graph();

    // Duplicate seeds count once
    let rows = query(&store, Pattern::SeedMovie, QueryParams::for_movies(vec![1, 1], 0));
    assert_eq!(movie_ids(&rows), vec![2, 3]);
    assert_eq!(rows[0].float(columns::AVG_RATING).unwrap(), 4.5);
    assert_eq!(rows[0].int(columns::CONTRIBUTORS).unwrap(), 2);

    let path = &rows[0].paths(columns::PATHS).unwrap()[0];
    assert_eq!(path.hops(), 2);
    assert_eq!(path.node(Role::SharedMovie).unwrap().str("title"), Some("A"));
    assert_eq!(path.node(Role::PeerUser).unwrap().int("userId"), Some(7));
    assert!(path.node(Role::SeedUser).is_none());

    // Seeds are never candidates
    let rows = query(&store, Pattern::SeedMovie, QueryParams::for_movies(vec![1, 2], 0));
    assert_eq!(movie_ids(&rows), vec![3]);
}

#[test]
fn test_missing_parameters() {
    let store = create_test_graph();
    let mut session = store.open_session().unwrap();

    let err = session
        .run_read_query(Pattern::SeedMovie, &QueryParams::for_movies(vec![], 0))
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::MissingParameter {
            pattern: "seed_movie",
            name: "movieIds",
        }
    );

    let err = session
        .run_read_query(Pattern::GenreTagHybrid, &QueryParams::default())
        .unwrap_err();
    assert!(matches!(err, GraphError::MissingParameter { name: "userId", .. }));
}

#[test]
fn test_hybrid_overlaps() {
    let store = create_test_graph();
    let rows = query(&store, Pattern::GenreTagHybrid, QueryParams::for_user(2, 130));

    // Movie 5 shares neither a genre nor a tag with user 2
    assert_eq!(movie_ids(&rows), vec![2, 3, 4]);

    let b = &rows[0];
    assert_eq!(b.str_list(columns::OVERLAPPING_GENRES).unwrap(), ["Comedy"]);
    assert!(b.str_list(columns::OVERLAPPING_TAGS).unwrap().is_empty());

    let c = &rows[1];
    assert!(c.str_list(columns::OVERLAPPING_GENRES).unwrap().is_empty());
    assert_eq!(c.str_list(columns::OVERLAPPING_TAGS).unwrap(), ["funny"]);
}

#[test]
fn test_hybrid_rating_aggregates() {
    let store = create_test_graph();
    let rows = query(&store, Pattern::GenreTagHybrid, QueryParams::for_user(2, 130));

    let b = &rows[0];
    assert_eq!(b.float(columns::AVG_RATING).unwrap(), 4.5);
    assert_eq!(b.int(columns::RATING_COUNT).unwrap(), 2);
    let expected = (1000.0 / 11.0 + 1000.0) / 2.0;
    assert!((b.float(columns::RECENCY_BOOST).unwrap() - expected).abs() < 1e-9);

    // An unrated candidate stays in with zeroed aggregates
    let d = &rows[2];
    assert_eq!(d.float(columns::AVG_RATING).unwrap(), 0.0);
    assert_eq!(d.int(columns::RATING_COUNT).unwrap(), 0);
    assert_eq!(d.float(columns::RECENCY_BOOST).unwrap(), 0.0);
    assert!(d.paths(columns::RATING_PATHS).unwrap().is_empty());
}

#[test]
fn test_hybrid_witness_columns() {
    let store = create_test_graph();
    let rows = query(&store, Pattern::GenreTagHybrid, QueryParams::for_user(2, 130));

    let b = &rows[0];
    let genre = &b.paths(columns::GENRE_PATHS).unwrap()[0];
    assert_eq!(genre.node(Role::ProfileMovie).unwrap().str("title"), Some("A"));
    assert_eq!(genre.node(Role::Genre).unwrap().str("name"), Some("Comedy"));

    let candidate_genres: Vec<_> = b
        .paths(columns::CANDIDATE_GENRE_PATHS)
        .unwrap()
        .iter()
        .map(|p| p.node(Role::Genre).unwrap().str("name").unwrap().to_string())
        .collect();
    assert_eq!(candidate_genres, vec!["Drama", "Comedy"]);

    let ratings = b.paths(columns::RATING_PATHS).unwrap();
    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings[0].node(Role::OtherUser).unwrap().int("userId"), Some(7));

    let c = &rows[1];
    let tagged = &c.paths(columns::TAG_PATHS).unwrap()[0];
    assert_eq!(tagged.relationship(Role::Tag).unwrap().str("tag"), Some("funny"));
    assert_eq!(tagged.node(Role::ProfileMovie).unwrap().str("title"), Some("A"));
    assert!(c.paths(columns::GENRE_PATHS).unwrap().is_empty());

    let d = &rows[2];
    let other = &d.paths(columns::CANDIDATE_TAG_PATHS).unwrap()[0];
    assert_eq!(other.node(Role::OtherUser).unwrap().int("userId"), Some(7));
    assert_eq!(other.relationship(Role::Tag).unwrap().str("tag"), Some("sweet"));
}

#[test]
fn test_sessions_are_independent() {
    let store = create_test_graph();
    let mut first = store.open_session().unwrap();
    let mut second = store.open_session().unwrap();

    let params = QueryParams::for_user(2, 0);
    let a = first.run_read_query(Pattern::PeerCollaborative, &params).unwrap();
    let b = second.run_read_query(Pattern::PeerCollaborative, &params).unwrap();
    assert_eq!(a, b);
}
