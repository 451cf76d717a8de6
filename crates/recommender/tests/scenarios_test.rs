//! End-to-end scenarios through the in-memory graph store.

use data_loader::{DataIndex, Movie, Rating, Tag};
use graph::{GraphStore, InMemoryGraph};
use recommender::{
    Aggregates, ExplanationCategory, Recommender, RecommenderConfig, Strategy,
};
use std::sync::Arc;

const NOW: i64 = 1_700_000_000;

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

fn recommender() -> Recommender {
    Recommender::with_config(RecommenderConfig::new().with_fixed_time(NOW))
}

fn store(index: DataIndex) -> InMemoryGraph {
    InMemoryGraph::new(Arc::new(index))
}

#[test]
fn test_peer_collaborative_scenario() {
    let mut index = DataIndex::new();
    index.insert_movie(movie(1, "A", &["Drama"]));
    index.insert_movie(movie(2, "B", &["Drama"]));
    index.insert_rating(rating(2, 1, 5.0, 1));
    index.insert_rating(rating(7, 1, 4.0, 1));
    index.insert_rating(rating(7, 2, 5.0, 1));
    let store = store(index);

    let mut session = store.open_session().unwrap();
    let recs = recommender()
        .recommend_by_peer_collaboration(session.as_mut(), 2, None)
        .unwrap();

    assert_eq!(recs.len(), 1);
    let b = &recs[0];
    assert_eq!(b.movie_id, 2);
    assert_eq!(b.title, "B");
    match &b.aggregates {
        Aggregates::Collaborative(stats) => {
            assert_eq!(stats.mean_rating, 5.0);
            assert_eq!(stats.distinct_contributors, 1);
        }
        other => panic!("unexpected aggregates {:?}", other),
    }
    assert!((b.score - 5.0 * 2f64.log10()).abs() < 1e-9);
    assert!((b.score - 1.505).abs() < 1e-3);
    assert_eq!(
        b.explanations.get(ExplanationCategory::Paths),
        ["User 7 rated 'A' and gave 'B' a 5/5"]
    );
}

#[test]
fn test_seed_movie_scenario() {
    let mut index = DataIndex::new();
    index.insert_movie(movie(74, "Seed One", &["Drama"]));
    index.insert_movie(movie(82, "Seed Two", &["Drama"]));
    index.insert_movie(movie(100, "X", &["Comedy"]));
    index.insert_rating(rating(1, 82, 3.0, 1));
    index.insert_rating(rating(1, 100, 4.0, 1));
    index.insert_rating(rating(2, 74, 2.0, 1));
    index.insert_rating(rating(2, 100, 5.0, 1));
    let store = store(index);

    let mut session = store.open_session().unwrap();
    let recs = recommender()
        .recommend_by_seed_movies(session.as_mut(), &[82, 74], None)
        .unwrap();

    assert_eq!(recs.len(), 1);
    let x = &recs[0];
    assert_eq!(x.movie_id, 100);
    assert_eq!(x.aggregates.mean_rating(), 4.5);
    assert!((x.score - 4.5 * 3f64.log10()).abs() < 1e-9);
    assert!((x.score - 2.147).abs() < 1e-3);

    let lines = x.explanations.get(ExplanationCategory::Paths);
    assert_eq!(
        lines,
        [
            "User 1 rated 'Seed Two' and gave 'X' a 4/5",
            "User 2 rated 'Seed One' and gave 'X' a 5/5",
        ]
    );
}

#[test]
fn test_hybrid_scenario() {
    let mut index = DataIndex::new();
    index.insert_movie(movie(10, "Profile Comedy", &["Comedy"]));
    index.insert_movie(movie(11, "Profile Drama", &["Drama"]));
    index.insert_movie(movie(20, "Y", &["Comedy"]));
    index.insert_movie(movie(21, "Unrelated", &["Horror"]));
    index.insert_rating(rating(312, 10, 4.0, NOW - 1000));
    index.insert_rating(rating(312, 11, 3.0, NOW - 1000));
    index.insert_rating(rating(5, 20, 4.0, NOW - 9));
    index.insert_rating(rating(5, 21, 5.0, NOW - 9));
    let store = store(index);

    let mut session = store.open_session().unwrap();
    let recs = recommender()
        .recommend_by_genre_tag_hybrid(session.as_mut(), 312, None)
        .unwrap();

    assert_eq!(recs.len(), 1);
    let y = &recs[0];
    assert_eq!(y.title, "Y");
    let Aggregates::Hybrid(stats) = &y.aggregates else {
        panic!("expected hybrid aggregates");
    };
    assert_eq!(stats.overlapping_genres, vec!["Comedy"]);
    assert!(stats.overlapping_tags.is_empty());
    assert_eq!(stats.rating_count, 1);
    assert!((stats.recency_boost - 100.0).abs() < 1e-9);

    let expected = 0.6 * (4.0 * 2f64.log10()) + 0.6 * 100.0 + 0.4 * 1.0 + 0.2 * 0.0;
    assert!((y.score - expected).abs() < 1e-9);

    assert_eq!(
        y.explanations.get(ExplanationCategory::GenreMatch),
        ["User rated 'Profile Comedy' with genre 'Comedy'"]
    );
    assert_eq!(
        y.explanations.get(ExplanationCategory::CandidateGenre),
        ["Candidate has genre 'Comedy'"]
    );
    assert_eq!(
        y.explanations.get(ExplanationCategory::CandidateRating),
        ["User 5 rated candidate 4/5"]
    );
    assert!(y.explanations.get(ExplanationCategory::TagMatch).is_empty());
}

#[test]
fn test_hybrid_tags_and_unrated_candidates() {
    let mut index = DataIndex::new();
    index.insert_movie(movie(1, "Seen", &["Drama"]));
    index.insert_movie(movie(2, "Tagged", &["Horror"]));
    index.insert_rating(rating(3, 1, 4.0, 1));
    index.insert_tag(Tag {
        user_id: 3,
        movie_id: 1,
        tag: "slow burn".to_string(),
        timestamp: 1,
    });
    index.insert_tag(Tag {
        user_id: 8,
        movie_id: 2,
        tag: "slow burn".to_string(),
        timestamp: 1,
    });
    let store = store(index);

    let mut session = store.open_session().unwrap();
    let recs = recommender()
        .recommend_by_genre_tag_hybrid(session.as_mut(), 3, None)
        .unwrap();

    // No ratings at all, still recommended on the tag overlap
    assert_eq!(recs.len(), 1);
    assert!((recs[0].score - 0.2).abs() < 1e-12);
    assert_eq!(
        recs[0].explanations.get(ExplanationCategory::TagMatch),
        ["User tagged 'Seen' with 'slow burn'"]
    );
    assert_eq!(
        recs[0].explanations.get(ExplanationCategory::CandidateTag),
        ["User 8 tagged candidate with 'slow burn'"]
    );
    assert!(recs[0].explanations.get(ExplanationCategory::CandidateRating).is_empty());
}

#[test]
fn test_hybrid_ignores_tags_on_unrated_movies() {
    let mut index = DataIndex::new();
    index.insert_movie(movie(1, "Seen", &["Drama"]));
    index.insert_movie(movie(2, "Unseen", &["Horror"]));
    index.insert_rating(rating(1, 1, 4.0, 1));
    index.insert_tag(Tag {
        user_id: 1,
        movie_id: 2,
        tag: "creepy".to_string(),
        timestamp: 1,
    });
    let store = store(index);

    let mut session = store.open_session().unwrap();
    let outcome = recommender()
        .evaluate(session.as_mut(), &Strategy::GenreTagHybrid { user_id: 1 }, 10)
        .unwrap();
    assert!(outcome.is_empty());
}

#[test]
fn test_fractional_rating_keeps_its_decimal_form() {
    let mut index = DataIndex::new();
    index.insert_movie(movie(1, "A", &["Drama"]));
    index.insert_movie(movie(2, "B", &["Drama"]));
    index.insert_rating(rating(2, 1, 5.0, 1));
    index.insert_rating(rating(7, 1, 4.0, 1));
    index.insert_rating(rating(7, 2, 4.3, 1));
    let store = store(index);

    let mut session = store.open_session().unwrap();
    let recs = recommender()
        .recommend_by_peer_collaboration(session.as_mut(), 2, None)
        .unwrap();

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].aggregates.mean_rating(), 4.3);
    assert_eq!(
        recs[0].explanations.get(ExplanationCategory::Paths),
        ["User 7 rated 'A' and gave 'B' a 4.3/5"]
    );
}

fn ranked_index() -> DataIndex {
    let mut index = DataIndex::new();
    for id in 1..=6 {
        index.insert_movie(movie(id, &format!("Movie {}", id), &["Drama"]));
    }
    index.insert_rating(rating(1, 1, 4.0, 1));
    // Peers 2..=5 all share movie 1 and spread out over 2..=6
    for peer in 2..=5 {
        index.insert_rating(rating(peer, 1, 4.0, 1));
        for candidate in 2..=peer + 1 {
            index.insert_rating(rating(peer, candidate, 3.0 + (candidate % 2) as f32, 1));
        }
    }
    index
}

#[test]
fn test_limit_and_ordering() {
    let store = store(ranked_index());
    let mut session = store.open_session().unwrap();
    let recommender = recommender();

    let all = recommender
        .recommend_by_peer_collaboration(session.as_mut(), 1, None)
        .unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(all.iter().all(|r| r.movie_id != 1));

    let top = recommender
        .recommend_by_peer_collaboration(session.as_mut(), 1, Some(1))
        .unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0], all[0]);
}

#[test]
fn test_repeated_calls_are_identical() {
    let store = store(ranked_index());
    let recommender = recommender();

    let mut first = store.open_session().unwrap();
    let mut second = store.open_session().unwrap();
    let a = recommender
        .recommend_by_peer_collaboration(first.as_mut(), 1, Some(3))
        .unwrap();
    let b = recommender
        .recommend_by_peer_collaboration(second.as_mut(), 1, Some(3))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_no_candidates_is_empty_outcome() {
    let mut index = DataIndex::new();
    index.insert_movie(movie(1, "Lonely", &["Drama"]));
    index.insert_rating(rating(1, 1, 4.0, 1));
    let store = store(index);

    let mut session = store.open_session().unwrap();
    let outcome = recommender()
        .evaluate(session.as_mut(), &Strategy::PeerCollaborative { user_id: 1 }, 10)
        .unwrap();
    assert!(outcome.is_empty());
    assert!(!outcome.is_failed());
}

#[test]
fn test_json_shape() {
    let store = store(ranked_index());
    let mut session = store.open_session().unwrap();
    let recs = recommender()
        .recommend_by_peer_collaboration(session.as_mut(), 1, Some(1))
        .unwrap();

    let json = serde_json::to_value(&recs[0]).unwrap();
    assert_eq!(json["aggregates"]["kind"], "collaborative");
    assert!(json["aggregates"]["distinct_contributors"].is_u64());
    assert!(json["explanations"]["paths"].is_array());
}
