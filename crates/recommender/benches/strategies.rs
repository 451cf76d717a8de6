//! Benchmarks for the three recommendation strategies
//!
//! Run with: cargo bench --package recommender
//!
//! Uses a synthetic graph so the benchmark runs without the MovieLens files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{DataIndex, Movie, Rating, Tag};
use graph::{GraphStore, InMemoryGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recommender::{Recommender, RecommenderConfig};
use std::sync::Arc;

const USERS: u32 = 600;
const MOVIES: u32 = 2_000;
const RATINGS_PER_USER: usize = 60;
const GENRES: &[&str] = &["Action", "Comedy", "Drama", "Horror", "Romance", "Sci-Fi", "Thriller"];
const TAGS: &[&str] = &["classic", "dark", "funny", "slow", "twist ending"];

fn synthetic_graph() -> InMemoryGraph {
    let mut rng = StdRng::seed_from_u64(42);

    let movies: Vec<Movie> = (1..=MOVIES)
        .map(|id| {
            let first = rng.random_range(0..GENRES.len());
            let second = rng.random_range(0..GENRES.len());
            let mut genres = vec![GENRES[first].to_string()];
            if second != first {
                genres.push(GENRES[second].to_string());
            }
            Movie {
                id,
                title: format!("Movie {}", id),
                genres,
            }
        })
        .collect();

    let mut ratings = Vec::new();
    let mut tags = Vec::new();
    for user_id in 1..=USERS {
        for _ in 0..RATINGS_PER_USER {
            let movie_id = rng.random_range(1..=MOVIES);
            ratings.push(Rating {
                user_id,
                movie_id,
                rating: f32::from(rng.random_range(1u8..=10)) / 2.0,
                timestamp: rng.random_range(1_000_000_000..1_700_000_000),
            });
            if rng.random_bool(0.05) {
                tags.push(Tag {
                    user_id,
                    movie_id,
                    tag: TAGS[rng.random_range(0..TAGS.len())].to_string(),
                    timestamp: 1,
                });
            }
        }
    }

    let index = DataIndex::from_parts(movies, ratings, tags, vec![], vec![])
        .expect("Failed to build synthetic graph");
    InMemoryGraph::new(Arc::new(index))
}

fn bench_strategies(c: &mut Criterion) {
    let store = synthetic_graph();
    let recommender = Recommender::with_config(RecommenderConfig::new().with_fixed_time(1_700_000_000));

    c.bench_function("peer_collaborative", |b| {
        b.iter(|| {
            let mut session = store.open_session().unwrap();
            let recs = recommender
                .recommend_by_peer_collaboration(session.as_mut(), black_box(1), Some(10))
                .unwrap();
            black_box(recs)
        })
    });

    c.bench_function("seed_movie", |b| {
        b.iter(|| {
            let mut session = store.open_session().unwrap();
            let recs = recommender
                .recommend_by_seed_movies(session.as_mut(), black_box(&[82u32, 74, 118][..]), Some(10))
                .unwrap();
            black_box(recs)
        })
    });

    c.bench_function("genre_tag_hybrid", |b| {
        b.iter(|| {
            let mut session = store.open_session().unwrap();
            let recs = recommender
                .recommend_by_genre_tag_hybrid(session.as_mut(), black_box(1), Some(10))
                .unwrap();
            black_box(recs)
        })
    });
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
