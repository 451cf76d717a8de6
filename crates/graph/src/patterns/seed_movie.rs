//! Seed-movie pattern:
//! `(sharedMovie)<-[:RATED]-(peerUser)-[:RATED]->(candidateMovie)` where the
//! shared movie is one of the seeds and the candidate is not.

use super::{mean, movie_node, rated_rel, sorted_ratings, user_node};
use crate::error::Result;
use crate::query::{MAX_WITNESSES, Pattern, QueryParams, columns};
use crate::value::{Row, Value, widen_rating};
use crate::witness::{PathWitness, Role};
use data_loader::{DataIndex, MovieId, Rating, UserId};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Default)]
struct CandidateAcc {
    ratings: Vec<f64>,
    contributors: BTreeSet<UserId>,
    witnesses: Vec<PathWitness>,
}

pub(crate) fn run(index: &DataIndex, params: &QueryParams) -> Result<Vec<Row>> {
    let seeds: BTreeSet<MovieId> = params
        .require_movies(Pattern::SeedMovie)?
        .iter()
        .copied()
        .collect();

    // Peers anchored on the lowest seed id they rated
    let mut peers: BTreeMap<UserId, &Rating> = BTreeMap::new();
    for &seed in &seeds {
        for shared in index.get_movie_ratings(seed) {
            peers.entry(shared.user_id).or_insert(shared);
        }
    }

    let mut candidates: BTreeMap<MovieId, CandidateAcc> = BTreeMap::new();
    for (&peer, &shared) in &peers {
        for candidate in sorted_ratings(index.get_user_ratings(peer), |r| r.movie_id) {
            if seeds.contains(&candidate.movie_id) {
                continue;
            }
            let acc = candidates.entry(candidate.movie_id).or_default();
            acc.ratings.push(widen_rating(candidate.rating));
            if acc.contributors.insert(peer) && acc.witnesses.len() < MAX_WITNESSES {
                acc.witnesses.push(witness(index, shared, candidate));
            }
        }
    }

    Ok(candidates
        .into_iter()
        .map(|(movie_id, acc)| {
            let title = index
                .get_movie(movie_id)
                .map(|m| m.title.clone())
                .unwrap_or_default();
            Row::new()
                .with(columns::MOVIE_ID, Value::Int(i64::from(movie_id)))
                .with(columns::TITLE, Value::Str(title))
                .with(columns::AVG_RATING, Value::Float(mean(&acc.ratings)))
                .with(
                    columns::CONTRIBUTORS,
                    Value::Int(acc.contributors.len() as i64),
                )
                .with(columns::PATHS, Value::Paths(acc.witnesses))
        })
        .collect())
}

fn witness(index: &DataIndex, shared: &Rating, candidate: &Rating) -> PathWitness {
    PathWitness::start(Role::SharedMovie, movie_node(index, shared.movie_id))
        .then(
            Role::SharedRating,
            rated_rel(shared),
            Role::PeerUser,
            user_node(shared.user_id),
        )
        .then(
            Role::CandidateRating,
            rated_rel(candidate),
            Role::CandidateMovie,
            movie_node(index, candidate.movie_id),
        )
}
