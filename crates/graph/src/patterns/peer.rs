//! Peer-collaborative pattern:
//! `(seedUser)-[:RATED]->(sharedMovie)<-[:RATED]-(peerUser)-[:RATED]->(candidateMovie)`
//! where the seed user has not rated the candidate.

use super::{mean, movie_node, rated_rel, sorted_ratings, user_node};
use crate::error::Result;
use crate::query::{MAX_WITNESSES, Pattern, QueryParams, columns};
use crate::value::{Row, Value, widen_rating};
use crate::witness::{PathWitness, Role};
use data_loader::{DataIndex, MovieId, Rating, UserId};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Default)]
struct CandidateAcc {
    ratings: Vec<f64>,
    contributors: BTreeSet<UserId>,
    witnesses: Vec<PathWitness>,
}

pub(crate) fn run(index: &DataIndex, params: &QueryParams) -> Result<Vec<Row>> {
    let seed_user = params.require_user(Pattern::PeerCollaborative)?;
    let seed_ratings = index.get_user_ratings(seed_user);
    let seed_rated: HashSet<MovieId> = seed_ratings.iter().map(|r| r.movie_id).collect();

    // Each peer is anchored on the first movie (lowest id) it shares with the seed
    let mut peers: BTreeMap<UserId, (&Rating, &Rating)> = BTreeMap::new();
    for seed_rating in sorted_ratings(seed_ratings, |r| r.movie_id) {
        for shared in index.get_movie_ratings(seed_rating.movie_id) {
            if shared.user_id != seed_user {
                peers.entry(shared.user_id).or_insert((seed_rating, shared));
            }
        }
    }

    let mut candidates: BTreeMap<MovieId, CandidateAcc> = BTreeMap::new();
    for (&peer, &(seed_rating, shared)) in &peers {
        for candidate in sorted_ratings(index.get_user_ratings(peer), |r| r.movie_id) {
            if seed_rated.contains(&candidate.movie_id) {
                continue;
            }
            let acc = candidates.entry(candidate.movie_id).or_default();
            acc.ratings.push(widen_rating(candidate.rating));
            let first_edge_from_peer = acc.contributors.insert(peer);
            if first_edge_from_peer && acc.witnesses.len() < MAX_WITNESSES {
                acc.witnesses
                    .push(witness(index, seed_user, seed_rating, shared, candidate));
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

fn witness(
    index: &DataIndex,
    seed_user: UserId,
    seed_rating: &Rating,
    shared: &Rating,
    candidate: &Rating,
) -> PathWitness {
    PathWitness::start(Role::SeedUser, user_node(seed_user))
        .then(
            Role::SeedRating,
            rated_rel(seed_rating),
            Role::SharedMovie,
            movie_node(index, shared.movie_id),
        )
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
