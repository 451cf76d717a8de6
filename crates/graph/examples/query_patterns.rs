//! Example: Run the read patterns for a user and dump the raw rows
//!
//! Run with: cargo run --package graph --example query_patterns
//!
//! This example shows how to:
//! 1. Load the MovieLens dataset into an in-memory graph
//! 2. Open a read session
//! 3. Run the peer-collaborative and hybrid patterns
//! 4. Walk the role-tagged witnesses of the first rows

use data_loader::DataIndex;
use graph::{columns, GraphStore, InMemoryGraph, Pattern, QueryParams, Role};
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== ReelGraph Query Patterns Example ===\n");

    let start = Instant::now();
    let index = DataIndex::load_from_dir(Path::new("data/ml-latest-small"))?;
    println!("Loaded dataset in {:?}\n", start.elapsed());

    let store = InMemoryGraph::new(Arc::new(index));
    let mut session = store.open_session()?;
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

    let user_id = 1;
    let rows = session.run_read_query(Pattern::PeerCollaborative, &QueryParams::for_user(user_id, now))?;
    println!("Peer-collaborative: {} candidate rows for user {}", rows.len(), user_id);
    for row in rows.iter().take(3) {
        println!(
            "  {} (avg {:.2}, {} peers)",
            row.str(columns::TITLE)?,
            row.float(columns::AVG_RATING)?,
            row.int(columns::CONTRIBUTORS)?
        );
        for path in row.paths(columns::PATHS)? {
            let peer = path.node(Role::PeerUser).and_then(|n| n.int("userId"));
            let shared = path.node(Role::SharedMovie).and_then(|n| n.str("title"));
            println!("     via user {:?} on {:?}", peer, shared);
        }
    }

    let rows = session.run_read_query(Pattern::GenreTagHybrid, &QueryParams::for_user(user_id, now))?;
    println!("\nGenre/tag hybrid: {} candidate rows", rows.len());
    for row in rows.iter().take(3) {
        println!(
            "  {} genres={:?} tags={:?} recency={:.4}",
            row.str(columns::TITLE)?,
            row.str_list(columns::OVERLAPPING_GENRES)?,
            row.str_list(columns::OVERLAPPING_TAGS)?,
            row.float(columns::RECENCY_BOOST)?
        );
    }

    Ok(())
}
