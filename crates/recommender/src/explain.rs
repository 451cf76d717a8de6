//! Explanation Extractor: turns path witnesses into one-line sentences.
//!
//! Every witness is decoded on its own. A witness that does not have the
//! shape its category expects is logged and skipped, so one corrupt path
//! never costs the rest of the bundle.

use crate::error::WitnessError;
use graph::{PathWitness, Property, Role, Row, Snapshot, columns};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Kind of justification attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationCategory {
    /// Peer or seed-movie traversal
    Paths,
    /// A movie the user rated shares a genre with the candidate
    GenreMatch,
    /// The user applied a tag the candidate also carries
    TagMatch,
    CandidateGenre,
    CandidateTag,
    CandidateRating,
}

impl ExplanationCategory {
    /// Row column holding this category's witnesses
    pub fn column(self) -> &'static str {
        match self {
            ExplanationCategory::Paths => columns::PATHS,
            ExplanationCategory::GenreMatch => columns::GENRE_PATHS,
            ExplanationCategory::TagMatch => columns::TAG_PATHS,
            ExplanationCategory::CandidateGenre => columns::CANDIDATE_GENRE_PATHS,
            ExplanationCategory::CandidateTag => columns::CANDIDATE_TAG_PATHS,
            ExplanationCategory::CandidateRating => columns::RATING_PATHS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExplanationCategory::Paths => "Paths",
            ExplanationCategory::GenreMatch => "Genre matches",
            ExplanationCategory::TagMatch => "Tag matches",
            ExplanationCategory::CandidateGenre => "Candidate genres",
            ExplanationCategory::CandidateTag => "Candidate tags",
            ExplanationCategory::CandidateRating => "Candidate ratings",
        }
    }

    /// Render one witness as a sentence
    pub fn describe(self, witness: &PathWitness) -> Result<String, WitnessError> {
        if !witness.is_well_formed() {
            return Err(WitnessError::Shape);
        }
        let sentence = match self {
            ExplanationCategory::Paths => format!(
                "User {} rated '{}' and gave '{}' a {}/5",
                node_prop(witness, Role::PeerUser, "userId")?,
                node_prop(witness, Role::SharedMovie, "title")?,
                node_prop(witness, Role::CandidateMovie, "title")?,
                rel_prop(witness, Role::CandidateRating, "rating")?,
            ),
            ExplanationCategory::GenreMatch => format!(
                "User rated '{}' with genre '{}'",
                node_prop(witness, Role::ProfileMovie, "title")?,
                node_prop(witness, Role::Genre, "name")?,
            ),
            ExplanationCategory::TagMatch => format!(
                "User tagged '{}' with '{}'",
                node_prop(witness, Role::ProfileMovie, "title")?,
                rel_prop(witness, Role::Tag, "tag")?,
            ),
            ExplanationCategory::CandidateGenre => format!(
                "Candidate has genre '{}'",
                node_prop(witness, Role::Genre, "name")?,
            ),
            ExplanationCategory::CandidateTag => format!(
                "User {} tagged candidate with '{}'",
                node_prop(witness, Role::OtherUser, "userId")?,
                rel_prop(witness, Role::Tag, "tag")?,
            ),
            ExplanationCategory::CandidateRating => format!(
                "User {} rated candidate {}/5",
                node_prop(witness, Role::OtherUser, "userId")?,
                rel_prop(witness, Role::CandidateRating, "rating")?,
            ),
        };
        Ok(sentence)
    }
}

impl fmt::Display for ExplanationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn node_prop<'a>(
    witness: &'a PathWitness,
    role: Role,
    property: &'static str,
) -> Result<&'a Property, WitnessError> {
    let node = witness
        .node(role)
        .ok_or(WitnessError::MissingElement { role, kind: "node" })?;
    prop(node, role, property)
}

fn rel_prop<'a>(
    witness: &'a PathWitness,
    role: Role,
    property: &'static str,
) -> Result<&'a Property, WitnessError> {
    let rel = witness.relationship(role).ok_or(WitnessError::MissingElement {
        role,
        kind: "relationship",
    })?;
    prop(rel, role, property)
}

fn prop<'a>(
    snapshot: &'a Snapshot,
    role: Role,
    property: &'static str,
) -> Result<&'a Property, WitnessError> {
    snapshot
        .get(property)
        .ok_or(WitnessError::MissingProperty { role, property })
}

/// Explanation lines of one recommendation, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Explanations {
    lines: BTreeMap<ExplanationCategory, Vec<String>>,
}

impl Explanations {
    /// Lines of one category; empty if the category produced none
    pub fn get(&self, category: ExplanationCategory) -> &[String] {
        self.lines.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExplanationCategory, &[String])> {
        self.lines.iter().map(|(c, lines)| (*c, lines.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Decode up to `per_category` sentences for each category from a row
pub fn extract(row: &Row, categories: &[ExplanationCategory], per_category: usize) -> Explanations {
    let mut lines = BTreeMap::new();
    for &category in categories {
        let witnesses: &[PathWitness] = match row.paths(category.column()) {
            Ok(witnesses) => witnesses,
            Err(e) => {
                warn!(category = %category, "No witnesses to explain: {}", e);
                &[]
            }
        };

        let mut sentences = Vec::new();
        for witness in witnesses {
            if sentences.len() >= per_category {
                break;
            }
            match category.describe(witness) {
                Ok(sentence) => sentences.push(sentence),
                Err(e) => warn!(category = %category, "Skipping malformed witness: {}", e),
            }
        }
        lines.insert(category, sentences);
    }
    Explanations { lines }
}
