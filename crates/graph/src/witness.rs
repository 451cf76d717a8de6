//! Path witnesses: concrete traversals returned alongside result rows.
//!
//! A witness is an alternating sequence node, relationship, node, ... and
//! every element is tagged with the [`Role`] it plays in the query pattern.
//! Consumers look elements up by role, so adding a hop to a pattern does not
//! shift what `PeerUser` or `CandidateRating` resolve to.

use crate::value::Property;
use std::collections::BTreeMap;
use std::fmt;

/// Semantic role of a node or relationship inside a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    // nodes
    SeedUser,
    SharedMovie,
    PeerUser,
    OtherUser,
    ProfileMovie,
    CandidateMovie,
    Genre,
    // relationships
    SeedRating,
    SharedRating,
    CandidateRating,
    HasGenre,
    Tag,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::SeedUser => "seedUser",
            Role::SharedMovie => "sharedMovie",
            Role::PeerUser => "peerUser",
            Role::OtherUser => "otherUser",
            Role::ProfileMovie => "profileMovie",
            Role::CandidateMovie => "candidateMovie",
            Role::Genre => "genre",
            Role::SeedRating => "seedRating",
            Role::SharedRating => "sharedRating",
            Role::CandidateRating => "candidateRating",
            Role::HasGenre => "hasGenre",
            Role::Tag => "tag",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a node or relationship: its label/type and properties
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    kind: String,
    properties: BTreeMap<String, Property>,
}

impl Snapshot {
    /// `kind` is the node label (`Movie`) or relationship type (`RATED`)
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Property>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Property::as_int)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Property::as_float)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Property::as_str)
    }
}

/// One element of a witness
#[derive(Debug, Clone, PartialEq)]
pub enum PathElement {
    Node { role: Role, snapshot: Snapshot },
    Relationship { role: Role, snapshot: Snapshot },
}

impl PathElement {
    pub fn role(&self) -> Role {
        match self {
            PathElement::Node { role, .. } | PathElement::Relationship { role, .. } => *role,
        }
    }
}

/// An ordered node/relationship sequence satisfying a query pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PathWitness {
    elements: Vec<PathElement>,
}

impl PathWitness {
    /// Start a witness at its first node
    pub fn start(role: Role, node: Snapshot) -> Self {
        Self {
            elements: vec![PathElement::Node {
                role,
                snapshot: node,
            }],
        }
    }

    /// Extend the witness by one hop
    pub fn then(mut self, rel_role: Role, rel: Snapshot, node_role: Role, node: Snapshot) -> Self {
        self.elements.push(PathElement::Relationship {
            role: rel_role,
            snapshot: rel,
        });
        self.elements.push(PathElement::Node {
            role: node_role,
            snapshot: node,
        });
        self
    }

    /// Wrap raw elements without checking their shape.
    ///
    /// Used by adapters for stores that hand back paths as plain lists.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Number of relationships in the witness
    pub fn hops(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, PathElement::Relationship { .. }))
            .count()
    }

    /// True for node (rel node)* with nothing out of place
    pub fn is_well_formed(&self) -> bool {
        !self.elements.is_empty()
            && self.elements.len() % 2 == 1
            && self.elements.iter().enumerate().all(|(i, e)| match e {
                PathElement::Node { .. } => i % 2 == 0,
                PathElement::Relationship { .. } => i % 2 == 1,
            })
    }

    /// First node playing `role`
    pub fn node(&self, role: Role) -> Option<&Snapshot> {
        self.elements.iter().find_map(|e| match e {
            PathElement::Node { role: r, snapshot } if *r == role => Some(snapshot),
            _ => None,
        })
    }

    /// First relationship playing `role`
    pub fn relationship(&self, role: Role) -> Option<&Snapshot> {
        self.elements.iter().find_map(|e| match e {
            PathElement::Relationship { role: r, snapshot } if *r == role => Some(snapshot),
            _ => None,
        })
    }
}
