//! Declared node attributes, before normalization
//!
//! A manifest hands the resolver an insertion-ordered list of named nodes,
//! each carrying up to two relationship fields: `depends_on` and
//! `required_by`. Either field holds an explicit name list or the `"*"`
//! wildcard token meaning "every other applicable node".

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard token accepted in manifests.
pub const WILDCARD: &str = "*";

/// The names a relationship field refers to.
///
/// Manifests overload one field with either an explicit list or the wildcard
/// token; in memory the two shapes are kept as a tagged variant so no name
/// list can be confused with a sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySet {
    /// Explicit, ordered list of node names.
    Names(Vec<String>),
    /// Every other applicable node in the graph at normalization time.
    AllOthers,
}

impl DependencySet {
    /// Build an explicit name list.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DependencySet::Names(names.into_iter().map(Into::into).collect())
    }

    /// True for the wildcard variant.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, DependencySet::AllOthers)
    }
}

impl Serialize for DependencySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DependencySet::Names(names) => serializer.collect_seq(names),
            DependencySet::AllOthers => serializer.serialize_str(WILDCARD),
        }
    }
}

impl<'de> Deserialize<'de> for DependencySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = DependencySet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a sequence of node names or the wildcard string \"*\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                if value == WILDCARD {
                    Ok(DependencySet::AllOthers)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(value), &self))
                }
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut names = Vec::new();
                while let Some(name) = seq.next_element::<String>()? {
                    names.push(name);
                }
                Ok(DependencySet::Names(names))
            }
        }

        deserializer.deserialize_any(SetVisitor)
    }
}

/// Declared attributes of a single node.
///
/// Both fields are optional; a bare node (`{}` in a manifest) declares no
/// relationships at all. `required_by` is declarative sugar for the inverse
/// edge and is eliminated during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependencySet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_by: Option<DependencySet>,
}

impl NodeSpec {
    /// A node with no declared relationships.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare forward dependencies.
    pub fn with_depends_on(mut self, set: DependencySet) -> Self {
        self.depends_on = Some(set);
        self
    }

    /// Declare inverse dependencies.
    pub fn with_required_by(mut self, set: DependencySet) -> Self {
        self.required_by = Some(set);
        self
    }
}

/// Insertion-ordered manifest of declared nodes.
///
/// Deserializes from a mapping while preserving document order, which the
/// ordering contract depends on and which plain map types do not guarantee.
/// Feed it straight into [`crate::graph::Resolver::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest(pub Vec<(String, NodeSpec)>);

impl Manifest {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Manifest {
    type Item = (String, NodeSpec);
    type IntoIter = std::vec::IntoIter<(String, NodeSpec)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, spec)| (name, spec)))
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = Manifest;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping from node name to its declared attributes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut nodes = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, NodeSpec>()? {
                    nodes.push(entry);
                }
                Ok(Manifest(nodes))
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}

#[cfg(test)]
mod tests {
    include!("node.test.rs");
}
