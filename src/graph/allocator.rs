//! Ids for entities invented by fixups.
//!
//! Allocation is memoized by `(kind, name)`: asking again for a name returns the id it got the
//! first time, so numeric constants that downstream code keeps for synthetic entities stay valid
//! when the pipeline runs more than once in a process.

use std::collections::{BTreeSet, HashMap};

/// Id namespace of a synthetic entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticKind {
    Category,
    Group,
    Type,
    /// Aggregate attributes of the warfare buffs entity
    WarfareBuffAttribute,
    Attribute,
    Effect,
}

impl SyntheticKind {
    /// First id handed out for the kind
    pub const fn first_id(self) -> i32 {
        match self {
            SyntheticKind::Category => 1_000_000,
            SyntheticKind::Group => 1_000_000,
            SyntheticKind::Type => 1_000_000,
            SyntheticKind::WarfareBuffAttribute => 1_000_000,
            SyntheticKind::Attribute => 1_100_000,
            SyntheticKind::Effect => 1_000_000,
        }
    }
}

#[derive(Debug, Default)]
struct Namespace {
    by_name: HashMap<String, i32>,
    issued: BTreeSet<i32>,
}

/// Memoizing allocator of synthetic ids, one namespace per [`SyntheticKind`]
#[derive(Debug, Default)]
pub struct SyntheticIds {
    namespaces: HashMap<SyntheticKind, Namespace>,
}

impl SyntheticIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `(kind, name)`, reserving the next free one on first use
    ///
    /// `is_taken` reports ids already present in the graph; they are skipped along with every
    /// id this allocator has issued for the kind.
    pub fn allocate(
        &mut self,
        kind: SyntheticKind,
        name: &str,
        is_taken: impl Fn(i32) -> bool,
    ) -> i32 {
        let namespace = self.namespaces.entry(kind).or_default();
        if let Some(id) = namespace.by_name.get(name) {
            return *id;
        }

        let mut id = kind.first_id();
        while namespace.issued.contains(&id) || is_taken(id) {
            id += 1;
        }
        namespace.issued.insert(id);
        namespace.by_name.insert(name.to_string(), id);
        id
    }

    /// Id previously allocated for `(kind, name)`
    pub fn get(&self, kind: SyntheticKind, name: &str) -> Option<i32> {
        self.namespaces.get(&kind)?.by_name.get(name).copied()
    }
}
