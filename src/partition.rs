//! Partition registry: the connectivity groups built from relations.
//!
//! Groups live in an arena of slots addressed by [`GroupId`]. Each group keeps
//! its member names in order, entry point first. A chain of live group ids
//! gives the global iteration order, and a name index answers lookups without
//! walking the arena.
//!
//! ```text
//! chain:  [#0, #2]
//! slots:  #0 [Melbourne, Sydney]
//!         #1 []                       (vacant: absorbed by #2)
//!         #2 [Jerusalem, Haifa, Boston, Miami]
//! ```
//!
//! # Algorithm
//!
//! - Registering a relation looks up both names, then creates a group, adds
//!   the missing name to the other's group, or merges two groups.
//! - A merge vacates the absorbed slot, unlinks it from the chain and appends
//!   its members to the surviving group.
//!
//! # Complexity
//!
//! Lookup is O(1) through the index. A merge is linear in the absorbed group
//! plus the chain length. No union-by-rank or path compression.

use crate::relations::{Result, RouteError};
use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::fmt;

/// Identifier of a group slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a single `register` call did to the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Neither name existed; a new group was created.
    Created(GroupId),
    /// One name was new and joined the other's group.
    Joined(GroupId),
    /// Both names were already in the same group.
    AlreadyConnected(GroupId),
    /// Two groups became one.
    Merged { survivor: GroupId, absorbed: GroupId },
}

impl Registration {
    /// The group holding both names after registration.
    #[inline]
    pub fn group(&self) -> GroupId {
        match *self {
            Registration::Created(id)
            | Registration::Joined(id)
            | Registration::AlreadyConnected(id) => id,
            Registration::Merged { survivor, .. } => survivor,
        }
    }
}

/// One connectivity group. An empty member list marks a vacant slot.
#[derive(Debug, Default)]
struct Group {
    members: Vec<String>,
}

impl Group {
    #[inline]
    fn is_vacant(&self) -> bool {
        self.members.is_empty()
    }
}

/// The full collection of disjoint groups.
///
/// Invariant: every registered name is stored in exactly one group, and the
/// groups are the transitive closure of all registered relations.
#[derive(Debug, Default)]
pub struct Partition {
    slots: Vec<Group>,
    chain: Vec<GroupId>,
    index: FxHashMap<String, GroupId>,
    member_count: usize,
}

impl Partition {
    /// Create an empty partition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored names.
    #[inline]
    pub fn len(&self) -> usize {
        self.member_count
    }

    /// Check if no name is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.member_count == 0
    }

    /// Number of live groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.chain.len()
    }

    /// Check if a name is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Find the group containing `name`.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<GroupId> {
        self.index.get(name).copied()
    }

    /// Find the group containing `name` by walking every group and member.
    ///
    /// Visits groups in chain order and members in stored order. If a name is
    /// stored more than once the last occurrence wins. Chain order is creation
    /// order, oldest first, so the winning copy is the one in the newest
    /// group rather than the oldest. `register` never stores a name twice, so
    /// this agrees with [`Partition::lookup`].
    pub fn scan_lookup(&self, name: &str) -> Option<GroupId> {
        let mut found = None;
        for &id in &self.chain {
            for member in &self.slots[id.0].members {
                if member == name {
                    found = Some(id);
                }
            }
        }
        found
    }

    /// Register a direct relation between two names.
    ///
    /// Unknown names are created on demand. When both names are already
    /// known but in different groups, `from`'s group absorbs `to`'s.
    pub fn register(&mut self, from: &str, to: &str) -> Result<Registration> {
        let registration = match (self.lookup(from), self.lookup(to)) {
            (None, None) => {
                let id = self.new_group(from)?;
                if from != to {
                    self.add_member(id, to)?;
                }
                Registration::Created(id)
            }
            (None, Some(group)) => {
                self.add_member(group, from)?;
                Registration::Joined(group)
            }
            (Some(group), None) => {
                self.add_member(group, to)?;
                Registration::Joined(group)
            }
            (Some(g1), Some(g2)) if g1 == g2 => Registration::AlreadyConnected(g1),
            (Some(g1), Some(g2)) => {
                self.merge(g1, g2)?;
                Registration::Merged {
                    survivor: g1,
                    absorbed: g2,
                }
            }
        };
        trace!("{},{} -> {:?}", from, to, registration);
        Ok(registration)
    }

    /// Check whether two names are in the same group.
    ///
    /// Fails with [`RouteError::EntityNotFound`] for the first unknown name,
    /// checking `a` before `b`.
    pub fn same_group(&self, a: &str, b: &str) -> Result<bool> {
        let g1 = self.lookup(a).ok_or_else(|| not_found(a))?;
        let g2 = self.lookup(b).ok_or_else(|| not_found(b))?;
        Ok(g1 == g2)
    }

    /// Iterate over live groups in chain order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &[String])> + '_ {
        self.chain
            .iter()
            .map(move |&id| (id, self.slots[id.0].members.as_slice()))
    }

    /// Members of a live group, entry point first.
    pub fn members(&self, id: GroupId) -> Option<&[String]> {
        self.slots
            .get(id.0)
            .filter(|group| !group.is_vacant())
            .map(|group| group.members.as_slice())
    }

    /// Entry point of a live group.
    pub fn entry_point(&self, id: GroupId) -> Option<&str> {
        self.members(id)
            .and_then(|members| members.first())
            .map(String::as_str)
    }

    /// Release every member and group. Returns the number of names released.
    ///
    /// The partition is empty afterwards and its storage is freed.
    pub fn teardown(&mut self) -> usize {
        let released = self.member_count;
        let groups = self.chain.len();
        self.slots = Vec::new();
        self.chain = Vec::new();
        self.index = FxHashMap::default();
        self.member_count = 0;
        debug!("Released {} locations in {} groups", released, groups);
        released
    }

    /// Verify the structural invariants.
    ///
    /// Every name is stored exactly once, the index agrees with the stored
    /// groups, no live group is empty, and the chain lists exactly the live
    /// slots.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let live_slots = self.slots.iter().filter(|g| !g.is_vacant()).count();
        if live_slots != self.chain.len() {
            return Err(format!(
                "{} live slots but {} chained groups",
                live_slots,
                self.chain.len()
            ));
        }

        let mut seen: FxHashMap<&str, GroupId> = FxHashMap::default();
        for &id in &self.chain {
            let group = self
                .slots
                .get(id.0)
                .ok_or_else(|| format!("chain references missing slot {}", id))?;
            if group.is_vacant() {
                return Err(format!("chain references vacant slot {}", id));
            }
            for name in &group.members {
                if let Some(other) = seen.insert(name.as_str(), id) {
                    return Err(format!("'{}' stored in {} and {}", name, other, id));
                }
                if self.lookup(name) != Some(id) {
                    return Err(format!("index disagrees on '{}' in {}", name, id));
                }
            }
        }

        if seen.len() != self.member_count || self.index.len() != self.member_count {
            return Err(format!(
                "{} stored names, {} indexed, {} counted",
                seen.len(),
                self.index.len(),
                self.member_count
            ));
        }
        Ok(())
    }

    fn new_group(&mut self, entry: &str) -> Result<GroupId> {
        let stored = owned_name(entry)?;
        let key = owned_name(entry)?;
        let mut members = Vec::new();
        members.try_reserve(2)?;
        self.slots.try_reserve(1)?;
        self.chain.try_reserve(1)?;
        self.index.try_reserve(1)?;

        members.push(stored);
        let id = GroupId(self.slots.len());
        self.slots.push(Group { members });
        self.chain.push(id);
        self.index.insert(key, id);
        self.member_count += 1;
        Ok(id)
    }

    fn add_member(&mut self, id: GroupId, name: &str) -> Result<()> {
        let stored = owned_name(name)?;
        let key = owned_name(name)?;
        self.index.try_reserve(1)?;
        let group = &mut self.slots[id.0];
        group.members.try_reserve(1)?;

        group.members.push(stored);
        self.index.insert(key, id);
        self.member_count += 1;
        Ok(())
    }

    fn merge(&mut self, survivor: GroupId, absorbed: GroupId) -> Result<()> {
        let moved = self.slots[absorbed.0].members.len();
        self.slots[survivor.0].members.try_reserve(moved)?;

        if let Some(pos) = self.chain.iter().position(|&id| id == absorbed) {
            self.chain.remove(pos);
        }
        let names = std::mem::take(&mut self.slots[absorbed.0].members);
        for name in &names {
            if let Some(slot) = self.index.get_mut(name.as_str()) {
                *slot = survivor;
            }
        }
        self.slots[survivor.0].members.extend(names);

        debug!(
            "Merged group {} ({} locations) into {} ({} locations)",
            absorbed,
            moved,
            survivor,
            self.slots[survivor.0].members.len()
        );
        Ok(())
    }

    /// Store a name without any lookup, bypassing the no-duplicate guarantee.
    #[cfg(test)]
    fn push_unchecked(&mut self, id: GroupId, name: &str) {
        self.slots[id.0].members.push(name.to_string());
    }
}

/// Copy a name into fresh storage, reporting allocation failure.
fn owned_name(name: &str) -> Result<String> {
    let mut owned = String::new();
    owned.try_reserve_exact(name.len())?;
    owned.push_str(name);
    Ok(owned)
}

fn not_found(name: &str) -> RouteError {
    RouteError::EntityNotFound {
        name: name.to_string(),
    }
}
