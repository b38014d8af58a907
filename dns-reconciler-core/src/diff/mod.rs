//! Desired-vs-existing record comparison
//!
//! Providers consume the diff as three classified sets (creations,
//! deletions, modifications) and never look further into how it was built.

use std::collections::BTreeMap;

use crate::error::ModelResult;
use crate::types::{DomainConfig, RecordConfig};

/// Kind of change the diff engine classified a record pair as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Delete,
    Modify,
}

/// One classified difference between existing and desired state.
#[derive(Debug, Clone)]
pub struct Change {
    pub kind: ChangeKind,
    /// Record currently at the provider (`None` for creations).
    pub existing: Option<RecordConfig>,
    /// Record the configuration asks for (`None` for deletions).
    pub desired: Option<RecordConfig>,
}

impl Change {
    fn create(desired: RecordConfig) -> Self {
        Self {
            kind: ChangeKind::Create,
            existing: None,
            desired: Some(desired),
        }
    }

    fn delete(existing: RecordConfig) -> Self {
        Self {
            kind: ChangeKind::Delete,
            existing: Some(existing),
            desired: None,
        }
    }

    fn modify(existing: RecordConfig, desired: RecordConfig) -> Self {
        Self {
            kind: ChangeKind::Modify,
            existing: Some(existing),
            desired: Some(desired),
        }
    }
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.existing, &self.desired) {
            (None, Some(d)) => write!(f, "CREATE {d}"),
            (Some(e), None) => write!(f, "DELETE {e}"),
            (Some(e), Some(d)) => write!(
                f,
                "MODIFY {} {}: ({} ttl={}) -> ({} ttl={})",
                d.record_type,
                d.name_fqdn,
                e.target_combined(),
                e.ttl,
                d.target_combined(),
                d.ttl
            ),
            (None, None) => write!(f, "NOOP"),
        }
    }
}

/// The three result sets of a diff.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    pub create: Vec<Change>,
    pub delete: Vec<Change>,
    pub modify: Vec<Change>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.delete.is_empty() && self.modify.is_empty()
    }

    pub fn len(&self) -> usize {
        self.create.len() + self.delete.len() + self.modify.len()
    }
}

/// Diff engine Trait
pub trait Differ {
    /// Compares `existing` against the desired state this differ was built from.
    fn incremental_diff(&self, existing: &[RecordConfig]) -> ModelResult<Changeset>;
}

/// Default [`Differ`]: groups records by (label, type) and pairs them up.
///
/// Within a group, records identical in content and TTL are left alone,
/// records identical in content only become TTL modifications, remaining
/// records pair up in order as modifications and the rest become creations
/// or deletions.
pub struct IncrementalDiff {
    desired: Vec<RecordConfig>,
}

impl IncrementalDiff {
    pub fn new(dc: &DomainConfig) -> Self {
        Self {
            desired: dc.records.clone(),
        }
    }
}

type Group = (Vec<RecordConfig>, Vec<RecordConfig>);

impl Differ for IncrementalDiff {
    fn incremental_diff(&self, existing: &[RecordConfig]) -> ModelResult<Changeset> {
        let mut groups: BTreeMap<(String, String), Group> = BTreeMap::new();
        for rc in existing {
            groups.entry(rc.key()).or_default().0.push(rc.clone());
        }
        for rc in &self.desired {
            groups.entry(rc.key()).or_default().1.push(rc.clone());
        }

        let mut changes = Changeset::default();
        for (key, (mut current, mut wanted)) in groups {
            current.retain(|e| {
                let found = wanted
                    .iter()
                    .position(|d| same_content(e, d) && e.ttl == d.ttl);
                if let Some(pos) = found {
                    wanted.remove(pos);
                    false
                } else {
                    true
                }
            });

            let mut i = 0;
            while i < current.len() {
                let found = wanted.iter().position(|d| same_content(&current[i], d));
                if let Some(pos) = found {
                    let e = current.remove(i);
                    let d = wanted.remove(pos);
                    changes.modify.push(Change::modify(e, d));
                } else {
                    i += 1;
                }
            }

            let paired = current.len().min(wanted.len());
            for (e, d) in current.drain(..paired).zip(wanted.drain(..paired)) {
                changes.modify.push(Change::modify(e, d));
            }

            if !current.is_empty() || !wanted.is_empty() {
                log::debug!(
                    "diff {}/{}: {} to delete, {} to create",
                    key.0,
                    key.1,
                    current.len(),
                    wanted.len()
                );
            }
            changes.delete.extend(current.into_iter().map(Change::delete));
            changes.create.extend(wanted.into_iter().map(Change::create));
        }

        Ok(changes)
    }
}

fn same_content(a: &RecordConfig, b: &RecordConfig) -> bool {
    a.target_combined() == b.target_combined()
}
