//! Identity-keyed entity reconciliation
//!
//! One [`Registry`] per dynamic entity class. Each snapshot's list is
//! reconciled against it: unseen ids get a new element, every listed id gets
//! its per-tick attributes, and ids missing from the list are destroyed.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use super::surface::{Attributes, ElementKind, Surface};

/// Counts from one reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub reordered: bool,
}

/// Owner of the on-screen elements of one entity class
#[derive(Debug)]
pub struct Registry<K, H> {
    kind: ElementKind,
    /// Applied once, right after creation (static tags, fixed sizes)
    setup: Attributes,
    entries: BTreeMap<K, H>,
    /// Ids in display order
    order: Vec<K>,
}

impl<K, H> Registry<K, H>
where
    K: Ord + Clone + Debug,
{
    pub fn new(kind: ElementKind, setup: Attributes) -> Self {
        Self {
            kind,
            setup,
            entries: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &K) -> Option<&H> {
        self.entries.get(id)
    }

    /// Ids in display order
    pub fn ids(&self) -> &[K] {
        &self.order
    }

    /// Bring the registry in line with `incoming`.
    ///
    /// Afterwards the registry holds exactly one element per distinct id in
    /// `incoming`. A repeated id is applied in list order, so the last
    /// occurrence wins.
    pub fn reconcile<S, I>(&mut self, surface: &mut S, incoming: I) -> ReconcileReport
    where
        S: Surface<Handle = H>,
        I: IntoIterator<Item = (K, Attributes)>,
    {
        let mut report = ReconcileReport::default();
        let mut seen: Vec<K> = Vec::new();
        let mut seen_set: BTreeSet<K> = BTreeSet::new();
        let mut fresh: Vec<K> = Vec::new();

        for (id, attrs) in incoming {
            if !self.entries.contains_key(&id) {
                let handle = match surface.create(self.kind) {
                    Ok(handle) => handle,
                    Err(err) => {
                        log::warn!("{:?} {:?} not created: {}", self.kind, id, err);
                        continue;
                    }
                };
                surface.set_attributes(&handle, &self.setup);
                self.entries.insert(id.clone(), handle);
                fresh.push(id.clone());
                report.created += 1;
            } else if !seen_set.contains(&id) {
                report.updated += 1;
            }

            if let Some(handle) = self.entries.get(&id) {
                surface.set_attributes(handle, &attrs);
            }
            if seen_set.insert(id.clone()) {
                seen.push(id);
            }
        }

        let stale: Vec<K> = self
            .entries
            .keys()
            .filter(|id| !seen_set.contains(*id))
            .cloned()
            .collect();
        for id in stale {
            if let Some(handle) = self.entries.remove(&id) {
                surface.destroy(handle);
                report.removed += 1;
            }
        }

        // Survivors keep their slots and new elements were appended; only
        // touch the surface when that differs from the incoming order.
        let displayed: Vec<&K> = self
            .order
            .iter()
            .filter(|id| seen_set.contains(*id))
            .chain(fresh.iter())
            .collect();
        if !displayed.iter().copied().eq(seen.iter()) {
            let handles: Vec<&H> = seen.iter().filter_map(|id| self.entries.get(id)).collect();
            surface.reorder(&handles);
            report.reordered = true;
        }
        self.order = seen;

        report
    }
}
