use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;

/// Id-keyed records plus an owner index and a most-recently-touched order.
///
/// Every upsert moves the id to the front of the order list.
#[derive(Debug)]
pub(crate) struct RecencyTable<T> {
    records: HashMap<Uuid, T>,
    by_owner: HashMap<String, Vec<Uuid>>,
    order: VecDeque<Uuid>,
}

impl<T> Default for RecencyTable<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            by_owner: HashMap::new(),
            order: VecDeque::new(),
        }
    }
}

impl<T: Clone> RecencyTable<T> {
    pub(crate) fn contains(&self, id: &Uuid) -> bool {
        self.records.contains_key(id)
    }

    pub(crate) fn get(&self, id: &Uuid) -> Option<T> {
        self.records.get(id).cloned()
    }

    pub(crate) fn upsert(&mut self, id: Uuid, owner: &str, record: T) {
        if self.records.insert(id, record).is_none() {
            self.by_owner.entry(owner.to_string()).or_default().push(id);
        }
        self.touch(id);
    }

    fn touch(&mut self, id: Uuid) {
        self.order.retain(|existing| *existing != id);
        self.order.push_front(id);
    }

    pub(crate) fn recent(&self) -> Vec<T> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }

    pub(crate) fn recent_for_owner(&self, owner: &str) -> Vec<T> {
        let Some(ids) = self.by_owner.get(owner) else {
            return Vec::new();
        };
        let ids: HashSet<&Uuid> = ids.iter().collect();
        self.order
            .iter()
            .filter(|id| ids.contains(id))
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }
}
