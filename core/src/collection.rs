//! Ordered, id-keyed local view of a remote collection.
//!
//! Records live in a `Vec` in display order; a side index maps each id to
//! its slot. Updates overwrite the slot so the record keeps its position,
//! and no two slots ever share an id.

use std::collections::HashMap;

use crate::entity::Entity;
use crate::types::EntityId;

/// What `upsert` did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Appended,
    Replaced { position: usize },
}

#[derive(Debug, Clone)]
pub struct Collection<E> {
    items: Vec<E>,
    index: HashMap<EntityId, usize>,
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<E: Entity> Collection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from server order. A repeated id overwrites the
    /// earlier record in place.
    pub fn from_records(records: impl IntoIterator<Item = E>) -> Self {
        let mut collection = Self::new();
        for record in records {
            collection.upsert(record);
        }
        collection
    }

    /// Appends a record with an unseen id, otherwise replaces the record with
    /// the same id where it stands.
    pub fn upsert(&mut self, record: E) -> Upsert {
        if let Some(&position) = self.index.get(record.id()) {
            self.items[position] = record;
            return Upsert::Replaced { position };
        }
        self.index.insert(record.id().clone(), self.items.len());
        self.items.push(record);
        Upsert::Appended
    }

    /// Replaces an existing record in place. Returns the record back if its
    /// id is not present.
    pub fn replace(&mut self, record: E) -> Result<usize, E> {
        match self.index.get(record.id()) {
            Some(&position) => {
                self.items[position] = record;
                Ok(position)
            }
            None => Err(record),
        }
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<E> {
        let position = self.index.remove(id)?;
        let removed = self.items.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: &EntityId) -> Option<&E> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.items.iter().map(E::id)
    }
}

impl<'a, E: Entity> IntoIterator for &'a Collection<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Admin;

    fn admin(id: &str, name: &str) -> Admin {
        Admin {
            id: EntityId::new(id).unwrap(),
            name: name.to_string(),
        }
    }

    fn id(raw: &str) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    fn names(collection: &Collection<Admin>) -> Vec<&str> {
        collection.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn upsert_appends_new_and_replaces_known() {
        let mut admins = Collection::new();
        assert_eq!(admins.upsert(admin("1", "Ana")), Upsert::Appended);
        assert_eq!(admins.upsert(admin("2", "Bia")), Upsert::Appended);
        assert_eq!(
            admins.upsert(admin("1", "Ana Maria")),
            Upsert::Replaced { position: 0 }
        );
        assert_eq!(names(&admins), vec!["Ana Maria", "Bia"]);
    }

    #[test]
    fn replace_refuses_unknown_ids() {
        let mut admins = Collection::from_records([admin("1", "Ana")]);
        let rejected = admins.replace(admin("9", "Zoe")).unwrap_err();
        assert_eq!(rejected.name, "Zoe");
        assert_eq!(admins.len(), 1);
    }

    #[test]
    fn remove_reindexes_later_records() {
        let mut admins =
            Collection::from_records([admin("1", "Ana"), admin("2", "Bia"), admin("3", "Cris")]);
        let removed = admins.remove(&id("1")).unwrap();
        assert_eq!(removed.name, "Ana");
        assert_eq!(admins.position(&id("2")), Some(0));
        assert_eq!(admins.position(&id("3")), Some(1));
        assert_eq!(admins.get(&id("3")).unwrap().name, "Cris");
        assert!(admins.remove(&id("1")).is_none());
    }

    #[test]
    fn duplicate_ids_from_server_collapse_in_place() {
        let admins =
            Collection::from_records([admin("1", "Ana"), admin("2", "Bia"), admin("1", "Ana 2")]);
        assert_eq!(names(&admins), vec!["Ana 2", "Bia"]);
    }
}
