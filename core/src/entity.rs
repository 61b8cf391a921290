//! The managed-resource abstraction shared by the client, the synchronizer
//! and the list screens.
//!
//! # Design
//! An `Entity` is a persisted record with a server-assigned id. Its editable
//! part is `Entity::Fields`, which is also the JSON body sent on create and
//! update. A record being edited is a `Draft`: either brand new (no id yet)
//! or a copy of an existing record. Keeping the distinction in the type
//! means "create or update" is decided by matching, not by inspecting an id
//! string.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::EntityId;

/// A resource type managed through a CRUD screen.
///
/// The associated constants carry the user-facing toast messages and modal
/// titles for the resource.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned {
    type Fields: Clone + fmt::Debug + Default + PartialEq + Serialize;

    /// Path segment of the collection, e.g. `admins` for `/admins`.
    const COLLECTION: &'static str;
    const LOAD_FAILED: &'static str;
    const SAVE_FAILED: &'static str;
    const DELETED: &'static str;
    const DELETE_FAILED: &'static str;
    const NEW_TITLE: &'static str;
    const EDIT_TITLE: &'static str;

    fn id(&self) -> &EntityId;

    fn fields(&self) -> Self::Fields;

    /// Success toast shown after this record was saved.
    fn saved_message(&self) -> String;

    /// Local checks run before a draft may be submitted. The error string is
    /// shown inline in the modal, never as a toast.
    fn check_fields(_fields: &Self::Fields) -> Result<(), String> {
        Ok(())
    }
}

/// A record bound to the edit/create modal.
#[derive(Debug, Clone, PartialEq)]
pub enum Draft<E: Entity> {
    New(E::Fields),
    Existing { id: EntityId, fields: E::Fields },
}

impl<E: Entity> Draft<E> {
    pub fn empty() -> Self {
        Draft::New(E::Fields::default())
    }

    pub fn from_entity(entity: &E) -> Self {
        Draft::Existing {
            id: entity.id().clone(),
            fields: entity.fields(),
        }
    }

    pub fn id(&self) -> Option<&EntityId> {
        match self {
            Draft::New(_) => None,
            Draft::Existing { id, .. } => Some(id),
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Draft::New(_))
    }

    pub fn fields(&self) -> &E::Fields {
        match self {
            Draft::New(fields) | Draft::Existing { fields, .. } => fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut E::Fields {
        match self {
            Draft::New(fields) | Draft::Existing { fields, .. } => fields,
        }
    }

    /// Modal title for this draft.
    pub fn title(&self) -> &'static str {
        if self.is_new() {
            E::NEW_TITLE
        } else {
            E::EDIT_TITLE
        }
    }
}
