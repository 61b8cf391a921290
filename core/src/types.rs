//! Domain DTOs for the salon admin API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Identifiers are opaque server-assigned strings. An `EntityId` is never
//! empty: records that have not been persisted yet are represented by
//! `Draft::New` instead of a sentinel id.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::Entity;

/// Returned when an identifier string is empty or all whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entity id must not be empty")]
pub struct EmptyId;

/// Server-assigned identifier of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyId);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EntityId {
    type Error = EmptyId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = EmptyId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An administrator account as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Admin {
    pub id: EntityId,
    pub name: String,
}

/// Editable fields of an admin. Sent as the body of create and update
/// requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminFields {
    pub name: String,
}

impl Entity for Admin {
    type Fields = AdminFields;

    const COLLECTION: &'static str = "admins";
    const LOAD_FAILED: &'static str = "Falha ao carregar administradores.";
    const SAVE_FAILED: &'static str = "Falha ao salvar administrador.";
    const DELETED: &'static str = "Administrador excluído com sucesso.";
    const DELETE_FAILED: &'static str = "Falha ao excluir administrador.";
    const NEW_TITLE: &'static str = "Novo Administrador";
    const EDIT_TITLE: &'static str = "Editar Administrador";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn fields(&self) -> AdminFields {
        AdminFields {
            name: self.name.clone(),
        }
    }

    fn saved_message(&self) -> String {
        format!("Administrador \"{}\" salvo com sucesso!", self.name)
    }

    fn check_fields(fields: &AdminFields) -> Result<(), String> {
        if fields.name.trim().is_empty() {
            return Err("O nome é obrigatório.".to_string());
        }
        Ok(())
    }
}

/// Which side of the application a successful login lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Admin,
}

/// Navigation targets of the admin area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppView {
    Schedule,
    Appointments,
    Calendar,
    Reports,
    Clients,
    Professionals,
    ServicesAdmin,
    Birthdays,
    SettingsAdmin,
    Admins,
    SettingsHub,
}
