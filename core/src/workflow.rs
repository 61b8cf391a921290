//! Modal state machines that gate edits and deletions.
//!
//! # Design
//! `EditModal` walks `Closed → Open → Submitting` and back; `DeleteConfirmation`
//! walks `Idle → Pending → Idle`. Both move only on explicit user intent,
//! except that a save resolution closes or reopens the edit modal.
//!
//! Confirming hands out the token and closes the dialog at once. The
//! in-flight delete is tracked per row by the synchronizer, so another row's
//! delete can be requested while the first one is still running.
//!
//! A remote delete can only be started with a `ConfirmedDelete`, and the
//! only way to obtain one is `DeleteConfirmation::confirm`. There is no
//! code path that deletes without passing through the dialog.

use crate::entity::{Draft, Entity};
use crate::error::WorkflowError;
use crate::types::EntityId;

/// Inline message when a submit is refused because another save is running.
pub const SAVE_BUSY: &str = "Aguarde o salvamento em andamento.";
/// Inline message when the edited record is being deleted.
pub const DELETE_BUSY: &str = "Este registro está sendo excluído.";

/// Edit/create modal.
#[derive(Debug, Clone, PartialEq)]
pub enum EditModal<E: Entity> {
    Closed,
    Open {
        draft: Draft<E>,
        /// Inline message from the last rejected submit.
        error: Option<String>,
    },
    Submitting {
        draft: Draft<E>,
    },
}

impl<E: Entity> Default for EditModal<E> {
    fn default() -> Self {
        EditModal::Closed
    }
}

impl<E: Entity> EditModal<E> {
    pub fn open_new(&mut self) -> Result<(), WorkflowError> {
        self.open(Draft::empty())
    }

    pub fn open_edit(&mut self, entity: &E) -> Result<(), WorkflowError> {
        self.open(Draft::from_entity(entity))
    }

    fn open(&mut self, draft: Draft<E>) -> Result<(), WorkflowError> {
        if !matches!(self, EditModal::Closed) {
            return Err(self.invalid("open the editor"));
        }
        tracing::debug!(new = draft.is_new(), "editor opened");
        *self = EditModal::Open { draft, error: None };
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, EditModal::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, EditModal::Submitting { .. })
    }

    pub fn draft(&self) -> Option<&Draft<E>> {
        match self {
            EditModal::Closed => None,
            EditModal::Open { draft, .. } | EditModal::Submitting { draft } => Some(draft),
        }
    }

    /// Fields can only be edited while the form is open and idle.
    pub fn fields_mut(&mut self) -> Option<&mut E::Fields> {
        match self {
            EditModal::Open { draft, error } => {
                *error = None;
                Some(draft.fields_mut())
            }
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            EditModal::Open { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        self.draft().map(Draft::title)
    }

    /// Moves `Open → Submitting` and hands back the draft to send. Local
    /// field checks failing keeps the modal open with an inline message.
    pub fn submit(&mut self) -> Result<Draft<E>, WorkflowError> {
        let EditModal::Open { draft, error } = self else {
            return Err(self.invalid("submit"));
        };
        if let Err(message) = E::check_fields(draft.fields()) {
            *error = Some(message.clone());
            return Err(WorkflowError::Invalid(message));
        }
        let draft = draft.clone();
        *self = EditModal::Submitting {
            draft: draft.clone(),
        };
        Ok(draft)
    }

    /// User dismissed the modal. An in-flight save keeps running.
    pub fn cancel(&mut self) {
        if self.is_open() {
            tracing::debug!(submitting = self.is_submitting(), "editor closed");
        }
        *self = EditModal::Closed;
    }

    /// Applies the outcome of the save started by `submit`. If the user
    /// already closed the modal it stays closed.
    pub fn resolve(&mut self, saved: bool) {
        if let EditModal::Submitting { draft } = self {
            *self = if saved {
                EditModal::Closed
            } else {
                EditModal::Open {
                    draft: draft.clone(),
                    error: None,
                }
            };
        }
    }

    /// Returns a submitted draft to the open form with an inline message,
    /// for submits refused before any request was sent.
    pub fn reject(&mut self, message: impl Into<String>) {
        if let EditModal::Submitting { draft } = self {
            *self = EditModal::Open {
                draft: draft.clone(),
                error: Some(message.into()),
            };
        }
    }

    fn invalid(&self, action: &'static str) -> WorkflowError {
        let state = match self {
            EditModal::Closed => "the editor is closed",
            EditModal::Open { .. } => "the editor is open",
            EditModal::Submitting { .. } => "a save is in flight",
        };
        WorkflowError::InvalidTransition { action, state }
    }
}

/// Proof that the user confirmed deleting `id`.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: EntityId,
}

impl ConfirmedDelete {
    pub fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Delete confirmation dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteConfirmation {
    #[default]
    Idle,
    Pending(EntityId),
}

impl DeleteConfirmation {
    /// Stages `id` and opens the dialog, replacing any earlier target.
    pub fn request(&mut self, id: EntityId) {
        tracing::debug!(%id, "delete requested");
        *self = DeleteConfirmation::Pending(id);
    }

    /// Closes the dialog without deleting. Returns false if there was no
    /// open dialog.
    pub fn cancel(&mut self) -> bool {
        if let DeleteConfirmation::Pending(_) = self {
            *self = DeleteConfirmation::Idle;
            return true;
        }
        false
    }

    /// Closes the dialog and hands out the token for the staged target.
    pub fn confirm(&mut self) -> Result<ConfirmedDelete, WorkflowError> {
        match std::mem::take(self) {
            DeleteConfirmation::Pending(id) => Ok(ConfirmedDelete { id }),
            DeleteConfirmation::Idle => Err(WorkflowError::InvalidTransition {
                action: "confirm",
                state: "no delete is pending",
            }),
        }
    }

    pub fn is_dialog_open(&self) -> bool {
        matches!(self, DeleteConfirmation::Pending(_))
    }

    pub fn target(&self) -> Option<&EntityId> {
        match self {
            DeleteConfirmation::Idle => None,
            DeleteConfirmation::Pending(id) => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Admin, AdminFields};

    fn ana() -> Admin {
        Admin {
            id: EntityId::new("7").unwrap(),
            name: "Ana".to_string(),
        }
    }

    #[test]
    fn editor_round_trip_through_failed_and_successful_save() {
        let mut modal = EditModal::<Admin>::default();
        modal.open_edit(&ana()).unwrap();
        modal.fields_mut().unwrap().name = "Ana Paula".to_string();

        let draft = modal.submit().unwrap();
        assert_eq!(draft.fields().name, "Ana Paula");
        assert!(modal.is_submitting());
        assert!(modal.fields_mut().is_none());

        modal.resolve(false);
        assert_eq!(modal.draft().unwrap().fields().name, "Ana Paula");
        assert!(!modal.is_submitting());

        modal.submit().unwrap();
        modal.resolve(true);
        assert_eq!(modal, EditModal::Closed);
    }

    #[test]
    fn blank_name_keeps_editor_open_with_inline_error() {
        let mut modal = EditModal::<Admin>::default();
        modal.open_new().unwrap();
        let err = modal.submit().unwrap_err();
        assert_eq!(err, WorkflowError::Invalid("O nome é obrigatório.".to_string()));
        assert_eq!(modal.error(), Some("O nome é obrigatório."));

        *modal.fields_mut().unwrap() = AdminFields {
            name: "Ana".to_string(),
        };
        assert_eq!(modal.error(), None);
        assert!(modal.submit().is_ok());
    }

    #[test]
    fn closing_during_submit_stays_closed_after_failure() {
        let mut modal = EditModal::<Admin>::default();
        modal.open_edit(&ana()).unwrap();
        modal.submit().unwrap();
        modal.cancel();
        modal.resolve(false);
        assert_eq!(modal, EditModal::Closed);
    }

    #[test]
    fn rejected_submit_reopens_with_message() {
        let mut modal = EditModal::<Admin>::default();
        modal.open_edit(&ana()).unwrap();
        let draft = modal.submit().unwrap();
        modal.reject(SAVE_BUSY);
        assert_eq!(modal.error(), Some(SAVE_BUSY));
        assert_eq!(modal.draft(), Some(&draft));

        modal.cancel();
        modal.reject(SAVE_BUSY);
        assert_eq!(modal, EditModal::Closed);
    }

    #[test]
    fn cannot_open_twice_or_submit_closed() {
        let mut modal = EditModal::<Admin>::default();
        assert!(matches!(
            modal.submit(),
            Err(WorkflowError::InvalidTransition { .. })
        ));
        modal.open_new().unwrap();
        assert!(matches!(
            modal.open_edit(&ana()),
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn confirm_hands_out_token_and_closes_dialog() {
        let mut dialog = DeleteConfirmation::default();
        assert!(dialog.confirm().is_err());

        dialog.request(EntityId::new("7").unwrap());
        assert!(dialog.is_dialog_open());

        let token = dialog.confirm().unwrap();
        assert_eq!(token.id().as_str(), "7");
        assert_eq!(dialog, DeleteConfirmation::Idle);
        assert!(dialog.confirm().is_err());

        dialog.request(EntityId::new("8").unwrap());
        assert_eq!(dialog.target().map(EntityId::as_str), Some("8"));
    }

    #[test]
    fn cancel_clears_pending_target() {
        let mut dialog = DeleteConfirmation::default();
        dialog.request(EntityId::new("7").unwrap());
        assert!(dialog.cancel());
        assert_eq!(dialog.target(), None);
        assert!(!dialog.cancel());
    }
}
