//! A CRUD list screen: the synchronizer plus its two modals.
//!
//! The screen owns its collection, editing draft and deletion target; no
//! other screen shares them. User intents map one-to-one onto methods, and
//! every remote step is exposed both as a `begin_*`/`complete_*` pair and
//! as an async method that runs one whole cycle.

use crate::api::EntityApi;
use crate::collection::Collection;
use crate::entity::Entity;
use crate::error::{ApiError, WorkflowError};
use crate::sync::{DeleteOutcome, PendingDelete, PendingLoad, PendingSave, SaveOutcome, Synchronizer};
use crate::toast::ToastBus;
use crate::types::EntityId;
use crate::workflow::{DeleteConfirmation, EditModal, DELETE_BUSY, SAVE_BUSY};

/// One rendered row.
#[derive(Debug)]
pub struct Row<'a, E> {
    pub entity: &'a E,
    /// Shows a spinner on this row's delete button.
    pub deleting: bool,
}

#[derive(Debug)]
pub struct EntityListScreen<E: Entity> {
    sync: Synchronizer<E>,
    editor: EditModal<E>,
    deletion: DeleteConfirmation,
}

impl<E: Entity> EntityListScreen<E> {
    pub fn new(toasts: ToastBus) -> Self {
        Self {
            sync: Synchronizer::new(toasts),
            editor: EditModal::Closed,
            deletion: DeleteConfirmation::Idle,
        }
    }

    pub fn items(&self) -> &Collection<E> {
        self.sync.items()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_, E>> {
        self.sync.items().iter().map(|entity| Row {
            entity,
            deleting: self.sync.is_deleting(entity.id()),
        })
    }

    pub fn is_loading(&self) -> bool {
        self.sync.is_loading()
    }

    pub fn is_submitting(&self) -> bool {
        self.sync.is_submitting()
    }

    pub fn is_deleting(&self, id: &EntityId) -> bool {
        self.sync.is_deleting(id)
    }

    pub fn editor(&self) -> &EditModal<E> {
        &self.editor
    }

    pub fn deletion(&self) -> &DeleteConfirmation {
        &self.deletion
    }

    pub fn toasts(&self) -> &ToastBus {
        self.sync.toasts()
    }

    // --- load ---

    pub fn begin_load(&mut self) -> Result<PendingLoad, WorkflowError> {
        self.sync.begin_load()
    }

    pub fn complete_load(&mut self, pending: PendingLoad, result: Result<Vec<E>, ApiError>) {
        self.sync.complete_load(pending, result);
    }

    /// Loads the collection once for this mount.
    pub async fn mount<A: EntityApi<E>>(&mut self, api: &A) -> Result<(), WorkflowError> {
        self.sync.load(api).await
    }

    // --- add / edit ---

    pub fn open_add(&mut self) -> Result<(), WorkflowError> {
        self.editor.open_new()
    }

    pub fn open_edit(&mut self, id: &EntityId) -> Result<(), WorkflowError> {
        let entity = self
            .sync
            .get(id)
            .ok_or_else(|| WorkflowError::UnknownEntity(id.clone()))?;
        self.editor.open_edit(entity)
    }

    pub fn edit_fields(&mut self) -> Option<&mut E::Fields> {
        self.editor.fields_mut()
    }

    pub fn close_editor(&mut self) {
        self.editor.cancel();
    }

    /// Submits the open editor. A submit refused by the synchronizer
    /// leaves the editor open with an inline message and sends nothing.
    pub fn begin_save(&mut self) -> Result<PendingSave<E>, WorkflowError> {
        let draft = self.editor.submit()?;
        self.sync.begin_save(draft).inspect_err(|err| {
            self.editor.reject(refusal_message(err));
        })
    }

    pub fn complete_save(
        &mut self,
        pending: PendingSave<E>,
        result: Result<E, ApiError>,
    ) -> SaveOutcome<E> {
        let outcome = self.sync.complete_save(pending, result);
        if self.sync.is_mounted() {
            self.editor.resolve(outcome.is_saved());
        }
        outcome
    }

    /// Submits the open editor and waits for the result.
    pub async fn save<A: EntityApi<E>>(&mut self, api: &A) -> Result<SaveOutcome<E>, WorkflowError> {
        let pending = self.begin_save()?;
        let result = api.save(pending.draft()).await;
        Ok(self.complete_save(pending, result))
    }

    // --- delete ---

    /// Opens the confirmation dialog for `id`. Rows whose delete is already
    /// running are refused; other rows stay available.
    pub fn request_delete(&mut self, id: &EntityId) -> Result<(), WorkflowError> {
        if !self.sync.items().contains(id) {
            return Err(WorkflowError::UnknownEntity(id.clone()));
        }
        if self.sync.is_deleting(id) {
            return Err(WorkflowError::DeleteInFlight(id.clone()));
        }
        self.deletion.request(id.clone());
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.deletion.cancel()
    }

    /// Confirms the open dialog, which closes it, and starts the delete.
    pub fn begin_delete(&mut self) -> Result<PendingDelete, WorkflowError> {
        let confirmed = self.deletion.confirm()?;
        self.sync.begin_delete(confirmed)
    }

    pub fn complete_delete(
        &mut self,
        pending: PendingDelete,
        result: Result<(), ApiError>,
    ) -> DeleteOutcome {
        self.sync.complete_delete(pending, result)
    }

    /// Confirms the pending delete and waits for the result.
    pub async fn confirm_delete<A: EntityApi<E>>(
        &mut self,
        api: &A,
    ) -> Result<DeleteOutcome, WorkflowError> {
        let pending = self.begin_delete()?;
        let result = api.delete(pending.id()).await;
        Ok(self.complete_delete(pending, result))
    }

    /// Tears the screen down. In-flight requests still resolve but no longer
    /// touch this screen's list or modals.
    pub fn unmount(&mut self) {
        self.sync.unmount();
        tracing::debug!(collection = E::COLLECTION, "screen unmounted");
    }
}

fn refusal_message(err: &WorkflowError) -> String {
    match err {
        WorkflowError::SaveInFlight => SAVE_BUSY.to_string(),
        WorkflowError::DeleteInFlight(_) => DELETE_BUSY.to_string(),
        other => other.to_string(),
    }
}
