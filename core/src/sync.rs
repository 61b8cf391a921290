//! Keeps a screen's local list consistent with the remote collection.
//!
//! # Design
//! The local list is only ever mutated when a remote call resolves, never
//! before, so a failed request leaves nothing to roll back. Each operation
//! is split into `begin_*`, which checks and raises the busy flag and hands
//! out a ticket, and `complete_*`, which consumes the ticket together with
//! the API result. Between the two the caller awaits the network; other
//! operations may begin and complete in the meantime, which is how a delete
//! on one row and a save on another interleave on a single-threaded loop.
//!
//! Every resolution emits exactly one toast, after the list mutation. Once
//! the owning screen unmounts, resolutions still clear their busy flags and
//! still notify (the toast bus outlives screens) but leave the list alone.

use std::collections::HashSet;

use crate::api::EntityApi;
use crate::collection::Collection;
use crate::entity::{Draft, Entity};
use crate::error::{ApiError, WorkflowError};
use crate::toast::ToastBus;
use crate::types::EntityId;
use crate::workflow::ConfirmedDelete;

/// Ticket for an in-flight load.
#[derive(Debug)]
#[must_use]
pub struct PendingLoad {
    _private: (),
}

/// Ticket for an in-flight save.
#[derive(Debug)]
#[must_use]
pub struct PendingSave<E: Entity> {
    draft: Draft<E>,
}

impl<E: Entity> PendingSave<E> {
    pub fn draft(&self) -> &Draft<E> {
        &self.draft
    }
}

/// Ticket for an in-flight delete.
#[derive(Debug)]
#[must_use]
pub struct PendingDelete {
    id: EntityId,
}

impl PendingDelete {
    pub fn id(&self) -> &EntityId {
        &self.id
    }
}

#[derive(Debug)]
pub enum SaveOutcome<E> {
    Saved(E),
    Failed(ApiError),
}

impl<E> SaveOutcome<E> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    Failed(ApiError),
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    NotStarted,
    InFlight,
    Done,
}

#[derive(Debug)]
pub struct Synchronizer<E: Entity> {
    items: Collection<E>,
    load: LoadState,
    /// `Some` while a save is in flight; holds the target id for updates.
    saving: Option<Option<EntityId>>,
    deleting: HashSet<EntityId>,
    mounted: bool,
    toasts: ToastBus,
}

impl<E: Entity> Synchronizer<E> {
    pub fn new(toasts: ToastBus) -> Self {
        Self {
            items: Collection::new(),
            load: LoadState::NotStarted,
            saving: None,
            deleting: HashSet::new(),
            mounted: true,
            toasts,
        }
    }

    pub fn items(&self) -> &Collection<E> {
        &self.items
    }

    pub fn get(&self, id: &EntityId) -> Option<&E> {
        self.items.get(id)
    }

    /// True until the initial load has resolved.
    pub fn is_loading(&self) -> bool {
        self.load != LoadState::Done
    }

    pub fn is_submitting(&self) -> bool {
        self.saving.is_some()
    }

    pub fn is_deleting(&self, id: &EntityId) -> bool {
        self.deleting.contains(id)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn toasts(&self) -> &ToastBus {
        &self.toasts
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn begin_load(&mut self) -> Result<PendingLoad, WorkflowError> {
        self.ensure_mounted()?;
        if self.load != LoadState::NotStarted {
            return Err(WorkflowError::AlreadyLoaded);
        }
        self.load = LoadState::InFlight;
        tracing::debug!(collection = E::COLLECTION, "loading");
        Ok(PendingLoad { _private: () })
    }

    pub fn complete_load(&mut self, _pending: PendingLoad, result: Result<Vec<E>, ApiError>) {
        self.load = LoadState::Done;
        match result {
            Ok(records) => {
                if !self.mounted {
                    tracing::warn!(collection = E::COLLECTION, "load resolved after unmount");
                    return;
                }
                self.items = Collection::from_records(records);
                tracing::info!(collection = E::COLLECTION, count = self.items.len(), "loaded");
            }
            Err(error) => {
                tracing::warn!(collection = E::COLLECTION, %error, "load failed");
                self.toasts.error(E::LOAD_FAILED);
            }
        }
    }

    pub fn begin_save(&mut self, draft: Draft<E>) -> Result<PendingSave<E>, WorkflowError> {
        self.ensure_mounted()?;
        if self.saving.is_some() {
            return Err(WorkflowError::SaveInFlight);
        }
        if let Some(id) = draft.id() {
            if self.deleting.contains(id) {
                return Err(WorkflowError::DeleteInFlight(id.clone()));
            }
        }
        self.saving = Some(draft.id().cloned());
        tracing::debug!(collection = E::COLLECTION, new = draft.is_new(), "saving");
        Ok(PendingSave { draft })
    }

    pub fn complete_save(
        &mut self,
        pending: PendingSave<E>,
        result: Result<E, ApiError>,
    ) -> SaveOutcome<E> {
        self.saving = None;
        match result {
            Ok(saved) => {
                if self.mounted {
                    self.apply_saved(&pending.draft, saved.clone());
                } else {
                    tracing::warn!(id = %saved.id(), "save resolved after unmount");
                }
                self.toasts.success(saved.saved_message());
                SaveOutcome::Saved(saved)
            }
            Err(error) => {
                tracing::warn!(collection = E::COLLECTION, %error, "save failed");
                self.toasts.error(E::SAVE_FAILED);
                SaveOutcome::Failed(error)
            }
        }
    }

    fn apply_saved(&mut self, draft: &Draft<E>, saved: E) {
        match draft {
            Draft::New(_) => {
                tracing::info!(id = %saved.id(), "created");
                self.items.upsert(saved);
            }
            Draft::Existing { id, .. } => {
                if id != saved.id() {
                    tracing::warn!(requested = %id, returned = %saved.id(), "update returned another id");
                }
                let saved_id = saved.id().clone();
                match self.items.replace(saved) {
                    Ok(position) => tracing::info!(id = %saved_id, position, "updated"),
                    Err(_) => tracing::warn!(id = %saved_id, "updated record is no longer listed"),
                }
            }
        }
    }

    /// Starts a delete. Only callable with a token from the confirmation
    /// dialog.
    pub fn begin_delete(&mut self, confirmed: ConfirmedDelete) -> Result<PendingDelete, WorkflowError> {
        self.ensure_mounted()?;
        let id = confirmed.id().clone();
        if self.deleting.contains(&id) {
            return Err(WorkflowError::DeleteInFlight(id));
        }
        if self.saving.as_ref().is_some_and(|target| target.as_ref() == Some(&id)) {
            return Err(WorkflowError::SaveInFlight);
        }
        if !self.items.contains(&id) {
            return Err(WorkflowError::UnknownEntity(id));
        }
        self.deleting.insert(id.clone());
        tracing::debug!(collection = E::COLLECTION, %id, "deleting");
        Ok(PendingDelete { id })
    }

    pub fn complete_delete(
        &mut self,
        pending: PendingDelete,
        result: Result<(), ApiError>,
    ) -> DeleteOutcome {
        self.deleting.remove(&pending.id);
        match result {
            Ok(()) => {
                if self.mounted {
                    self.items.remove(&pending.id);
                } else {
                    tracing::warn!(id = %pending.id, "delete resolved after unmount");
                }
                tracing::info!(id = %pending.id, "deleted");
                self.toasts.success(E::DELETED);
                DeleteOutcome::Deleted
            }
            Err(error) => {
                tracing::warn!(id = %pending.id, %error, "delete failed");
                self.toasts.error(E::DELETE_FAILED);
                DeleteOutcome::Failed(error)
            }
        }
    }

    /// One-shot load: begin, await, complete.
    pub async fn load<A: EntityApi<E>>(&mut self, api: &A) -> Result<(), WorkflowError> {
        let pending = self.begin_load()?;
        let result = api.list().await;
        self.complete_load(pending, result);
        Ok(())
    }

    fn ensure_mounted(&self) -> Result<(), WorkflowError> {
        if self.mounted {
            Ok(())
        } else {
            Err(WorkflowError::Unmounted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::ToastKind;
    use crate::types::{Admin, AdminFields};
    use crate::workflow::DeleteConfirmation;

    fn admin(id: &str, name: &str) -> Admin {
        Admin {
            id: EntityId::new(id).unwrap(),
            name: name.to_string(),
        }
    }

    fn id(raw: &str) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    fn loaded(records: Vec<Admin>) -> (Synchronizer<Admin>, ToastBus) {
        let toasts = ToastBus::new();
        let mut sync = Synchronizer::new(toasts.clone());
        let pending = sync.begin_load().unwrap();
        sync.complete_load(pending, Ok(records));
        (sync, toasts)
    }

    fn confirmed(raw: &str) -> ConfirmedDelete {
        let mut dialog = DeleteConfirmation::default();
        dialog.request(id(raw));
        dialog.confirm().unwrap()
    }

    fn failure() -> ApiError {
        ApiError::HttpError {
            status: 500,
            body: "boom".to_string(),
        }
    }

    fn last_toast(toasts: &ToastBus) -> (String, ToastKind) {
        let toast = toasts.active().pop().unwrap();
        (toast.message, toast.kind)
    }

    #[test]
    fn load_failure_leaves_list_empty_and_notifies() {
        let toasts = ToastBus::new();
        let mut sync = Synchronizer::<Admin>::new(toasts.clone());
        assert!(sync.is_loading());

        let pending = sync.begin_load().unwrap();
        sync.complete_load(pending, Err(failure()));

        assert!(!sync.is_loading());
        assert!(sync.items().is_empty());
        assert_eq!(
            last_toast(&toasts),
            ("Falha ao carregar administradores.".to_string(), ToastKind::Error)
        );
        assert_eq!(sync.begin_load().unwrap_err(), WorkflowError::AlreadyLoaded);
    }

    #[test]
    fn create_appends_server_record() {
        let (mut sync, toasts) = loaded(vec![admin("1", "Bia")]);
        let pending = sync
            .begin_save(Draft::New(AdminFields {
                name: "Ana".to_string(),
            }))
            .unwrap();
        assert!(sync.is_submitting());

        let outcome = sync.complete_save(pending, Ok(admin("42", "Ana")));
        assert!(outcome.is_saved());
        assert!(!sync.is_submitting());
        assert_eq!(sync.items().position(&id("42")), Some(1));
        assert_eq!(
            last_toast(&toasts),
            (
                "Administrador \"Ana\" salvo com sucesso!".to_string(),
                ToastKind::Success
            )
        );
    }

    #[test]
    fn update_replaces_in_place() {
        let (mut sync, _) = loaded(vec![admin("1", "Ana"), admin("2", "Bia"), admin("3", "Cris")]);
        let pending = sync
            .begin_save(Draft::from_entity(&admin("2", "Bia")))
            .unwrap();
        sync.complete_save(pending, Ok(admin("2", "Beatriz")));

        let names: Vec<_> = sync.items().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Beatriz", "Cris"]);
    }

    #[test]
    fn failed_save_leaves_list_untouched() {
        let (mut sync, toasts) = loaded(vec![admin("1", "Ana")]);
        let pending = sync
            .begin_save(Draft::from_entity(&admin("1", "Ana")))
            .unwrap();
        let outcome = sync.complete_save(pending, Err(failure()));

        assert!(!outcome.is_saved());
        assert_eq!(sync.items().get(&id("1")).unwrap().name, "Ana");
        assert!(!sync.is_submitting());
        assert_eq!(
            last_toast(&toasts),
            ("Falha ao salvar administrador.".to_string(), ToastKind::Error)
        );
    }

    #[test]
    fn second_save_is_rejected_while_one_is_in_flight() {
        let (mut sync, _) = loaded(Vec::new());
        let _pending = sync.begin_save(Draft::empty()).unwrap();
        assert_eq!(
            sync.begin_save(Draft::empty()).unwrap_err(),
            WorkflowError::SaveInFlight
        );
    }

    #[test]
    fn delete_marks_only_its_row() {
        let (mut sync, toasts) = loaded(vec![admin("1", "Ana"), admin("2", "Bia")]);
        let pending = sync.begin_delete(confirmed("1")).unwrap();
        assert!(sync.is_deleting(&id("1")));
        assert!(!sync.is_deleting(&id("2")));

        // the other row stays editable
        let save = sync.begin_save(Draft::from_entity(&admin("2", "Bia"))).unwrap();
        assert_eq!(
            sync.begin_delete(confirmed("1")).unwrap_err(),
            WorkflowError::DeleteInFlight(id("1"))
        );

        assert!(sync.complete_delete(pending, Ok(())).is_deleted());
        assert!(!sync.items().contains(&id("1")));
        assert!(!sync.is_deleting(&id("1")));
        assert_eq!(
            last_toast(&toasts),
            ("Administrador excluído com sucesso.".to_string(), ToastKind::Success)
        );

        sync.complete_save(save, Ok(admin("2", "Bianca")));
        assert_eq!(sync.items().position(&id("2")), Some(0));
    }

    #[test]
    fn failed_delete_restores_row() {
        let (mut sync, toasts) = loaded(vec![admin("7", "Ana")]);
        let pending = sync.begin_delete(confirmed("7")).unwrap();
        let outcome = sync.complete_delete(pending, Err(failure()));

        assert!(!outcome.is_deleted());
        assert!(sync.items().contains(&id("7")));
        assert!(!sync.is_deleting(&id("7")));
        assert_eq!(
            last_toast(&toasts),
            ("Falha ao excluir administrador.".to_string(), ToastKind::Error)
        );
    }

    #[test]
    fn saving_a_row_under_deletion_is_rejected() {
        let (mut sync, _) = loaded(vec![admin("7", "Ana")]);
        let _pending = sync.begin_delete(confirmed("7")).unwrap();
        assert_eq!(
            sync.begin_save(Draft::from_entity(&admin("7", "Ana"))).unwrap_err(),
            WorkflowError::DeleteInFlight(id("7"))
        );
    }

    #[test]
    fn deleting_a_row_being_saved_is_rejected() {
        let (mut sync, _) = loaded(vec![admin("7", "Ana")]);
        let _pending = sync.begin_save(Draft::from_entity(&admin("7", "Ana"))).unwrap();
        assert_eq!(
            sync.begin_delete(confirmed("7")).unwrap_err(),
            WorkflowError::SaveInFlight
        );
        assert!(!sync.is_deleting(&id("7")));
    }

    #[test]
    fn resolution_after_unmount_leaves_list_alone() {
        let (mut sync, toasts) = loaded(vec![admin("1", "Ana")]);
        let pending = sync.begin_delete(confirmed("1")).unwrap();
        sync.unmount();

        sync.complete_delete(pending, Ok(()));
        assert!(sync.items().contains(&id("1")));
        assert!(!sync.is_deleting(&id("1")));
        assert_eq!(toasts.active().len(), 1);
        assert_eq!(
            sync.begin_save(Draft::empty()).unwrap_err(),
            WorkflowError::Unmounted
        );
    }
}
