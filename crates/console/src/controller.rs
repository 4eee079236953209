//! Generic list/create/update/delete controller, one per screen visit.
//!
//! The controller owns what a screen renders: the loaded collection, the form
//! draft, the edit target, the last error message and the loading/submitting
//! flags. Network calls go through the shared [`ApiClient`]; the session
//! credential is read at call time.

use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Method;

use posadmin_core::{Entity, EntityId};

use crate::confirm::Confirm;
use crate::error::{ConsoleError, ConsoleResult};
use crate::resource::{Deletable, Editable, Resource};
use crate::transport::{Access, ApiClient};

/// Observable state of one screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState<E, D> {
    /// Collection exactly as the backend last returned it.
    pub items: Vec<E>,
    pub draft: D,
    /// Identifier being edited; `None` while creating.
    pub editing: Option<EntityId>,
    /// User-facing message of the last failure, cleared by the next success.
    pub error: Option<String>,
    pub loading: bool,
    /// A mutation is outstanding; the save button should be disabled.
    pub submitting: bool,
}

impl<E, D: Default> ControllerState<E, D> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            draft: D::default(),
            editing: None,
            error: None,
            loading: false,
            submitting: false,
        }
    }
}

pub type StateOf<R> = ControllerState<<R as Resource>::Entity, <R as Resource>::Draft>;

/// Clears the in-flight flag however the request ends.
struct SubmitGuard<'a, E, D> {
    state: &'a Mutex<ControllerState<E, D>>,
}

impl<E, D> Drop for SubmitGuard<'_, E, D> {
    fn drop(&mut self) {
        self.state.lock().submitting = false;
    }
}

pub struct CrudController<R: Resource> {
    api: ApiClient,
    state: Arc<Mutex<StateOf<R>>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for CrudController<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: Arc::clone(&self.state),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> core::fmt::Debug for CrudController<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CrudController")
            .field("resource", &R::NAME)
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl<R: Resource> CrudController<R> {
    /// A fresh screen: empty list, empty draft, nothing loaded yet.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(ControllerState::new())),
            _resource: PhantomData,
        }
    }

    pub fn snapshot(&self) -> StateOf<R> {
        self.state.lock().clone()
    }

    pub fn items(&self) -> Vec<R::Entity> {
        self.state.lock().items.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn draft(&self) -> R::Draft {
        self.state.lock().draft.clone()
    }

    pub fn editing(&self) -> Option<EntityId> {
        self.state.lock().editing
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn is_submitting(&self) -> bool {
        self.state.lock().submitting
    }

    fn ensure_access(&self) -> ConsoleResult<()> {
        if R::ACCESS == Access::Bearer && !self.api.session().is_authenticated() {
            tracing::warn!(resource = R::NAME, "refusing request before login");
            return Err(ConsoleError::NotAuthenticated);
        }
        Ok(())
    }

    fn begin_submit(&self) -> ConsoleResult<SubmitGuard<'_, R::Entity, R::Draft>> {
        let mut state = self.state.lock();
        if state.submitting {
            tracing::warn!(resource = R::NAME, "ignoring submit while a request is in flight");
            return Err(ConsoleError::SubmitInFlight);
        }
        state.submitting = true;
        Ok(SubmitGuard { state: &self.state })
    }

    fn fail(&self, message: &str, source: crate::transport::ApiError) -> ConsoleError {
        self.state.lock().error = Some(message.to_string());
        ConsoleError::request(message, source)
    }

    /// Fetch the whole collection and replace the held list with it.
    ///
    /// On failure the previous list stays as it was and the error message is
    /// set.
    pub async fn list(&self) -> ConsoleResult<()> {
        self.ensure_access()?;
        self.state.lock().loading = true;

        let result = self
            .api
            .get_json::<Vec<R::Entity>>(R::ENDPOINT, R::ACCESS)
            .await;

        let mut state = self.state.lock();
        state.loading = false;
        match result {
            Ok(items) => {
                tracing::debug!(resource = R::NAME, count = items.len(), "collection loaded");
                state.items = items;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(resource = R::NAME, error = %e, "failed to load collection");
                drop(state);
                Err(self.fail(R::LOAD_FAILED, e))
            }
        }
    }

    /// Re-list after a successful mutation. A failed refresh is already
    /// visible through the error message and does not undo the mutation.
    async fn refresh(&self) {
        if let Err(e) = self.list().await {
            tracing::warn!(resource = R::NAME, error = %e, "refresh after mutation failed");
        }
    }

    /// Look up a loaded entity by id.
    pub fn find(&self, id: EntityId) -> Option<R::Entity> {
        self.state
            .lock()
            .items
            .iter()
            .find(|entity| entity.id() == id)
            .cloned()
    }
}

impl<R: Editable> CrudController<R> {
    /// Replace the form draft (form input binding).
    pub fn set_draft(&self, draft: R::Draft) {
        self.state.lock().draft = draft;
    }

    /// Modify the form draft in place.
    pub fn edit_draft(&self, f: impl FnOnce(&mut R::Draft)) {
        f(&mut self.state.lock().draft);
    }

    /// Copy `entity` into the draft and make it the edit target.
    pub fn begin_edit(&self, entity: &R::Entity) {
        let mut state = self.state.lock();
        state.draft = R::draft_from(entity);
        state.editing = Some(entity.id());
    }

    pub fn cancel_edit(&self) {
        self.clear_form();
    }

    /// Reset the draft and drop the edit target.
    pub fn clear_form(&self) {
        let mut state = self.state.lock();
        state.draft = R::Draft::default();
        state.editing = None;
    }

    /// Create a new entity from `draft`.
    ///
    /// The draft is staged first so that it survives a failed attempt.
    pub async fn create(&self, draft: R::Draft) -> ConsoleResult<()> {
        {
            let mut state = self.state.lock();
            state.draft = draft.clone();
            state.editing = None;
        }
        self.save(None, draft).await
    }

    /// Overwrite the entity `id` with `draft`.
    pub async fn update(&self, id: EntityId, draft: R::Draft) -> ConsoleResult<()> {
        {
            let mut state = self.state.lock();
            state.draft = draft.clone();
            state.editing = Some(id);
        }
        self.save(Some(id), draft).await
    }

    /// Save the staged draft: update when editing, create otherwise.
    pub async fn submit(&self) -> ConsoleResult<()> {
        let (draft, editing) = {
            let state = self.state.lock();
            (state.draft.clone(), state.editing)
        };
        self.save(editing, draft).await
    }

    async fn save(&self, target: Option<EntityId>, draft: R::Draft) -> ConsoleResult<()> {
        self.ensure_access()?;
        let guard = self.begin_submit()?;

        if let Err(e) = R::validate(&draft) {
            tracing::debug!(resource = R::NAME, error = %e, "draft rejected");
            self.state.lock().error = Some(e.to_string());
            return Err(e.into());
        }

        let payload = R::payload(&draft, target);
        let (method, path, failure) = match target {
            None => (Method::POST, R::ENDPOINT.to_string(), R::SAVE_FAILED),
            Some(id) => (Method::PUT, format!("{}/{}", R::ENDPOINT, id), R::UPDATE_FAILED),
        };

        if let Err(e) = self.api.send_json(method, &path, &payload, R::ACCESS).await {
            tracing::error!(resource = R::NAME, ?target, error = %e, "failed to save");
            return Err(self.fail(failure, e));
        }

        tracing::info!(resource = R::NAME, ?target, "saved");
        {
            let mut state = self.state.lock();
            state.draft = R::Draft::default();
            state.editing = None;
            state.error = None;
        }
        drop(guard);

        self.refresh().await;
        Ok(())
    }
}

impl<R: Deletable> CrudController<R> {
    /// Delete `id`, asking `confirm` first when the resource requires it.
    pub async fn delete(&self, id: EntityId, confirm: &impl Confirm) -> ConsoleResult<()> {
        self.ensure_access()?;
        let guard = self.begin_submit()?;

        if let Some(prompt) = R::CONFIRM_PROMPT {
            if !confirm.confirm(prompt) {
                tracing::debug!(resource = R::NAME, %id, "delete cancelled");
                return Err(ConsoleError::Cancelled);
            }
        }

        self.state.lock().error = None;
        let path = format!("{}/{}", R::ENDPOINT, id);
        if let Err(e) = self.api.delete(&path, R::ACCESS).await {
            tracing::error!(resource = R::NAME, %id, error = %e, "failed to delete");
            return Err(self.fail(R::DELETE_FAILED, e));
        }

        tracing::info!(resource = R::NAME, %id, "deleted");
        drop(guard);

        self.refresh().await;
        Ok(())
    }
}
