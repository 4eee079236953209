//! Application context: created at start, dropped at shutdown.
//!
//! [`Console`] owns the session and the HTTP client and hands out per-screen
//! controllers that share them.

use posadmin_auth::SessionManager;

use crate::auth_flow::AuthFlow;
use crate::config::ConsoleConfig;
use crate::controller::CrudController;
use crate::order_draft::OrderDraft;
use crate::resource::Resource;
use crate::resources::{ItemCategories, Items};
use crate::transport::{Access, ApiClient, ApiError};

#[derive(Debug, Clone)]
pub struct Console {
    config: ConsoleConfig,
    api: ApiClient,
}

impl Console {
    /// Build the HTTP client and an empty session.
    pub fn start(config: ConsoleConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(config.api_url.clone(), SessionManager::new())?;
        tracing::info!(api_url = %api.base_url(), "console started");
        Ok(Self { config, api })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionManager {
        self.api.session()
    }

    pub fn auth(&self) -> AuthFlow {
        AuthFlow::new(self.api.clone())
    }

    /// A fresh controller for resource `R`, nothing loaded.
    pub fn controller<R: Resource>(&self) -> CrudController<R> {
        CrudController::new(self.api.clone())
    }

    /// Visit the screen for `R`: a fresh controller, loaded if the session
    /// allows it. Load failures are left in the controller's error state.
    pub async fn open<R: Resource>(&self) -> CrudController<R> {
        let controller = self.controller::<R>();
        if R::ACCESS == Access::Anonymous || self.session().is_authenticated() {
            let _ = controller.list().await;
        }
        controller
    }

    /// The item screen also needs the categories for its select box.
    pub async fn open_item_screen(&self) -> ItemScreen {
        ItemScreen {
            items: self.open::<Items>().await,
            categories: self.open::<ItemCategories>().await,
        }
    }

    /// Visit the create-order screen; the catalog is fetched on entry.
    pub async fn open_order_draft(&self) -> OrderDraft {
        let mut draft = OrderDraft::new(self.api.clone());
        let _ = draft.load_catalog().await;
        draft
    }

    /// End the application lifecycle. The session is session-only, so the
    /// credential goes away with it.
    pub fn shutdown(self) {
        self.session().logout();
        tracing::info!("console stopped");
    }
}

#[derive(Debug, Clone)]
pub struct ItemScreen {
    pub items: CrudController<Items>,
    pub categories: CrudController<ItemCategories>,
}
