//! Wiring of the core services: configuration, storage, session, API.
//!
//! `Tracker` is the composition root an embedding application holds on to.
//! Construction restores any persisted session from storage without a
//! network call; every domain request made through `api()` carries the
//! current token and participates in automatic invalidation.

use std::sync::Arc;

use anyhow::Result;

use crate::api::{ApiClient, AuthFailureWatch, BearerAuth, Navigator, Pipeline};
use crate::auth::{SessionHandle, SessionManager, SessionStore};
use crate::config::Config;
use crate::storage::{FileStorage, KeyValueStorage};

/// Core services for a fintrack client.
pub struct Tracker {
    pub config: Config,
    session: SessionManager,
    api: ApiClient,
}

impl Tracker {
    /// Assemble the core from explicit parts. The session handle is shared
    /// between the manager (writer) and the pipeline stages (reader +
    /// forced-logout delegate).
    pub fn new(
        config: Config,
        storage: Box<dyn KeyValueStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let store = SessionStore::new(storage);
        let handle = SessionHandle::new(store);

        let pipeline = Pipeline::new()
            .with_outbound(BearerAuth::new(handle.clone()))
            .with_inbound(AuthFailureWatch::new(handle.clone(), navigator));

        let api = ApiClient::new(&config.api_base_url)?.with_pipeline(pipeline);
        let session = SessionManager::new(handle, api.clone());

        Ok(Self {
            config,
            session,
            api,
        })
    }

    /// Load config and open file-backed storage at the default location.
    pub fn open(navigator: Arc<dyn Navigator>) -> Result<Self> {
        let config = Config::load()?;
        let storage = FileStorage::new(config.data_dir()?)?;
        Self::new(config, Box::new(storage), navigator)
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
