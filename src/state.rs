//! Shared application state.

use crate::config::Config;
use crate::courier::CourierClient;
use crate::store::RecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub config: Arc<Config>,
    /// `None` when courier credentials are not configured.
    pub courier: Option<Arc<CourierClient>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let courier = config.courier.clone().map(|c| Arc::new(CourierClient::new(c)));
        Self {
            store: Arc::new(RecordStore::new(&config.data_dir)),
            config: Arc::new(config),
            courier,
        }
    }
}
