use std::sync::Arc;

use crate::{config::Config, database::RecordStore};

pub struct AppState<S> {
    pub config: Config,
    pub store: S,
}

impl<S: RecordStore> AppState<S> {
    pub fn new(config: Config, store: S) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
