use std::sync::Arc;
use crate::cache::Cache;
use crate::services::{Store, TaskTimer, UserInfoLookup};

// Shared by every handler; built once by the composition root
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub cache: Arc<Cache>,
    pub timer: TaskTimer,
    pub user_info: Arc<dyn UserInfoLookup>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, cache: Arc<Cache>, user_info: Arc<dyn UserInfoLookup>) -> Self {
        let timer = TaskTimer::new(store.clone(), cache.clone());
        Self {
            store,
            cache,
            timer,
            user_info,
        }
    }
}
