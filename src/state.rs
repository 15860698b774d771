use std::sync::Arc;

use crate::services::reminder::ReminderJob;
use crate::services::telegram::TelegramBot;
use crate::store::SqliteStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SqliteStore,
    pub telegram: Arc<TelegramBot>,
    pub reminder_job: ReminderJob,
}

impl AppState {
    pub fn new(store: SqliteStore, telegram: Arc<TelegramBot>, reminder_job: ReminderJob) -> Self {
        Self {
            store,
            telegram,
            reminder_job,
        }
    }
}
