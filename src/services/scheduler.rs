//! Daily trigger for the reminder job.
//!
//! One scheduler is started in `main` and stopped when the HTTP server exits.

use chrono::{DateTime, Local};
use cron::Schedule;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::services::reminder::ReminderJob;

pub struct ReminderScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReminderScheduler {
    pub fn start(job: ReminderJob, schedule: Schedule) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            info!("Reminder scheduler started ({})", schedule);
            loop {
                let now = Local::now();
                let Some(next) = next_fire_after(&schedule, &now) else {
                    warn!("Reminder schedule has no upcoming fire time; scheduler idle");
                    break;
                };
                let wait = (next - now).to_std().unwrap_or_default();
                info!("Next reminder run at {}", next.format("%Y-%m-%d %H:%M:%S"));

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        info!("Triggering daily special day check");
                        job.run_today().await;
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            info!("Reminder scheduler stopped");
        });

        ReminderScheduler { shutdown, handle }
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!("Reminder scheduler task ended abnormally: {}", e);
        }
    }
}

pub fn next_fire_after(schedule: &Schedule, now: &DateTime<Local>) -> Option<DateTime<Local>> {
    schedule.after(now).next()
}
