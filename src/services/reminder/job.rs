use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info};

use super::dispatch::{dispatch_all, DispatchResult, Notification};
use super::occurrence::check_occurrence;
use super::render::{message_for, render_message};
use super::targets::resolve_destinations;
use crate::error::AppResult;
use crate::models::Union;
use crate::services::clock::Clock;
use crate::services::telegram::MessageTransport;
use crate::store::ReminderStore;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    /// Special days that fired today.
    pub matched: usize,
    /// Deliveries attempted, successful or not.
    pub processed: usize,
    pub results: Vec<DispatchResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRun {
    /// Handed to a background task; its outcome only shows up in the logs.
    Scheduled { delay_seconds: u64 },
    Completed(JobReport),
}

#[derive(Clone)]
pub struct ReminderJob {
    store: Arc<dyn ReminderStore>,
    transport: Arc<dyn MessageTransport>,
    clock: Arc<dyn Clock>,
    concurrency: usize,
}

impl ReminderJob {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        transport: Arc<dyn MessageTransport>,
        clock: Arc<dyn Clock>,
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            transport,
            clock,
            concurrency: concurrency.max(1),
        }
    }

    /// Runs now, or with a delay spawns a detached run and returns at once.
    ///
    /// Overlapping runs are not serialized: a manual trigger on the same day as
    /// the scheduled one sends the same reminders again.
    pub async fn trigger(&self, delay_seconds: Option<u64>) -> AppResult<JobRun> {
        match delay_seconds {
            Some(delay_seconds) if delay_seconds > 0 => {
                info!("Reminder job scheduled with {}s delay", delay_seconds);
                let job = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(delay_seconds)).await;
                    info!("Executing delayed reminder job");
                    job.run_today().await;
                });
                Ok(JobRun::Scheduled { delay_seconds })
            }
            _ => {
                let report = self.run(self.clock.today()).await?;
                Ok(JobRun::Completed(report))
            }
        }
    }

    /// Runs for the clock's current date and logs the outcome instead of returning it.
    pub async fn run_today(&self) {
        if let Err(e) = self.run(self.clock.today()).await {
            error!("Reminder job failed: {}", e);
        }
    }

    /// Matches every special day against `today` and sends what fired.
    ///
    /// Loading fails the whole run before anything is sent; delivery failures
    /// are only recorded in the report.
    pub async fn run(&self, today: NaiveDate) -> AppResult<JobReport> {
        let special_days = self.store.list_special_days(true).await?;

        let mut all_unions: Option<Vec<Union>> = None;
        let mut notifications = Vec::new();
        let mut matched = 0;

        for day in &special_days {
            let Some(occurrence) = check_occurrence(day, today) else {
                continue;
            };
            matched += 1;

            let unions: &[Union] = if day.is_global() {
                if all_unions.is_none() {
                    all_unions = Some(self.store.list_unions().await?);
                }
                all_unions.as_deref().unwrap_or_default()
            } else {
                &[]
            };

            let message = render_message(day, occurrence, today);
            for destination in resolve_destinations(day, unions) {
                let text = message_for(&destination, &message);
                notifications.push(Notification { destination, text });
            }
        }

        let results = dispatch_all(self.transport.as_ref(), notifications, self.concurrency).await;
        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            "Reminder job finished for {}. Matched: {}, processed: {}, succeeded: {}",
            today,
            matched,
            results.len(),
            succeeded
        );

        Ok(JobReport {
            matched,
            processed: results.len(),
            results,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeStore;
    use super::*;
    use crate::models::SpecialDay;
    use crate::services::clock::FixedClock;
    use crate::services::reminder::dispatch::testing::RecordingTransport;
    use std::sync::atomic::Ordering;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn union(id: &str, customer: Option<&str>, internal: Option<&str>) -> Union {
        Union {
            id: id.to_string(),
            name: format!("Sendika {}", id),
            telegram_chat_id: customer.map(str::to_string),
            internal_chat_id: internal.map(str::to_string),
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    fn special_day(id: &str, title: &str, date: NaiveDate, union_id: Option<&str>) -> SpecialDay {
        SpecialDay {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            date: Some(date),
            is_recurring: true,
            reminder_days_before: 0,
            union_id: union_id.map(str::to_string),
            created_at: "2024-01-01T00:00:00Z".into(),
            union: None,
        }
    }

    fn three_unions() -> Vec<Union> {
        vec![
            union("A", Some("a-customer"), None),
            union("B", None, Some("b-internal")),
            union("C", Some("c-customer"), Some("c-internal")),
        ]
    }

    fn job(store: FakeStore, transport: Arc<RecordingTransport>, today: NaiveDate) -> ReminderJob {
        ReminderJob::new(Arc::new(store), transport, Arc::new(FixedClock(today)), 1)
    }

    #[tokio::test]
    async fn national_holiday_reaches_every_configured_chat() {
        let store = FakeStore {
            unions: three_unions(),
            special_days: vec![special_day("sd", "23 Nisan", ymd(2024, 4, 23), None)],
            ..Default::default()
        };
        let transport = Arc::new(RecordingTransport::default());

        let report = job(store, transport.clone(), ymd(2025, 4, 23))
            .run(ymd(2025, 4, 23))
            .await
            .unwrap();

        assert_eq!(report.matched, 1);
        assert_eq!(report.processed, 4);
        assert!(report.results.iter().all(|r| r.success));

        let sent = transport.sent();
        let chats: Vec<&str> = sent.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(chats, vec!["a-customer", "b-internal", "c-customer", "c-internal"]);
        assert!(sent[0].1.contains("Tarih: 23.04.2025"));
        assert!(sent[0].1.contains("**23 Nisan**"));
        assert!(sent[1].1.starts_with("[Ekip - Sendika B]\n"));
        assert!(!sent[2].1.starts_with("[Ekip"));
    }

    #[tokio::test]
    async fn scoped_day_without_chats_sends_nothing() {
        let store = FakeStore {
            unions: vec![union("E", None, None)],
            special_days: vec![special_day("sd", "Kuruluş", ymd(2010, 5, 10), Some("E"))],
            ..Default::default()
        };
        let transport = Arc::new(RecordingTransport::default());

        let report = job(store, transport.clone(), ymd(2025, 5, 10))
            .run(ymd(2025, 5, 10))
            .await
            .unwrap();

        assert_eq!(report.matched, 1);
        assert_eq!(report.processed, 0);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn partial_failure_is_reported_per_destination() {
        let store = FakeStore {
            unions: vec![union("C", Some("c-customer"), Some("c-internal")), union("A", Some("a-customer"), None)],
            special_days: vec![special_day("sd", "1 Mayıs", ymd(2020, 5, 1), None)],
            ..Default::default()
        };
        let transport = Arc::new(RecordingTransport::failing_on(&["c-internal"]));

        let report = job(store, transport, ymd(2025, 5, 1)).run(ymd(2025, 5, 1)).await.unwrap();

        let flags: Vec<bool> = report.results.iter().map(|r| r.success).collect();
        assert_eq!(flags, vec![true, false, true]);
        assert_eq!(report.processed, 3);
        assert_eq!(report.matched, 1);
    }

    #[tokio::test]
    async fn unions_load_only_for_global_days() {
        let store = Arc::new(FakeStore {
            unions: three_unions(),
            special_days: vec![special_day("sd", "Kuruluş", ymd(2010, 5, 10), Some("C"))],
            ..Default::default()
        });
        let transport = Arc::new(RecordingTransport::default());
        let job = ReminderJob::new(store.clone(), transport, Arc::new(FixedClock(ymd(2025, 5, 10))), 1);

        let report = job.run(ymd(2025, 5, 10)).await.unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(store.union_loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_failure_aborts_before_sending() {
        let store = FakeStore {
            unions: three_unions(),
            special_days: vec![special_day("sd", "23 Nisan", ymd(2024, 4, 23), None)],
            fail: true,
            ..Default::default()
        };
        let transport = Arc::new(RecordingTransport::default());

        let result = job(store, transport.clone(), ymd(2025, 4, 23)).run(ymd(2025, 4, 23)).await;

        assert!(result.is_err());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn upcoming_and_today_days_in_one_run() {
        let mut reminder = special_day("r", "Yılbaşı", ymd(2024, 1, 2), Some("C"));
        reminder.reminder_days_before = 3;
        let store = FakeStore {
            unions: three_unions(),
            special_days: vec![
                reminder,
                special_day("t", "Kuruluş", ymd(2001, 12, 30), Some("A")),
                special_day("n", "Başka Gün", ymd(2001, 6, 1), None),
            ],
            ..Default::default()
        };
        let transport = Arc::new(RecordingTransport::default());

        let report = job(store, transport.clone(), ymd(2024, 12, 30))
            .run(ymd(2024, 12, 30))
            .await
            .unwrap();

        assert_eq!(report.matched, 2);
        let sent = transport.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].1.contains("3 Gün Kaldı"));
        assert!(sent[0].1.contains("Tarih: 02 January"));
        assert!(sent[2].1.contains("Bugün Özel Gün"));
    }

    #[tokio::test]
    async fn trigger_without_delay_runs_with_clock_date() {
        let store = FakeStore {
            unions: three_unions(),
            special_days: vec![special_day("sd", "23 Nisan", ymd(2024, 4, 23), None)],
            ..Default::default()
        };
        let transport = Arc::new(RecordingTransport::default());

        let run = job(store, transport, ymd(2025, 4, 23)).trigger(Some(0)).await.unwrap();

        match run {
            JobRun::Completed(report) => assert_eq!(report.processed, 4),
            other => panic!("expected a completed run, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn delayed_trigger_returns_before_sending() {
        let store = FakeStore {
            unions: three_unions(),
            special_days: vec![special_day("sd", "23 Nisan", ymd(2024, 4, 23), None)],
            ..Default::default()
        };
        let transport = Arc::new(RecordingTransport::default());

        let run = job(store, transport.clone(), ymd(2025, 4, 23)).trigger(Some(60)).await.unwrap();

        assert_eq!(run, JobRun::Scheduled { delay_seconds: 60 });
        assert!(transport.sent().is_empty());
    }
}
