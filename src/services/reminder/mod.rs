//! Daily special-day reminders.
//!
//! A run loads every special day, keeps the ones that fall on today (or exactly
//! their reminder offset ahead of it), expands each into the union chats it
//! concerns, and sends one message per chat.

pub mod dispatch;
pub mod job;
pub mod occurrence;
pub mod render;
pub mod targets;

pub use job::{JobRun, ReminderJob};
