pub mod clock;
pub mod reminder;
pub mod scheduler;
pub mod telegram;
