use chrono::NaiveDate;

use super::occurrence::Occurrence;
use super::targets::Destination;
use crate::models::SpecialDay;

pub fn render_message(day: &SpecialDay, occurrence: Occurrence, today: NaiveDate) -> String {
    let (header, date_info) = match occurrence {
        Occurrence::Today => (
            "📅 *Bugün Özel Gün!*".to_string(),
            format!("Tarih: {}", today.format("%d.%m.%Y")),
        ),
        Occurrence::Upcoming { days_left } => (
            format!("⏳ *Yaklaşıyor! ({} Gün Kaldı)*", days_left),
            // day and month only; the year of a recurring record is meaningless
            format!(
                "Tarih: {}",
                day.date.map(|d| d.format("%d %B").to_string()).unwrap_or_default()
            ),
        ),
    };

    let description = day
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!("\n_{}_", d))
        .unwrap_or_default();

    format!("{}\n\n**{}**\n{}\n{}", header, day.title, description, date_info)
}

/// Team chats get a tag naming the union so they can tell copies apart.
pub fn message_for(destination: &Destination, message: &str) -> String {
    if destination.is_internal {
        format!("[Ekip - {}]\n{}", destination.union_name, message)
    } else {
        message.to_string()
    }
}
