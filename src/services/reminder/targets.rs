use crate::models::{SpecialDay, Union};

/// A concrete chat a reminder goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub chat_id: String,
    pub union_name: String,
    pub is_internal: bool,
}

/// Customer chat first, then the team chat; unset chats are skipped.
pub fn union_destinations(union: &Union) -> Vec<Destination> {
    let customer = union.telegram_chat_id.as_ref().map(|chat_id| Destination {
        chat_id: chat_id.clone(),
        union_name: union.name.clone(),
        is_internal: false,
    });
    let internal = union.internal_chat_id.as_ref().map(|chat_id| Destination {
        chat_id: chat_id.clone(),
        union_name: union.name.clone(),
        is_internal: true,
    });
    customer.into_iter().chain(internal).collect()
}

/// Expands a special day into the chats it must reach.
///
/// Scoped days use their joined union, falling back to a lookup in `unions`.
/// Global days fan out over every union in `unions`.
pub fn resolve_destinations(day: &SpecialDay, unions: &[Union]) -> Vec<Destination> {
    match day.union_id.as_deref() {
        Some(union_id) => day
            .union
            .as_ref()
            .or_else(|| unions.iter().find(|u| u.id == union_id))
            .map(union_destinations)
            .unwrap_or_default(),
        None => unions.iter().flat_map(union_destinations).collect(),
    }
}
