use serde::{Deserialize, Serialize};

/// A client organization and the two Telegram chats it can be reached on.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Union {
    pub id: String,
    pub name: String,
    pub telegram_chat_id: Option<String>, // customer-facing group
    pub internal_chat_id: Option<String>, // team group
    pub created_at: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UnionRequest {
    pub name: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub internal_chat_id: Option<String>,
}

/// Validated union fields ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionInput {
    pub name: String,
    pub telegram_chat_id: Option<String>,
    pub internal_chat_id: Option<String>,
}

impl UnionRequest {
    pub fn into_input(self) -> Option<UnionInput> {
        let name = non_empty(self.name)?;
        Some(UnionInput {
            name,
            telegram_chat_id: non_empty(self.telegram_chat_id),
            internal_chat_id: non_empty(self.internal_chat_id),
        })
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
