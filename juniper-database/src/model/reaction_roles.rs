use serde::{Deserialize, Serialize};

/// One emoji-on-message to role binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRoleBinding {
    pub guild_id: u64,
    pub message_id: u64,
    pub emoji: String,
    pub role_id: u64,
}
