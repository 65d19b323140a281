use serde::{Deserialize, Serialize};

/// One suppression rule. `channel_id = None` means guild-wide; exactly one
/// of `command`/`category` is set (enforced by a table CHECK).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionRule {
    pub guild_id: u64,
    pub channel_id: Option<u64>,
    pub command: Option<String>,
    pub category: Option<String>,
    pub disabled_by: u64,
    pub disabled_at: u64,
}
