use serde::{Deserialize, Serialize};

/// Moderation action recorded in a case. Unknown values read back from
/// storage collapse into `Other` rather than failing the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModAction {
    Ban,
    Kick,
    Mute,
    Timeout,
    Untimeout,
    Warn,
    Nuke,
    Other,
}

impl ModAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Kick => "kick",
            Self::Mute => "mute",
            Self::Timeout => "timeout",
            Self::Untimeout => "untimeout",
            Self::Warn => "warn",
            Self::Nuke => "nuke",
            Self::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ban" => Self::Ban,
            "kick" => Self::Kick,
            "mute" => Self::Mute,
            "timeout" => Self::Timeout,
            "untimeout" => Self::Untimeout,
            "warn" => Self::Warn,
            "nuke" => Self::Nuke,
            _ => Self::Other,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ban => "Ban",
            Self::Kick => "Kick",
            Self::Mute => "Mute",
            Self::Timeout => "Timeout",
            Self::Untimeout => "Untimeout",
            Self::Warn => "Warn",
            Self::Nuke => "Nuke",
            Self::Other => "Other",
        }
    }
}

/// One appended moderation case. Rows are never mutated; they only leave
/// the table through the retention sweep.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_number: u64,
    pub guild_id: u64,
    pub target_user_id: Option<u64>,
    pub moderator_user_id: u64,
    pub action: ModAction,
    pub reason: String,
    pub duration_seconds: Option<u64>,
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::ModAction;

    #[test]
    fn action_round_trips_through_storage_text() {
        for action in [
            ModAction::Ban,
            ModAction::Kick,
            ModAction::Mute,
            ModAction::Timeout,
            ModAction::Untimeout,
            ModAction::Warn,
            ModAction::Nuke,
            ModAction::Other,
        ] {
            assert_eq!(ModAction::parse(action.as_str()), action);
        }
    }

    #[test]
    fn unknown_actions_collapse_into_other() {
        assert_eq!(ModAction::parse("purge"), ModAction::Other);
        assert_eq!(ModAction::parse(" BAN "), ModAction::Ban);
        assert_eq!(ModAction::parse(""), ModAction::Other);
    }
}
