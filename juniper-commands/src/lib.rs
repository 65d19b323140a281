pub mod config;
pub mod dispatch;
pub mod moderation;
pub mod utility;

use std::collections::HashSet;

use juniper_core::{Data, Error};

/// Static description of one command, consumed by help, the dispatcher
/// gate, and the suppression meta commands.
pub struct CommandMeta {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
    pub cooldown_secs: u64,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    utility::ping::META,
    utility::afk::META,
    utility::tags::TAG_META,
    utility::tags::TAGS_META,
    utility::tags::TAGADD_META,
    utility::tags::TAGDEL_META,
    utility::giveaway::GSTART_META,
    utility::giveaway::GEND_META,
    utility::giveaway::GREROLL_META,
    utility::ticket::TICKET_META,
    utility::ticket::CLOSETICKET_META,
    moderation::ban::META,
    moderation::kick::META,
    moderation::mute::META,
    moderation::unmute::META,
    moderation::timeout::META,
    moderation::untimeout::META,
    moderation::warn::META,
    moderation::purge::META,
    moderation::nuke::META,
    moderation::modlogs::META,
    moderation::case::META,
    config::prefix::META,
    config::welcome::META,
    config::logchannel::META,
    config::muterole::META,
    config::automod::META,
    config::autorole::META,
    config::reactionrole::META,
    config::starboard::META,
    config::disable::META,
    config::enable::META,
    config::disabledlist::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::help::help(),
        utility::ping::ping(),
        utility::afk::afk(),
        utility::tags::tag(),
        utility::tags::tags(),
        utility::tags::tagadd(),
        utility::tags::tagdel(),
        utility::giveaway::gstart(),
        utility::giveaway::gend(),
        utility::giveaway::greroll(),
        utility::ticket::ticket(),
        utility::ticket::closeticket(),
        moderation::ban::ban(),
        moderation::kick::kick(),
        moderation::mute::mute(),
        moderation::unmute::unmute(),
        moderation::timeout::timeout(),
        moderation::untimeout::untimeout(),
        moderation::warn::warn(),
        moderation::purge::purge(),
        moderation::nuke::nuke(),
        moderation::modlogs::modlogs(),
        moderation::case::case(),
        config::prefix::prefix(),
        config::welcome::welcome(),
        config::logchannel::logchannel(),
        config::muterole::muterole(),
        config::automod::automod(),
        config::autorole::autorole(),
        config::reactionrole::reactionrole(),
        config::starboard::starboard(),
        config::disable::disable(),
        config::enable::enable(),
        config::disabledlist::disabledlist(),
    ]
}

/// Look up a command's static metadata by primary name.
pub fn find_meta(name: &str) -> Option<&'static CommandMeta> {
    COMMANDS.iter().find(|meta| meta.name == name)
}

/// Resolve raw user input to a primary command name, via name or alias.
pub fn resolve_command_name(input: &str) -> Option<&'static str> {
    let needle = input.trim().to_ascii_lowercase();
    COMMANDS
        .iter()
        .find(|meta| meta.name == needle || meta.aliases.contains(&needle.as_str()))
        .map(|meta| meta.name)
}

/// Every category that currently has at least one command.
pub fn category_names() -> Vec<&'static str> {
    let mut categories: Vec<&str> = COMMANDS.iter().map(|meta| meta.category).collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

/// Near-name matches for "command not found" replies: substring
/// containment in either direction over names and aliases.
pub fn similar_commands(input: &str) -> Vec<&'static str> {
    let needle = input.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    COMMANDS
        .iter()
        .filter(|meta| {
            std::iter::once(meta.name)
                .chain(meta.aliases.iter().copied())
                .any(|name| name.contains(&needle) || needle.contains(name))
        })
        .map(|meta| meta.name)
        .collect()
}

/// Startup validation: a duplicate name or alias is a configuration bug
/// and should abort startup rather than shadow a command silently.
pub fn validate_registry() -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for meta in COMMANDS {
        for name in std::iter::once(meta.name).chain(meta.aliases.iter().copied()) {
            if !seen.insert(name) {
                anyhow::bail!("duplicate command name or alias in registry: `{name}`");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_no_duplicates() {
        validate_registry().expect("registry should validate");
    }

    #[test]
    fn meta_table_and_command_list_agree() {
        let built = commands();
        assert_eq!(built.len(), COMMANDS.len());

        let mut meta_names: Vec<&str> = COMMANDS.iter().map(|meta| meta.name).collect();
        let mut built_names: Vec<String> =
            built.iter().map(|command| command.name.clone()).collect();
        meta_names.sort_unstable();
        built_names.sort_unstable();

        assert_eq!(
            built_names,
            meta_names
                .iter()
                .map(|name| (*name).to_owned())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn aliases_resolve_to_primary_names() {
        assert_eq!(resolve_command_name("ban"), Some("ban"));
        assert_eq!(resolve_command_name("BAN"), Some("ban"));
        assert_eq!(resolve_command_name("commands"), Some("help"));
        assert_eq!(resolve_command_name("nope"), None);
    }

    #[test]
    fn similar_commands_match_substrings_both_ways() {
        assert!(similar_commands("banhammer").contains(&"ban"));
        assert!(similar_commands("tag").contains(&"tagadd"));
        assert!(similar_commands("").is_empty());
        assert!(similar_commands("zzzzz").is_empty());
    }

    #[test]
    fn guard_exempt_commands_exist_in_the_registry() {
        for name in dispatch::GUARD_EXEMPT_COMMANDS {
            assert!(
                find_meta(name).is_some(),
                "guard-exempt command `{name}` is missing from the registry"
            );
        }
    }
}
