/// Template used when a guild enables welcomes without setting a message.
pub const DEFAULT_WELCOME_TEMPLATE: &str = "Welcome {user} to {server}!";

/// Render a member-message template. `{user}` becomes a mention of the
/// member, `{server}` the guild name; unknown placeholders pass through
/// untouched.
pub fn render_member_template(template: &str, user_id: u64, guild_name: &str) -> String {
    template
        .replace("{user}", &format!("<@{user_id}>"))
        .replace("{server}", guild_name)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_WELCOME_TEMPLATE, render_member_template};

    #[test]
    fn placeholders_are_substituted() {
        assert_eq!(
            render_member_template(DEFAULT_WELCOME_TEMPLATE, 42, "Juniper HQ"),
            "Welcome <@42> to Juniper HQ!"
        );
    }

    #[test]
    fn repeated_and_unknown_placeholders() {
        assert_eq!(
            render_member_template("{user} {user} {unknown}", 7, "x"),
            "<@7> <@7> {unknown}"
        );
        assert_eq!(render_member_template("no placeholders", 7, "x"), "no placeholders");
    }
}
