use crate::CommandMeta;

pub fn unknown_category_message(wanted_category: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Unknown category: {}\nValid categories: {}",
        display_category(wanted_category),
        valid
    )
}

pub fn no_commands_message(category: Option<&str>) -> String {
    match category {
        Some(cat) => format!("No commands found in category: {}", display_category(cat)),
        None => "No commands found at all. (This probably means something is broken)".to_owned(),
    }
}

pub fn page_out_of_range_message(requested_page: usize, total_pages: usize) -> String {
    format!(
        "Page {} does not exist. Available pages: 1-{}.",
        requested_page, total_pages
    )
}

/// Render a command slice grouped under category headers.
pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        if command.aliases.is_empty() {
            out.push_str(&format!("`{}`: {}\n", command.name, command.desc));
        } else {
            out.push_str(&format!(
                "`{}` ({}): {}\n",
                command.name,
                command.aliases.join(", "),
                command.desc
            ));
        }
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::grouped_help_description;
    use crate::CommandMeta;

    const FAKE: [CommandMeta; 2] = [
        CommandMeta {
            name: "alpha",
            aliases: &["a"],
            desc: "First.",
            category: "utility",
            usage: "!alpha",
            cooldown_secs: 3,
        },
        CommandMeta {
            name: "beta",
            aliases: &[],
            desc: "Second.",
            category: "utility",
            usage: "!beta",
            cooldown_secs: 3,
        },
    ];

    #[test]
    fn grouping_renders_headers_and_aliases() {
        let rendered = grouped_help_description(&[&FAKE[0], &FAKE[1]]);
        assert!(rendered.starts_with("**Utility**"));
        assert!(rendered.contains("`alpha` (a): First."));
        assert!(rendered.contains("`beta`: Second."));
    }
}
