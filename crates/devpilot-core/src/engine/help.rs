//! Plain-text help listing.

use std::collections::BTreeMap;

use super::dispatcher::{READ_COMMAND, SEARCH_COMMAND, WRITE_COMMAND};
use crate::config::{EngineConfig, HELP_COMMAND};

const GENERAL_GROUP: &str = "general";

/// Render the command registry and recipe dictionary as help text.
///
/// Commands are grouped by the prefix before `:`; names without a prefix
/// land in `general`.
pub fn render_help(config: &EngineConfig) -> String {
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for name in config.commands.keys() {
        if name == HELP_COMMAND {
            continue;
        }
        let group = name
            .split_once(':')
            .map_or(GENERAL_GROUP, |(prefix, _)| prefix);
        groups.entry(group).or_default().push(name);
    }

    let mut out = String::from("Commands:\n");
    for (group, names) in &groups {
        out.push_str(&format!("  {group}: {}\n", names.join(", ")));
    }

    out.push_str(&format!(
        "\nBuilt-in:\n  {SEARCH_COMMAND} (query, path?, limit?), {READ_COMMAND} (path), \
         {WRITE_COMMAND} (path, content), {HELP_COMMAND}\n"
    ));

    out.push_str("\nRecipes:\n");
    if config.recipes.is_empty() {
        out.push_str("  (none)\n");
    }
    for (name, steps) in &config.recipes {
        out.push_str(&format!("  {name}: {}\n", steps.join(" -> ")));
    }

    out.push_str("\nPhrases are matched first, e.g. \"fix de ci\" or \"search for <text>\".");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::HandlerRef;

    fn config() -> EngineConfig {
        let mut config = EngineConfig::default();
        for name in ["git:status", "git:commit", "build", "ci:monitor"] {
            config
                .commands
                .insert(name.to_string(), Some(HandlerRef::new("exec:true")));
        }
        config.commands.insert(HELP_COMMAND.to_string(), None);
        config.recipes.insert(
            "commit-push".to_string(),
            vec!["git:commit".into(), "ci:monitor".into()],
        );
        config
    }

    #[test]
    fn test_groups_by_prefix() {
        let text = render_help(&config());
        assert!(text.contains("  ci: ci:monitor\n"));
        assert!(text.contains("  git: git:commit, git:status\n"));
        assert!(text.contains("  general: build\n"));
    }

    #[test]
    fn test_lists_recipes_and_builtins() {
        let text = render_help(&config());
        assert!(text.contains("commit-push: git:commit -> ci:monitor"));
        assert!(text.contains("search (query, path?, limit?)"));
        assert!(!text.contains("general: build, help"));
    }

    #[test]
    fn test_sections_are_separated() {
        let text = render_help(&config());
        assert!(text.starts_with("Commands:\n"));
        assert!(text.contains("write (path, content), help\n\nRecipes:\n"));
        assert!(text.ends_with("\"search for <text>\"."));
    }

    #[test]
    fn test_empty_recipes() {
        let text = render_help(&EngineConfig::default());
        assert!(text.contains("Recipes:\n  (none)"));
    }
}
