//! Natural-language pattern matching.
//!
//! Rules are kept in two ordered lists, one per locale. The secondary
//! locale (Spanish) is scanned before the primary one (English), and the
//! first rule whose expression matches decides the action.

use std::collections::BTreeMap;
use std::fmt;

use regex::{Captures, Regex, RegexBuilder};
use serde::Serialize;
use tracing::trace;

use crate::config::{ConfigError, PatternRuleConfig};
use crate::domain::{Args, Invocation};

/// Locale a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Spanish phrases. Scanned first.
    Secondary,
    /// English phrases.
    Primary,
}

impl Locale {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondary => "secondary",
            Self::Primary => "primary",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives an invocation from the capture groups of a matched rule.
#[derive(Clone)]
pub enum Extractor {
    /// Config-defined: argument values are `$1` / `${name}` templates.
    Template {
        command: String,
        args: BTreeMap<String, String>,
    },
    /// Code-defined pure function of the captures.
    Func(fn(&Captures<'_>) -> Invocation),
}

impl Extractor {
    /// Run the extractor against a successful match.
    pub fn extract(&self, captures: &Captures<'_>) -> Invocation {
        match self {
            Self::Func(f) => f(captures),
            Self::Template { command, args } => {
                let mut extracted = Args::new();
                for (key, template) in args {
                    let mut value = String::new();
                    captures.expand(template, &mut value);
                    let value = value.trim();
                    // Optional groups that did not participate render empty
                    if !value.is_empty() {
                        extracted.insert(key.clone(), value.into());
                    }
                }
                Invocation {
                    command: command.clone(),
                    args: extracted,
                }
            }
        }
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template { command, args } => f
                .debug_struct("Template")
                .field("command", command)
                .field("args", args)
                .finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// What a rule resolves to.
#[derive(Debug, Clone)]
pub enum PatternAction {
    Recipe(String),
    Command(String),
    Extract(Extractor),
}

/// A compiled natural-language rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub id: String,
    pub locale: Locale,
    pub expression: Regex,
    pub action: PatternAction,
}

impl PatternRule {
    /// Build a rule from a pattern string. Matching is case-insensitive.
    pub fn new(
        id: impl Into<String>,
        locale: Locale,
        pattern: &str,
        action: PatternAction,
    ) -> Result<Self, ConfigError> {
        let id = id.into();
        let expression = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                id: id.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            id,
            locale,
            expression,
            action,
        })
    }

    /// Compile a rule from its configuration form.
    ///
    /// Rules without an explicit id get `<locale>-<index>`.
    pub fn compile(
        config: &PatternRuleConfig,
        locale: Locale,
        index: usize,
    ) -> Result<Self, ConfigError> {
        let id = config
            .id
            .clone()
            .unwrap_or_else(|| format!("{locale}-{index}"));

        let action = match (&config.recipe, &config.command, &config.extract) {
            (Some(recipe), None, None) => PatternAction::Recipe(recipe.clone()),
            (None, Some(command), None) => PatternAction::Command(command.clone()),
            (None, None, Some(template)) => PatternAction::Extract(Extractor::Template {
                command: template.command.clone(),
                args: template.args.clone(),
            }),
            (None, None, None) => {
                return Err(ConfigError::InvalidRule {
                    id,
                    reason: "rule needs one of recipe, command or extract".into(),
                });
            }
            _ => {
                return Err(ConfigError::InvalidRule {
                    id,
                    reason: "rule may only have one of recipe, command or extract".into(),
                });
            }
        };

        Self::new(id, locale, &config.pattern, action)
    }
}

/// Outcome of a successful match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolvedAction {
    Recipe { name: String },
    Command { name: String, args: Args },
}

/// A match together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub rule_id: String,
    pub locale: Locale,
    pub action: ResolvedAction,
}

/// Ordered rule list with secondary-locale rules first.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
}

impl PatternSet {
    /// Concatenate the two locale lists, secondary first.
    pub fn new(secondary: Vec<PatternRule>, primary: Vec<PatternRule>) -> Self {
        let mut rules = secondary;
        rules.extend(primary);
        Self { rules }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules for one locale.
    pub fn count(&self, locale: Locale) -> usize {
        self.rules.iter().filter(|r| r.locale == locale).count()
    }

    /// Resolve `input` with the first matching rule.
    pub fn match_input(&self, input: &str) -> Option<ResolvedAction> {
        self.explain(input).map(|e| e.action)
    }

    /// Like `match_input`, also reporting which rule matched.
    pub fn explain(&self, input: &str) -> Option<Explanation> {
        for rule in &self.rules {
            let Some(captures) = rule.expression.captures(input) else {
                continue;
            };
            trace!(rule = %rule.id, locale = %rule.locale, "Pattern matched");

            let action = match &rule.action {
                PatternAction::Recipe(name) => ResolvedAction::Recipe { name: name.clone() },
                PatternAction::Command(name) => ResolvedAction::Command {
                    name: name.clone(),
                    args: Args::new(),
                },
                PatternAction::Extract(extractor) => {
                    let invocation = extractor.extract(&captures);
                    ResolvedAction::Command {
                        name: invocation.command,
                        args: invocation.args,
                    }
                }
            };

            return Some(Explanation {
                rule_id: rule.id.clone(),
                locale: rule.locale,
                action,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(
        id: &str,
        locale: Locale,
        pattern: &str,
        action: PatternAction,
    ) -> PatternRule {
        PatternRule::new(id, locale, pattern, action).unwrap()
    }

    fn recipe(id: &str, locale: Locale, pattern: &str, name: &str) -> PatternRule {
        rule(id, locale, pattern, PatternAction::Recipe(name.into()))
    }

    fn command(id: &str, locale: Locale, pattern: &str, name: &str) -> PatternRule {
        rule(id, locale, pattern, PatternAction::Command(name.into()))
    }

    fn check_ci() -> PatternSet {
        let ci = command("ci", Locale::Primary, r"^check ci$", "ci:monitor");
        PatternSet::new(vec![], vec![ci])
    }

    fn branch_from_captures(caps: &Captures<'_>) -> Invocation {
        let name = caps.get(1).map_or("", |m| m.as_str()).replace(' ', "-");
        Invocation::new("git:branch").with_arg("branch", name)
    }

    #[test]
    fn test_first_match_wins() {
        let set = PatternSet::new(
            vec![],
            vec![
                recipe("r1", Locale::Primary, r"^deploy", "ship"),
                command("r2", Locale::Primary, r"deploy now$", "x"),
            ],
        );
        let ship = ResolvedAction::Recipe {
            name: "ship".into(),
        };
        assert_eq!(set.match_input("deploy now"), Some(ship));
    }

    #[test]
    fn test_secondary_locale_takes_precedence() {
        let set = PatternSet::new(
            vec![recipe("es", Locale::Secondary, r"ci$", "fix-ci")],
            vec![command("en", Locale::Primary, r"^fix", "quality:fix")],
        );
        let explained = set.explain("fix de ci").unwrap();
        assert_eq!(explained.rule_id, "es");
        assert_eq!(explained.locale, Locale::Secondary);
        let fix_ci = ResolvedAction::Recipe {
            name: "fix-ci".into(),
        };
        assert_eq!(explained.action, fix_ci);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(check_ci().match_input("CHECK CI").is_some());
    }

    #[test]
    fn test_no_match_returns_none() {
        assert_eq!(check_ci().match_input("git:status"), None);
    }

    #[test]
    fn test_literal_command_has_empty_args() {
        let set = PatternSet::new(
            vec![],
            vec![command("t", Locale::Primary, r"^run tests$", "test")],
        );
        assert_eq!(
            set.match_input("run tests"),
            Some(ResolvedAction::Command {
                name: "test".into(),
                args: Args::new(),
            })
        );
    }

    #[test]
    fn test_template_extractor() {
        let mut args = BTreeMap::new();
        args.insert("query".to_string(), "${query}".to_string());
        args.insert("path".to_string(), "${path}".to_string());
        let set = PatternSet::new(
            vec![],
            vec![rule(
                "search",
                Locale::Primary,
                r"^search\s+(?:for\s+)?(?P<query>.+?)(?:\s+in\s+(?P<path>\S+))?$",
                PatternAction::Extract(Extractor::Template {
                    command: "search".into(),
                    args,
                }),
            )],
        );

        let matched = set.match_input("search for authenticate");
        let Some(ResolvedAction::Command { name, args }) = matched else {
            panic!("expected command");
        };
        assert_eq!(name, "search");
        assert_eq!(args.get("query"), Some(&json!("authenticate")));
        assert!(!args.contains_key("path"));

        let matched = set.match_input("search token in src/auth");
        let Some(ResolvedAction::Command { args, .. }) = matched else {
            panic!("expected command");
        };
        assert_eq!(args.get("query"), Some(&json!("token")));
        assert_eq!(args.get("path"), Some(&json!("src/auth")));
    }

    #[test]
    fn test_func_extractor() {
        let set = PatternSet::new(
            vec![],
            vec![rule(
                "branch",
                Locale::Primary,
                r"^new branch (.+)$",
                PatternAction::Extract(Extractor::Func(branch_from_captures)),
            )],
        );
        assert_eq!(
            set.match_input("new branch login form"),
            Some(ResolvedAction::Command {
                name: "git:branch".into(),
                args: Invocation::new("x").with_arg("branch", "login-form").args,
            })
        );
    }

    #[test]
    fn test_compile_rejects_ambiguous_rule() {
        let config = PatternRuleConfig {
            id: Some("bad".into()),
            pattern: "x".into(),
            recipe: Some("a".into()),
            command: Some("b".into()),
            extract: None,
        };
        let err = PatternRule::compile(&config, Locale::Primary, 0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { ref id, .. } if id == "bad"));
    }

    #[test]
    fn test_compile_rejects_bad_regex() {
        let config = PatternRuleConfig {
            id: None,
            pattern: "(unclosed".into(),
            recipe: Some("a".into()),
            command: None,
            extract: None,
        };
        let err = PatternRule::compile(&config, Locale::Secondary, 3).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref id, .. } if id == "secondary-3"));
    }
}
