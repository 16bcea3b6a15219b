//! Human-readable rendering of dispatch outcomes.

use devpilot_core::{CommandResult, Outcome, RecipeResult, Resolution};
use serde_json::Value;

/// Render an outcome for the terminal.
pub fn format_outcome(outcome: &Outcome) -> String {
    let mut out = String::new();
    match outcome {
        Outcome::Command(result) => write_command(&mut out, result),
        Outcome::Recipe(recipe) => write_recipe(&mut out, recipe, 0),
    }
    out.trim_end().to_string()
}

fn write_command(out: &mut String, result: &CommandResult) {
    if let Some(message) = &result.message {
        out.push_str(&format!("{message}\n"));
    }
    if let Some(data) = &result.data {
        // Search hits are listed under their summary line
        if result.message.is_none() || data.get("matches").is_some() {
            write_data(out, data);
        }
    }

    if let Some(error) = &result.error {
        out.push_str(&format!("error: {error}\n"));
    } else if result.is_failed() {
        out.push_str("failed\n");
    }
}

fn write_data(out: &mut String, data: &Value) {
    if let Some(matches) = data.get("matches").and_then(Value::as_array) {
        for hit in matches {
            out.push_str(&format!(
                "{}:{}: {}\n",
                hit["path"].as_str().unwrap_or("?"),
                hit["line"],
                hit["text"].as_str().unwrap_or_default()
            ));
        }
        return;
    }
    if let Some(content) = data.get("content").and_then(Value::as_str) {
        out.push_str(&format!("{content}\n"));
        return;
    }
    if let Some(stdout) = data.get("stdout").and_then(Value::as_str) {
        if !stdout.is_empty() {
            out.push_str(&format!("{stdout}\n"));
        }
        return;
    }
    if let Ok(pretty) = serde_json::to_string_pretty(data) {
        out.push_str(&format!("{pretty}\n"));
    }
}

fn write_recipe(out: &mut String, recipe: &RecipeResult, indent: usize) {
    let pad = "  ".repeat(indent);
    let verdict = if recipe.success {
        "succeeded"
    } else {
        "failed"
    };
    out.push_str(&format!(
        "{pad}Recipe {} {verdict} ({} step(s) run)\n",
        recipe.recipe,
        recipe.steps.len()
    ));

    for step in &recipe.steps {
        let marker = match (&step.result, step.success) {
            (_, false) => "✗",
            (Some(result), true) if result.is_failed() => "!",
            _ => "✓",
        };
        match (&step.error, &step.result) {
            (Some(error), _) => {
                out.push_str(&format!("{pad}  {marker} {}: {error}\n", step.step));
            }
            (None, Some(Outcome::Recipe(inner))) => {
                out.push_str(&format!("{pad}  {marker} {}\n", step.step));
                write_recipe(out, inner, indent + 2);
            }
            (None, Some(Outcome::Command(result))) if result.is_failed() => {
                let detail = result.error.as_deref().unwrap_or("reported failure");
                out.push_str(&format!("{pad}  {marker} {}: {detail} (stopped)\n", step.step));
            }
            (None, _) => {
                out.push_str(&format!("{pad}  {marker} {}\n", step.step));
            }
        }
    }
}

/// Render a resolution preview.
pub fn format_resolution(resolution: &Resolution) -> String {
    let (summary, rule) = match resolution {
        Resolution::Recipe { name, steps, rule } => {
            (format!("recipe {name}: {}", steps.join(" -> ")), rule)
        }
        Resolution::UnknownRecipe { name, rule } => (format!("unknown recipe {name}"), rule),
        Resolution::Builtin { name, args, rule } => {
            (format!("built-in {name}{}", format_args_suffix(args)), rule)
        }
        Resolution::Command {
            name,
            handler,
            args,
            rule,
        } => (
            format!("command {name} ({handler}){}", format_args_suffix(args)),
            rule,
        ),
        Resolution::Help { rule } => ("help".to_string(), rule),
        Resolution::Unknown { name, rule } => (format!("unknown command {name}"), rule),
    };

    match rule {
        Some(rule) => format!("{summary}\n  matched rule: {rule}"),
        None => summary,
    }
}

fn format_args_suffix(args: &devpilot_core::Args) -> String {
    if args.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = args.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!(" with {}", pairs.join(", "))
}
