//! Run command handler.
//!
//! Sends the joined input words through the dispatcher and prints the
//! outcome.

use std::process::ExitCode;

use anyhow::Result;
use devpilot_core::{Args, Outcome};
use serde_json::Value;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::format_outcome;

/// Execute the run command.
///
/// Exits with 1 when a recipe fails or a command flags its result as
/// failed, even though dispatch itself succeeded.
pub async fn execute(
    ctx: &CliContext,
    input: &[String],
    raw_args: &[String],
    json: bool,
) -> Result<ExitCode> {
    let args = parse_args(raw_args)?;
    let outcome = dispatch(ctx, &input.join(" "), args).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        let text = format_outcome(&outcome);
        if !text.is_empty() {
            println!("{text}");
        }
    }

    Ok(exit_code_for(&outcome))
}

/// Dispatch one line of input, mapping engine errors to `CliError`.
pub async fn dispatch(ctx: &CliContext, input: &str, args: Args) -> Result<Outcome, CliError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::Arguments("nothing to run".into()));
    }
    Ok(ctx.dispatcher().execute(input, args).await?)
}

/// Exit status for a completed dispatch.
pub fn exit_code_for(outcome: &Outcome) -> ExitCode {
    if outcome.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Parse `key=value` pairs. Values that are valid JSON keep their type.
pub fn parse_args(raw: &[String]) -> Result<Args, CliError> {
    let mut args = Args::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(CliError::Arguments(format!("expected KEY=VALUE, got '{pair}'")));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::Arguments(format!("missing key in '{pair}'")));
        }
        let value = serde_json::from_str::<Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        args.insert(key.to_string(), value);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devpilot_core::{CommandResult, RecipeResult, StepOutcome};
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_args_types() {
        let args = parse_args(&strings(&[
            "limit=5",
            "draft=true",
            "message=fix login",
            "path=src/lib.rs",
            "argv=[\"--no-verify\"]",
            "empty=",
        ]))
        .unwrap();

        assert_eq!(args["limit"], json!(5));
        assert_eq!(args["draft"], json!(true));
        assert_eq!(args["message"], json!("fix login"));
        assert_eq!(args["path"], json!("src/lib.rs"));
        assert_eq!(args["argv"], json!(["--no-verify"]));
        assert_eq!(args["empty"], json!(""));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let args = parse_args(&strings(&["query=a=b"])).unwrap();
        assert_eq!(args["query"], json!("a=b"));
    }

    #[test]
    fn test_parse_args_rejects_malformed_pairs() {
        assert!(matches!(parse_args(&strings(&["oops"])), Err(CliError::Arguments(_))));
        assert!(matches!(parse_args(&strings(&["=1"])), Err(CliError::Arguments(_))));
    }

    #[test]
    fn test_exit_codes() {
        let ok = CommandResult::ok();
        assert_eq!(exit_code_for(&ok.into()), ExitCode::SUCCESS);
        let lint = CommandResult::failure("lint");
        assert_eq!(exit_code_for(&lint.into()), ExitCode::FAILURE);

        let failed = RecipeResult::from_steps("r", vec![StepOutcome::errored("a", "boom")]);
        assert_eq!(exit_code_for(&failed.into()), ExitCode::FAILURE);
    }
}
