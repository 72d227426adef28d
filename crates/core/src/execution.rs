use log::{debug, info};

use crate::command_definitions::{App, Behavior, HELP_FLAG};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::parser::{parse, Invocation, Resolution};

/// What a successfully executed command leaves for the driver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Usage text to print on standard output.
    Usage(String),
}

/// Executes a resolved invocation against the final context.
///
/// Leaf behaviors run exactly once and their errors are returned unchanged.
/// The help behavior parses a lone `--help` again instead of running anything.
///
/// # Errors
///
/// Returns whatever the command's behavior fails with.
pub fn execute(app: &App, invocation: Invocation<'_>, context: &mut Context) -> Result<Outcome> {
    let command = invocation.command();
    info!("Executing command `{}`", invocation.command_path());

    match &command.behavior {
        Behavior::Run(behavior) => {
            behavior.run(invocation.values(), context)?;
            Ok(Outcome::Completed)
        }
        Behavior::Help => {
            debug!("Re-entering the parser with `--{HELP_FLAG}`");
            match parse(app, &[format!("--{HELP_FLAG}")], context)? {
                Resolution::Help(usage) => Ok(Outcome::Usage(usage)),
                Resolution::Invocation(other) => Err(Error::HelpReentry(other.command_path())),
            }
        }
        Behavior::Group => Err(Error::MissingCommand {
            expected: command.subcommands.keys().cloned().collect(),
            usage: crate::help::render_usage(app, invocation.nodes()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_definitions::{CommandDef, FlagDef};
    use crate::parser::ArgValues;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Calls(AtomicUsize);

    fn sample() -> App {
        App::builder("tool")
            .description("The tool.")
            .flag(FlagDef::boolean("verbose"))
            .command(
                CommandDef::new("count")
                    .run(|_: &ArgValues, context: &Context| -> Result<()> {
                        context.resolve::<Calls>()?.0.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }),
            )
            .command(
                CommandDef::new("fail")
                    .run(|_: &ArgValues, _: &Context| -> Result<()> {
                        Err(Error::Misc("no luck".to_string()))
                    }),
            )
            .command(CommandDef::new("help").help_command())
            .build()
    }

    fn run(app: &App, args: &[&str], context: &mut Context) -> Result<Outcome> {
        match parse(app, args, context)? {
            Resolution::Invocation(invocation) => execute(app, invocation, context),
            Resolution::Help(usage) => Ok(Outcome::Usage(usage)),
        }
    }

    #[test]
    fn test_leaf_runs_exactly_once() {
        let app = sample();
        let calls = Arc::new(Calls::default());
        let mut context = Context::new();
        context.bind(calls.clone());

        assert_eq!(run(&app, &["count"], &mut context).unwrap(), Outcome::Completed);
        assert_eq!(calls.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_leaf_error_is_returned_unchanged() {
        let app = sample();
        let mut context = Context::new();
        let error = run(&app, &["fail"], &mut context).unwrap_err();
        assert!(matches!(error, Error::Misc(message) if message == "no luck"));
    }

    #[test]
    fn test_unbound_capability_is_fatal() {
        let app = sample();
        let mut context = Context::new();
        let error = run(&app, &["count"], &mut context).unwrap_err();
        assert!(matches!(error, Error::NotBound { .. }));
    }

    #[test]
    fn test_help_command_matches_help_flag() {
        let app = sample();
        let calls = Arc::new(Calls::default());
        let mut context = Context::new();
        context.bind(calls.clone());

        let from_command = run(&app, &["help"], &mut context).unwrap();
        let from_flag = run(&app, &["--help"], &mut context).unwrap();

        assert_eq!(from_command, from_flag);
        assert!(matches!(from_command, Outcome::Usage(usage) if usage.starts_with("Usage: tool")));
        assert_eq!(calls.0.load(Ordering::SeqCst), 0);
    }
}
