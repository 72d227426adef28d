//! Command tree of the `upjet` binary.
//!
//! Declares the global `--verbose` flag, the `batch` and `help` commands,
//! and the capabilities bound before any argument is parsed.

use std::sync::Arc;

use log::debug;
use upjet_core::command_definitions::{App, CommandDef, FlagDef, Value};
use upjet_core::context::Context;
use upjet_core::error::Result;
use upjet_core::logging::{Logger, NopLogger, VerboseLogger};

use crate::batch::{self, PackageTool, XpkgCli};
use crate::config::{APP_NAME, HELP_DESCRIPTION, HELP_OPTIONS};

pub const VERBOSE_FLAG: &str = "verbose";
pub const HELP_COMMAND: &str = "help";

/// Builds the complete `upjet` application.
///
/// # Examples
///
/// ```rust
/// use upjet_cli::cli_args::build_app;
///
/// let app = build_app();
/// assert_eq!(app.name(), "upjet");
/// assert!(app.lookup(&["batch"]).is_some());
/// ```
#[must_use]
pub fn build_app() -> App {
    App::builder(APP_NAME)
        .description(HELP_DESCRIPTION)
        .help_options(HELP_OPTIONS)
        .flag(
            FlagDef::boolean(VERBOSE_FLAG)
                .help("Print verbose logging statements.")
                .hook(bind_verbose_logger),
        )
        .command(batch::command())
        .command(CommandDef::new(HELP_COMMAND).help("Show help.").help_command())
        .build()
}

/// Context with the defaults every invocation starts from: a silent logger
/// and the packaging tool named by the environment.
#[must_use]
pub fn default_context() -> Context {
    let mut context = Context::new();
    context.bind::<dyn Logger>(Arc::new(NopLogger));
    context.bind::<dyn PackageTool>(Arc::new(XpkgCli::from_env()));
    context
}

/// Hook of `--verbose`: swaps in the development-mode logger.
///
/// # Errors
///
/// Never fails; the signature matches the hook contract.
pub fn bind_verbose_logger(context: &mut Context, value: &Value) -> Result<()> {
    if matches!(value, Value::Bool(true)) {
        debug!("Binding verbose logger");
        context.bind::<dyn Logger>(Arc::new(VerboseLogger::new()));
    } else {
        context.bind::<dyn Logger>(Arc::new(NopLogger));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use upjet_core::parser::{parse, Resolution};

    #[test]
    fn test_commands_are_alphabetized() {
        let app = build_app();
        let names: Vec<&str> = app.root.subcommands.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["batch", "help"]);
    }

    #[test]
    fn test_default_context_is_quiet() {
        let context = default_context();
        let logger = context.resolve::<dyn Logger>().unwrap();
        assert!(!logger.debug_enabled());
        assert!(context.is_bound::<dyn PackageTool>());
    }

    #[test]
    fn test_verbose_hook_binds_verbose_logger() {
        let mut context = default_context();
        bind_verbose_logger(&mut context, &Value::Bool(true)).unwrap();
        assert!(context.resolve::<dyn Logger>().unwrap().debug_enabled());

        bind_verbose_logger(&mut context, &Value::Bool(false)).unwrap();
        assert!(!context.resolve::<dyn Logger>().unwrap().debug_enabled());
    }

    #[test]
    fn test_verbose_after_command_name() {
        let app = build_app();
        let mut context = default_context();
        let resolution = parse(
            &app,
            &["batch", "--provider-name=provider-aws", "--service=ec2", "--verbose"],
            &mut context,
        )
        .unwrap();

        assert!(matches!(resolution, Resolution::Invocation(_)));
        assert!(context.resolve::<dyn Logger>().unwrap().debug_enabled());
    }

    #[test]
    fn test_help_flag_renders_description() {
        let app = build_app();
        let mut context = default_context();
        match parse(&app, &["--help"], &mut context).unwrap() {
            Resolution::Help(usage) => {
                assert!(usage.starts_with("Usage: upjet <command> [flags]"));
                assert!(usage.contains("The Upjet CLI."));
                assert!(usage.contains("batch"));
                assert!(usage.contains("--verbose"));
            }
            Resolution::Invocation(_) => panic!("expected help"),
        }
    }
}
