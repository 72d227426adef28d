//! Integration tests for upjet-core
//!
//! These tests drive complete invocations through the public API: building a
//! tree, binding capabilities, parsing with hooks and executing commands.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use upjet_core::command_definitions::{App, CommandDef, FlagDef, Value};
use upjet_core::config::HelpOptions;
use upjet_core::context::Context;
use upjet_core::driver::{Driver, Exit};
use upjet_core::error::{Error, Result};
use upjet_core::logging::{Logger, NopLogger, VerboseLogger};
use upjet_core::parser::ArgValues;

/// What the executed command saw when it resolved the logger.
#[derive(Default)]
struct Observed {
    runs: AtomicUsize,
    verbose: Mutex<Vec<bool>>,
}

fn observing_command(name: &str) -> CommandDef {
    CommandDef::new(name)
        .help("Record which logger is bound.")
        .flag(FlagDef::string("target").default_value(Value::Str("all".to_string())))
        .run(|_: &ArgValues, context: &Context| -> Result<()> {
            let observed = context.resolve::<Observed>()?;
            let logger = context.resolve::<dyn Logger>()?;
            observed.runs.fetch_add(1, Ordering::SeqCst);
            observed.verbose.lock().unwrap().push(logger.debug_enabled());
            Ok(())
        })
}

fn app() -> App {
    App::builder("upjet")
        .description("The Upjet CLI.")
        .help_options(HelpOptions {
            flags_last: true,
            compact: true,
            wrap_upper_bound: 80,
        })
        .flag(
            FlagDef::boolean("verbose")
                .help("Print verbose logging statements.")
                .hook(|context, _| {
                    context.bind::<dyn Logger>(Arc::new(VerboseLogger::new()));
                    Ok(())
                }),
        )
        .command(observing_command("batch"))
        .command(
            CommandDef::new("nested")
                .help("A group.")
                .subcommand(observing_command("leaf")),
        )
        .command(CommandDef::new("help").help("Show help.").help_command())
        .build()
}

struct Run {
    exit: Exit,
    out: String,
    err: String,
    observed: Arc<Observed>,
}

fn run(app: &App, args: &[&str]) -> Run {
    let observed = Arc::new(Observed::default());
    let mut context = Context::new();
    context.bind::<dyn Logger>(Arc::new(NopLogger));
    context.bind(observed.clone());

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let exit = Driver::new(app).run(args.iter().copied(), &mut context, &mut out, &mut err);

    Run {
        exit,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
        observed,
    }
}

#[test]
fn test_valid_invocation_executes_exactly_once() {
    let app = app();
    for args in [
        vec!["batch"],
        vec!["batch", "--target", "ec2"],
        vec!["nested", "leaf"],
        vec!["nested", "leaf", "--target=s3"],
    ] {
        let run = run(&app, &args);
        assert_eq!(run.exit, Exit::Success, "args: {args:?}, err: {}", run.err);
        assert_eq!(run.observed.runs.load(Ordering::SeqCst), 1, "args: {args:?}");
    }
}

#[test]
fn test_verbose_anywhere_binds_verbose_logger() {
    let app = app();
    for args in [
        vec!["--verbose", "batch"],
        vec!["batch", "--verbose"],
        vec!["batch", "--target", "ec2", "--verbose"],
        vec!["nested", "--verbose", "leaf"],
        vec!["--verbose", "nested", "leaf", "--target=s3"],
    ] {
        let run = run(&app, &args);
        assert_eq!(run.exit, Exit::Success, "args: {args:?}");
        assert_eq!(*run.observed.verbose.lock().unwrap(), vec![true], "args: {args:?}");
    }
}

#[test]
fn test_without_verbose_logger_stays_quiet() {
    let app = app();
    for args in [vec!["batch"], vec!["nested", "leaf", "--target", "x"]] {
        let run = run(&app, &args);
        assert_eq!(*run.observed.verbose.lock().unwrap(), vec![false], "args: {args:?}");
    }
}

#[test]
fn test_unknown_top_level_token_executes_nothing() {
    let app = app();
    let run = run(&app, &["bogus"]);

    assert_eq!(run.exit, Exit::Failure);
    assert_eq!(run.observed.runs.load(Ordering::SeqCst), 0);
    assert!(run.err.contains("Usage: upjet <command> [flags]"));
    assert!(run.err.contains("upjet: error: unexpected argument `bogus`"));
}

#[test]
fn test_empty_arguments_equal_help_flag() {
    let app = app();
    let empty = run(&app, &[]);
    let help = run(&app, &["--help"]);

    assert_eq!(empty.exit, Exit::Success);
    assert_eq!(empty.out, help.out);
    assert!(empty.out.contains("Commands:\n  batch"));
}

#[test]
fn test_help_command_never_runs_other_behavior() {
    let app = app();
    let run_help = run(&app, &["help"]);

    assert_eq!(run_help.exit, Exit::Success);
    assert_eq!(run_help.observed.runs.load(Ordering::SeqCst), 0);
    assert_eq!(run_help.out, run(&app, &["--help"]).out);
}

#[test]
fn test_help_output_is_identical_across_invocations() {
    let app = app();
    assert_eq!(run(&app, &["--help"]).out, run(&app, &["--help"]).out);
}

#[test]
fn test_hook_failure_aborts_before_execution() {
    let app = App::builder("upjet")
        .flag(
            FlagDef::boolean("strict")
                .hook(|_, _| Err(Error::Misc("strict mode unavailable".to_string()))),
        )
        .command(observing_command("batch"))
        .build();

    let run = run(&app, &["batch", "--strict"]);
    assert_eq!(run.exit, Exit::Failure);
    assert_eq!(run.observed.runs.load(Ordering::SeqCst), 0);
    assert_eq!(run.err, "upjet: error: Misc error: strict mode unavailable\n");
}

#[test]
fn test_concurrent_invocations_do_not_share_bindings() {
    let app = app();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|index| {
                let app = &app;
                scope.spawn(move || {
                    let verbose = index % 2 == 0;
                    let args = if verbose {
                        vec!["batch", "--verbose"]
                    } else {
                        vec!["batch"]
                    };
                    let run = run(app, &args);
                    let seen = run.observed.verbose.lock().unwrap().clone();
                    (verbose, seen)
                })
            })
            .collect();

        for handle in handles {
            let (verbose, seen) = handle.join().unwrap();
            assert_eq!(seen, vec![verbose]);
        }
    });
}
