//! The top-level driver: parse, execute, report, exit.

use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::process::ExitCode;

use log::{debug, warn};

use crate::command_definitions::{App, HELP_FLAG};
use crate::context::Context;
use crate::error::Error;
use crate::execution::{execute, Outcome};
use crate::parser::{parse, Invocation, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}

enum State<'a> {
    Idle(Vec<OsString>),
    Parsing(Vec<OsString>),
    Executing(Invocation<'a>),
    Terminated(Exit),
}

impl Display for State<'_> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Idle(_) => formatter.write_str("idle"),
            State::Parsing(args) => write!(formatter, "parsing {args:?}"),
            State::Executing(invocation) => {
                write!(formatter, "executing `{}`", invocation.command_path())
            }
            State::Terminated(exit) => write!(formatter, "terminated ({exit:?})"),
        }
    }
}

pub struct Driver<'a> {
    app: &'a App,
}

impl<'a> Driver<'a> {
    #[must_use]
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Runs one invocation of the application.
    ///
    /// `args` excludes the program name; when it is empty a single `--help`
    /// is parsed instead. Arguments need not be valid UTF-8; such a token
    /// fails like any other unknown token. Usage goes to `out`, failures to `err`. Every
    /// failure is terminal.
    pub fn run<I, S>(
        &self,
        args: I,
        context: &mut Context,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Exit
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut state = State::Idle(args.into_iter().map(Into::into).collect());

        loop {
            debug!("Driver state: {state}");
            state = match state {
                State::Idle(args) if args.is_empty() => {
                    State::Parsing(vec![OsString::from(format!("--{HELP_FLAG}"))])
                }
                State::Idle(args) => State::Parsing(args),
                State::Parsing(args) => match parse(self.app, &args, context) {
                    Ok(Resolution::Help(usage)) => State::Terminated(self.emit(out, &usage)),
                    Ok(Resolution::Invocation(invocation)) => State::Executing(invocation),
                    Err(error) => State::Terminated(self.report(err, &error)),
                },
                State::Executing(invocation) => match execute(self.app, invocation, context) {
                    Ok(Outcome::Completed) => State::Terminated(Exit::Success),
                    Ok(Outcome::Usage(usage)) => State::Terminated(self.emit(out, &usage)),
                    Err(error) => State::Terminated(self.report(err, &error)),
                },
                State::Terminated(exit) => return exit,
            };
        }
    }

    fn emit(&self, out: &mut dyn Write, usage: &str) -> Exit {
        match out.write_all(usage.as_bytes()).and_then(|()| out.flush()) {
            Ok(()) => Exit::Success,
            Err(error) => {
                warn!("Failed to write usage: {error}");
                Exit::Failure
            }
        }
    }

    /// Writes usage (for parse errors) followed by the error line.
    fn report(&self, err: &mut dyn Write, error: &Error) -> Exit {
        let mut message = String::new();
        if let Some(usage) = error.usage() {
            message.push_str(usage);
            message.push('\n');
        }
        message.push_str(&format!("{}: error: {error}\n", self.app.name()));

        if let Err(write_error) = err.write_all(message.as_bytes()).and_then(|()| err.flush()) {
            warn!("Failed to report error `{error}`: {write_error}");
        }
        Exit::Failure
    }
}
