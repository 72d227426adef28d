//! The logger capability handed to commands through the [`Context`](crate::context::Context).
//!
//! Two implementations exist: [`NopLogger`], bound by default, which drops
//! everything, and [`VerboseLogger`], which writes debug-level records through
//! its own `env_logger` instance. The verbose logger is never installed as the
//! global `log` logger, so swapping one for the other only affects the
//! context it is bound in.

use std::fmt::Display;

use env_logger::{Target, WriteStyle};
use itertools::Itertools;
use log::{Level, LevelFilter, Log, Record};

/// Key/value pairs attached to a log statement.
pub type Fields<'a> = &'a [(&'a str, &'a dyn Display)];

const LOG_TARGET: &str = "upjet";

pub trait Logger: Send + Sync {
    fn info(&self, message: &str, fields: Fields<'_>);

    fn debug(&self, message: &str, fields: Fields<'_>);

    /// Whether debug statements reach any output.
    fn debug_enabled(&self) -> bool;
}

/// Discards every statement.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn info(&self, _message: &str, _fields: Fields<'_>) {}

    fn debug(&self, _message: &str, _fields: Fields<'_>) {}

    fn debug_enabled(&self) -> bool {
        false
    }
}

/// Development-mode logger printing info and debug statements.
pub struct VerboseLogger {
    inner: env_logger::Logger,
}

impl VerboseLogger {
    /// Verbose logger writing to standard error.
    #[must_use]
    pub fn new() -> Self {
        Self::with_target(Target::Stderr)
    }

    /// Verbose logger writing to `target`; tests use [`Target::Pipe`] to
    /// capture output.
    #[must_use]
    pub fn with_target(target: Target) -> Self {
        let inner = env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .write_style(WriteStyle::Never)
            .target(target)
            .build();

        Self { inner }
    }

    fn emit(&self, level: Level, message: &str, fields: Fields<'_>) {
        let fields = fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .join(" ");

        if fields.is_empty() {
            self.inner.log(
                &Record::builder()
                    .level(level)
                    .target(LOG_TARGET)
                    .args(format_args!("{message}"))
                    .build(),
            );
        } else {
            self.inner.log(
                &Record::builder()
                    .level(level)
                    .target(LOG_TARGET)
                    .args(format_args!("{message} {fields}"))
                    .build(),
            );
        }
        self.inner.flush();
    }
}

impl Default for VerboseLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for VerboseLogger {
    fn info(&self, message: &str, fields: Fields<'_>) {
        self.emit(Level::Info, message, fields);
    }

    fn debug(&self, message: &str, fields: Fields<'_>) {
        self.emit(Level::Debug, message, fields);
    }

    fn debug_enabled(&self) -> bool {
        true
    }
}
