//! Upjet Core Library
//!
//! This crate provides the dispatch engine behind the `upjet` command-line
//! front end: a statically built tree of commands and flags, a context of
//! bound capabilities shared by flag hooks and commands, and the parser,
//! executor and driver that turn process arguments into one executed command.
//!
//! # Key Features
//!
//! - **Command Tree**: Commands, subcommands and typed flags assembled with builders
//! - **Capability Binding**: Hooks and commands reach shared values such as the logger through a [`context::Context`]
//! - **Flag Hooks**: Side effects that run the moment a flag is recognized, in command-line order
//! - **Context-Sensitive Help**: Usage for any position in the tree, also shown on parse errors
//! - **Error Handling**: One error type covering parse, hook and execution failures
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use upjet_core::command_definitions::{App, CommandDef, FlagDef};
//! use upjet_core::context::Context;
//! use upjet_core::driver::{Driver, Exit};
//! use upjet_core::logging::{Logger, NopLogger, VerboseLogger};
//! use upjet_core::parser::ArgValues;
//!
//! let app = App::builder("tool")
//!     .flag(FlagDef::boolean("verbose").hook(|context, _| {
//!         context.bind::<dyn Logger>(Arc::new(VerboseLogger::new()));
//!         Ok(())
//!     }))
//!     .command(CommandDef::new("hello").run(
//!         |_: &ArgValues, context: &Context| -> upjet_core::error::Result<()> {
//!             context.resolve::<dyn Logger>()?.info("Hello", &[]);
//!             Ok(())
//!         },
//!     ))
//!     .build();
//!
//! let mut context = Context::new();
//! context.bind::<dyn Logger>(Arc::new(NopLogger));
//!
//! let (mut out, mut err) = (Vec::new(), Vec::new());
//! let exit = Driver::new(&app).run(["hello"], &mut context, &mut out, &mut err);
//! assert_eq!(exit, Exit::Success);
//! ```

pub mod command_definitions;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod execution;
pub mod help;
pub mod hooks;
pub mod logging;
pub mod parser;
