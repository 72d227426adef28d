//! Argument parsing and command dispatch.
//!
//! Tokens are consumed left to right. Each one is a long flag (`--name`,
//! `--name=value`), a short flag (`-n`) or the next segment of the command
//! path. Flag hooks fire as soon as their value is known, so anything they
//! bind into the [`Context`] is in place before the next token is read.

use std::ffi::OsStr;

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;

use crate::command_definitions::{
    App, CommandDef, FlagDef, Value, ValueKind, HELP_FLAG, HELP_SHORT,
};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::help::render_usage;
use crate::hooks::run_hook;

/// Final flag values of an invocation, defaults included.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArgValues {
    values: IndexMap<String, Value>,
}

impl ArgValues {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn flag_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// `false` when the flag is absent.
    #[must_use]
    pub fn flag_bool(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Bool(true)))
    }

    #[must_use]
    pub fn flag_uint(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(Value::Uint(value)) => Some(*value),
            _ => None,
        }
    }

    /// Empty when the flag is absent.
    #[must_use]
    pub fn flag_list(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(Value::List(values)) => values,
            _ => &[],
        }
    }

    /// Stores `value`; lists accumulate across occurrences, scalars are replaced.
    fn record(&mut self, name: &str, value: Value) -> &Value {
        let stored = self
            .values
            .entry(name.to_string())
            .and_modify(|stored| {
                if let (Value::List(existing), Value::List(items)) = (&mut *stored, &value) {
                    existing.extend(items.iter().cloned());
                }
            })
            .or_insert_with(|| value.clone());
        if !matches!(stored, Value::List(_)) {
            *stored = value;
        }
        stored
    }
}

/// A fully resolved command, ready for the executor.
#[derive(Debug)]
pub struct Invocation<'a> {
    nodes: Vec<&'a CommandDef>,
    values: ArgValues,
}

impl<'a> Invocation<'a> {
    #[must_use]
    pub fn command(&self) -> &'a CommandDef {
        self.nodes[self.nodes.len() - 1]
    }

    /// Names of the selected commands below the root, space separated.
    #[must_use]
    pub fn command_path(&self) -> String {
        self.nodes.iter().skip(1).map(|node| node.name.as_str()).join(" ")
    }

    #[must_use]
    pub fn nodes(&self) -> &[&'a CommandDef] {
        &self.nodes
    }

    #[must_use]
    pub fn values(&self) -> &ArgValues {
        &self.values
    }
}

#[derive(Debug)]
pub enum Resolution<'a> {
    /// `--help` was given; holds usage for the position it appeared at.
    Help(String),
    Invocation(Invocation<'a>),
}

/// Parses `args` (without the program name) against `app`.
///
/// # Errors
///
/// Returns a parse error carrying usage text for unknown tokens, unknown or
/// misplaced flags, missing or invalid flag values, a missing command or a
/// missing required flag. A token that is not valid UTF-8 is an unknown
/// token. Hook errors are returned unchanged.
pub fn parse<'a, S: AsRef<OsStr>>(
    app: &'a App,
    args: &[S],
    context: &mut Context,
) -> Result<Resolution<'a>> {
    let tokens: Vec<&OsStr> = args.iter().map(AsRef::as_ref).collect();
    let mut state = ParseState::new(app);
    let mut index = 0;

    while index < tokens.len() {
        let token = state.token(tokens[index])?;
        let next = tokens.get(index + 1).copied();
        index += 1;

        if let Some(long) = token.strip_prefix("--") {
            if long.is_empty() {
                return Err(Error::unknown_token(token, state.usage()));
            }
            let (name, attached) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };
            if name == HELP_FLAG {
                debug!("Help requested at `{}`", state.position());
                return Ok(Resolution::Help(state.usage()));
            }
            let flag = state.find_long(name)?;
            if state.apply(flag, attached, next, context)? {
                index += 1;
            }
        } else if token.len() > 1 && token.starts_with('-') {
            let mut chars = token.chars().skip(1);
            let (Some(short), None) = (chars.next(), chars.next()) else {
                return Err(Error::unknown_flag(token, state.usage()));
            };
            if short == HELP_SHORT {
                debug!("Help requested at `{}`", state.position());
                return Ok(Resolution::Help(state.usage()));
            }
            let flag = state.find_short(short, token)?;
            if state.apply(flag, None, next, context)? {
                index += 1;
            }
        } else {
            state.descend(token)?;
        }
    }

    state.finish()
}

struct ParseState<'a> {
    app: &'a App,
    nodes: Vec<&'a CommandDef>,
    values: ArgValues,
}

impl<'a> ParseState<'a> {
    fn new(app: &'a App) -> Self {
        Self {
            app,
            nodes: vec![&app.root],
            values: ArgValues::default(),
        }
    }

    fn token<'t>(&self, token: &'t OsStr) -> Result<&'t str> {
        token
            .to_str()
            .ok_or_else(|| Error::unknown_token(&token.to_string_lossy(), self.usage()))
    }

    fn current(&self) -> &'a CommandDef {
        self.nodes[self.nodes.len() - 1]
    }

    fn position(&self) -> String {
        self.nodes.iter().map(|node| node.name.as_str()).join(" ")
    }

    fn usage(&self) -> String {
        render_usage(self.app, &self.nodes)
    }

    /// Innermost declaration wins when a command shadows an outer flag.
    fn find_long(&self, name: &str) -> Result<&'a FlagDef> {
        if let Some(flag) = self.nodes.iter().rev().find_map(|node| node.flags.get(name)) {
            return Ok(flag);
        }

        let flag = format!("--{name}");
        match self.current().declared_below(name) {
            Some(owner) => {
                let below_root = self.nodes.iter().skip(1).map(|node| node.name.as_str());
                Err(Error::FlagOutOfScope {
                    flag,
                    owner: below_root.chain(std::iter::once(owner.as_str())).join(" "),
                    usage: self.usage(),
                })
            }
            None => Err(Error::unknown_flag(&flag, self.usage())),
        }
    }

    fn find_short(&self, short: char, token: &str) -> Result<&'a FlagDef> {
        self.nodes
            .iter()
            .rev()
            .find_map(|node| node.find_short(short))
            .ok_or_else(|| Error::unknown_flag(token, self.usage()))
    }

    /// Finalizes one occurrence of `flag` and runs its hook.
    ///
    /// # Returns
    ///
    /// Whether `next` was consumed as the flag's value.
    fn apply(
        &mut self,
        flag: &'a FlagDef,
        attached: Option<&str>,
        next: Option<&OsStr>,
        context: &mut Context,
    ) -> Result<bool> {
        let (text, consumed) = match (flag.kind, attached) {
            (ValueKind::Bool, None) => (None, false),
            (_, Some(text)) => (Some(text), false),
            (_, None) => match next {
                Some(next) if !next.as_encoded_bytes().starts_with(b"--") => {
                    (Some(self.token(next)?), true)
                }
                _ => return Err(Error::missing_flag_value(&flag.name, self.usage())),
            },
        };

        let value = match text {
            None => Value::Bool(true),
            Some(text) => self.convert(flag, text)?,
        };

        debug!("Recognized flag `--{}` = `{}`", flag.name, value);
        let stored = self.values.record(&flag.name, value);
        run_hook(flag, context, stored)?;
        Ok(consumed)
    }

    fn convert(&self, flag: &FlagDef, text: &str) -> Result<Value> {
        let invalid = || {
            Error::invalid_flag_value(&flag.name, text, &flag.kind.to_string(), self.usage())
        };
        match flag.kind {
            ValueKind::Bool => text.parse::<bool>().map(Value::Bool).map_err(|_| invalid()),
            ValueKind::String => Ok(Value::Str(text.to_string())),
            ValueKind::Uint => text.parse::<u64>().map(Value::Uint).map_err(|_| invalid()),
            ValueKind::List => {
                let items: Vec<String> = text
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect();
                if items.is_empty() {
                    Err(invalid())
                } else {
                    Ok(Value::List(items))
                }
            }
        }
    }

    fn descend(&mut self, token: &str) -> Result<()> {
        let current = self.current();
        let next = if current.behavior.is_terminal() {
            None
        } else {
            current.subcommand_named(token)
        };

        match next {
            Some(command) => {
                debug!("Selected command `{}`", command.name);
                self.nodes.push(command);
                Ok(())
            }
            None => Err(Error::unknown_token(token, self.usage())),
        }
    }

    fn finish(mut self) -> Result<Resolution<'a>> {
        let current = self.current();
        if !current.behavior.is_terminal() {
            return Err(Error::MissingCommand {
                expected: current.subcommands.keys().cloned().collect(),
                usage: self.usage(),
            });
        }

        let in_scope: Vec<&'a FlagDef> = self
            .nodes
            .iter()
            .flat_map(|node| node.flags.values())
            .collect();

        if let Some(flag) = in_scope
            .iter()
            .find(|flag| flag.required && !self.values.contains(&flag.name))
        {
            return Err(Error::MissingRequiredFlag {
                flag: flag.name.clone(),
                usage: self.usage(),
            });
        }

        for flag in in_scope {
            if let Some(default) = &flag.default {
                if !self.values.contains(&flag.name) {
                    self.values.values.insert(flag.name.clone(), default.clone());
                }
            }
        }

        Ok(Resolution::Invocation(Invocation {
            nodes: self.nodes,
            values: self.values,
        }))
    }
}
