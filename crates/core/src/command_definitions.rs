//! The static command tree: applications, commands and flags.
//!
//! Trees are assembled once at startup with the builders in this module and
//! never change afterwards. Duplicate names within one scope are programmer
//! errors and panic while building.

use std::fmt::{Debug, Display, Formatter};

use indexmap::IndexMap;

use crate::config::HelpOptions;
use crate::context::Context;
use crate::error::Result;
use crate::hooks::Hook;
use crate::parser::ArgValues;

pub const HELP_FLAG: &str = "help";
pub const HELP_SHORT: char = 'h';
const HELP_TEXT: &str = "Show context-sensitive help.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    String,
    Uint,
    /// Repeatable; each occurrence may hold comma-separated items.
    List,
}

impl ValueKind {
    /// Placeholder shown after `=` in usage text.
    #[must_use]
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::Bool => None,
            Self::String => Some("STRING"),
            Self::Uint => Some("UINT"),
            Self::List => Some("STRING,..."),
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Self::Bool => "a boolean",
            Self::String => "a string",
            Self::Uint => "an unsigned integer",
            Self::List => "a list of strings",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Str(String),
    Uint(u64),
    List(Vec<String>),
}

impl Display for Value {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Str(value) => formatter.write_str(value),
            Self::Uint(value) => write!(formatter, "{value}"),
            Self::List(values) => formatter.write_str(&values.join(",")),
        }
    }
}

pub struct FlagDef {
    pub name: String,
    pub short: Option<char>,
    pub help: String,
    pub kind: ValueKind,
    pub default: Option<Value>,
    pub required: bool,
    pub placeholder: Option<String>,
    pub hook: Option<Hook>,
}

impl FlagDef {
    fn new(name: &str, kind: ValueKind) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            help: String::new(),
            kind,
            default: None,
            required: false,
            placeholder: None,
            hook: None,
        }
    }

    #[must_use]
    pub fn boolean(name: &str) -> Self {
        Self::new(name, ValueKind::Bool)
    }

    #[must_use]
    pub fn string(name: &str) -> Self {
        Self::new(name, ValueKind::String)
    }

    #[must_use]
    pub fn uint(name: &str) -> Self {
        Self::new(name, ValueKind::Uint)
    }

    #[must_use]
    pub fn list(name: &str) -> Self {
        Self::new(name, ValueKind::List)
    }

    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    #[must_use]
    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    /// Runs `hook` each time the parser finalizes a value for this flag.
    #[must_use]
    pub fn hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context, &Value) -> Result<()> + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// The `--name[=PLACEHOLDER]` form used in usage text.
    #[must_use]
    pub fn usage_form(&self) -> String {
        let placeholder = self
            .placeholder
            .as_deref()
            .or_else(|| self.kind.placeholder());
        match placeholder {
            Some(placeholder) => format!("--{}={}", self.name, placeholder),
            None => format!("--{}", self.name),
        }
    }

    fn implicit_help() -> Self {
        Self::boolean(HELP_FLAG).short(HELP_SHORT).help(HELP_TEXT)
    }
}

impl Debug for FlagDef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("FlagDef")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}

/// Leaf command behavior, supplied from outside the engine.
pub trait Run: Send + Sync {
    /// # Errors
    ///
    /// Whatever the behavior fails with; it reaches the driver unchanged.
    fn run(&self, values: &ArgValues, context: &Context) -> Result<()>;
}

impl<F> Run for F
where
    F: Fn(&ArgValues, &Context) -> Result<()> + Send + Sync,
{
    fn run(&self, values: &ArgValues, context: &Context) -> Result<()> {
        self(values, context)
    }
}

pub enum Behavior {
    /// Has subcommands; one of them must be selected.
    Group,
    /// Re-enters the parser with `--help`.
    Help,
    Run(Box<dyn Run>),
}

impl Behavior {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Group)
    }
}

impl Debug for Behavior {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Self::Group => "Group",
            Self::Help => "Help",
            Self::Run(_) => "Run",
        })
    }
}

#[derive(Debug)]
pub struct CommandDef {
    pub name: String,
    pub help: String,
    pub flags: IndexMap<String, FlagDef>,
    pub subcommands: IndexMap<String, CommandDef>,
    pub behavior: Behavior,
}

impl CommandDef {
    /// A command without behavior; give it one with [`Self::run`] or
    /// [`Self::help_command`], or add subcommands.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            help: String::new(),
            flags: IndexMap::new(),
            subcommands: IndexMap::new(),
            behavior: Behavior::Group,
        }
    }

    #[must_use]
    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// # Panics
    ///
    /// If a flag with the same long or short name is already declared here.
    #[must_use]
    pub fn flag(mut self, flag: FlagDef) -> Self {
        assert!(
            !self.flags.contains_key(&flag.name) && flag.name != HELP_FLAG,
            "duplicate flag `--{}` on command `{}`",
            flag.name,
            self.name
        );
        if let Some(short) = flag.short {
            assert!(
                short != HELP_SHORT && self.find_short(short).is_none(),
                "duplicate flag `-{short}` on command `{}`",
                self.name
            );
        }
        self.flags.insert(flag.name.clone(), flag);
        self
    }

    /// # Panics
    ///
    /// If a subcommand with the same name already exists, or this command
    /// already has a leaf behavior.
    #[must_use]
    pub fn subcommand(mut self, command: CommandDef) -> Self {
        assert!(
            !self.behavior.is_terminal(),
            "command `{}` cannot have both a behavior and subcommands",
            self.name
        );
        assert!(
            !self.subcommands.contains_key(&command.name),
            "duplicate command `{}` under `{}`",
            command.name,
            self.name
        );
        self.subcommands.insert(command.name.clone(), command);
        self
    }

    #[must_use]
    pub fn run<R: Run + 'static>(self, behavior: R) -> Self {
        self.behavior(Behavior::Run(Box::new(behavior)))
    }

    /// Makes this command show the top-level usage, like `--help`.
    #[must_use]
    pub fn help_command(self) -> Self {
        self.behavior(Behavior::Help)
    }

    fn behavior(mut self, behavior: Behavior) -> Self {
        assert!(
            self.subcommands.is_empty(),
            "command `{}` cannot have both a behavior and subcommands",
            self.name
        );
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub fn subcommand_named(&self, name: &str) -> Option<&CommandDef> {
        self.subcommands.get(name)
    }

    #[must_use]
    pub fn find_short(&self, short: char) -> Option<&FlagDef> {
        self.flags.values().find(|flag| flag.short == Some(short))
    }

    /// First command strictly below this one declaring flag `name`, as a
    /// space separated path relative to this command.
    #[must_use]
    pub fn declared_below(&self, name: &str) -> Option<String> {
        self.subcommands.values().find_map(|command| {
            if command.flags.contains_key(name) {
                Some(command.name.clone())
            } else {
                command
                    .declared_below(name)
                    .map(|path| format!("{} {}", command.name, path))
            }
        })
    }
}

/// The root of a command tree.
#[derive(Debug)]
pub struct App {
    pub root: CommandDef,
    pub description: String,
    pub help_options: HelpOptions,
    help_flag: FlagDef,
}

impl App {
    #[must_use]
    pub fn builder(name: &str) -> AppBuilder {
        AppBuilder {
            root: CommandDef::new(name),
            description: String::new(),
            help_options: HelpOptions::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.root.name
    }

    /// Resolves a path of command names from the root.
    #[must_use]
    pub fn lookup(&self, path: &[&str]) -> Option<Vec<&CommandDef>> {
        let mut nodes = vec![&self.root];
        let mut current = &self.root;
        for segment in path {
            current = current.subcommand_named(segment)?;
            nodes.push(current);
        }
        Some(nodes)
    }

    /// Flags valid at the end of `nodes` (as returned by [`Self::lookup`]),
    /// grouped per declaring node, root first. The root group starts with the
    /// implicit help flag.
    #[must_use]
    pub fn flags_in_scope<'a>(&'a self, nodes: &[&'a CommandDef]) -> Vec<Vec<&'a FlagDef>> {
        nodes
            .iter()
            .enumerate()
            .map(|(depth, node)| {
                let implicit = (depth == 0).then_some(&self.help_flag);
                implicit.into_iter().chain(node.flags.values()).collect()
            })
            .collect()
    }
}

pub struct AppBuilder {
    root: CommandDef,
    description: String,
    help_options: HelpOptions,
}

impl AppBuilder {
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    #[must_use]
    pub fn help_options(mut self, help_options: HelpOptions) -> Self {
        self.help_options = help_options;
        self
    }

    /// Declares a global flag, valid before, between and after command names.
    #[must_use]
    pub fn flag(mut self, flag: FlagDef) -> Self {
        self.root = self.root.flag(flag);
        self
    }

    #[must_use]
    pub fn command(mut self, command: CommandDef) -> Self {
        self.root = self.root.subcommand(command);
        self
    }

    #[must_use]
    pub fn build(self) -> App {
        let mut root = self.root;
        root.help = self.description.clone();
        App {
            root,
            description: self.description,
            help_options: self.help_options,
            help_flag: FlagDef::implicit_help(),
        }
    }
}
