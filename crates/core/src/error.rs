use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected argument `{}`", .token)]
    UnknownToken { token: String, usage: String },

    #[error("unknown flag `{}`", .flag)]
    UnknownFlag { flag: String, usage: String },

    #[error("flag `{}` is not valid here; it belongs to `{}`", .flag, .owner)]
    FlagOutOfScope {
        flag: String,
        owner: String,
        usage: String,
    },

    #[error("missing value for flag `--{}`", .flag)]
    MissingFlagValue { flag: String, usage: String },

    #[error("invalid value `{}` for flag `--{}`: expected {}", .value, .flag, .expected)]
    InvalidFlagValue {
        flag: String,
        value: String,
        expected: String,
        usage: String,
    },

    #[error("expected one of \"{}\"", .expected.join("\", \""))]
    MissingCommand { expected: Vec<String>, usage: String },

    #[error("missing required flag `--{}`", .flag)]
    MissingRequiredFlag { flag: String, usage: String },

    #[error("no instance bound for capability `{}`", .capability)]
    NotBound { capability: String },

    #[error("help re-entry resolved to command `{}` instead of usage", .0)]
    HelpReentry(String),

    #[error("The sub process `{}` exited with non-success status: {}", .program, .status)]
    SubProcessExit { program: String, status: String },

    #[error("Error with sub process: {}", .0)]
    SubProcess(#[from] std::io::Error),

    #[error("Misc error: {}", .0)]
    Misc(String),
}

impl Error {
    pub fn unknown_token(token: &str, usage: String) -> Self {
        Self::UnknownToken {
            token: token.to_string(),
            usage,
        }
    }

    pub fn unknown_flag(flag: &str, usage: String) -> Self {
        Self::UnknownFlag {
            flag: flag.to_string(),
            usage,
        }
    }

    pub fn missing_flag_value(flag: &str, usage: String) -> Self {
        Self::MissingFlagValue {
            flag: flag.to_string(),
            usage,
        }
    }

    pub fn invalid_flag_value(flag: &str, value: &str, expected: &str, usage: String) -> Self {
        Self::InvalidFlagValue {
            flag: flag.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
            usage,
        }
    }

    pub fn not_bound<T: ?Sized>() -> Self {
        Self::NotBound {
            capability: std::any::type_name::<T>().to_string(),
        }
    }

    /// Usage text of the nearest valid tree node, for errors raised while parsing.
    #[must_use]
    pub fn usage(&self) -> Option<&str> {
        match self {
            Self::UnknownToken { usage, .. }
            | Self::UnknownFlag { usage, .. }
            | Self::FlagOutOfScope { usage, .. }
            | Self::MissingFlagValue { usage, .. }
            | Self::InvalidFlagValue { usage, .. }
            | Self::MissingCommand { usage, .. }
            | Self::MissingRequiredFlag { usage, .. } => Some(usage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_carry_usage() {
        let error = Error::unknown_token("bogus", "Usage: upjet <command>".to_string());
        assert_eq!(error.to_string(), "unexpected argument `bogus`");
        assert_eq!(error.usage(), Some("Usage: upjet <command>"));
    }

    #[test]
    fn test_missing_command_lists_expected_names() {
        let error = Error::MissingCommand {
            expected: vec!["batch".to_string(), "help".to_string()],
            usage: String::new(),
        };
        assert_eq!(error.to_string(), "expected one of \"batch\", \"help\"");
    }

    #[test]
    fn test_not_bound_names_the_capability() {
        let error = Error::not_bound::<dyn std::fmt::Debug>();
        assert!(error.to_string().contains("Debug"));
        assert!(error.usage().is_none());
    }
}
