use std::path::PathBuf;
use std::process::{Command, Stdio};

use itertools::Itertools;
use log::info;

use upjet_core::error::{Error, Result};

use crate::config::get_xpkg_tool;

/// One package build for a service and platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub service: String,
    pub platform: String,
    pub package_root: PathBuf,
    pub package_file: PathBuf,
}

/// Pushes every platform package of one service under a single reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub service: String,
    pub package_files: Vec<PathBuf>,
    pub reference: String,
}

/// The packaging backend used by `batch`, resolved from the context.
pub trait PackageTool: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the package cannot be built.
    fn build(&self, request: &BuildRequest) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the packages cannot be pushed.
    fn push(&self, request: &PushRequest) -> Result<()>;
}

/// Delegates to the `xpkg` subcommands of an external executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpkgCli {
    program: String,
}

impl XpkgCli {
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Uses the executable named by the environment, see [`get_xpkg_tool`].
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            program: get_xpkg_tool(),
        }
    }

    fn build_args(request: &BuildRequest) -> Vec<String> {
        vec![
            "xpkg".to_string(),
            "build".to_string(),
            "--package-root".to_string(),
            request.package_root.display().to_string(),
            "--package-file".to_string(),
            request.package_file.display().to_string(),
        ]
    }

    fn push_args(request: &PushRequest) -> Vec<String> {
        vec![
            "xpkg".to_string(),
            "push".to_string(),
            "--package-files".to_string(),
            request
                .package_files
                .iter()
                .map(|file| file.display().to_string())
                .join(","),
            request.reference.clone(),
        ]
    }

    fn run(&self, args: &[String]) -> Result<()> {
        let mut command = Command::new(&self.program);
        command.args(args);
        execute_command(&self.program, command)
    }
}

impl PackageTool for XpkgCli {
    fn build(&self, request: &BuildRequest) -> Result<()> {
        self.run(&Self::build_args(request))
    }

    fn push(&self, request: &PushRequest) -> Result<()> {
        self.run(&Self::push_args(request))
    }
}

/// Executes a command with inherited standard streams.
///
/// # Errors
///
/// Returns an error if the command cannot be spawned or exits with non-zero status.
pub fn execute_command(program: &str, mut command: Command) -> Result<()> {
    let command = command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    info!("Executing {:?}", command);
    let status = command.spawn()?.wait()?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::SubProcessExit {
            program: program.to_string(),
            status: status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_request() -> BuildRequest {
        BuildRequest {
            service: "ec2".to_string(),
            platform: "linux_amd64".to_string(),
            package_root: PathBuf::from("package/ec2"),
            package_file: PathBuf::from("out/provider-aws-ec2-latest-linux_amd64.xpkg"),
        }
    }

    #[test]
    fn test_build_args() {
        assert_eq!(
            XpkgCli::build_args(&build_request()),
            vec![
                "xpkg",
                "build",
                "--package-root",
                "package/ec2",
                "--package-file",
                "out/provider-aws-ec2-latest-linux_amd64.xpkg",
            ]
        );
    }

    #[test]
    fn test_push_args_join_package_files() {
        let request = PushRequest {
            service: "ec2".to_string(),
            package_files: vec![PathBuf::from("a.xpkg"), PathBuf::from("b.xpkg")],
            reference: "xpkg.upbound.io/upbound/provider-aws-ec2:latest".to_string(),
        };

        assert_eq!(
            XpkgCli::push_args(&request),
            vec![
                "xpkg",
                "push",
                "--package-files",
                "a.xpkg,b.xpkg",
                "xpkg.upbound.io/upbound/provider-aws-ec2:latest",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_tool() {
        assert!(XpkgCli::new("true").build(&build_request()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_reports_program() {
        let result = XpkgCli::new("false").build(&build_request());
        assert!(matches!(result, Err(Error::SubProcessExit { program, .. }) if program == "false"));
    }

    #[test]
    fn test_missing_tool_is_io_error() {
        let result = XpkgCli::new("upjet-no-such-packaging-tool").build(&build_request());
        assert!(matches!(result, Err(Error::SubProcess(_))));
    }
}
