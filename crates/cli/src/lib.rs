//! Upjet CLI Library
//!
//! This crate assembles the `upjet` command line on top of `upjet-core`: the
//! command tree, the capabilities bound before parsing, and the `batch`
//! command that builds and pushes service-scoped provider packages.
//!
//! # Architecture
//!
//! - [`cli_args`]: The application tree, the `--verbose` hook and the default context
//! - [`batch`]: Options, packaging backend and behavior of the `batch` command
//! - [`config`]: Application name, help layout and environment lookups
//!
//! # Examples
//!
//! The CLI binary (`upjet`) can be used in several ways:
//!
//! ```bash
//! # Show help, same as `upjet --help` or `upjet help`
//! upjet
//!
//! # Build and push the EC2 and S3 packages of provider-aws
//! upjet batch --provider-name provider-aws --service ec2,s3 --version v1.0.0
//!
//! # Only build, with verbose logging
//! upjet --verbose batch --provider-name provider-aws --service ec2 --build-only
//! ```

pub mod batch;
pub mod cli_args;
pub mod config;
