//! The `batch` command: builds and pushes one provider package per service.

mod options;
mod packaging;

pub use options::BatchOptions;
pub use packaging::{execute_command, BuildRequest, PackageTool, PushRequest, XpkgCli};

use upjet_core::command_definitions::{CommandDef, Run};
use upjet_core::context::Context;
use upjet_core::error::Result;
use upjet_core::logging::Logger;
use upjet_core::parser::ArgValues;

pub const NAME: &str = "batch";
pub const HELP: &str = "Batch build and push a family of service-scoped provider packages.";

/// Builds the `batch` command definition.
pub fn command() -> CommandDef {
    options::flags()
        .into_iter()
        .fold(CommandDef::new(NAME).help(HELP), CommandDef::flag)
        .run(BatchCmd)
}

/// Runs the builds of every service and platform in order, then pushes each
/// service unless `--build-only` is set.
pub struct BatchCmd;

impl Run for BatchCmd {
    fn run(&self, values: &ArgValues, context: &Context) -> Result<()> {
        let logger = context.resolve::<dyn Logger>()?;
        let tool = context.resolve::<dyn PackageTool>()?;
        let options = BatchOptions::from_values(values)?;

        logger.debug(
            "Starting batch",
            &[
                ("provider", &options.provider_name),
                ("services", &options.services.len()),
                ("platforms", &options.platforms.len()),
            ],
        );

        for service in &options.services {
            let mut package_files = Vec::with_capacity(options.platforms.len());

            for platform in &options.platforms {
                let request = BuildRequest {
                    service: service.clone(),
                    platform: platform.clone(),
                    package_root: options.service_root(service),
                    package_file: options.package_file(service, platform),
                };
                logger.debug(
                    "Building provider package",
                    &[("service", service), ("platform", platform)],
                );
                tool.build(&request)?;
                package_files.push(request.package_file);
            }

            if options.build_only {
                continue;
            }

            let request = PushRequest {
                service: service.clone(),
                package_files,
                reference: options.reference(service),
            };
            logger.debug(
                "Pushing provider packages",
                &[("service", service), ("reference", &request.reference)],
            );
            tool.push(&request)?;
        }

        logger.info(
            "Batch completed",
            &[
                ("services", &options.services.len()),
                ("pushed", &!options.build_only),
            ],
        );
        Ok(())
    }
}
