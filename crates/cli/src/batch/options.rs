use std::path::PathBuf;

use upjet_core::command_definitions::{FlagDef, Value};
use upjet_core::error::{Error, Result};
use upjet_core::parser::ArgValues;

pub const FAMILY_BASE_IMAGE: &str = "family-base-image";
pub const PROVIDER_NAME: &str = "provider-name";
pub const SERVICE: &str = "service";
pub const PLATFORM: &str = "platform";
pub const PACKAGE_ROOT: &str = "package-root";
pub const OUTPUT_DIR: &str = "output-dir";
pub const VERSION: &str = "version";
pub const BUILD_ONLY: &str = "build-only";

const DEFAULT_FAMILY_BASE_IMAGE: &str = "xpkg.upbound.io/upbound";
const DEFAULT_PLATFORMS: [&str; 2] = ["linux_amd64", "linux_arm64"];
const DEFAULT_PACKAGE_ROOT: &str = "./package";
const DEFAULT_OUTPUT_DIR: &str = "./_output/xpkg";
const DEFAULT_VERSION: &str = "latest";

/// Flags of the `batch` command, alphabetized.
pub fn flags() -> Vec<FlagDef> {
    vec![
        FlagDef::boolean(BUILD_ONLY).help(
            "Only build the smaller provider packages and do not attempt to push them to a package repository.",
        ),
        FlagDef::string(FAMILY_BASE_IMAGE)
            .help("Family image used as the base for the smaller provider packages.")
            .default_value(Value::Str(DEFAULT_FAMILY_BASE_IMAGE.to_string())),
        FlagDef::string(OUTPUT_DIR)
            .help("Path of the package output directory.")
            .default_value(Value::Str(DEFAULT_OUTPUT_DIR.to_string())),
        FlagDef::string(PACKAGE_ROOT)
            .help("Directory containing one package metadata directory per service.")
            .default_value(Value::Str(DEFAULT_PACKAGE_ROOT.to_string())),
        FlagDef::list(PLATFORM)
            .help("Platforms to build the packages for.")
            .default_value(Value::List(
                DEFAULT_PLATFORMS.iter().map(ToString::to_string).collect(),
            )),
        FlagDef::string(PROVIDER_NAME).required().help(
            "Provider name, such as provider-aws, used while formatting smaller provider package repositories.",
        ),
        FlagDef::list(SERVICE)
            .required()
            .placeholder("SERVICE,...")
            .help("Services to build the smaller provider packages for."),
        FlagDef::string(VERSION)
            .help("Version tag of the packages.")
            .default_value(Value::Str(DEFAULT_VERSION.to_string())),
    ]
}

/// Typed view of the `batch` flag values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub family_base_image: String,
    pub provider_name: String,
    pub services: Vec<String>,
    pub platforms: Vec<String>,
    pub package_root: PathBuf,
    pub output_dir: PathBuf,
    pub version: String,
    pub build_only: bool,
}

impl BatchOptions {
    /// # Errors
    ///
    /// Returns an error if a flag without default is missing from `values`.
    pub fn from_values(values: &ArgValues) -> Result<Self> {
        let services = values.flag_list(SERVICE).to_vec();
        if services.is_empty() {
            return Err(missing(SERVICE));
        }

        Ok(Self {
            family_base_image: required_str(values, FAMILY_BASE_IMAGE)?,
            provider_name: required_str(values, PROVIDER_NAME)?,
            services,
            platforms: values.flag_list(PLATFORM).to_vec(),
            package_root: PathBuf::from(required_str(values, PACKAGE_ROOT)?),
            output_dir: PathBuf::from(required_str(values, OUTPUT_DIR)?),
            version: required_str(values, VERSION)?,
            build_only: values.flag_bool(BUILD_ONLY),
        })
    }

    /// Metadata directory of `service`.
    pub fn service_root(&self, service: &str) -> PathBuf {
        self.package_root.join(service)
    }

    pub fn package_file(&self, service: &str, platform: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}-{}-{}-{}.xpkg",
            self.provider_name, service, self.version, platform
        ))
    }

    /// Repository reference the packages of `service` are pushed to.
    pub fn reference(&self, service: &str) -> String {
        format!(
            "{}/{}-{}:{}",
            self.family_base_image.trim_end_matches('/'),
            self.provider_name,
            service,
            self.version
        )
    }
}

fn required_str(values: &ArgValues, name: &str) -> Result<String> {
    values
        .flag_str(name)
        .map(ToString::to_string)
        .ok_or_else(|| missing(name))
}

fn missing(name: &str) -> Error {
    Error::Misc(format!("batch requires a value for `--{name}`"))
}
