use crate::calendar::{FailurePolicy, WeekStart};
use ::config::{builder::DefaultState, ConfigBuilder, ConfigError, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::Path;

/// Files looked for in the configuration directory when no `--config` is
/// given.  All of them are optional, and later ones override earlier ones.
const CONFIG_FILES: [(&str, FileFormat); 3] = [
    ("config.json5", FileFormat::Json5),
    ("config.json", FileFormat::Json),
    ("config.toml", FileFormat::Toml),
];

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// Whose journal to show
    pub(crate) user: Option<String>,
    pub(crate) week_start: WeekStart,
    pub(crate) on_failure: FailurePolicy,
    /// `tracing` filter directives used when no logging environment variable
    /// is set
    pub(crate) log_level: Option<String>,
}

impl Config {
    /// Loads the configuration from `path`, which must exist, or else from
    /// whichever of the standard configuration files exist
    pub(crate) fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut builder = ::config::Config::builder();
        match path {
            Some(p) => builder = builder.add_source(File::from(p).required(true)),
            None => {
                if let Some(dirs) = project_dirs() {
                    let config_dir = dirs.config_dir();
                    for (name, format) in CONFIG_FILES {
                        builder = builder.add_source(
                            File::from(config_dir.join(name))
                                .format(format)
                                .required(false),
                        );
                    }
                }
            }
        }
        Config::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
        builder.build()?.try_deserialize::<Config>()
    }
}

/// The platform directories for the program's configuration and data, if the
/// user has a home directory
pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
}
