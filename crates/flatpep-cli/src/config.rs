use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;

/// Generator description loaded from a TOML file.
///
/// ```toml
/// [generator]
/// program = "pymol"
/// args = ["-cq", "fab_extended.py", "--", "{seq}"]
/// ```
///
/// Every `{seq}` in an argument is replaced with the sequence being built.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    pub generator: GeneratorSection,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSection {
    /// Program to run, resolved through `PATH` like any shell command.
    pub program: String,
    /// Argument template; may be omitted for programs that need none.
    #[serde(default)]
    pub args: Vec<String>,
}

impl GeneratorConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(CliError::Io)?;
        let config: Self = toml::from_str(&content).map_err(|source| CliError::FileParsing {
            path: path.to_path_buf(),
            source,
        })?;
        if config.generator.program.trim().is_empty() {
            return Err(CliError::Config(
                "generator.program must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}
