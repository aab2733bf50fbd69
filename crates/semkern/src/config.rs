//! Kernel configuration.

use crate::error::KernelError;
use crate::functions::function_name::NAME_SEPARATOR;
use crate::prompt_template::TemplateFormat;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// The maximum number of function auto-invokes that can be made in a single user request.
pub const MAXIMUM_AUTO_INVOKE_ATTEMPTS: usize = 128;

/// Kernel-wide settings, usually loaded from a `kernel.toml` file.
///
/// ```toml
/// function_name_separator = "-"
/// max_auto_invoke_attempts = 16
/// default_template_format = "jinja"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Separator between the plugin name and the function name.
    pub function_name_separator: char,
    /// Round trip index from which auto-invocation is disabled.
    pub max_auto_invoke_attempts: usize,
    /// Template format used by [`Kernel::invoke_prompt`](crate::Kernel::invoke_prompt).
    pub default_template_format: TemplateFormat,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            function_name_separator: NAME_SEPARATOR,
            max_auto_invoke_attempts: MAXIMUM_AUTO_INVOKE_ATTEMPTS,
            default_template_format: TemplateFormat::default(),
        }
    }
}

impl KernelConfig {
    /// Parses the config from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(config: &str) -> Result<Self, KernelError> {
        let config = toml::from_str(config)?;
        Ok(config)
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KernelError> {
        let path = path.as_ref();
        let config = fs::read_to_string(path)?;
        tracing::debug!(target: "semkern", path = %path.display(), "loading kernel config");
        Self::from_toml_str(&config)
    }
}
