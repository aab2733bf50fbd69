//! Fully-qualified function names.

use crate::error::KernelError;
use std::{fmt, str::FromStr};

/// The separator used between the plugin name and the function name.
pub const NAME_SEPARATOR: char = '.';

/// A function name, optionally qualified by its plugin name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionName {
    /// The function name.
    pub function_name: String,
    /// The plugin name, if qualified.
    pub plugin_name: Option<String>,
}

impl FunctionName {
    /// Creates a new function name.
    pub fn new(function_name: impl Into<String>, plugin_name: Option<&str>) -> Self {
        Self {
            function_name: function_name.into(),
            plugin_name: plugin_name.map(str::to_owned),
        }
    }

    /// Parses `plugin.function` using the default separator.
    pub fn parse(fully_qualified_name: &str) -> Result<Self, KernelError> {
        Self::parse_with_separator(fully_qualified_name, NAME_SEPARATOR)
    }

    /// Parses a fully-qualified name, splitting on the first `separator`.
    ///
    /// Both parts are trimmed. An empty plugin part yields no plugin name.
    pub fn parse_with_separator(
        fully_qualified_name: &str,
        separator: char,
    ) -> Result<Self, KernelError> {
        if fully_qualified_name.trim().is_empty() {
            return Err(KernelError::InvalidFunctionName(
                "fully-qualified name is required".to_owned(),
            ));
        }

        let Some((plugin_name, function_name)) = fully_qualified_name.split_once(separator) else {
            return Ok(Self::new(fully_qualified_name, None));
        };

        let (plugin_name, function_name) = (plugin_name.trim(), function_name.trim());
        if function_name.is_empty() {
            return Err(KernelError::InvalidFunctionName(format!(
                "`{fully_qualified_name}` has no function part"
            )));
        }

        let plugin_name = (!plugin_name.is_empty()).then_some(plugin_name);
        Ok(Self::new(function_name, plugin_name))
    }

    /// Formats the name with the default separator.
    pub fn fully_qualified_name(&self) -> String {
        self.fully_qualified_name_with_separator(NAME_SEPARATOR)
    }

    /// Formats the name as `plugin{separator}function`, or just `function`.
    pub fn fully_qualified_name_with_separator(&self, separator: char) -> String {
        format_name(&self.function_name, self.plugin_name.as_deref(), separator)
    }
}

/// Formats a function name without allocating a [`FunctionName`] first.
pub fn format_name(function_name: &str, plugin_name: Option<&str>, separator: char) -> String {
    match plugin_name {
        Some(plugin_name) if !plugin_name.is_empty() => {
            format!("{plugin_name}{separator}{function_name}")
        }
        _ => function_name.to_owned(),
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fully_qualified_name())
    }
}

impl FromStr for FunctionName {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_plugin() {
        let name = FunctionName::parse("weather.temperature").unwrap();
        assert_eq!(name.function_name, "temperature");
        assert_eq!(name.plugin_name.as_deref(), Some("weather"));
    }

    #[test]
    fn test_parse_without_plugin() {
        let name = FunctionName::parse("temperature").unwrap();
        assert_eq!(name, FunctionName::new("temperature", None));
    }

    #[test]
    fn test_parse_trims_and_splits_on_first_separator() {
        let name = FunctionName::parse(" weather . temp.max ").unwrap();
        assert_eq!(name.plugin_name.as_deref(), Some("weather"));
        assert_eq!(name.function_name, "temp.max");
    }

    #[test]
    fn test_parse_custom_separator() {
        let name = FunctionName::parse_with_separator("weather-temperature", '-').unwrap();
        assert_eq!(name.plugin_name.as_deref(), Some("weather"));
        assert_eq!(name.fully_qualified_name_with_separator('-'), "weather-temperature");
        assert_eq!(name.fully_qualified_name(), "weather.temperature");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(FunctionName::parse("").is_err());
        assert!(FunctionName::parse("   ").is_err());
        assert!(FunctionName::parse("plugin.").is_err());
        assert_eq!(
            FunctionName::parse(".f").unwrap(),
            FunctionName::new("f", None)
        );
    }

    #[test]
    fn test_round_trip_from_parts() {
        let cases = [
            ("temperature", Some("weather")),
            ("temperature", None),
            ("get_time", Some("clock_plugin")),
            ("a.b", Some("p")),
        ];
        for (function_name, plugin_name) in cases {
            let name = FunctionName::new(function_name, plugin_name);
            let parsed = FunctionName::parse(&name.fully_qualified_name()).unwrap();
            assert_eq!(parsed, name);
        }
    }

    #[test]
    fn test_round_trip_from_string() {
        for fqn in ["weather.temperature", "temperature", "p.a.b"] {
            let parsed: FunctionName = fqn.parse().unwrap();
            assert_eq!(parsed.to_string(), fqn);
        }
    }
}
