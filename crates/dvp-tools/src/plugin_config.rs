//! The plugin config file (`plugin_config.yml`).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Locale used when the config names none.
pub const DEFAULT_LOCALE: &str = "en-us";

/// A validated plugin config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Optional plugin identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Plugin name.
    pub name: String,
    /// Display name.
    pub pretty_name: Option<String>,
    /// Plugin version.
    pub version: String,
    /// Language the plugin is written in.
    pub language: Language,
    /// Host platforms the plugin supports.
    pub host_types: Vec<HostType>,
    /// Ingestion strategy.
    pub plugin_type: PluginType,
    /// Whether source configs may be added manually.
    #[serde(default = "default_true")]
    pub manual_discovery: bool,
    /// `module:object` naming the plugin object.
    pub entry_point: String,
    /// Source directory relative to the config file.
    pub src_dir: String,
    /// Schema file relative to the config file.
    pub schema_file: String,
    /// Locale of user-facing messages.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Whether the plugin supports root-squashed mounts.
    #[serde(default = "default_true")]
    pub root_squash_enabled: bool,
}

impl PluginConfig {
    /// Returns the config `init` writes for a new plugin.
    #[must_use]
    pub fn template(name: &str, plugin_type: PluginType, pretty_name: &str) -> Self {
        Self {
            id: None,
            name: name.to_owned(),
            pretty_name: Some(pretty_name.to_owned()),
            version: String::from("0.1.0"),
            language: Language::Python27,
            host_types: vec![HostType::Unix],
            plugin_type,
            manual_discovery: true,
            entry_point: String::from("plugin_runner:plugin"),
            src_dir: String::from("src"),
            schema_file: String::from("schema.json"),
            default_locale: default_locale(),
            root_squash_enabled: true,
        }
    }

    /// Display name, falling back to the plugin name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.pretty_name.as_deref().unwrap_or(&self.name)
    }

    /// Splits the entry point into module and object.
    ///
    /// Either half may be empty; callers validate them.
    #[must_use]
    pub fn entry_point_parts(&self) -> (&str, &str) {
        self.entry_point.split_once(':').unwrap_or((&self.entry_point, ""))
    }
}

const fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    String::from(DEFAULT_LOCALE)
}

/// Ingestion strategy of a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum PluginType {
    /// Data is read directly from the source host.
    #[serde(rename = "DIRECT")]
    #[value(name = "DIRECT")]
    Direct,
    /// Data is copied to a staging host first.
    #[serde(rename = "STAGED")]
    #[value(name = "STAGED")]
    Staged,
}

impl PluginType {
    /// Upload type of the linked source definition.
    #[must_use]
    pub const fn linked_source_type(self) -> &'static str {
        match self {
            Self::Direct => "PluginLinkedDirectSourceDefinition",
            Self::Staged => "PluginLinkedStagedSourceDefinition",
        }
    }
}

/// Plugin implementation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// Python 2.7.
    #[serde(rename = "PYTHON27")]
    Python27,
}

/// Host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostType {
    /// Unix-like hosts.
    #[serde(rename = "UNIX")]
    Unix,
    /// Windows hosts.
    #[serde(rename = "WINDOWS")]
    Windows,
}
