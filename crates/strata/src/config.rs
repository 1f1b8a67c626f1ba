//! Configuration file support.
//!
//! strata reads an optional `strata.yaml`:
//!
//! ```yaml
//! reuse-previous-tree: true
//! extensions:
//!   blade: php
//! injections:
//!   html: |
//!     ((script_element (raw_text) @injection.content)
//!       (#set! injection.language "javascript"))
//! ```
//!
//! Configuration is read once at startup and turned into an immutable
//! [`Registry`] and [`ParseOptions`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::languages::Registry;
use crate::types::{Language, ParseOptions};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "strata.yaml";

/// Configuration file structure for strata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StrataConfig {
    /// Feed edited trees back into the parser
    #[serde(default = "default_reuse")]
    pub reuse_previous_tree: bool,

    /// Extra file extensions, mapped to language identifiers
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,

    /// Injection query overrides, keyed by language identifier
    #[serde(default)]
    pub injections: BTreeMap<String, String>,
}

fn default_reuse() -> bool {
    true
}

impl Default for StrataConfig {
    fn default() -> Self {
        Self {
            reuse_previous_tree: default_reuse(),
            extensions: BTreeMap::new(),
            injections: BTreeMap::new(),
        }
    }
}

impl StrataConfig {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Config`] if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed YAML, unknown keys, or
    /// unknown language identifiers.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to YAML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))
    }

    fn validate(&self) -> Result<()> {
        for (ext, name) in &self.extensions {
            parse_language(name).map_err(|e| {
                Error::Config(format!("extension '{ext}': {e}"))
            })?;
        }
        for name in self.injections.keys() {
            parse_language(name)?;
        }
        Ok(())
    }

    /// Build the registry described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if an injection override names an unknown
    /// language.
    pub fn registry(&self) -> Result<Arc<Registry>> {
        if self.injections.is_empty() {
            return Ok(Registry::builtin());
        }

        let mut registry = Registry::default();
        for (name, query) in &self.injections {
            registry = registry.with_injection_query(parse_language(name)?, query.as_str());
        }
        Ok(Arc::new(registry))
    }

    /// Parse options described by this configuration.
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            reuse_previous_tree: self.reuse_previous_tree,
        }
    }

    /// Language for a file, from configured extensions first, then the
    /// built-in ones.
    ///
    /// Only the final extension is considered, so `view.blade.php` is PHP.
    #[must_use]
    pub fn language_for_path(&self, path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.extensions
            .get(&ext)
            .and_then(|name| parse_language(name).ok())
            .or_else(|| Language::from_extension(&ext))
    }
}

fn parse_language(name: &str) -> Result<Language> {
    name.parse::<Language>()
        .map_err(|_| Error::Config(format!("unknown language '{name}'")))
}
