//! CLI command implementations.

pub mod display;

pub mod captures;
pub mod languages;
pub mod tree;

use std::path::Path;
use std::sync::Arc;

use strata::{CONFIG_FILE_NAME, Language, LanguageTree, Registry, StrataConfig};
use tracing::debug;

/// Settings shared by every command.
pub struct Context {
    pub config: StrataConfig,
    pub registry: Arc<Registry>,
}

impl Context {
    /// Load configuration from `path`, or from `strata.yaml` in the working
    /// directory when it exists.
    pub fn load(path: Option<&Path>) -> strata::Result<Self> {
        let config = match path {
            Some(path) => StrataConfig::load(path)?,
            None if Path::new(CONFIG_FILE_NAME).is_file() => {
                StrataConfig::load(Path::new(CONFIG_FILE_NAME))?
            }
            None => StrataConfig::default(),
        };
        debug!(?config, "Loaded configuration");

        let registry = config.registry()?;
        Ok(Self { config, registry })
    }

    /// Resolve the root language of `path`: explicit name first, then the
    /// file extension.
    pub fn language_for(&self, path: &Path, explicit: Option<&str>) -> strata::Result<Language> {
        if let Some(name) = explicit {
            return name.parse();
        }
        self.config.language_for_path(path).ok_or_else(|| {
            strata::Error::Config(format!(
                "cannot detect language of {}; pass --language",
                path.display()
            ))
        })
    }

    /// Read and parse a file into a fresh forest.
    pub fn parse_file(
        &self,
        path: &Path,
        language: Option<&str>,
    ) -> strata::Result<(Vec<u8>, LanguageTree)> {
        let language = self.language_for(path, language)?;
        let source = std::fs::read(path)?;

        let mut forest = LanguageTree::with_registry(
            Arc::clone(&self.registry),
            self.config.parse_options(),
            language,
            Vec::new(),
            Vec::new(),
        )?;
        forest.parse(&source)?;
        Ok((source, forest))
    }
}
