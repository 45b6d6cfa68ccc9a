//! Server configuration.
//!
//! Settings are layered, later sources overriding earlier ones field by
//! field:
//!
//!   1. Built-in defaults ([`Settings::default`])
//!   2. The user config file, `symdef/config.toml` in the platform config
//!      directory
//!   3. `.symdef.toml` in the workspace root
//!   4. A file passed with `--config`
//!   5. LSP `initializationOptions`
//!   6. `workspace/didChangeConfiguration`
//!
//! Every layer is a [`PartialSettings`]: fields it does not mention keep
//! the value from the layer below.
//!
//! ```toml
//! enabledLanguages = ["typescript", "javascript"]
//! variant = "strict"
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_lsp::lsp_types::{DocumentFilter, Registration, TextDocumentRegistrationOptions};

use crate::definition::ResolverVariant;

/// Name of the per-workspace config file.
pub const WORKSPACE_CONFIG_FILE: &str = ".symdef.toml";

/// Key under which editors usually nest our settings.
pub const SETTINGS_SECTION: &str = "symbolDefinition";

/// Registration id used for the dynamic definition provider.
pub const DEFINITION_REGISTRATION_ID: &str = "symdef/definition";

const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid client settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Effective settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Language ids the definition provider is registered for.  Empty
    /// means the provider is not registered at all.
    pub enabled_languages: Vec<String>,
    pub variant: ResolverVariant,
    /// Scan workspace files on start-up.
    pub index_workspace: bool,
    /// Files larger than this many bytes are not scanned.
    pub max_file_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled_languages: Vec::new(),
            variant: ResolverVariant::default(),
            index_workspace: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// One configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    #[serde(alias = "enabled_languages")]
    pub enabled_languages: Option<Vec<String>>,
    pub variant: Option<ResolverVariant>,
    #[serde(alias = "index_workspace")]
    pub index_workspace: Option<bool>,
    #[serde(alias = "max_file_size")]
    pub max_file_size: Option<u64>,
}

impl PartialSettings {
    /// Read a TOML layer.  A missing file is `Ok(None)`.
    pub fn from_toml_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Read a layer sent by the client.
    ///
    /// Accepts both the flat shape and one nested under
    /// [`SETTINGS_SECTION`].  `null` is an empty layer.
    pub fn from_lsp_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let value = value.get(SETTINGS_SECTION).unwrap_or(value);
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}

impl Settings {
    /// Apply `layer` on top of these settings.
    pub fn merge(&mut self, layer: &PartialSettings) {
        if let Some(languages) = &layer.enabled_languages {
            self.enabled_languages = languages.clone();
        }
        if let Some(variant) = layer.variant {
            self.variant = variant;
        }
        if let Some(index_workspace) = layer.index_workspace {
            self.index_workspace = index_workspace;
        }
        if let Some(max_file_size) = layer.max_file_size {
            self.max_file_size = max_file_size;
        }
    }

    /// Build settings from the file-based layers.
    ///
    /// Broken files are logged and skipped; they never prevent start-up.
    pub fn from_files(workspace_root: Option<&Path>, extra: &PartialSettings) -> Self {
        let mut settings = Self::default();

        let mut paths: Vec<PathBuf> = user_config_path().into_iter().collect();
        if let Some(root) = workspace_root {
            paths.push(root.join(WORKSPACE_CONFIG_FILE));
        }

        for path in paths {
            match PartialSettings::from_toml_file(&path) {
                Ok(Some(layer)) => {
                    tracing::info!("loaded settings from {}", path.display());
                    settings.merge(&layer);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("ignoring config file: {e}"),
            }
        }

        settings.merge(extra);
        settings
    }

    pub fn is_language_enabled(&self, language_id: &str) -> bool {
        self.enabled_languages.iter().any(|l| l == language_id)
    }

    /// The dynamic registration for the definition provider, or `None`
    /// when no language is enabled.
    pub fn definition_registration(&self) -> Option<Registration> {
        if self.enabled_languages.is_empty() {
            return None;
        }
        let document_selector = self
            .enabled_languages
            .iter()
            .map(|language| DocumentFilter {
                language: Some(language.clone()),
                scheme: None,
                pattern: None,
            })
            .collect();
        let options = TextDocumentRegistrationOptions {
            document_selector: Some(document_selector),
        };
        Some(Registration {
            id: DEFINITION_REGISTRATION_ID.to_string(),
            method: "textDocument/definition".to_string(),
            register_options: serde_json::to_value(options).ok(),
        })
    }
}

/// `<config dir>/symdef/config.toml`, when a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    use etcetera::BaseStrategy;

    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("symdef").join("config.toml"))
}
