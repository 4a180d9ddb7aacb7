//! Renderer configuration loading
//!
//! Static renderer setup (offscreen resources, defaults that do not change
//! per frame) is described by [`RendererConfig`], deserialized from TOML or
//! RON files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::shadow_map::ShadowMapConfig;

/// Errors produced while loading a renderer configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or schema error
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// RON syntax or schema error
    #[error("failed to parse RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// File extension is neither `.toml` nor `.ron`
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Shadow map section of the renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowMapSection {
    /// Id of the depth framebuffer the context provides for the map
    pub framebuffer: u32,
    /// Map resolution and volume fitting parameters
    #[serde(flatten)]
    pub config: ShadowMapConfig,
}

/// Static renderer configuration
///
/// Absent sections disable the corresponding resource: a renderer built
/// without a `shadow_map` section has no shadow map, and frames requesting
/// shadow mapping will degrade with a warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Shadow map resource, if the renderer should own one
    #[serde(default)]
    pub shadow_map: Option<ShadowMapSection>,
}

impl RendererConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Parse a configuration from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a configuration file, choosing the format by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("ron") => Self::from_ron_str(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shadow_map::ShadowRange;

    #[test]
    fn test_empty_config_has_no_shadow_map() {
        let config = RendererConfig::from_toml_str("").unwrap();
        assert!(config.shadow_map.is_none());
    }

    #[test]
    fn test_toml_shadow_map_section() {
        let config = RendererConfig::from_toml_str(
            r#"
            [shadow_map]
            framebuffer = 4
            width = 1024
            height = 1024
            "#,
        )
        .unwrap();

        let section = config.shadow_map.unwrap();
        assert_eq!(section.framebuffer, 4);
        assert_eq!(section.config.width, 1024);
        assert!(matches!(section.config.range, ShadowRange::FixedUser { .. }));
    }

    #[test]
    fn test_toml_auto_fit_range() {
        let config = RendererConfig::from_toml_str(
            r#"
            [shadow_map]
            framebuffer = 1

            [shadow_map.range.AutoFitCamera]
            extra_width = 2.0
            extra_height = 2.0
            extra_depth = 3.0
            "#,
        )
        .unwrap();

        let section = config.shadow_map.unwrap();
        match section.config.range {
            ShadowRange::AutoFitCamera { extra_depth, .. } => {
                assert!((extra_depth - 3.0).abs() < f32::EPSILON);
            }
            ShadowRange::FixedUser { .. } => panic!("expected auto-fit range"),
        }
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let error = RendererConfig::load("renderer.yaml").unwrap_err();
        assert!(matches!(error, ConfigError::Io(_) | ConfigError::UnsupportedFormat(_)));
    }
}
