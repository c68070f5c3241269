//! Engine configuration.
//!
//! Every field is optional; an empty document yields the defaults.
//!
//! ```yaml
//! attributes:
//!   flex: flex
//!   layout: layout
//! inject_default_direction: true
//! breakpoints:            # replaces the default table
//!   - alias: sm
//!     media_query: "(min-width: 600px) and (max-width: 959px)"
//! ```

use std::path::Path;

use flexout_media::{BreakPoint, BreakPointRegistry};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Attribute names the bindings read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeNames {
    pub flex: String,
    pub layout: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            flex: "flex".to_string(),
            layout: "layout".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub attributes: AttributeNames,
    /// Write `flex-direction: row` onto parents that declare no direction.
    pub inject_default_direction: bool,
    /// Custom breakpoint table; `None` uses the default one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<BreakPoint>>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            attributes: AttributeNames::default(),
            inject_default_direction: true,
            breakpoints: None,
        }
    }
}

impl LayoutConfig {
    /// Parses a configuration from YAML.
    ///
    /// ```rust
    /// use flexout::LayoutConfig;
    ///
    /// let config = LayoutConfig::from_yaml("attributes: { flex: fxFlex }").unwrap();
    /// assert_eq!(config.attributes.flex, "fxFlex");
    /// assert_eq!(config.attributes.layout, "layout");
    /// assert!(config.inject_default_direction);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Builds the breakpoint registry this configuration describes.
    pub fn registry(&self) -> Result<BreakPointRegistry, ConfigError> {
        match &self.breakpoints {
            Some(items) => Ok(BreakPointRegistry::new(items.clone())?),
            None => Ok(BreakPointRegistry::default()),
        }
    }
}
