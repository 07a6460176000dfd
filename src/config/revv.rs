//! `[revv]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[revv]` section in norska.toml - asset revisioning configuration.
///
/// Revisioning only ever runs in production mode; `enable` is the master
/// switch that removes the phase from the build entirely.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct RevvConfig {
    /// Run the revisioning phase at the end of production builds.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_revv_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert!(config.revv.enable);
    }

    #[test]
    fn test_revv_disabled() {
        let config = r#"
            [revv]
            enable = false
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert!(!config.revv.enable);
    }

    #[test]
    fn test_revv_unknown_field_rejection() {
        let config = r#"
            [revv]
            unknown = "field"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
