use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Glyphs used when drawing a solved maze
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    pub target: char,
    pub solution: char,
    pub backtrack: char,
    /// placed between the directions of the written out solution
    pub separator: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            target: 'x',
            solution: 's',
            backtrack: 'b',
            separator: "-".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // missing fields keep their default values
pub struct MazeConfig {
    pub markers: Markers,
    /// stop searching after this many steps, unbounded if unset
    pub max_steps: Option<u64>,
}

impl MazeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid config file {:?}", path))
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: MazeConfig =
            serde_json::from_str(r#"{ "markers": { "solution": "o" } }"#).unwrap();

        assert_eq!(config.markers.solution, 'o');
        assert_eq!(config.markers.target, 'x');
        assert_eq!(config.markers.separator, "-");
        assert_eq!(config.max_steps, None);
    }

    #[test]
    fn test_empty_config() {
        let config: MazeConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config, MazeConfig::default());
    }

    #[test]
    fn test_invalid_marker() {
        let res = serde_json::from_str::<MazeConfig>(r#"{ "markers": { "target": "xx" } }"#);

        assert!(res.is_err());
    }

    #[test]
    fn test_missing_config_file() {
        assert!(MazeConfig::load("does/not/exist.json").is_err());
    }
}
