use std::io::Read;
use std::path::PathBuf;

use slidegrid::EngineConfig;

/// Driver configuration loaded from a TOML file.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    /// JSON file holding best scores; omitted means session-only scores.
    #[serde(default)]
    pub best_file: Option<PathBuf>,
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg: Self = toml::from_str(&contents)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            best_file = "scores.json"

            [engine]
            size = 5
            winning_tile = 4096
            "#,
        )
        .unwrap();
        assert_eq!(cfg.engine.size, 5);
        assert_eq!(cfg.engine.winning_tile, 4096);
        assert_eq!(cfg.best_file, Some(PathBuf::from("scores.json")));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.engine, EngineConfig::default());
        assert_eq!(cfg.best_file, None);
    }
}
