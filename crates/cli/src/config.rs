use anyhow::{anyhow, Context, Result};
use roomie_recommend::MAX_AMOUNT;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "roomie.toml";
pub const DEFAULT_SNAPSHOT_FILE: &str = "roomie.json";

const ENV_SNAPSHOT: &str = "ROOMIE_SNAPSHOT";
const ENV_SEED: &str = "ROOMIE_SEED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomieConfig {
    pub snapshot: PathBuf,
    pub recommend: RecommendConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendConfig {
    pub default_amount: usize,
    /// `None` seeds the selector from entropy
    pub seed: Option<u64>,
    pub record_viewed: bool,
}

impl Default for RoomieConfig {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            recommend: RecommendConfig::default(),
        }
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            default_amount: 5,
            seed: None,
            record_viewed: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    schema_version: Option<u32>,
    snapshot: Option<PathBuf>,
    recommend: Option<RawRecommendConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecommendConfig {
    default_amount: Option<usize>,
    seed: Option<u64>,
    record_viewed: Option<bool>,
}

impl RoomieConfig {
    /// Resolve configuration: file, then environment
    ///
    /// An explicit path must exist; without one `./roomie.toml` is used when
    /// present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let raw = match explicit {
            Some(path) => Some(read_raw(path)?),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Some(read_raw(fallback)?)
                } else {
                    None
                }
            }
        };

        let mut cfg = Self::from_raw(raw.unwrap_or_default())?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text).map_err(|err| anyhow!("Config parse error: {err}"))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        if let Some(schema_version) = raw.schema_version {
            if schema_version != 1 {
                return Err(anyhow!(
                    "config.schema_version {schema_version} is not supported (expected 1)"
                ));
            }
        }

        let mut cfg = Self::default();
        if let Some(snapshot) = raw.snapshot.filter(|p| !p.as_os_str().is_empty()) {
            cfg.snapshot = snapshot;
        }
        if let Some(recommend) = raw.recommend {
            let defaults = RecommendConfig::default();
            cfg.recommend = RecommendConfig {
                default_amount: recommend.default_amount.unwrap_or(defaults.default_amount),
                seed: recommend.seed,
                record_viewed: recommend.record_viewed.unwrap_or(defaults.record_viewed),
            };
        }
        if !(1..=MAX_AMOUNT).contains(&cfg.recommend.default_amount) {
            return Err(anyhow!(
                "recommend.default_amount {} is out of range (expected 1..={MAX_AMOUNT})",
                cfg.recommend.default_amount
            ));
        }
        Ok(cfg)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(snapshot) = var(ENV_SNAPSHOT).filter(|v| !v.trim().is_empty()) {
            self.snapshot = PathBuf::from(snapshot);
        }
        if let Some(seed) = var(ENV_SEED).filter(|v| !v.trim().is_empty()) {
            let seed = seed
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_SEED} must be an unsigned integer, got '{seed}'"))?;
            self.recommend.seed = Some(seed);
        }
        Ok(())
    }
}

fn read_raw(path: &Path) -> Result<RawConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&text).map_err(|err| anyhow!("Config {} parse error: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(RoomieConfig::parse("").unwrap(), RoomieConfig::default());
    }

    #[test]
    fn test_full_config() {
        let cfg = RoomieConfig::parse(
            r#"
            schema_version = 1
            snapshot = "data/state.json"

            [recommend]
            default_amount = 3
            seed = 42
            record_viewed = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.snapshot, PathBuf::from("data/state.json"));
        assert_eq!(
            cfg.recommend,
            RecommendConfig {
                default_amount: 3,
                seed: Some(42),
                record_viewed: false,
            }
        );
    }

    #[test]
    fn test_rejects_unknown_schema_and_fields() {
        let err = RoomieConfig::parse("schema_version = 2").unwrap_err();
        assert!(err.to_string().contains("not supported"));

        assert!(RoomieConfig::parse("snapshots = \"x.json\"").is_err());
        assert!(RoomieConfig::parse("[recommend]\ndefault_amount = 11").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = RoomieConfig::default();
        cfg.apply_env(|key| match key {
            ENV_SNAPSHOT => Some("/tmp/other.json".to_string()),
            ENV_SEED => Some("7".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(cfg.snapshot, PathBuf::from("/tmp/other.json"));
        assert_eq!(cfg.recommend.seed, Some(7));

        let bad = cfg.apply_env(|key| (key == ENV_SEED).then(|| "seven".to_string()));
        assert!(bad.is_err());
    }
}
