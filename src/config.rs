use crate::error::{PlateReconError, Result};
use plate_recon_common::{DateFilter, DirectoryLayout, MatchOptions, DEFAULT_SIMILARITY_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 閾値を上書きする環境変数
pub const THRESHOLD_ENV: &str = "PLATE_RECON_THRESHOLD";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub similarity_threshold: f64,
    /// "All" または YYYY-MM-DD
    pub default_date: Option<String>,
    pub default_format: String,
    pub directory_layout: DirectoryLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PlateReconError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("plate-recon").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            default_date: None,
            default_format: "csv".into(),
            directory_layout: DirectoryLayout::default(),
        }
    }

    /// 照合オプション（CLI指定 > 環境変数 > 設定ファイル）
    pub fn match_options(&self, cli_threshold: Option<f64>) -> Result<MatchOptions> {
        let threshold = match cli_threshold {
            Some(t) => t,
            None => self.env_threshold()?.unwrap_or(self.similarity_threshold),
        };
        Ok(MatchOptions::with_threshold(threshold)?)
    }

    fn env_threshold(&self) -> Result<Option<f64>> {
        match std::env::var(THRESHOLD_ENV) {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| PlateReconError::Config(format!("{} が数値ではありません: {}", THRESHOLD_ENV, raw))),
            Err(_) => Ok(None),
        }
    }

    /// 日付フィルタ（CLI指定 > 設定ファイル > All）
    pub fn date_filter(&self, cli_date: Option<&str>) -> Result<DateFilter> {
        match cli_date.or(self.default_date.as_deref()) {
            Some(raw) => Ok(raw.parse::<DateFilter>()?),
            None => Ok(DateFilter::All),
        }
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        MatchOptions::with_threshold(threshold)?;
        self.similarity_threshold = threshold;
        self.save()
    }

    pub fn set_default_date(&mut self, date: String) -> Result<()> {
        date.parse::<DateFilter>()?;
        self.default_date = Some(date);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// 環境変数を触るテストの直列化
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config.similarity_threshold, 0.85);
        assert_eq!(config.default_format, "csv");
        assert_eq!(config.directory_layout.record_tag, "G_C6");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::default();
        config.similarity_threshold = 0.9;
        config.default_date = Some("2023-11-14".into());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.similarity_threshold, 0.9);
        assert_eq!(loaded.default_date.as_deref(), Some("2023-11-14"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"similarity_threshold": 0.7}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.similarity_threshold, 0.7);
        assert_eq!(config.directory_layout.plate_tag, "C12");
    }

    #[test]
    fn test_cli_threshold_wins_and_is_validated() {
        let config = Config::default();
        assert_eq!(config.match_options(Some(0.6)).unwrap().similarity_threshold, 0.6);
        assert!(config.match_options(Some(2.0)).is_err());
    }

    #[test]
    fn test_date_filter_precedence() {
        let mut config = Config::default();
        assert_eq!(config.date_filter(None).unwrap(), DateFilter::All);

        config.default_date = Some("2023-11-14".into());
        assert!(matches!(config.date_filter(None).unwrap(), DateFilter::On(_)));
        assert_eq!(config.date_filter(Some("All")).unwrap(), DateFilter::All);
        assert!(config.date_filter(Some("tomorrow")).is_err());
    }

    #[test]
    fn test_threshold_env_precedence() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"similarity_threshold": 0.7}"#).unwrap();
        let config = Config::load_from(&path).unwrap();

        std::env::set_var(THRESHOLD_ENV, " 0.9 ");
        let from_env = config.match_options(None).map(|o| o.similarity_threshold);
        let from_cli = config.match_options(Some(0.6)).map(|o| o.similarity_threshold);

        std::env::set_var(THRESHOLD_ENV, "high");
        let not_numeric = config.match_options(None);

        std::env::set_var(THRESHOLD_ENV, "1.5");
        let out_of_range = config.match_options(None);

        std::env::remove_var(THRESHOLD_ENV);
        let from_file = config.match_options(None).map(|o| o.similarity_threshold);

        assert_eq!(from_env.unwrap(), 0.9);
        assert_eq!(from_cli.unwrap(), 0.6);
        assert!(matches!(not_numeric, Err(PlateReconError::Config(_))));
        assert!(matches!(out_of_range, Err(PlateReconError::Common(_))));
        assert_eq!(from_file.unwrap(), 0.7);
    }
}
