use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Args;
use crate::data::model::Column;

/// Environment variable naming an alternative settings file.
pub const CONFIG_ENV: &str = "CO2_DASHBOARD_CONFIG";

/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "co2-dashboard.json";

/// Upper bound on `histogram_bins`.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Dashboard start-up settings.
///
/// ```json
/// {
///   "dataset_path": "CO2 Emissions_Canada.csv",
///   "histogram_column": "emissoes_co2_g_km",
///   "histogram_bins": 50,
///   "pie_column": "tipo_combustivel"
/// }
/// ```
/// Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub dataset_path: PathBuf,
    pub histogram_column: Column,
    pub histogram_bins: usize,
    pub pie_column: Column,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("CO2 Emissions_Canada.csv"),
            histogram_column: Column::Co2Emissions,
            histogram_bins: 50,
            pie_column: Column::FuelType,
        }
    }
}

impl Settings {
    /// Read settings from `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        settings.validated()
    }

    fn validated(self) -> Result<Self> {
        if !self.histogram_column.is_numeric() {
            anyhow::bail!(
                "histogram_column '{}' is not a numeric column",
                self.histogram_column
            );
        }
        if self.pie_column.is_numeric() {
            anyhow::bail!("pie_column '{}' is not a categorical column", self.pie_column);
        }
        if !(1..=MAX_HISTOGRAM_BINS).contains(&self.histogram_bins) {
            anyhow::bail!(
                "histogram_bins must be between 1 and {MAX_HISTOGRAM_BINS}, got {}",
                self.histogram_bins
            );
        }
        Ok(self)
    }

    /// Resolve settings for this process.
    ///
    /// Uses `--config`, else the file named by [`CONFIG_ENV`], else
    /// [`DEFAULT_CONFIG_FILE`] if it exists, else defaults. A broken file is
    /// logged and ignored. The positional dataset argument overrides the
    /// dataset path.
    pub fn resolve(args: &Args) -> Self {
        let path = args
            .config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.exists().then_some(local)
            });

        let mut settings = match path {
            Some(path) => Settings::from_file(&path).unwrap_or_else(|e| {
                log::warn!("Using default settings: {e:#}");
                Settings::default()
            }),
            None => Settings::default(),
        };

        if let Some(dataset) = &args.dataset {
            settings.dataset_path = dataset.clone();
        }
        log::debug!("Settings: {settings:?}");
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_settings(text: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), text).expect("write settings");
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_settings(r#"{ "histogram_bins": 20 }"#);
        let settings = Settings::from_file(file.path()).expect("settings");
        assert_eq!(settings.histogram_bins, 20);
        assert_eq!(settings.histogram_column, Column::Co2Emissions);
        assert_eq!(settings.dataset_path, PathBuf::from("CO2 Emissions_Canada.csv"));
    }

    #[test]
    fn columns_are_named_canonically() {
        let file = write_settings(
            r#"{ "histogram_column": "tamanho_motor_l", "pie_column": "classe_veiculo" }"#,
        );
        let settings = Settings::from_file(file.path()).expect("settings");
        assert_eq!(settings.histogram_column, Column::EngineSize);
        assert_eq!(settings.pie_column, Column::VehicleClass);
    }

    #[test]
    fn source_header_names_are_rejected() {
        let file = write_settings(r#"{ "histogram_column": "CO2 Emissions(g/km)" }"#);
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown column"), "{err:#}");
    }

    #[test]
    fn histogram_column_must_be_numeric() {
        let file = write_settings(r#"{ "histogram_column": "marca" }"#);
        assert!(Settings::from_file(file.path()).is_err());
    }

    #[test]
    fn histogram_bins_must_be_in_range() {
        for bins in ["0", "1001"] {
            let file = write_settings(&format!(r#"{{ "histogram_bins": {bins} }}"#));
            let err = Settings::from_file(file.path()).unwrap_err();
            assert!(format!("{err:#}").contains("histogram_bins"), "{bins}: {err:#}");
        }
        let file = write_settings(r#"{ "histogram_bins": 18446744073709551615 }"#);
        assert!(Settings::from_file(file.path()).is_err());
        let file = write_settings(r#"{ "histogram_bins": 1000 }"#);
        assert_eq!(Settings::from_file(file.path()).expect("settings").histogram_bins, 1000);
    }

    #[test]
    fn command_line_overrides_the_settings_file() {
        let file = write_settings(r#"{ "dataset_path": "from-file.csv", "histogram_bins": 12 }"#);
        let args = Args {
            dataset: Some(PathBuf::from("from-args.csv")),
            config: Some(file.path().to_path_buf()),
        };
        let settings = Settings::resolve(&args);
        assert_eq!(settings.dataset_path, PathBuf::from("from-args.csv"));
        assert_eq!(settings.histogram_bins, 12);
    }

    #[test]
    fn broken_config_falls_back_to_defaults() {
        let file = write_settings(r#"{ "histogram_bins": 0 }"#);
        let args = Args {
            dataset: None,
            config: Some(file.path().to_path_buf()),
        };
        assert_eq!(Settings::resolve(&args).histogram_bins, Settings::default().histogram_bins);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_settings(r#"{ "bins": 10 }"#);
        assert!(Settings::from_file(file.path()).is_err());
    }
}
