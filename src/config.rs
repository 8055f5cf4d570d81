use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_yaml::from_reader;
use tracing::{debug, info, instrument};

use crate::error::CinestatError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct YearRange {
    #[serde(rename = "start-year")]
    pub start_year: i32,
    #[serde(rename = "end-year")]
    pub end_year: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start_year: 2000,
            end_year: 2020,
        }
    }
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        year >= self.start_year && year <= self.end_year
    }

    /// Years of the range, latest first.
    pub fn descending(&self) -> impl Iterator<Item = i32> {
        (self.start_year..=self.end_year).rev()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct OutlierFence {
    #[serde(rename = "lower-quantile")]
    pub lower_quantile: f64,
    #[serde(rename = "upper-quantile")]
    pub upper_quantile: f64,
    pub multiplier: f64,
}

impl Default for OutlierFence {
    fn default() -> Self {
        Self {
            lower_quantile: 0.15,
            upper_quantile: 0.85,
            multiplier: 1.5,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CinestatConfig {
    pub database: PathBuf,
    #[serde(rename = "stock-years", default)]
    pub stock_years: YearRange,
    #[serde(rename = "min-movie-year", default = "default_min_movie_year")]
    pub min_movie_year: i32,
    #[serde(rename = "outlier-fence", default)]
    pub outlier_fence: OutlierFence,
    #[serde(rename = "verbose-outliers", default)]
    pub verbose_outliers: bool,
    #[serde(rename = "report-path")]
    pub report_path: PathBuf,
    #[serde(rename = "summary-csv")]
    pub summary_csv: Option<PathBuf>,
    #[serde(rename = "plot-dir")]
    pub plot_dir: Option<PathBuf>,
}

fn default_min_movie_year() -> i32 {
    2000
}

const DEFAULT_DATA: &str = r#"
database: "movie_info.db"
stock-years:
  start-year: 2000
  end-year: 2020
min-movie-year: 2000
outlier-fence:
  lower-quantile: 0.15
  upper-quantile: 0.85
  multiplier: 1.5
verbose-outliers: true
report-path: "data_analysis.txt"
summary-csv: "correlations.csv"
plot-dir: "plots"
"#;

impl Default for CinestatConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("movie_info.db"),
            stock_years: YearRange::default(),
            min_movie_year: default_min_movie_year(),
            outlier_fence: OutlierFence::default(),
            verbose_outliers: true,
            report_path: PathBuf::from("data_analysis.txt"),
            summary_csv: Some(PathBuf::from("correlations.csv")),
            plot_dir: Some(PathBuf::from("plots")),
        }
    }
}

impl CinestatConfig {
    /// Reads the configuration from a YAML file.
    ///
    /// If the file does not exist, it creates a default configuration file.
    ///
    /// # Arguments
    ///
    /// * `filename` - Optional path to the configuration file.
    ///
    /// # Returns
    ///
    /// A `Result` containing the validated `CinestatConfig` on success.
    #[instrument(level = "info", skip(filename))]
    pub fn read_config<P: AsRef<Path>>(filename: Option<P>) -> Result<Self, CinestatError> {
        let path = filename
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(|| Path::new("config.yml").to_path_buf());

        info!(path = %path.display(), "Reading configuration");

        if !path.exists() {
            info!(
                "Config file does not exist. Creating default config at {}",
                path.display()
            );
            let mut file = File::create(&path)?;
            file.write_all(DEFAULT_DATA.as_bytes())?;
            debug!("Default configuration file created");
            return Ok(CinestatConfig::default());
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let config: Self = from_reader(reader)?;
        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Checks the year range and outlier fence for values the pipeline cannot use.
    pub fn validate(&self) -> Result<(), CinestatError> {
        if self.stock_years.start_year > self.stock_years.end_year {
            return Err(CinestatError::InvalidConfig(format!(
                "stock-years start-year {} is after end-year {}",
                self.stock_years.start_year, self.stock_years.end_year
            )));
        }
        let fence = &self.outlier_fence;
        let quantiles_ok = (0.0..=1.0).contains(&fence.lower_quantile)
            && (0.0..=1.0).contains(&fence.upper_quantile)
            && fence.lower_quantile < fence.upper_quantile;
        if !quantiles_ok {
            return Err(CinestatError::InvalidConfig(format!(
                "outlier-fence quantiles must satisfy 0 <= lower < upper <= 1 (got {} and {})",
                fence.lower_quantile, fence.upper_quantile
            )));
        }
        if !fence.multiplier.is_finite() || fence.multiplier < 0.0 {
            return Err(CinestatError::InvalidConfig(format!(
                "outlier-fence multiplier must be a non-negative number (got {})",
                fence.multiplier
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_config_file_does_not_exist() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();
        drop(temp_file);
        assert!(!path.exists());

        let config = CinestatConfig::read_config(Some(&path)).unwrap();

        assert_eq!(config, CinestatConfig::default());
        assert!(path.exists());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn compare_default_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(DEFAULT_DATA.as_bytes()).unwrap();
        let config = CinestatConfig::read_config(Some(temp_file.path())).unwrap();
        assert_eq!(CinestatConfig::default(), config);
    }

    #[test]
    fn test_read_config_with_missing_optional_sections() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let yaml_content = r#"
database: "films.db"
report-path: "out.txt"
"#;
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = CinestatConfig::read_config(Some(temp_file.path())).unwrap();

        assert_eq!(config.database, PathBuf::from("films.db"));
        assert_eq!(config.stock_years, YearRange::default());
        assert_eq!(config.min_movie_year, 2000);
        assert_eq!(config.outlier_fence, OutlierFence::default());
        assert!(!config.verbose_outliers);
        assert_eq!(config.summary_csv, None);
        assert_eq!(config.plot_dir, None);
    }

    #[test]
    fn test_read_config_missing_database() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let yaml_content = r#"
report-path: "out.txt"
"#;
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let result = CinestatConfig::read_config(Some(temp_file.path()));
        assert!(matches!(result, Err(CinestatError::SerdeYamlError(_))));
    }

    #[test]
    fn test_read_config_inverted_year_range() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let yaml_content = r#"
database: "films.db"
report-path: "out.txt"
stock-years:
  start-year: 2020
  end-year: 2000
"#;
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let result = CinestatConfig::read_config(Some(temp_file.path()));
        assert!(matches!(result, Err(CinestatError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_fence() {
        let config = CinestatConfig {
            outlier_fence: OutlierFence {
                lower_quantile: 0.9,
                upper_quantile: 0.1,
                multiplier: 1.5,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CinestatError::InvalidConfig(_))
        ));

        let config = CinestatConfig {
            outlier_fence: OutlierFence {
                multiplier: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_year_range_descending() {
        let range = YearRange {
            start_year: 2018,
            end_year: 2020,
        };
        assert_eq!(range.descending().collect::<Vec<_>>(), vec![2020, 2019, 2018]);
        assert!(range.contains(2019));
        assert!(!range.contains(2021));
    }
}
