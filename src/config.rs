use crate::utils::{check_num, check_size};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Largest number of days a single run may simulate.
pub const MAX_DAYS: usize = 100_000;

/// Relative slack allowed when the initial cohorts add up to the population.
const SUM_TOL: f64 = 1e-9;

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Disease parameters.
    pub disease: DiseaseConfig,
    /// Initial condition.
    pub init: InitConfig,
    /// Output parameters.
    pub output: OutputConfig,
}

/// Disease parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DiseaseConfig {
    /// Name of the disease.
    pub name: String,

    /// Transmission coefficient (effective contacts per day).
    pub beta: f64,

    /// Days a cohort spends latent before becoming contagious.
    pub latent_duration: usize,
    /// Days a cohort spends contagious before becoming zombified.
    pub contagious_duration: usize,
}

/// Initial condition.
///
/// The healthy population is whatever is left once the initial cohorts
/// are taken out of the total population.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    /// Total population.
    pub population: f64,

    /// Initial number of latent individuals.
    pub latent: f64,
    /// Initial number of contagious individuals.
    pub contagious: f64,
    /// Initial number of zombified individuals.
    pub zombified: f64,
}

/// Output parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of days simulated by default.
    pub n_days: usize,
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded and contain a serialized [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.disease
            .validate()
            .context("invalid disease parameters")?;
        self.init.validate().context("invalid initial condition")?;
        check_num(self.output.n_days, 0..=MAX_DAYS).context("invalid number of days")?;

        Ok(())
    }
}

impl DiseaseConfig {
    pub fn validate(&self) -> Result<()> {
        check_size(self.beta).context("invalid transmission coefficient")?;
        check_num(self.latent_duration, 1..=10_000).context("invalid latent duration")?;
        check_num(self.contagious_duration, 1..=10_000)
            .context("invalid contagious duration")?;

        Ok(())
    }
}

impl InitConfig {
    pub fn validate(&self) -> Result<()> {
        check_size(self.population).context("invalid population")?;
        if self.population == 0.0 {
            bail!("population must be positive");
        }

        check_size(self.latent).context("invalid initial number of latent individuals")?;
        check_size(self.contagious)
            .context("invalid initial number of contagious individuals")?;
        check_size(self.zombified).context("invalid initial number of zombified individuals")?;

        let n_sick = self.latent + self.contagious + self.zombified;
        if n_sick - self.population > SUM_TOL * self.population {
            bail!(
                "initial cohorts must not exceed the population ({}), but sum to {n_sick}",
                self.population
            );
        }

        Ok(())
    }

    /// Initial number of healthy individuals.
    pub fn healthy(&self) -> f64 {
        (self.population - self.latent - self.contagious - self.zombified).max(0.0)
    }
}

impl OutputConfig {
    /// Number of days to simulate: `days` if given, `n_days` otherwise.
    ///
    /// # Errors
    /// Returns an error if the number of days is out of range.
    pub fn days(&self, days: Option<usize>) -> Result<usize> {
        let days = days.unwrap_or(self.n_days);
        check_num(days, 0..=MAX_DAYS).context("invalid number of days")?;
        Ok(days)
    }
}
