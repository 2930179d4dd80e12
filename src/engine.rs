use crate::config::{DiseaseConfig, InitConfig};
use crate::tracker::{Durations, StageTracker};
use crate::transmission::TransmissionModel;
use crate::types::{Snapshot, Totals};
use anyhow::{Context, Result};
use std::fmt;

/// Relative magnitude below which negative values are treated as rounding noise.
const ROUNDING_TOL: f64 = 1e-9;

/// Simulation engine.
///
/// Holds the configuration, the transmission model and the population
/// buckets, and advances the outbreak one day at a time.
#[derive(Debug, Clone)]
pub struct Engine {
    disease: DiseaseConfig,
    init: InitConfig,
    transmission: TransmissionModel,
    tracker: StageTracker,
    totals: Totals,
    days_elapsed: usize,
    n_anomalies: usize,
}

impl Engine {
    /// Create a new `Engine` in its initial condition.
    ///
    /// # Errors
    /// Returns an error if any parameter is invalid.
    pub fn new(disease: DiseaseConfig, init: InitConfig) -> Result<Self> {
        disease
            .validate()
            .context("invalid disease parameters")?;
        init.validate().context("invalid initial condition")?;

        let transmission = TransmissionModel::new(init.population, disease.beta);
        let tracker = StageTracker::new(&init);
        let totals = tracker.totals();

        Ok(Self {
            disease,
            init,
            transmission,
            tracker,
            totals,
            days_elapsed: 0,
            n_anomalies: 0,
        })
    }

    /// Advance the outbreak by one day.
    pub fn advance_one_day(&mut self) {
        // Transmission only sees the buckets as they were at the start of the day.
        let totals = self.tracker.totals();
        let infectious = totals.infectious();
        let susceptible = self.init.population - infectious - totals.latent;

        let (new_susceptible, new_infectious) =
            match self.transmission.step(susceptible, infectious) {
                Ok(result) => result,
                Err(error) => {
                    self.n_anomalies += 1;
                    log::warn!("day {}: {error:#}, skipping transmission", self.days_elapsed + 1);
                    (susceptible, infectious)
                }
            };

        // The healthy pool never grows back.
        let new_susceptible = self
            .check_quantity("healthy population", new_susceptible)
            .min(susceptible.min(totals.healthy).max(0.0));
        let newly_infected = self.check_quantity("newly infected", new_infectious - infectious);

        let durations = self.durations();
        self.tracker.set_healthy(new_susceptible);
        self.tracker.seed_cohort(newly_infected);
        self.tracker.sweep(durations);

        self.days_elapsed += 1;
        self.totals = self.tracker.totals();

        log::debug!("day {}: {:?}", self.days_elapsed, self.totals);
    }

    /// Advance the outbreak by `days` days.
    pub fn advance(&mut self, days: usize) {
        for _ in 0..days {
            self.advance_one_day();
        }
    }

    /// Advance the outbreak by `days` days, recording a snapshot of the
    /// current state and one after each day.
    pub fn run(&mut self, days: usize) -> Vec<Snapshot> {
        let mut snapshots = vec![self.snapshot()];
        for _ in 0..days {
            self.advance_one_day();
            snapshots.push(self.snapshot());
        }
        snapshots
    }

    /// Restore the initial condition.
    pub fn reset(&mut self) {
        self.tracker = StageTracker::new(&self.init);
        self.totals = self.tracker.totals();
        self.days_elapsed = 0;
        self.n_anomalies = 0;
    }

    pub fn name(&self) -> &str {
        &self.disease.name
    }

    pub fn population(&self) -> f64 {
        self.init.population
    }

    pub fn beta(&self) -> f64 {
        self.disease.beta
    }

    pub fn healthy(&self) -> f64 {
        self.totals.healthy
    }

    pub fn latent(&self) -> f64 {
        self.totals.latent
    }

    pub fn contagious(&self) -> f64 {
        self.totals.contagious
    }

    pub fn zombified(&self) -> f64 {
        self.totals.zombified
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn days_elapsed(&self) -> usize {
        self.days_elapsed
    }

    /// Number of numeric anomalies clamped since the last reset.
    pub fn n_anomalies(&self) -> usize {
        self.n_anomalies
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            day: self.days_elapsed,
            totals: self.totals,
        }
    }

    fn durations(&self) -> Durations {
        Durations {
            latent: self.disease.latent_duration,
            contagious: self.disease.contagious_duration,
        }
    }

    /// Clamp a negative or non-finite population count to 0.
    ///
    /// Anything beyond rounding noise is reported as an anomaly.
    fn check_quantity(&mut self, what: &str, value: f64) -> f64 {
        if value >= 0.0 {
            return value;
        }
        if value.is_nan() || value < -ROUNDING_TOL * self.init.population {
            self.n_anomalies += 1;
            log::warn!(
                "day {}: {what} is {value}, clamping to 0",
                self.days_elapsed + 1
            );
        }
        0.0
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Disease: {}", self.disease.name)?;
        writeln!(f, "Population: {:.6}", self.init.population)?;
        writeln!(f, "Healthy: {:.6}", self.totals.healthy)?;
        writeln!(f, "Latent: {:.6}", self.totals.latent)?;
        writeln!(f, "Contagious: {:.6}", self.totals.contagious)?;
        writeln!(f, "Zombified: {:.6}", self.totals.zombified)?;
        writeln!(f, "Beta: {:.6}", self.disease.beta)?;
        write!(f, "Days Elapsed: {}", self.days_elapsed)
    }
}
