use crate::types::Snapshot;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Stage totals of a single day, as written to CSV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRow {
    pub day: usize,
    pub healthy: f64,
    pub latent: f64,
    pub contagious: f64,
    pub zombified: f64,
}

/// Time series of the stage totals, one entry per recorded day.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub day: Vec<usize>,
    pub healthy: Vec<f64>,
    pub latent: Vec<f64>,
    pub contagious: Vec<f64>,
    pub zombified: Vec<f64>,
}

impl Trajectory {
    pub fn from_snapshots<I>(snapshots: I) -> Self
    where
        I: IntoIterator<Item = Snapshot>,
    {
        let mut trajectory = Self::default();
        for snapshot in snapshots {
            trajectory.push(&snapshot);
        }
        trajectory
    }

    pub fn push(&mut self, snapshot: &Snapshot) {
        self.day.push(snapshot.day);
        self.healthy.push(snapshot.totals.healthy);
        self.latent.push(snapshot.totals.latent);
        self.contagious.push(snapshot.totals.contagious);
        self.zombified.push(snapshot.totals.zombified);
    }

    pub fn len(&self) -> usize {
        self.day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_empty()
    }

    /// Day and size of the largest contagious population (first one on ties).
    pub fn peak_contagious(&self) -> Option<(usize, f64)> {
        self.day
            .iter()
            .zip(&self.contagious)
            .fold(None, |peak, (&day, &val)| match peak {
                Some((_, max)) if max >= val => peak,
                _ => Some((day, val)),
            })
    }

    pub fn rows(&self) -> impl Iterator<Item = TrajectoryRow> + '_ {
        (0..self.len()).map(|i_day| TrajectoryRow {
            day: self.day[i_day],
            healthy: self.healthy[i_day],
            latent: self.latent[i_day],
            contagious: self.contagious[i_day],
            zombified: self.zombified[i_day],
        })
    }

    /// Write the time series as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for row in self.rows() {
            writer
                .serialize(row)
                .with_context(|| format!("failed to serialize day {}", row.day))?;
        }
        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }
}
