//! Simulation data types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the disease a bucket of individuals is in.
///
/// Stages are ordered: individuals only ever move forward through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Can acquire the disease.
    Healthy,
    /// Has the disease but cannot transmit it.
    Latent,
    /// Transmits the disease.
    Contagious,
    /// Transmits the disease. Absorbing.
    Zombified,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Healthy => "healthy",
            Stage::Latent => "latent",
            Stage::Contagious => "contagious",
            Stage::Zombified => "zombified",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketId(pub u64);

/// Sub-population sharing a stage and a creation day.
///
/// Sizes are real-valued: the model is deterministic and continuous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    id: BucketId,
    size: f64,
    stage: Stage,
    age: usize,
}

impl Bucket {
    /// Create a new bucket of age 0.
    pub fn new(id: BucketId, size: f64, stage: Stage) -> Self {
        Self {
            id,
            size,
            stage,
            age: 0,
        }
    }

    pub fn id(&self) -> BucketId {
        self.id
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Days elapsed since the bucket entered its current stage.
    pub fn age(&self) -> usize {
        self.age
    }

    pub fn set_size(&mut self, size: f64) {
        self.size = size;
    }

    pub fn absorb(&mut self, size: f64) {
        self.size += size;
    }

    /// Move the bucket to `stage` and restart its age.
    pub fn promote(&mut self, stage: Stage) {
        self.stage = stage;
        self.age = 0;
    }

    pub fn grow_older(&mut self) {
        self.age += 1;
    }
}

/// Number of individuals in each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub healthy: f64,
    pub latent: f64,
    pub contagious: f64,
    pub zombified: f64,
}

impl Totals {
    /// Add `size` individuals to the total of `stage`.
    pub fn add(&mut self, stage: Stage, size: f64) {
        match stage {
            Stage::Healthy => self.healthy += size,
            Stage::Latent => self.latent += size,
            Stage::Contagious => self.contagious += size,
            Stage::Zombified => self.zombified += size,
        }
    }

    /// Contagious plus zombified individuals.
    pub fn infectious(&self) -> f64 {
        self.contagious + self.zombified
    }

    pub fn sum(&self) -> f64 {
        self.healthy + self.latent + self.contagious + self.zombified
    }
}

/// Observable state of the engine after a given number of days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Days elapsed.
    pub day: usize,

    /// Stage totals at that day.
    pub totals: Totals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_restarts_age() {
        let mut bucket = Bucket::new(BucketId(7), 3.5, Stage::Latent);
        bucket.grow_older();
        bucket.grow_older();
        assert_eq!(bucket.age(), 2);

        bucket.promote(Stage::Contagious);
        assert_eq!(bucket.stage(), Stage::Contagious);
        assert_eq!(bucket.age(), 0);
        assert_eq!(bucket.id(), BucketId(7));
        assert_eq!(bucket.size(), 3.5);
    }

    #[test]
    fn totals_group_by_stage() {
        let mut totals = Totals::default();
        totals.add(Stage::Healthy, 10.0);
        totals.add(Stage::Latent, 2.0);
        totals.add(Stage::Latent, 1.0);
        totals.add(Stage::Contagious, 4.0);
        totals.add(Stage::Zombified, 5.0);

        assert_eq!(totals.latent, 3.0);
        assert_eq!(totals.infectious(), 9.0);
        assert_eq!(totals.sum(), 22.0);
    }
}
