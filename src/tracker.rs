use crate::config::InitConfig;
use crate::types::{Bucket, BucketId, Stage, Totals};

/// Stage durations, in days.
#[derive(Debug, Clone, Copy)]
pub struct Durations {
    pub latent: usize,
    pub contagious: usize,
}

/// Buckets of the population, grouped by stage.
///
/// The healthy and zombified pools live for the whole simulation; latent
/// and contagious cohorts are created and merged away as days go by.
#[derive(Debug, Clone)]
pub struct StageTracker {
    healthy: Bucket,
    zombified: Bucket,
    cohorts: Vec<Bucket>,
    next_id: u64,
}

impl StageTracker {
    /// Create the buckets of the initial condition.
    pub fn new(init: &InitConfig) -> Self {
        let mut tracker = Self {
            healthy: Bucket::new(BucketId(0), init.healthy(), Stage::Healthy),
            zombified: Bucket::new(BucketId(1), init.zombified, Stage::Zombified),
            cohorts: Vec::new(),
            next_id: 2,
        };
        tracker.add_cohort(init.latent, Stage::Latent);
        tracker.add_cohort(init.contagious, Stage::Contagious);
        tracker
    }

    pub fn set_healthy(&mut self, size: f64) {
        self.healthy.set_size(size);
    }

    /// Add a new latent cohort of `size` individuals.
    pub fn seed_cohort(&mut self, size: f64) -> BucketId {
        self.add_cohort(size, Stage::Latent)
    }

    fn add_cohort(&mut self, size: f64, stage: Stage) -> BucketId {
        let id = BucketId(self.next_id);
        self.next_id += 1;
        self.cohorts.push(Bucket::new(id, size, stage));
        id
    }

    /// Apply one day of stage progression to every bucket.
    ///
    /// Latent cohorts of age `durations.latent` become contagious and
    /// contagious cohorts of age `durations.contagious` merge into the
    /// zombified pool. Every remaining bucket then grows one day older,
    /// including the ones just promoted.
    pub fn sweep(&mut self, durations: Durations) {
        let zombified = &mut self.zombified;
        self.cohorts.retain_mut(|cohort| {
            match cohort.stage() {
                Stage::Latent if cohort.age() == durations.latent => {
                    log::trace!("cohort {:?} is now {}", cohort.id(), Stage::Contagious);
                    cohort.promote(Stage::Contagious);
                }
                Stage::Contagious if cohort.age() == durations.contagious => {
                    log::trace!("cohort {:?} merged into {}", cohort.id(), Stage::Zombified);
                    zombified.absorb(cohort.size());
                    return false;
                }
                _ => {}
            }
            cohort.grow_older();
            true
        });

        self.healthy.grow_older();
        self.zombified.grow_older();
    }

    /// All buckets: the healthy pool, the cohorts and the zombified pool.
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        std::iter::once(&self.healthy)
            .chain(self.cohorts.iter())
            .chain(std::iter::once(&self.zombified))
    }

    /// Sum bucket sizes by stage.
    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for bucket in self.buckets() {
            totals.add(bucket.stage(), bucket.size());
        }
        totals
    }
}
