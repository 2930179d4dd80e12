//! Day-by-day simulation of an outbreak moving a fixed population through
//! the healthy, latent, contagious and zombified stages.
//!
//! Transmission is continuous: each day the contact-rate equations are
//! integrated to find how many healthy individuals get infected. Stage
//! progression is discrete: every day's infections form a cohort that
//! stays latent and then contagious for a fixed number of days before
//! merging into the zombified pool.

pub mod config;
pub mod engine;
pub mod ode;
pub mod series;
pub mod tracker;
pub mod transmission;
pub mod types;
mod utils;

pub use crate::config::{Config, DiseaseConfig, InitConfig, OutputConfig};
pub use crate::engine::Engine;
pub use crate::series::Trajectory;
pub use crate::types::{Bucket, BucketId, Snapshot, Stage, Totals};
