//! RAID-6 erasure-coded object store
//!
//! This library stripes files across a fixed array of N simulated disks
//! (local directories) as N−2 data shards plus two Reed-Solomon parities
//! (P and Q) over GF(2^8). Any one or two disks can be lost and rebuilt
//! without data loss.

pub mod erasure;
pub mod error;
pub mod simulation;
pub mod storage;

pub use erasure::Coder;
pub use error::{Error, Result};
pub use simulation::Simulator;
pub use storage::{Cluster, Disk, ShardId, P_SHARD, Q_SHARD};

use std::path::PathBuf;

/// Configuration for a RAID-6 cluster
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of disks in the array; two of them carry parity per file
    pub disks: usize,
    /// Directory under which disk `i` lives at `disk_<i>`
    pub base_path: PathBuf,
    /// Seed for the parity-placement PRNG, so placement is reproducible
    pub parity_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disks: 8,
            base_path: PathBuf::from("raid6_data"),
            parity_seed: 0,
        }
    }
}

impl Config {
    /// Create a configuration for `disks` disks under `base_path`
    pub fn new(disks: usize, base_path: impl Into<PathBuf>) -> Self {
        Self {
            disks,
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Override the parity-placement seed
    pub fn with_parity_seed(mut self, seed: u64) -> Self {
        self.parity_seed = seed;
        self
    }

    /// Number of data shards per file
    pub fn data_shards(&self) -> usize {
        self.disks - 2
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.disks < 4 {
            return Err(Error::InvalidConfig(format!(
                "need at least 4 disks, got {}",
                self.disks
            )));
        }
        // Each data shard index must map to a distinct non-zero power of
        // the generator
        if self.disks - 2 >= 255 {
            return Err(Error::InvalidConfig(format!(
                "{} data shards exceed the GF(2^8) field size",
                self.disks - 2
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(Config::new(4, "/tmp/r").validate().is_ok());
        assert!(Config::new(10, "/tmp/r").validate().is_ok());
        assert!(Config::new(3, "/tmp/r").validate().is_err());
        assert!(Config::new(257, "/tmp/r").validate().is_err());
    }

    #[test]
    fn test_config_data_shards() {
        assert_eq!(Config::new(8, "/tmp/r").data_shards(), 6);
        assert_eq!(Config::default().disks, 8);
    }
}
