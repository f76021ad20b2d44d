//! Simulation driver for cluster workloads
//!
//! This module orchestrates generated workloads against a cluster: timed
//! population, integrity verification, and failure/recovery drills.

pub mod drill;
pub mod workload;

pub use drill::{DrillReport, VerifyReport};
pub use workload::{FileSpec, WorkloadGenerator};

use std::time::{Duration, Instant};

use tracing::info;

use crate::error::Result;
use crate::storage::Cluster;

/// A simulation coordinator that owns the cluster and the workload
/// currently written to it
pub struct Simulator {
    cluster: Cluster,
    files: Vec<FileSpec>,
}

impl Simulator {
    /// Create a simulator over an empty cluster
    pub fn new(cluster: Cluster) -> Self {
        Self {
            cluster,
            files: Vec::new(),
        }
    }

    /// The underlying cluster
    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    /// The workload written so far
    pub fn files(&self) -> &[FileSpec] {
        &self.files
    }

    /// Write every file of the workload, returning the elapsed wall time
    pub fn populate(&mut self, files: Vec<FileSpec>) -> Result<Duration> {
        let start = Instant::now();
        for spec in &files {
            self.cluster.write_file(&spec.name, &spec.contents)?;
        }
        let elapsed = start.elapsed();

        info!(
            files = files.len(),
            ms = elapsed.as_millis() as u64,
            "workload written"
        );
        self.files.extend(files);
        Ok(elapsed)
    }

    /// Read every file back and compare against the workload
    pub fn verify_all(&self) -> VerifyReport {
        drill::verify_files(&self.cluster, &self.files)
    }

    /// Run corrupt → recover → verify for each single-failure case
    pub fn run_single_drill(&self, cases: &[usize]) -> Result<DrillReport> {
        let report = drill::run_single_failure_drill(&self.cluster, &self.files, cases)?;
        info!(
            cases = report.cases,
            avg_ms = report.average_recovery_time().as_millis() as u64,
            corrupted = report.corrupted_files,
            "single-failure drill finished"
        );
        Ok(report)
    }

    /// Run corrupt → recover → verify for each double-failure case
    pub fn run_double_drill(&self, cases: &[(usize, usize)]) -> Result<DrillReport> {
        let report = drill::run_double_failure_drill(&self.cluster, &self.files, cases)?;
        info!(
            cases = report.cases,
            avg_ms = report.average_recovery_time().as_millis() as u64,
            corrupted = report.corrupted_files,
            "double-failure drill finished"
        );
        Ok(report)
    }

    /// Rewrite files in place and verify the whole workload afterwards
    ///
    /// Each update targets a name already in the workload; the expected
    /// contents are swapped so later verification checks the new bytes.
    pub fn run_update_drill(&mut self, updates: Vec<FileSpec>) -> Result<(Duration, VerifyReport)> {
        let start = Instant::now();
        for update in &updates {
            self.cluster.update_file(&update.name, &update.contents)?;
        }
        let elapsed = start.elapsed();

        for update in updates {
            if let Some(spec) = self.files.iter_mut().find(|s| s.name == update.name) {
                spec.contents = update.contents;
            }
        }

        let report = self.verify_all();
        info!(
            ms = elapsed.as_millis() as u64,
            verified = report.verified,
            corrupted = report.mismatches + report.read_errors,
            "update drill finished"
        );
        Ok((elapsed, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use tempfile::TempDir;

    #[test]
    fn test_simulator_end_to_end() {
        let dir = TempDir::new().unwrap();
        let cluster = Cluster::new(&Config::new(8, dir.path()).with_parity_seed(2)).unwrap();
        let mut sim = Simulator::new(cluster);

        let mut gen = WorkloadGenerator::new(42);
        sim.populate(gen.files(6, 100)).unwrap();
        assert!(sim.verify_all().is_clean());

        let singles = gen.single_failures(3, 8);
        let report = sim.run_single_drill(&singles).unwrap();
        assert_eq!(report.corrupted_files, 0);

        let doubles = gen.double_failures(3, 8);
        let report = sim.run_double_drill(&doubles).unwrap();
        assert_eq!(report.corrupted_files, 0);
    }

    #[test]
    fn test_update_drill_swaps_expected_contents() {
        let dir = TempDir::new().unwrap();
        let cluster = Cluster::new(&Config::new(6, dir.path()).with_parity_seed(2)).unwrap();
        let mut sim = Simulator::new(cluster);

        let mut gen = WorkloadGenerator::new(7);
        let files = gen.files(4, 50);
        sim.populate(files.clone()).unwrap();

        let updates = gen.updates(&files, 2, 50);
        let (_, report) = sim.run_update_drill(updates).unwrap();
        assert!(report.is_clean());
    }
}
