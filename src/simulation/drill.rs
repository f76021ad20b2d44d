//! Failure and recovery drills
//!
//! Timed corrupt → recover → verify sequences over a populated cluster,
//! with integrity accounting for the final report.

use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::Result;
use crate::storage::Cluster;

use super::workload::FileSpec;

/// Outcome of reading every file back against the generated workload
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    /// Files that read back byte-identical
    pub verified: usize,
    /// Files that read back with different contents
    pub mismatches: usize,
    /// Files that failed to read at all
    pub read_errors: usize,
}

impl VerifyReport {
    /// Whether every file round-tripped
    pub fn is_clean(&self) -> bool {
        self.mismatches == 0 && self.read_errors == 0
    }
}

/// Timing and integrity summary of a drill
#[derive(Debug, Clone, Default)]
pub struct DrillReport {
    /// Failure cases exercised
    pub cases: usize,
    /// Total time spent in recovery calls
    pub recovery_time: Duration,
    /// Files that failed verification across all cases
    pub corrupted_files: usize,
}

impl DrillReport {
    /// Mean recovery time per case
    pub fn average_recovery_time(&self) -> Duration {
        if self.cases == 0 {
            return Duration::ZERO;
        }
        self.recovery_time / self.cases as u32
    }

    fn absorb(&mut self, elapsed: Duration, verify: &VerifyReport) {
        self.cases += 1;
        self.recovery_time += elapsed;
        self.corrupted_files += verify.mismatches + verify.read_errors;
    }
}

/// Read every file back and compare against its expected contents
pub fn verify_files(cluster: &Cluster, files: &[FileSpec]) -> VerifyReport {
    let mut report = VerifyReport::default();
    for spec in files {
        match cluster.read_file(&spec.name) {
            Ok(bytes) if bytes == spec.contents => report.verified += 1,
            Ok(_) => {
                warn!(file = %spec.name, "contents mismatch after recovery");
                report.mismatches += 1;
            }
            Err(err) => {
                warn!(file = %spec.name, error = %err, "read failed");
                report.read_errors += 1;
            }
        }
    }
    report
}

/// Corrupt one disk per case, recover it, and verify every file
pub fn run_single_failure_drill(
    cluster: &Cluster,
    files: &[FileSpec],
    cases: &[usize],
) -> Result<DrillReport> {
    let mut report = DrillReport::default();
    for &node in cases {
        cluster.simulate_failure(node)?;

        let start = Instant::now();
        cluster.recover_single(node)?;
        let elapsed = start.elapsed();

        report.absorb(elapsed, &verify_files(cluster, files));
    }
    Ok(report)
}

/// Corrupt two disks per case, recover both, and verify every file
pub fn run_double_failure_drill(
    cluster: &Cluster,
    files: &[FileSpec],
    cases: &[(usize, usize)],
) -> Result<DrillReport> {
    let mut report = DrillReport::default();
    for &(n1, n2) in cases {
        cluster.simulate_double_failure(n1, n2)?;

        let start = Instant::now();
        cluster.recover_double(n1, n2)?;
        let elapsed = start.elapsed();

        report.absorb(elapsed, &verify_files(cluster, files));
    }
    Ok(report)
}
