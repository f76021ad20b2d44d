//! RAID-6 cluster coordination
//!
//! The cluster owns the ordered disk array and the known-file list, splits
//! payloads into N−2 data shards, derives the P/Q parities, and drives
//! recovery after simulated disk loss. A single mutex serializes the whole
//! public surface; every operation runs to completion under it.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::erasure::Coder;
use crate::error::{Error, Result};
use crate::storage::{Disk, ShardId, P_SHARD, Q_SHARD};
use crate::Config;

/// RAID-6 coordinator over N directory-backed disks
///
/// Files are striped as N−2 data shards plus the P and Q parities, one
/// shard per disk. The two parity disks are picked per file, so placement
/// differs between files; updates preserve whatever placement a file got
/// at write time.
pub struct Cluster {
    state: Mutex<ClusterState>,
}

struct ClusterState {
    disks: Vec<Disk>,
    file_names: Vec<String>,
    coder: Coder,
    rng: StdRng,
}

/// Shards of one file as found on the surviving disks
struct FileShards {
    data: Vec<Option<Vec<u8>>>,
    p: Option<Vec<u8>>,
    q: Option<Vec<u8>>,
}

impl FileShards {
    /// Common block size of everything present
    fn block_size(&self, file: &str) -> Result<usize> {
        let mut size = None;
        let buffers = self
            .data
            .iter()
            .flatten()
            .chain(self.p.iter())
            .chain(self.q.iter());
        for buf in buffers {
            match size {
                None => size = Some(buf.len()),
                Some(expected) if buf.len() != expected => {
                    return Err(Error::ShardLengthMismatch {
                        expected,
                        found: buf.len(),
                    });
                }
                Some(_) => {}
            }
        }
        size.ok_or_else(|| Error::ShardMissing {
            file: file.to_string(),
            shard_id: 0,
        })
    }

    /// Missing shard ids, parities first: −2, then −1, then data ascending
    fn missing_ids(&self) -> Vec<ShardId> {
        let mut missing = Vec::new();
        if self.q.is_none() {
            missing.push(Q_SHARD);
        }
        if self.p.is_none() {
            missing.push(P_SHARD);
        }
        for (j, block) in self.data.iter().enumerate() {
            if block.is_none() {
                missing.push(j as ShardId);
            }
        }
        missing
    }
}

impl Cluster {
    /// Create a cluster of `config.disks` disks under `config.base_path`
    ///
    /// Disk `i` lives at `<base_path>/disk_<i>`; directories are created as
    /// needed. The parity-placement PRNG is seeded from the config so
    /// placement is reproducible.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let disks = (0..config.disks)
            .map(|i| Disk::new(i, config.base_path.join(format!("disk_{}", i))))
            .collect::<Result<Vec<_>>>()?;

        info!(
            disks = config.disks,
            base = %config.base_path.display(),
            "cluster initialized"
        );

        Ok(Self {
            state: Mutex::new(ClusterState {
                disks,
                file_names: Vec::new(),
                coder: Coder::new(),
                rng: StdRng::seed_from_u64(config.parity_seed),
            }),
        })
    }

    /// Stripe a new file across the cluster
    ///
    /// Picks two random disks for the P and Q parities and lays the data
    /// shards onto the remaining disks in ascending disk order. Rewriting
    /// an existing name is rejected; use [`Cluster::update_file`].
    pub fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut state = self.state.lock();
        if state.is_known(name) {
            return Err(Error::DuplicateFile(name.to_string()));
        }

        let k = state.disks.len() - 2;
        let blocks = split_payload(data, k);
        let (p, q) = state.coder.parity(&blocks)?;
        let (p_idx, q_idx) = state.pick_parity_disks();

        state.disks[p_idx].write_shard(name, P_SHARD, &p)?;
        state.disks[q_idx].write_shard(name, Q_SHARD, &q)?;

        let mut disk_idx = 0;
        for (j, block) in blocks.iter().enumerate() {
            while disk_idx == p_idx || disk_idx == q_idx {
                disk_idx += 1;
            }
            state.disks[disk_idx].write_shard(name, j as ShardId, block)?;
            disk_idx += 1;
        }

        state.file_names.push(name.to_string());
        debug!(
            file = name,
            block_size = blocks[0].len(),
            p_disk = p_idx,
            q_disk = q_idx,
            "file written"
        );
        Ok(())
    }

    /// Read a file back by concatenating its data shards
    ///
    /// Requires every disk to be healthy. Trailing zero bytes are stripped;
    /// they are indistinguishable from block padding.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let state = self.state.lock();
        state.require_known(name)?;

        if let Some(disk) = state.disks.iter().find(|d| !d.is_healthy()) {
            return Err(Error::DegradedCluster { disk: disk.id() });
        }

        let shards = state.collect_shards(name)?;
        shards.block_size(name)?;

        let mut payload = Vec::new();
        for (j, block) in shards.data.iter().enumerate() {
            let block = block.as_ref().ok_or_else(|| Error::ShardMissing {
                file: name.to_string(),
                shard_id: j as ShardId,
            })?;
            payload.extend_from_slice(block);
        }

        while payload.last() == Some(&0) {
            payload.pop();
        }
        Ok(payload)
    }

    /// Rewrite a known file in place, preserving its shard placement
    ///
    /// Each disk is probed for what it currently holds for this file (Q,
    /// then P, then a data shard) and that shard is overwritten with the
    /// freshly computed bytes.
    pub fn update_file(&self, name: &str, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let state = self.state.lock();
        state.require_known(name)?;

        let k = state.disks.len() - 2;
        let blocks = split_payload(data, k);
        let (p, q) = state.coder.parity(&blocks)?;

        for disk in &state.disks {
            if disk.contains_shard(name, Q_SHARD) {
                disk.write_shard(name, Q_SHARD, &q)?;
            } else if disk.contains_shard(name, P_SHARD) {
                disk.write_shard(name, P_SHARD, &p)?;
            } else {
                for (j, block) in blocks.iter().enumerate() {
                    if disk.contains_shard(name, j as ShardId) {
                        disk.write_shard(name, j as ShardId, block)?;
                        break;
                    }
                }
            }
        }

        debug!(file = name, block_size = blocks[0].len(), "file updated");
        Ok(())
    }

    /// Simulate the total loss of one disk
    pub fn simulate_failure(&self, node: usize) -> Result<()> {
        let mut state = self.state.lock();
        state.check_disk_index(node)?;

        let failed_elsewhere = state.failed_disks_excluding(&[node]);
        if failed_elsewhere >= 2 {
            return Err(Error::TooManyFailures);
        }

        state.disks[node].corrupt()?;
        info!(disk = node, "simulated disk failure");
        Ok(())
    }

    /// Simulate the simultaneous loss of two distinct disks
    pub fn simulate_double_failure(&self, n1: usize, n2: usize) -> Result<()> {
        let mut state = self.state.lock();
        state.check_disk_index(n1)?;
        state.check_disk_index(n2)?;
        if n1 == n2 {
            return Err(Error::InvalidConfig(
                "double failure requires two distinct disks".to_string(),
            ));
        }
        if state.failed_disks_excluding(&[n1, n2]) > 0 {
            return Err(Error::TooManyFailures);
        }

        state.disks[n1].corrupt()?;
        state.disks[n2].corrupt()?;
        info!(disk1 = n1, disk2 = n2, "simulated double disk failure");
        Ok(())
    }

    /// Rebuild every file's missing shard onto disk `node` and mark it
    /// healthy again
    ///
    /// For each known file the surviving disks are consulted; a missing
    /// data shard is reconstructed from P, a missing parity is recomputed
    /// from the data shards. Files with nothing missing are skipped, so
    /// repeated recovery is a no-op.
    pub fn recover_single(&self, node: usize) -> Result<()> {
        let mut state = self.state.lock();
        state.check_disk_index(node)?;

        let names = state.file_names.clone();
        for name in &names {
            state.recover_file_single(node, name)?;
        }

        state.disks[node].set_healthy(true);
        info!(disk = node, files = names.len(), "disk recovered");
        Ok(())
    }

    /// Rebuild the shards lost to a double failure and mark both disks
    /// healthy again
    ///
    /// Per file, the missing shard ids are listed parities first (−2, then
    /// −1, then data ids ascending); `n1` receives the first entry and `n2`
    /// the second, so recovery is deterministic for a given on-disk state.
    pub fn recover_double(&self, n1: usize, n2: usize) -> Result<()> {
        let mut state = self.state.lock();
        state.check_disk_index(n1)?;
        state.check_disk_index(n2)?;
        if n1 == n2 {
            return Err(Error::InvalidConfig(
                "double recovery requires two distinct disks".to_string(),
            ));
        }

        let names = state.file_names.clone();
        for name in &names {
            state.recover_file_double(n1, n2, name)?;
        }

        state.disks[n1].set_healthy(true);
        state.disks[n2].set_healthy(true);
        info!(
            disk1 = n1,
            disk2 = n2,
            files = names.len(),
            "double recovery complete"
        );
        Ok(())
    }

    /// Rebuild the known-file list from disk 0's directory
    ///
    /// Used after a process restart over an existing cluster footprint;
    /// disk 0 is assumed healthy.
    pub fn rescan(&self) -> Result<()> {
        let mut state = self.state.lock();
        let names = state.disks[0].list_file_names()?;
        state.file_names = names.into_iter().collect();
        debug!(files = state.file_names.len(), "rescanned file names");
        Ok(())
    }

    /// Names of the files written to this cluster
    pub fn file_names(&self) -> Vec<String> {
        self.state.lock().file_names.clone()
    }

    /// Number of files known to the cluster
    pub fn file_count(&self) -> usize {
        self.state.lock().file_names.len()
    }

    /// Number of disks in the array
    pub fn disk_count(&self) -> usize {
        self.state.lock().disks.len()
    }

    /// Whether any disk is currently failed
    pub fn is_degraded(&self) -> bool {
        self.state.lock().disks.iter().any(|d| !d.is_healthy())
    }

    /// Availability flag of one disk
    pub fn disk_healthy(&self, node: usize) -> Result<bool> {
        let state = self.state.lock();
        state.check_disk_index(node)?;
        Ok(state.disks[node].is_healthy())
    }

    /// The `(disk index, shard id)` pairs a file occupies, in disk order
    pub fn shard_locations(&self, name: &str) -> Result<Vec<(usize, ShardId)>> {
        let state = self.state.lock();
        state.require_known(name)?;

        let k = state.disks.len() - 2;
        let mut locations = Vec::new();
        for disk in &state.disks {
            if let Some(shard_id) = holds_for_file(disk, name, k) {
                locations.push((disk.id(), shard_id));
            }
        }
        Ok(locations)
    }
}

impl ClusterState {
    fn is_known(&self, name: &str) -> bool {
        self.file_names.iter().any(|n| n == name)
    }

    fn require_known(&self, name: &str) -> Result<()> {
        if self.is_known(name) {
            Ok(())
        } else {
            Err(Error::UnknownFile(name.to_string()))
        }
    }

    fn check_disk_index(&self, node: usize) -> Result<()> {
        if node < self.disks.len() {
            Ok(())
        } else {
            Err(Error::DiskOutOfRange(node))
        }
    }

    fn failed_disks_excluding(&self, targets: &[usize]) -> usize {
        self.disks
            .iter()
            .filter(|d| !d.is_healthy() && !targets.contains(&d.id()))
            .count()
    }

    /// Two distinct disk indices, uniformly at random
    fn pick_parity_disks(&mut self) -> (usize, usize) {
        let n = self.disks.len();
        let p = self.rng.gen_range(0..n);
        let mut q = self.rng.gen_range(0..n - 1);
        if q >= p {
            q += 1;
        }
        (p, q)
    }

    /// Gather whatever the disks still hold for one file
    ///
    /// Each disk is probed for P, then Q, then the data shard ids; the
    /// first hit is what that disk holds. A disk that lost its shard
    /// contributes nothing.
    fn collect_shards(&self, name: &str) -> Result<FileShards> {
        let k = self.disks.len() - 2;
        let mut shards = FileShards {
            data: vec![None; k],
            p: None,
            q: None,
        };

        for disk in &self.disks {
            if shards.p.is_none() && disk.contains_shard(name, P_SHARD) {
                shards.p = Some(disk.read_shard(name, P_SHARD)?);
                continue;
            }
            if shards.q.is_none() && disk.contains_shard(name, Q_SHARD) {
                shards.q = Some(disk.read_shard(name, Q_SHARD)?);
                continue;
            }
            for j in 0..k {
                if shards.data[j].is_none() && disk.contains_shard(name, j as ShardId) {
                    shards.data[j] = Some(disk.read_shard(name, j as ShardId)?);
                    break;
                }
            }
        }

        Ok(shards)
    }

    /// Rebuild at most one missing shard of `name` onto disk `target`
    fn recover_file_single(&mut self, target: usize, name: &str) -> Result<()> {
        let mut shards = self.collect_shards(name)?;
        let size = shards.block_size(name)?;
        let missing = shards.missing_ids();

        let shard_id = match missing.as_slice() {
            [] => return Ok(()),
            [one] => *one,
            _ => return Err(Error::TooManyFailures),
        };

        let bytes = match shard_id {
            id if id >= 0 => {
                let p = shards.p.as_ref().ok_or_else(|| Error::ShardMissing {
                    file: name.to_string(),
                    shard_id: P_SHARD,
                })?;
                self.coder.recover_with_p(&mut shards.data, p, id as usize)?;
                shards.data[id as usize].take().unwrap_or_default()
            }
            P_SHARD => self.coder.parity_p(&shards.data)?,
            _ => self.coder.parity_q(&shards.data)?,
        };

        debug_assert_eq!(bytes.len(), size);
        self.write_recovered(target, name, shard_id, &bytes)
    }

    /// Rebuild the (up to two) missing shards of `name` onto `n1`/`n2`
    fn recover_file_double(&mut self, n1: usize, n2: usize, name: &str) -> Result<()> {
        let mut shards = self.collect_shards(name)?;
        shards.block_size(name)?;
        let missing = shards.missing_ids();

        let (first, second) = match missing.as_slice() {
            [] => return Ok(()),
            [_one] => {
                // Only one shard is gone; aim it at whichever target disk
                // holds nothing for this file.
                let k = self.disks.len() - 2;
                let target = if holds_for_file(&self.disks[n1], name, k).is_some() {
                    n2
                } else {
                    n1
                };
                return self.recover_file_single(target, name);
            }
            [first, second] => (*first, *second),
            _ => return Err(Error::TooManyFailures),
        };

        match (first, second) {
            // Both parities lost: recompute from the complete data set
            (Q_SHARD, P_SHARD) => {
                let q = self.coder.parity_q(&shards.data)?;
                let p = self.coder.parity_p(&shards.data)?;
                self.write_recovered(n1, name, Q_SHARD, &q)?;
                self.write_recovered(n2, name, P_SHARD, &p)?;
            }
            // Q plus a data shard: rebuild the data from P, then recompute Q
            (Q_SHARD, j) => {
                let p = shards.p.as_ref().ok_or_else(|| Error::ShardMissing {
                    file: name.to_string(),
                    shard_id: P_SHARD,
                })?;
                self.coder.recover_with_p(&mut shards.data, p, j as usize)?;
                let q = self.coder.parity_q(&shards.data)?;
                let block = shards.data[j as usize].take().unwrap_or_default();
                self.write_recovered(n1, name, Q_SHARD, &q)?;
                self.write_recovered(n2, name, j, &block)?;
            }
            // P plus a data shard: rebuild the data from Q, then recompute P
            (P_SHARD, j) => {
                let q = shards.q.as_ref().ok_or_else(|| Error::ShardMissing {
                    file: name.to_string(),
                    shard_id: Q_SHARD,
                })?;
                self.coder.recover_with_q(&mut shards.data, q, j as usize)?;
                let p = self.coder.parity_p(&shards.data)?;
                let block = shards.data[j as usize].take().unwrap_or_default();
                self.write_recovered(n1, name, P_SHARD, &p)?;
                self.write_recovered(n2, name, j, &block)?;
            }
            // Two data shards: solve the P/Q system for both
            (j1, j2) => {
                let p = shards.p.as_ref().ok_or_else(|| Error::ShardMissing {
                    file: name.to_string(),
                    shard_id: P_SHARD,
                })?;
                let q = shards.q.as_ref().ok_or_else(|| Error::ShardMissing {
                    file: name.to_string(),
                    shard_id: Q_SHARD,
                })?;
                self.coder
                    .recover_two(&mut shards.data, p, q, j1 as usize, j2 as usize)?;
                let block1 = shards.data[j1 as usize].take().unwrap_or_default();
                let block2 = shards.data[j2 as usize].take().unwrap_or_default();
                self.write_recovered(n1, name, j1, &block1)?;
                self.write_recovered(n2, name, j2, &block2)?;
            }
        }
        Ok(())
    }

    fn write_recovered(
        &self,
        target: usize,
        name: &str,
        shard_id: ShardId,
        bytes: &[u8],
    ) -> Result<()> {
        self.disks[target]
            .write_shard(name, shard_id, bytes)
            .map_err(|err| Error::RecoveryFailed {
                file: name.to_string(),
                reason: err.to_string(),
            })?;
        debug!(
            file = name,
            shard_id,
            disk = target,
            "reconstructed shard written"
        );
        Ok(())
    }
}

/// The shard id a disk holds for one file, if any
///
/// Probes P, then Q, then the data ids; a disk holds at most one shard per
/// file.
fn holds_for_file(disk: &Disk, name: &str, k: usize) -> Option<ShardId> {
    if disk.contains_shard(name, P_SHARD) {
        return Some(P_SHARD);
    }
    if disk.contains_shard(name, Q_SHARD) {
        return Some(Q_SHARD);
    }
    (0..k as ShardId).find(|&j| disk.contains_shard(name, j))
}

/// Split a payload into `k` equal blocks, zero-padding the tail
fn split_payload(data: &[u8], k: usize) -> Vec<Vec<u8>> {
    let block_size = data.len().div_ceil(k);
    let mut blocks = Vec::with_capacity(k);
    for j in 0..k {
        let start = (j * block_size).min(data.len());
        let end = ((j + 1) * block_size).min(data.len());
        let mut block = vec![0u8; block_size];
        block[..end - start].copy_from_slice(&data[start..end]);
        blocks.push(block);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cluster(disks: usize) -> (TempDir, Cluster) {
        let dir = TempDir::new().unwrap();
        let config = Config::new(disks, dir.path()).with_parity_seed(7);
        let cluster = Cluster::new(&config).unwrap();
        (dir, cluster)
    }

    #[test]
    fn test_split_payload() {
        let blocks = split_payload(b"this_is_a_test_file_data", 6);
        assert_eq!(blocks.len(), 6);
        assert_eq!(blocks[0], b"this");
        assert_eq!(blocks[5], b"data");

        // Short payload pads out with zeros
        let blocks = split_payload(b"x", 6);
        assert_eq!(blocks[0], b"x");
        for block in &blocks[1..] {
            assert_eq!(block, &vec![0u8]);
        }
    }

    #[test]
    fn test_write_read_roundtrip() {
        let (_dir, cluster) = test_cluster(8);
        cluster
            .write_file("a.txt", b"this_is_a_test_file_data")
            .unwrap();
        assert_eq!(cluster.read_file("a.txt").unwrap(), b"this_is_a_test_file_data");
    }

    #[test]
    fn test_write_rejects_empty_and_duplicate() {
        let (_dir, cluster) = test_cluster(8);
        assert!(matches!(
            cluster.write_file("a.txt", b""),
            Err(Error::EmptyInput)
        ));

        cluster.write_file("a.txt", b"data").unwrap();
        assert!(matches!(
            cluster.write_file("a.txt", b"other"),
            Err(Error::DuplicateFile(_))
        ));
    }

    #[test]
    fn test_read_unknown_file() {
        let (_dir, cluster) = test_cluster(8);
        assert!(matches!(
            cluster.read_file("nope"),
            Err(Error::UnknownFile(_))
        ));
    }

    #[test]
    fn test_read_degraded_cluster() {
        let (_dir, cluster) = test_cluster(8);
        cluster.write_file("a.txt", b"data").unwrap();
        cluster.simulate_failure(2).unwrap();
        assert!(matches!(
            cluster.read_file("a.txt"),
            Err(Error::DegradedCluster { disk: 2 })
        ));
    }

    #[test]
    fn test_every_file_has_full_shard_set() {
        let (_dir, cluster) = test_cluster(8);
        cluster.write_file("a.txt", b"some file contents").unwrap();

        let mut ids: Vec<ShardId> = cluster
            .shard_locations("a.txt")
            .unwrap()
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![-2, -1, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_single_failure_recovery_every_disk() {
        let (_dir, cluster) = test_cluster(8);
        cluster
            .write_file("a.txt", b"this_is_a_test_file_data")
            .unwrap();

        for node in 0..8 {
            cluster.simulate_failure(node).unwrap();
            cluster.recover_single(node).unwrap();
            assert!(cluster.disk_healthy(node).unwrap());
            assert_eq!(
                cluster.read_file("a.txt").unwrap(),
                b"this_is_a_test_file_data"
            );
        }
    }

    #[test]
    fn test_double_failure_recovery_every_pair() {
        let (_dir, cluster) = test_cluster(6);
        for i in 0..5 {
            cluster
                .write_file(&format!("file{}", i), format!("contents number {}", i).as_bytes())
                .unwrap();
        }

        for n1 in 0..6 {
            for n2 in 0..6 {
                if n1 == n2 {
                    continue;
                }
                cluster.simulate_double_failure(n1, n2).unwrap();
                cluster.recover_double(n1, n2).unwrap();
                for i in 0..5 {
                    assert_eq!(
                        cluster.read_file(&format!("file{}", i)).unwrap(),
                        format!("contents number {}", i).as_bytes()
                    );
                }
            }
        }
    }

    #[test]
    fn test_update_preserves_placement() {
        let (_dir, cluster) = test_cluster(8);
        cluster.write_file("a.txt", b"first contents here").unwrap();
        let before = cluster.shard_locations("a.txt").unwrap();

        cluster
            .update_file("a.txt", b"second, rather longer, contents")
            .unwrap();
        let after = cluster.shard_locations("a.txt").unwrap();

        assert_eq!(before, after);
        assert_eq!(
            cluster.read_file("a.txt").unwrap(),
            b"second, rather longer, contents"
        );
    }

    #[test]
    fn test_update_unknown_and_empty() {
        let (_dir, cluster) = test_cluster(8);
        assert!(matches!(
            cluster.update_file("nope", b"data"),
            Err(Error::UnknownFile(_))
        ));
        cluster.write_file("a.txt", b"data").unwrap();
        assert!(matches!(
            cluster.update_file("a.txt", b""),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_recovery_is_idempotent() {
        let (_dir, cluster) = test_cluster(8);
        cluster.write_file("a.txt", b"idempotency check").unwrap();

        cluster.simulate_failure(1).unwrap();
        cluster.recover_single(1).unwrap();
        cluster.recover_single(1).unwrap();

        assert_eq!(cluster.read_file("a.txt").unwrap(), b"idempotency check");
        let mut ids: Vec<ShardId> = cluster
            .shard_locations("a.txt")
            .unwrap()
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_third_failure_rejected() {
        let (_dir, cluster) = test_cluster(8);
        cluster.write_file("a.txt", b"data").unwrap();
        cluster.simulate_double_failure(0, 1).unwrap();
        assert!(matches!(
            cluster.simulate_failure(2),
            Err(Error::TooManyFailures)
        ));
    }

    #[test]
    fn test_invalid_disk_arguments() {
        let (_dir, cluster) = test_cluster(8);
        assert!(matches!(
            cluster.simulate_failure(8),
            Err(Error::DiskOutOfRange(8))
        ));
        assert!(matches!(
            cluster.simulate_double_failure(3, 3),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            cluster.recover_double(2, 2),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rescan_rebuilds_file_list() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(8, dir.path()).with_parity_seed(7);

        {
            let cluster = Cluster::new(&config).unwrap();
            cluster.write_file("a.txt", b"one").unwrap();
            cluster.write_file("b.txt", b"two").unwrap();
        }

        // A fresh cluster over the same footprint knows nothing until rescan
        let cluster = Cluster::new(&config).unwrap();
        assert_eq!(cluster.file_count(), 0);
        cluster.rescan().unwrap();

        let mut names = cluster.file_names();
        names.sort();
        assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);
        assert_eq!(cluster.read_file("a.txt").unwrap(), b"one");
    }
}
