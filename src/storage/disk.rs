//! Directory-backed storage disk
//!
//! Each disk owns one directory and stores shards as raw block files named
//! `<fileName>_<shardId>.bin`. An availability flag models disk loss: a
//! corrupted disk keeps its (emptied) directory but is marked unhealthy
//! until a recovery rewrites its shards.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::ShardId;

/// A simulated disk holding shard files under one directory
#[derive(Debug)]
pub struct Disk {
    id: usize,
    root: PathBuf,
    healthy: bool,
}

impl Disk {
    /// Create a disk rooted at `root`, creating the directory if needed
    pub fn new(id: usize, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            id,
            root,
            healthy: true,
        })
    }

    /// Index of this disk within the cluster
    pub fn id(&self) -> usize {
        self.id
    }

    /// Directory backing this disk
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Whether the disk is available
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    pub(crate) fn set_healthy(&mut self, healthy: bool) {
        self.healthy = healthy;
    }

    fn shard_path(&self, file: &str, shard_id: ShardId) -> PathBuf {
        self.root.join(format!("{}_{}.bin", file, shard_id))
    }

    /// Check whether this disk holds the given shard
    pub fn contains_shard(&self, file: &str, shard_id: ShardId) -> bool {
        self.shard_path(file, shard_id).is_file()
    }

    /// Read a whole shard file
    pub fn read_shard(&self, file: &str, shard_id: ShardId) -> Result<Vec<u8>> {
        match fs::read(self.shard_path(file, shard_id)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(Error::ShardMissing {
                file: file.to_string(),
                shard_id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the shard file's contents with `bytes`
    ///
    /// The bytes land in a temporary file that is renamed over the target,
    /// so prior contents of any length are discarded in one step and a
    /// partial write never leaves a wrong-length shard behind.
    pub fn write_shard(&self, file: &str, shard_id: ShardId, bytes: &[u8]) -> Result<()> {
        let path = self.shard_path(file, shard_id);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Distinct file names present on this disk
    ///
    /// Parses entries named `<fileName>_<idToken>.bin`, splitting at the
    /// last underscore; the id token never contains one.
    pub fn list_file_names(&self) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some((file, _)) = parse_shard_file_name(name) {
                names.insert(file.to_string());
            }
        }
        Ok(names)
    }

    /// Mark the disk failed and delete everything it stores
    pub fn corrupt(&mut self) -> Result<()> {
        self.healthy = false;
        for entry in fs::read_dir(&self.root)? {
            fs::remove_file(entry?.path())?;
        }
        debug!(disk = self.id, "disk corrupted, contents wiped");
        Ok(())
    }
}

/// Split `<fileName>_<idToken>.bin` into file name and id token
fn parse_shard_file_name(name: &str) -> Option<(&str, &str)> {
    let stem = name.strip_suffix(".bin")?;
    let (file, id) = stem.rsplit_once('_')?;
    if file.is_empty() || id.is_empty() {
        return None;
    }
    Some((file, id))
}
