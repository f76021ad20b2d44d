//! RAID-6 parity computation and shard reconstruction
//!
//! The coder derives the P and Q parity shards from the data shards and
//! rebuilds any one or two missing shards from the survivors. P is the plain
//! XOR of the data shards; Q weights data shard `j` by `g^j` before XORing.
//! Data shards are passed as `Option` slots so a caller can hand over exactly
//! what survived; `None` entries are skipped in every sum.

use crate::erasure::gf::{GfTables, FIELD_SIZE};
use crate::error::{Error, Result};

/// Reed-Solomon coder over GF(2^8) with generator 2
#[derive(Debug, Clone, Default)]
pub struct Coder {
    gf: GfTables,
}

impl Coder {
    /// Create a coder with freshly built field tables
    pub fn new() -> Self {
        Self { gf: GfTables::new() }
    }

    /// Compute the P and Q parity shards for a complete data shard set
    ///
    /// All shards must share one length; the returned parities have the same
    /// length.
    pub fn parity(&self, data: &[Vec<u8>]) -> Result<(Vec<u8>, Vec<u8>)> {
        let size = uniform_len(data.iter().map(|b| b.as_slice()))?;
        check_shard_count(data.len())?;

        let mut p = vec![0u8; size];
        let mut q = vec![0u8; size];
        for i in 0..size {
            let mut ps = 0u8;
            let mut qs = 0u8;
            for (j, block) in data.iter().enumerate() {
                ps = self.gf.add(ps, block[i]);
                qs = self.gf.add(qs, self.gf.mul(self.gf.pow(j as i64), block[i]));
            }
            p[i] = ps;
            q[i] = qs;
        }
        Ok((p, q))
    }

    /// Recompute the P parity by XORing the present data shards
    pub fn parity_p(&self, data: &[Option<Vec<u8>>]) -> Result<Vec<u8>> {
        let size = uniform_len(present(data))?;

        let mut p = vec![0u8; size];
        for i in 0..size {
            let mut ps = 0u8;
            for block in data.iter().flatten() {
                ps = self.gf.add(ps, block[i]);
            }
            p[i] = ps;
        }
        Ok(p)
    }

    /// Recompute the Q parity from the present data shards
    pub fn parity_q(&self, data: &[Option<Vec<u8>>]) -> Result<Vec<u8>> {
        let size = uniform_len(present(data))?;

        let mut q = vec![0u8; size];
        for i in 0..size {
            let mut qs = 0u8;
            for (j, block) in data.iter().enumerate() {
                if let Some(block) = block {
                    qs = self.gf.add(qs, self.gf.mul(self.gf.pow(j as i64), block[i]));
                }
            }
            q[i] = qs;
        }
        Ok(q)
    }

    /// Rebuild the data shard at `missing` from P and the surviving data
    /// shards, storing the new buffer into `data[missing]`
    pub fn recover_with_p(
        &self,
        data: &mut [Option<Vec<u8>>],
        p: &[u8],
        missing: usize,
    ) -> Result<()> {
        let size = p.len();
        check_survivors(data, missing, size)?;

        let mut out = vec![0u8; size];
        for i in 0..size {
            let mut acc = p[i];
            for (j, block) in data.iter().enumerate() {
                if j == missing {
                    continue;
                }
                if let Some(block) = block {
                    acc = self.gf.add(acc, block[i]);
                }
            }
            out[i] = acc;
        }
        data[missing] = Some(out);
        Ok(())
    }

    /// Rebuild the data shard at `missing` from Q and the surviving data
    /// shards: strip the survivors' contributions, then divide by `g^missing`
    pub fn recover_with_q(
        &self,
        data: &mut [Option<Vec<u8>>],
        q: &[u8],
        missing: usize,
    ) -> Result<()> {
        let size = q.len();
        check_survivors(data, missing, size)?;

        let weight = self.gf.pow(missing as i64);
        let mut out = vec![0u8; size];
        for i in 0..size {
            let mut acc = q[i];
            for (j, block) in data.iter().enumerate() {
                if j == missing {
                    continue;
                }
                if let Some(block) = block {
                    acc = self.gf.add(acc, self.gf.mul(self.gf.pow(j as i64), block[i]));
                }
            }
            out[i] = self.gf.div(acc, weight)?;
        }
        data[missing] = Some(out);
        Ok(())
    }

    /// Rebuild two missing data shards from P and Q
    ///
    /// Solves, per byte position, the linear system
    /// `D_m1 + D_m2 = p'` and `g^m1·D_m1 + g^m2·D_m2 = q'`
    /// where `p'`/`q'` are the parities with the survivors' contributions
    /// removed. Requires `m1 != m2`.
    pub fn recover_two(
        &self,
        data: &mut [Option<Vec<u8>>],
        p: &[u8],
        q: &[u8],
        m1: usize,
        m2: usize,
    ) -> Result<()> {
        let size = p.len();
        if q.len() != size {
            return Err(Error::ShardLengthMismatch {
                expected: size,
                found: q.len(),
            });
        }
        check_survivors(data, m1, size)?;
        check_survivors(data, m2, size)?;

        let x = self.gf.pow(m1 as i64);
        let y = self.gf.pow(m2 as i64);
        // Non-zero whenever m1 != m2; div() rejects the degenerate case
        let diff = self.gf.add(x, y);

        let mut out1 = vec![0u8; size];
        let mut out2 = vec![0u8; size];
        for i in 0..size {
            let mut ps = p[i];
            let mut qs = q[i];
            for (j, block) in data.iter().enumerate() {
                if j == m1 || j == m2 {
                    continue;
                }
                if let Some(block) = block {
                    ps = self.gf.add(ps, block[i]);
                    qs = self.gf.add(qs, self.gf.mul(self.gf.pow(j as i64), block[i]));
                }
            }
            let d2 = self.gf.div(self.gf.add(qs, self.gf.mul(x, ps)), diff)?;
            let d1 = self.gf.add(ps, d2);
            out1[i] = d1;
            out2[i] = d2;
        }
        data[m1] = Some(out1);
        data[m2] = Some(out2);
        Ok(())
    }
}

/// Iterate the present shard buffers of an `Option` slice
fn present(data: &[Option<Vec<u8>>]) -> impl Iterator<Item = &[u8]> {
    data.iter().flatten().map(|b| b.as_slice())
}

/// Common length of a non-empty set of shard buffers
fn uniform_len<'a>(mut blocks: impl Iterator<Item = &'a [u8]>) -> Result<usize> {
    let size = match blocks.next() {
        Some(first) => first.len(),
        None => return Ok(0),
    };
    for block in blocks {
        if block.len() != size {
            return Err(Error::ShardLengthMismatch {
                expected: size,
                found: block.len(),
            });
        }
    }
    Ok(size)
}

/// Validate survivors against the expected block size before reconstruction
fn check_survivors(data: &[Option<Vec<u8>>], missing: usize, size: usize) -> Result<()> {
    check_shard_count(data.len())?;
    if missing >= data.len() {
        return Err(Error::InvalidConfig(format!(
            "missing shard index {} out of {} data shards",
            missing,
            data.len()
        )));
    }
    for block in data.iter().flatten() {
        if block.len() != size {
            return Err(Error::ShardLengthMismatch {
                expected: size,
                found: block.len(),
            });
        }
    }
    Ok(())
}

/// Each data shard index must map to a distinct non-zero power of g
fn check_shard_count(count: usize) -> Result<()> {
    if count >= FIELD_SIZE {
        return Err(Error::InvalidConfig(format!(
            "{} data shards exceed the {} distinct field generators",
            count, FIELD_SIZE
        )));
    }
    Ok(())
}
