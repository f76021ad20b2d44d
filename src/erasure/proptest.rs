//! Property-based tests for the GF(2^8) field and the coder
//!
//! Systematically verifies the field laws and the reconstruction
//! identities across randomized inputs.

#![cfg(test)]

use proptest::prelude::*;

use super::coder::Coder;
use super::gf::GfTables;

fn block_set_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    // 2..=10 shards of one shared length 1..=64
    (2usize..=10, 1usize..=64).prop_flat_map(|(k, size)| {
        prop::collection::vec(prop::collection::vec(any::<u8>(), size), k)
    })
}

proptest! {
    #[test]
    fn add_laws(a: u8, b: u8, c: u8) {
        let gf = GfTables::new();
        prop_assert_eq!(gf.add(a, b), gf.add(b, a));
        prop_assert_eq!(gf.add(gf.add(a, b), c), gf.add(a, gf.add(b, c)));
        prop_assert_eq!(gf.add(a, 0), a);
        prop_assert_eq!(gf.add(a, a), 0);
    }

    #[test]
    fn mul_laws(a: u8, b: u8, c: u8) {
        let gf = GfTables::new();
        prop_assert_eq!(gf.mul(a, b), gf.mul(b, a));
        prop_assert_eq!(gf.mul(gf.mul(a, b), c), gf.mul(a, gf.mul(b, c)));
        prop_assert_eq!(gf.mul(a, 1), a);
    }

    #[test]
    fn mul_distributes_over_add(a: u8, b: u8, c: u8) {
        let gf = GfTables::new();
        prop_assert_eq!(
            gf.mul(a, gf.add(b, c)),
            gf.add(gf.mul(a, b), gf.mul(a, c))
        );
    }

    #[test]
    fn div_inverts_mul(a: u8, b in 1u8..) {
        let gf = GfTables::new();
        prop_assert_eq!(gf.div(gf.mul(a, b), b).unwrap(), a);
    }

    #[test]
    fn inverse_is_reciprocal(a in 1u8..) {
        let gf = GfTables::new();
        prop_assert_eq!(gf.mul(a, gf.inverse(a)), 1);
    }

    #[test]
    fn any_two_losses_recoverable(blocks in block_set_strategy(), seed: u64) {
        let coder = Coder::new();
        let (p, q) = coder.parity(&blocks).unwrap();

        let k = blocks.len();
        let m1 = (seed as usize) % k;
        let m2 = (seed as usize / k) % k;

        let mut survivors: Vec<Option<Vec<u8>>> =
            blocks.iter().cloned().map(Some).collect();
        survivors[m1] = None;
        survivors[m2] = None;

        if m1 == m2 {
            coder.recover_with_p(&mut survivors, &p, m1).unwrap();
        } else {
            coder.recover_two(&mut survivors, &p, &q, m1, m2).unwrap();
        }

        for (recovered, original) in survivors.iter().zip(blocks.iter()) {
            prop_assert_eq!(recovered.as_ref().unwrap(), original);
        }
    }
}
