//! Fixed-length hashed descriptor used as policy network input.
//!
//! Every character n-gram of the molecule string with a length between
//! `min_radius` and `max_radius` is hashed with FNV-1a and mapped onto
//! `bits_per_feature` positions of a `length`-bit vector. The hash is stable
//! across processes, which the network weights depend on.

use crate::chemistry::molecule::Molecule;
use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedFingerprint {
    pub length: usize,
    pub min_radius: usize,
    pub max_radius: usize,
    pub bits_per_feature: usize,
}

impl Default for HashedFingerprint {
    fn default() -> Self {
        Self {
            length: 4096,
            min_radius: 2,
            max_radius: 4,
            bits_per_feature: 4,
        }
    }
}

impl HashedFingerprint {
    /// Sorted, deduplicated indices of the set bits.
    pub fn active_bits(&self, molecule: &Molecule) -> Vec<usize> {
        if self.length == 0 {
            return Vec::new();
        }
        let chars: Vec<char> = molecule.as_str().chars().collect();
        let mut bits = Vec::new();

        for radius in self.min_radius.max(1)..=self.max_radius {
            if radius > chars.len() {
                break;
            }
            for window in chars.windows(radius) {
                let mut hash = fnv1a(window);
                for _ in 0..self.bits_per_feature {
                    bits.push((hash % self.length as u64) as usize);
                    hash = hash.wrapping_mul(FNV_PRIME) ^ (hash >> 29);
                }
            }
        }

        bits.sort_unstable();
        bits.dedup();
        bits
    }

    /// Dense 0/1 vector of `length` entries.
    pub fn dense(&self, molecule: &Molecule) -> Vec<f32> {
        let mut dense = vec![0.0f32; self.length];
        for bit in self.active_bits(molecule) {
            dense[bit] = 1.0;
        }
        dense
    }
}

fn fnv1a(window: &[char]) -> u64 {
    let mut hash = FNV_OFFSET;
    for ch in window {
        let mut buf = [0u8; 4];
        for byte in ch.encode_utf8(&mut buf).bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}
