//! A small, self-contained HMAC-SHA256 implementation with streaming, key
//! reuse, and in-place rekeying, for constrained environments.
//!
//! The MAC state owns a single block-sized key buffer and one embedded hash
//! engine; nothing is allocated. Between operations the buffer holds the raw
//! zero-padded key, so after [`HMAC::finalize`] a call to [`HMAC::reinit`]
//! authenticates the next message without repeating key setup. [`DrbgHMAC`]
//! restricts the key to exactly [`Hash::DIGEST_SIZE`] bytes and adds
//! [`DrbgHMAC::rekey`], the finalize-and-rekey step an HMAC-DRBG uses to
//! advance its key without scratch storage.

#![no_std]
#![allow(clippy::unreadable_literal)]

const IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const ROUND_K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

#[inline(always)]
fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[inline(always)]
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline(always)]
fn ch(e: u32, f: u32, g: u32) -> u32 {
    (e & f) ^ (!e & g)
}

#[inline(always)]
fn maj(a: u32, b: u32, c: u32) -> u32 {
    (a & b) ^ (a & c) ^ (b & c)
}

#[cfg_attr(feature = "opt_size", inline(never))]
fn compress(state: &mut [u32; 8], block: &[u8; 64]) {
    let mut w = [0u32; 64];
    for (i, e) in w[..16].iter_mut().enumerate() {
        *e = u32::from_be_bytes(block[i * 4..i * 4 + 4].try_into().unwrap());
    }
    for i in 16..64 {
        w[i] = small_sigma1(w[i - 2])
            .wrapping_add(w[i - 7])
            .wrapping_add(small_sigma0(w[i - 15]))
            .wrapping_add(w[i - 16]);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;
    for i in 0..64 {
        let t1 = h
            .wrapping_add(big_sigma1(e))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(ROUND_K[i])
            .wrapping_add(w[i]);
        let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));
        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
    state[4] = state[4].wrapping_add(e);
    state[5] = state[5].wrapping_add(f);
    state[6] = state[6].wrapping_add(g);
    state[7] = state[7].wrapping_add(h);
}

/// Incremental SHA-256.
#[derive(Copy, Clone)]
pub struct Hash {
    state: [u32; 8],
    buf: [u8; 64],
    fill: usize,
    len: u64,
}

impl Hash {
    /// Input block size in bytes.
    pub const BLOCK_SIZE: usize = 64;
    /// Digest size in bytes.
    pub const DIGEST_SIZE: usize = 32;

    pub fn new() -> Hash {
        Hash {
            state: IV,
            buf: [0u8; 64],
            fill: 0,
            len: 0,
        }
    }

    fn _update(&mut self, input: impl AsRef<[u8]>) {
        let mut input = input.as_ref();
        self.len = self.len.wrapping_add(input.len() as u64);
        if self.fill > 0 {
            let take = core::cmp::min(Self::BLOCK_SIZE - self.fill, input.len());
            self.buf[self.fill..self.fill + take].copy_from_slice(&input[..take]);
            self.fill += take;
            input = &input[take..];
            if self.fill == Self::BLOCK_SIZE {
                compress(&mut self.state, &self.buf);
                self.fill = 0;
            }
        }
        while input.len() >= Self::BLOCK_SIZE {
            compress(&mut self.state, input[..Self::BLOCK_SIZE].try_into().unwrap());
            input = &input[Self::BLOCK_SIZE..];
        }
        if !input.is_empty() {
            self.buf[..input.len()].copy_from_slice(input);
            self.fill = input.len();
        }
    }

    /// Absorb content
    pub fn update(&mut self, input: impl AsRef<[u8]>) {
        self._update(input)
    }

    /// Compute SHA256(absorbed content)
    pub fn finalize(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.finalize_into(&mut out);
        out
    }

    /// Compute SHA256(absorbed content) into `out[..32]`
    pub fn finalize_into(mut self, out: &mut [u8]) {
        let bits = self.len << 3;
        self.buf[self.fill] = 0x80;
        for b in &mut self.buf[self.fill + 1..] {
            *b = 0;
        }
        if self.fill >= 56 {
            compress(&mut self.state, &self.buf);
            self.buf = [0u8; 64];
        }
        self.buf[56..].copy_from_slice(&bits.to_be_bytes());
        compress(&mut self.state, &self.buf);
        for (i, word) in self.state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
    }

    /// Compute SHA256(`input`)
    pub fn hash(input: &[u8]) -> [u8; 32] {
        let mut h = Hash::new();
        h.update(input);
        h.finalize()
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::new()
    }
}

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

// The rekey sequence splits the key block into digest-sized halves.
const _: () = assert!(Hash::BLOCK_SIZE == 2 * Hash::DIGEST_SIZE);

/// XOR `pad` into every byte of the key block. This is an involution:
/// applying the same pad twice restores the previous contents.
#[inline]
fn toggle_pad(key: &mut [u8; Hash::BLOCK_SIZE], pad: u8) {
    for b in key.iter_mut() {
        *b ^= pad;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    /// Raw key loaded, no hash phase in flight.
    Ready,
    /// Inner hash phase started, absorbing message bytes.
    Primed,
}

/// Streaming HMAC-SHA256 with a reusable key.
///
/// The key buffer holds the raw zero-padded key whenever control is outside
/// a method; the inner- and outer-padded forms only exist transiently, each
/// produced and undone by a paired XOR of the pad constant.
#[derive(Clone)]
pub struct HMAC {
    key: [u8; Hash::BLOCK_SIZE],
    ih: Hash,
    phase: Phase,
}

impl HMAC {
    /// Load `k` and prime the state for absorption.
    ///
    /// Keys longer than [`Hash::BLOCK_SIZE`] bytes are replaced by their
    /// digest; shorter keys are zero-padded.
    pub fn new(k: impl AsRef<[u8]>) -> HMAC {
        let k = k.as_ref();
        let mut st = HMAC {
            key: [0u8; Hash::BLOCK_SIZE],
            ih: Hash::new(),
            phase: Phase::Ready,
        };
        if k.len() > Hash::BLOCK_SIZE {
            let mut h = Hash::new();
            h.update(k);
            h.finalize_into(&mut st.key[..Hash::DIGEST_SIZE]);
        } else {
            st.key[..k.len()].copy_from_slice(k);
        }
        st.reinit();
        st
    }

    /// Prime a fresh inner hash phase over the current key.
    ///
    /// May be called repeatedly to authenticate successive messages under
    /// the same key without repeating key setup.
    pub fn reinit(&mut self) {
        toggle_pad(&mut self.key, IPAD);
        self.ih = Hash::new();
        self.ih.update(&self.key);
        toggle_pad(&mut self.key, IPAD);
        self.phase = Phase::Primed;
    }

    /// Absorb content
    pub fn update(&mut self, input: impl AsRef<[u8]>) {
        debug_assert_eq!(self.phase, Phase::Primed, "update without reinit");
        self.ih.update(input);
    }

    /// Compute the tag over everything absorbed since the last prime.
    ///
    /// The raw key stays loaded; call [`HMAC::reinit`] before absorbing the
    /// next message.
    pub fn finalize(&mut self) -> [u8; 32] {
        debug_assert_eq!(self.phase, Phase::Primed, "finalize without reinit");
        let inner = self.ih.finalize();
        toggle_pad(&mut self.key, OPAD);
        let mut oh = Hash::new();
        oh.update(&self.key);
        oh.update(inner);
        toggle_pad(&mut self.key, OPAD);
        self.phase = Phase::Ready;
        oh.finalize()
    }

    /// Compute HMAC-SHA256(`input`, `k`)
    pub fn mac(input: impl AsRef<[u8]>, k: impl AsRef<[u8]>) -> [u8; 32] {
        let mut st = HMAC::new(k);
        st.update(input);
        st.finalize()
    }

    /// Compute HMAC-SHA256(`input`, `k`) and compare it against `expected`
    /// in constant time.
    pub fn verify(input: impl AsRef<[u8]>, k: impl AsRef<[u8]>, expected: &[u8; 32]) -> bool {
        let tag = HMAC::mac(input, k);
        let mut acc = 0u8;
        for (a, b) in tag.iter().zip(expected.iter()) {
            acc |= a ^ b;
        }
        acc == 0
    }
}

/// Streaming HMAC-SHA256 whose key is always exactly [`Hash::DIGEST_SIZE`]
/// bytes, the form an HMAC-DRBG keeps its internal key in.
///
/// Construction from `&[u8; 32]` and rekeying only through [`DrbgHMAC::rekey`]
/// guarantee the key occupies the first half of the key buffer with the
/// second half zero, which the rekey sequence relies on.
#[derive(Clone)]
pub struct DrbgHMAC {
    st: HMAC,
}

impl DrbgHMAC {
    /// Load `k` and prime the state for absorption.
    pub fn new(k: &[u8; Hash::DIGEST_SIZE]) -> DrbgHMAC {
        DrbgHMAC { st: HMAC::new(k) }
    }

    /// Prime a fresh inner hash phase over the current key.
    pub fn reinit(&mut self) {
        self.st.reinit();
    }

    /// Absorb content
    pub fn update(&mut self, input: impl AsRef<[u8]>) {
        self.st.update(input);
    }

    /// Compute the tag over everything absorbed since the last prime.
    pub fn finalize(&mut self) -> [u8; 32] {
        self.st.finalize()
    }

    /// Replace the key with the MAC of everything absorbed since the last
    /// prime, then re-prime under the new key.
    ///
    /// Runs entirely inside the key buffer: its halves serve as scratch for
    /// the outer-padded key and the inner digest, so no key material exists
    /// outside the state at any point.
    pub fn rekey(&mut self) {
        debug_assert_eq!(self.st.phase, Phase::Primed, "rekey without reinit");
        const D: usize = Hash::DIGEST_SIZE;

        // Outer-pad the block; the second half was zero and is now literal
        // opad bytes.
        toggle_pad(&mut self.st.key, OPAD);

        // Close the inner phase into the second half of the block.
        let ih = self.st.ih;
        ih.finalize_into(&mut self.st.key[D..]);

        let mut oh = Hash::new();
        // First half of the outer-padded key.
        oh.update(&self.st.key[..D]);
        // The second half of the outer-padded key is literal opad bytes;
        // rebuild them over the first half and feed those.
        self.st.key[..D].fill(OPAD);
        oh.update(&self.st.key[..D]);
        // Inner digest.
        oh.update(&self.st.key[D..]);

        // The outer digest is the new raw key.
        oh.finalize_into(&mut self.st.key[..D]);
        // Restore the zero padding for the new key.
        self.st.key[D..].fill(0);

        self.st.reinit();
    }
}

#[cfg(feature = "zeroize")]
mod zeroize_impls {
    use zeroize::Zeroize;

    use super::{DrbgHMAC, Hash, Phase, HMAC};

    impl Zeroize for Hash {
        fn zeroize(&mut self) {
            self.state.zeroize();
            self.buf.zeroize();
            self.fill.zeroize();
            self.len.zeroize();
        }
    }

    impl Zeroize for HMAC {
        fn zeroize(&mut self) {
            self.key.zeroize();
            self.ih.zeroize();
            self.phase = Phase::Ready;
        }
    }

    impl Zeroize for DrbgHMAC {
        fn zeroize(&mut self) {
            self.st.zeroize();
        }
    }
}

/// Wrapped `Hash` type for the `Digest` trait.
#[cfg(feature = "traits010")]
pub type WrappedHash = digest010::core_api::CoreWrapper<Hash>;

#[cfg(feature = "traits010")]
mod digest_trait010 {
    use core::fmt;

    use digest010::{
        block_buffer::Eager,
        const_oid::{AssociatedOid, ObjectIdentifier},
        consts::{U32, U64},
        core_api::{
            AlgorithmName, Block, BlockSizeUser, Buffer, BufferKindUser, FixedOutputCore,
            OutputSizeUser, Reset, UpdateCore,
        },
        FixedOutput, FixedOutputReset, HashMarker, Output, Update,
    };

    use super::Hash;

    impl AssociatedOid for Hash {
        const OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");
    }

    impl AlgorithmName for Hash {
        fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Sha256")
        }
    }

    impl HashMarker for Hash {}

    impl BufferKindUser for Hash {
        type BufferKind = Eager;
    }

    impl BlockSizeUser for Hash {
        type BlockSize = U64;
    }

    impl OutputSizeUser for Hash {
        type OutputSize = U32;
    }

    impl UpdateCore for Hash {
        #[inline]
        fn update_blocks(&mut self, blocks: &[Block<Self>]) {
            for block in blocks {
                self._update(block);
            }
        }
    }

    impl Update for Hash {
        #[inline]
        fn update(&mut self, data: &[u8]) {
            self._update(data);
        }
    }

    impl FixedOutputCore for Hash {
        fn finalize_fixed_core(&mut self, buffer: &mut Buffer<Self>, out: &mut Output<Self>) {
            self._update(buffer.get_data());
            let h = (*self).finalize();
            out.copy_from_slice(&h);
        }
    }

    impl FixedOutput for Hash {
        fn finalize_into(self, out: &mut Output<Self>) {
            let h = self.finalize();
            out.copy_from_slice(&h);
        }
    }

    impl Reset for Hash {
        fn reset(&mut self) {
            *self = Self::new()
        }
    }

    impl FixedOutputReset for Hash {
        fn finalize_into_reset(&mut self, out: &mut Output<Self>) {
            let h = (*self).finalize();
            out.copy_from_slice(&h);
            self.reset();
        }
    }
}

#[cfg(feature = "traits09")]
mod digest_trait09 {
    use digest09::consts::{U32, U64};
    use digest09::{BlockInput, FixedOutputDirty, Output, Reset, Update};

    use super::Hash;

    impl BlockInput for Hash {
        type BlockSize = U64;
    }

    impl Update for Hash {
        fn update(&mut self, input: impl AsRef<[u8]>) {
            self._update(input)
        }
    }

    impl FixedOutputDirty for Hash {
        type OutputSize = U32;

        fn finalize_into_dirty(&mut self, out: &mut Output<Self>) {
            let h = (*self).finalize();
            out.copy_from_slice(&h);
        }
    }

    impl Reset for Hash {
        fn reset(&mut self) {
            *self = Self::new()
        }
    }
}

#[test]
fn main() {
    let h = HMAC::mac([], [0u8; 32]);
    assert_eq!(
        &h[..],
        &[
            182, 19, 103, 154, 8, 20, 217, 236, 119, 47, 149, 215, 120, 195, 95, 197, 255, 22, 151,
            196, 147, 113, 86, 83, 198, 199, 18, 20, 66, 146, 197, 173
        ]
    );

    let h = HMAC::mac([42u8; 69], []);
    assert_eq!(
        &h[..],
        &[
            225, 88, 35, 8, 78, 185, 165, 6, 235, 124, 28, 250, 112, 124, 159, 119, 159, 88, 184,
            61, 7, 37, 166, 229, 71, 154, 83, 153, 151, 181, 182, 72
        ]
    );

    let h = HMAC::mac([69u8; 250], [42u8; 50]);
    assert_eq!(
        &h[..],
        &[
            112, 156, 120, 216, 86, 25, 79, 210, 155, 193, 32, 120, 116, 134, 237, 14, 198, 1, 64,
            41, 124, 196, 103, 91, 109, 216, 36, 133, 4, 234, 218, 228
        ]
    );

    let mut s = HMAC::new([42u8; 50]);
    s.update([69u8; 150]);
    s.update([69u8; 100]);
    let h = s.finalize();
    assert_eq!(
        &h[..],
        &[
            112, 156, 120, 216, 86, 25, 79, 210, 155, 193, 32, 120, 116, 134, 237, 14, 198, 1, 64,
            41, 124, 196, 103, 91, 109, 216, 36, 133, 4, 234, 218, 228
        ]
    );

    // The key survives finalize; reinit starts the next message.
    s.reinit();
    s.update([69u8; 250]);
    let h2 = s.finalize();
    assert_eq!(&h2[..], &h[..]);

    assert!(HMAC::verify([69u8; 250], [42u8; 50], &h));
    let mut bad = h;
    bad[17] ^= 1;
    assert!(!HMAC::verify([69u8; 250], [42u8; 50], &bad));
}
