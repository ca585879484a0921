use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use hmac_sha256_core::{DrbgHMAC, Hash, HMAC};

pub fn bench_hash(c: &mut Criterion) {
    c.bench_function("sha256 1 KiB", |b| {
        b.iter(|| Hash::hash(black_box(&[0u8; 1024])))
    });
}

pub fn bench_mac(c: &mut Criterion) {
    c.bench_function("hmac-sha256 64 bytes", |b| {
        b.iter(|| HMAC::mac(black_box(&[0u8; 64]), black_box(&[0u8; 32])))
    });
    c.bench_function("hmac-sha256 1 KiB", |b| {
        b.iter(|| HMAC::mac(black_box(&[0u8; 1024]), black_box(&[0u8; 32])))
    });
}

pub fn bench_reinit(c: &mut Criterion) {
    c.bench_function("hmac-sha256 reinit + 64 bytes", |b| {
        let mut st = HMAC::new([7u8; 32]);
        b.iter(|| {
            st.reinit();
            st.update(black_box(&[0u8; 64]));
            st.finalize()
        })
    });
}

pub fn bench_rekey(c: &mut Criterion) {
    c.bench_function("hmac-sha256 rekey", |b| {
        let mut st = DrbgHMAC::new(&[7u8; 32]);
        b.iter(|| {
            st.update(black_box(&[0u8; 32]));
            st.rekey();
        })
    });
}

criterion_group!(benches, bench_hash, bench_mac, bench_reinit, bench_rekey);
criterion_main!(benches);
