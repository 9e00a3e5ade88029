//! Criterion micro-benchmarks for header decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn utf16(out: &mut Vec<u8>, s: &str) {
    out.extend(s.encode_utf16().flat_map(u16::to_le_bytes));
}

fn utf16_prefixed(out: &mut Vec<u8>, s: &str) {
    u32(out, s.encode_utf16().count() as u32);
    utf16(out, s);
}

fn ascii_prefixed(out: &mut Vec<u8>, s: &str) {
    u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

fn chunk(tag: &str, version: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(tag.as_bytes());
    u32(&mut out, version);
    u32(&mut out, body.len() as u32);
    u32(&mut out, 0);
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(body);
    out
}

fn player(name: &str, faction: &str) -> Vec<u8> {
    let mut body = Vec::new();
    utf16_prefixed(&mut body, name);
    u32(&mut body, 0);
    u32(&mut body, 0);
    ascii_prefixed(&mut body, faction);
    u32(&mut body, 0);
    u32(&mut body, 0);
    chunk("DATAINFO", 6, &body)
}

/// A replay buffer with an eight-player lobby and a run of chunks the
/// decoder skips structurally.
fn make_replay(skipped_chunks: usize) -> Vec<u8> {
    let mut data = Vec::new();
    u32(&mut data, 8);
    data.extend_from_slice(b"COH__REC");
    utf16(&mut data, "25.12.2023 14:30");
    data.extend_from_slice(&[0, 0]);
    data.resize(76, 0);
    data.extend_from_slice(b"Relic Chunky");
    u32(&mut data, 0);
    u32(&mut data, 3);
    u32(&mut data, 0);
    u32(&mut data, 96);
    data.resize(76 + 96, 0);
    data.extend_from_slice(b"Relic Chunky");
    u32(&mut data, 0);
    u32(&mut data, 3);
    u32(&mut data, 0);
    u32(&mut data, 28);

    let root1 = chunk("FOLDPOST", 1, &[]);

    let mut children = Vec::new();
    for i in 0..skipped_chunks {
        children.extend_from_slice(&chunk("DATAMISC", i as u32, &[0x5A; 96]));
    }
    for i in 0..8 {
        children.extend_from_slice(&player(&format!("player {i}"), "allies"));
    }
    let root2 = chunk("FOLDINFO", 1, &children);

    data.extend_from_slice(&root1);
    data.extend_from_slice(&root2);
    data
}

fn bench_decode_players(c: &mut Criterion) {
    let data = make_replay(0);
    c.bench_function("decode_eight_players", |b| {
        b.iter(|| black_box(cohrec::decode(black_box(&data))));
    });
}

fn bench_decode_skips(c: &mut Criterion) {
    let data = make_replay(64);
    c.bench_function("decode_skipping_64_unknown_chunks", |b| {
        b.iter(|| black_box(cohrec::decode(black_box(&data))));
    });
}

criterion_group!(benches, bench_decode_players, bench_decode_skips);
criterion_main!(benches);
