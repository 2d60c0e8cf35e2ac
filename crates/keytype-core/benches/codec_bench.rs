//! Criterion benchmarks for the event record codec.
//!
//! Run with:
//! ```bash
//! cargo bench --package keytype-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keytype_core::{decode_event, encode_event, protocol::decode_events, KeyEvent, Keycode};

fn shifted_tap() -> Vec<KeyEvent> {
    vec![
        KeyEvent::press(Keycode::LeftShift),
        KeyEvent::press(Keycode::KeyH),
        KeyEvent::release(Keycode::KeyH),
        KeyEvent::sync(),
        KeyEvent::release(Keycode::LeftShift),
        KeyEvent::sync(),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let ev = KeyEvent::press(Keycode::KeyA);
    c.bench_function("encode_event/press", |b| b.iter(|| black_box(encode_event(black_box(&ev)))));
}

fn bench_decode(c: &mut Criterion) {
    let record = encode_event(&KeyEvent::release(Keycode::Space));
    c.bench_function("decode_event/release", |b| {
        b.iter(|| black_box(decode_event(black_box(&record))))
    });
}

fn bench_decode_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_events");
    for chars in [1usize, 64, 1024] {
        let bytes: Vec<u8> = shifted_tap()
            .iter()
            .cycle()
            .take(chars * 6)
            .flat_map(encode_event)
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(chars), &bytes, |b, bytes| {
            b.iter(|| black_box(decode_events(black_box(bytes))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_decode_stream);
criterion_main!(benches);
