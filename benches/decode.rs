use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wavescope::audio::canonical_wav_bytes;
use wavescope::DecodedWave;

fn bench_decode(c: &mut Criterion) {
    // ten seconds of CD-quality stereo
    let payload: Vec<u8> = (0..44100 * 4 * 10).map(|i| (i % 251) as u8).collect();
    let bytes = canonical_wav_bytes(2, 44100, 16, &payload);

    c.bench_function("decode_stereo_16bit_10s", |b| {
        b.iter(|| DecodedWave::decode(black_box(bytes.clone())).unwrap())
    });

    let wave = DecodedWave::decode(bytes.clone()).unwrap();
    c.bench_function("interleave_stereo_16bit_10s", |b| b.iter(|| black_box(wave.interleave())));
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
