use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use huffcodec::{CodeTree, Codec, FrequencyTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_text(len: usize, alphabet: u8) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    // Skewed distribution so codeword lengths differ.
    (0..len)
        .map(|_| {
            let a = rng.gen_range(0..alphabet);
            let b = rng.gen_range(0..alphabet);
            a.min(b)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");
    for alphabet in [16u8, 64, 255] {
        let freqs = FrequencyTable::from_bytes(&generate_text(100_000, alphabet)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(alphabet), &freqs, |b, freqs| {
            b.iter(|| CodeTree::build(black_box(freqs)).unwrap())
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for size in [1_000usize, 10_000, 100_000] {
        let text = generate_text(size, 64);
        let codec = Codec::from_frequencies(&FrequencyTable::from_bytes(&text).unwrap()).unwrap();
        let encoded = codec.encode(&text).unwrap();

        group.bench_with_input(BenchmarkId::new("encode", size), &text, |b, text| {
            b.iter(|| codec.encode(black_box(text)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, bits| {
            b.iter(|| codec.decode(black_box(bits)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_codec);
criterion_main!(benches);
