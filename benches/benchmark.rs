use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fast_utf::{Encoding, Translator, detect_encoding, get_length, is_valid};

fn sample_text() -> String {
    "The quick brown fox jumps over the lazy dog. Ünïcödé 世界 😀\n".repeat(256)
}

fn bench_convert(c: &mut Criterion) {
    let text = sample_text();
    let mut group = c.benchmark_group("convert");
    group.throughput(Throughput::Bytes(text.len() as u64));

    for to in [Encoding::UTF16LE, Encoding::UTF32BE] {
        let translator = Translator::new(Encoding::UTF8, to).unwrap();
        group.bench_with_input(BenchmarkId::new("utf8", to.name()), &text, |b, text| {
            b.iter(|| translator.convert(black_box(text.as_bytes())).unwrap())
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let text = sample_text();
    let utf16 = Translator::new(Encoding::UTF8, Encoding::UTF16BE)
        .unwrap()
        .convert(text.as_bytes())
        .unwrap();

    c.bench_function("validate_utf8", |b| {
        b.iter(|| is_valid(black_box(text.as_bytes()), Encoding::UTF8))
    });
    c.bench_function("validate_utf16be", |b| {
        b.iter(|| is_valid(black_box(&utf16), Encoding::UTF16BE))
    });
    c.bench_function("length_utf8", |b| {
        b.iter(|| get_length(black_box(text.as_bytes()), Encoding::UTF8).unwrap())
    });
    c.bench_function("detect_utf8", |b| {
        b.iter(|| detect_encoding(black_box(text.as_bytes())))
    });
}

criterion_group!(benches, bench_convert, bench_validate);
criterion_main!(benches);
