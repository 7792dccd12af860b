//! Criterion benchmarks for compilation and example generation.
//!
//! Run with: cargo bench -p linq-eval

use criterion::{criterion_group, criterion_main, Criterion};
use linq_eval::{generate_examples, GenerateConfig};
use linq_ir::{compile, CompileOptions};
use linq_lang::Catalog;

const PROGRAMS: &[(&str, &str)] = &[
    ("take_count", "a <- [int]\nb <- int\nc <- TAKE b a\nd <- COUNT isEVEN c\ne <- TAKE d a"),
    ("sqr_sum", "a <- [int]\nb <- MAP SQR a\nc <- SUM b"),
    (
        "zip_scan_sort",
        "a <- [int]\nb <- [int]\nc <- ZIPWITH * a b\nd <- SCANL1 + c\ne <- SORT d",
    ),
];

fn bench_compile(c: &mut Criterion) {
    let catalog = Catalog::new(512);
    let options = CompileOptions::with_list_len(10);
    for (name, source) in PROGRAMS {
        c.bench_function(&format!("compile_{name}"), |b| {
            b.iter(|| compile(source, &catalog, &options).unwrap())
        });
    }
}

fn bench_generate(c: &mut Criterion, name: &str, source: &str, config: GenerateConfig) {
    let program = compile(source, &Catalog::new(512), &CompileOptions::with_list_len(10)).unwrap();
    c.bench_function(name, |b| {
        b.iter(|| generate_examples(&program, &config).unwrap())
    });
}

fn benchmarks(c: &mut Criterion) {
    bench_compile(c);

    let serial = GenerateConfig {
        count: 1000,
        seed: Some(0),
        ..Default::default()
    };
    let parallel = GenerateConfig {
        parallel: true,
        ..serial.clone()
    };

    for (name, source) in PROGRAMS {
        bench_generate(c, &format!("generate_{name}_1000"), source, serial.clone());
    }
    // Parallel mode
    bench_generate(
        c,
        "generate_zip_scan_sort_1000_parallel",
        PROGRAMS[2].1,
        parallel,
    );
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
