//! Benchmarks for whole-project analysis
//!
//! Builds synthetic projects where each module exports a handful of
//! symbols and consumes some of its predecessor's, through both named and
//! namespace imports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use deadexports::analysis::{extract_exports, ProjectAnalyzer};
use deadexports::graph::Project;

/// Source text for module `i` of a synthetic project.
fn module_source(i: usize) -> String {
    let mut source = String::new();
    if i > 0 {
        if i % 2 == 0 {
            source.push_str(&format!("import {{ value0, Shape0 }} from './m{}';\n", i - 1));
            source.push_str("const local: Shape0 = { id: value0 };\n");
        } else {
            source.push_str(&format!("import * as prev from './m{}';\n", i - 1));
            source.push_str("const local: prev.Shape0 = { id: prev.value1 };\n");
        }
        source.push_str("console.log(local);\n");
    }
    for j in 0..5 {
        source.push_str(&format!("export const value{} = {};\n", j, i * 10 + j));
    }
    source.push_str("export type Shape0 = { id: number };\n");
    source.push_str("export function helper(x: number) { return x + value2; }\n");
    source
}

fn create_project(modules: usize) -> Project {
    Project::from_sources(
        (0..modules).map(|i| (format!("/bench/m{}.ts", i), module_source(i))),
    )
    .expect("synthetic project parses")
}

/// Benchmark the two-phase analysis over whole projects
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_project");

    for size in [10, 100, 500].iter() {
        let project = create_project(*size);

        group.bench_with_input(BenchmarkId::new("modules", size), &project, |b, project| {
            b.iter(|| black_box(ProjectAnalyzer::new(project).run().definitely_unused()));
        });
    }

    group.finish();
}

/// Benchmark export extraction on a single large module
fn bench_extract_exports(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_exports");

    for size in [100, 1000].iter() {
        let source: String = (0..*size)
            .map(|i| format!("export const item{} = {};\n", i, i))
            .collect();
        let project = Project::from_sources([("/bench/big.ts", source)]).expect("parses");
        let module = project.get("/bench/big.ts").expect("module loaded");

        group.bench_with_input(BenchmarkId::new("exports", size), module, |b, module| {
            b.iter(|| black_box(extract_exports(module)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_extract_exports);
criterion_main!(benches);
