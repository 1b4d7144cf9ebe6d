use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pkgmaps_core::{resolve_exports, resolve_imports};
use serde_json::{json, Map, Value};

const CONDITIONS: &[&str] = &["node", "import"];

/// Exports map with `n` exact subpaths, `n` patterns, and a blocked directory.
fn wide_exports(n: usize) -> Value {
    let mut map = Map::new();
    map.insert(
        ".".to_string(),
        json!({ "import": "./esm/index.mjs", "default": "./cjs/index.js" }),
    );
    for i in 0..n {
        map.insert(format!("./feature-{i}"), json!(format!("./dist/feature-{i}.js")));
        map.insert(
            format!("./group-{i}/*"),
            json!({ "node": { "import": format!("./esm/group-{i}/*.mjs") }, "default": format!("./cjs/group-{i}/*.js") }),
        );
    }
    map.insert("./*".to_string(), json!(["./dist/*.js", "./dist/*/index.js"]));
    map.insert("./internal/*".to_string(), Value::Null);
    Value::Object(map)
}

fn bench_exports(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_exports");

    for size in [4, 64, 512] {
        let exports = wide_exports(size);
        let last = format!("group-{}/deep/module", size - 1);

        group.bench_with_input(BenchmarkId::new("root", size), &exports, |b, exports| {
            b.iter(|| resolve_exports(Some(black_box(exports)), "", CONDITIONS));
        });
        group.bench_with_input(BenchmarkId::new("exact", size), &exports, |b, exports| {
            b.iter(|| resolve_exports(Some(black_box(exports)), "feature-0", CONDITIONS));
        });
        group.bench_with_input(BenchmarkId::new("pattern", size), &exports, |b, exports| {
            b.iter(|| resolve_exports(Some(black_box(exports)), black_box(&last), CONDITIONS));
        });
        group.bench_with_input(BenchmarkId::new("blocked", size), &exports, |b, exports| {
            b.iter(|| resolve_exports(Some(black_box(exports)), "internal/x", CONDITIONS));
        });
    }

    group.finish();
}

fn bench_imports(c: &mut Criterion) {
    let imports = json!({
        "#config": { "node": "./src/config.node.js", "default": "./src/config.js" },
        "#utils/*": "./src/utils/*.js",
        "#dep": "dependency-name"
    });

    c.bench_function("resolve_imports/pattern", |b| {
        b.iter(|| resolve_imports(Some(black_box(&imports)), "#utils/path", CONDITIONS));
    });
    c.bench_function("resolve_imports/conditions", |b| {
        b.iter(|| resolve_imports(Some(black_box(&imports)), "#config", CONDITIONS));
    });
}

criterion_group!(benches, bench_exports, bench_imports);
criterion_main!(benches);
