// Palma2Tacton
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Mapping benchmarks
//!
//! Synthetic product structures: a deep chain of nested assemblies and a
//! wide root with many module positions sharing unifier properties.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use palma2tacton_mapper::{Document, MappingConfig, MappingEngine};
use serde_json::{Value, json};

fn properties(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({ "uid": format!("p{i}"), "name": format!("Property {i}"), "type": "LIST", "unifier": i % 2 == 0, "values": [{ "value": "A" }, { "value": "B" }] }))
        .collect()
}

fn modules(count: usize, property_count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let relations: Vec<Value> = (0..property_count).filter(|p| (p + i) % 3 != 0).map(|p| json!({ "propertyUid": format!("p{p}") })).collect();
            json!({ "uid": format!("m{i}"), "code": format!("M{i}"), "name": format!("Module {i}"), "propertyRelations": relations, "variants": [{ "name": "Standard", "reference": format!("R{i}") }] })
        })
        .collect()
}

fn leaf(level: usize, index: usize, module_count: usize) -> Value {
    json!({
        "type": "ModuleInstanceNode",
        "uid": format!("leaf_{level}_{index}"),
        "code": format!("L{level}{index}"),
        "name": format!("Leaf {index}"),
        "realization": format!("m{}", (level + index) % module_count),
        "quantity": 1,
        "optional": index % 2 == 1
    })
}

fn deep_document(depth: usize) -> Document {
    let module_count = 8;
    let mut node = json!({ "type": "ModuleSetNode", "uid": format!("set_{depth}"), "code": format!("S{depth}"), "name": "Innermost", "quantity": 1, "nodes": [leaf(depth, 0, module_count), leaf(depth, 1, module_count)] });
    for level in (0..depth).rev() {
        node = json!({
            "type": "ModuleSetNode",
            "uid": format!("set_{level}"),
            "code": format!("S{level}"),
            "name": format!("Level {level}"),
            "quantity": 1,
            "cases": [{ "quantity": 1, "propertyRelations": [{ "propertyUid": "p1", "valueRelations": [{ "value": "A" }] }] }, { "quantity": 2, "propertyRelations": [] }],
            "nodes": [node, leaf(level, 0, module_count), leaf(level, 1, module_count)]
        });
    }

    Document::from_value(json!({
        "configurationIntent": {
            "productStructure": [{ "type": "Root", "uid": "root", "name": "Root", "nodes": [node] }],
            "systemProperties": [{ "uid": "market", "name": "Market", "values": [{ "value": "EU" }] }],
            "properties": properties(12),
            "modules": modules(module_count, 12)
        }
    }))
    .unwrap()
}

fn wide_document(width: usize) -> Document {
    let module_count = 32;
    let children: Vec<Value> = (0..width).map(|i| leaf(0, i, module_count)).collect();
    Document::from_value(json!({
        "configurationIntent": {
            "productStructure": [{ "type": "Root", "uid": "root", "name": "Root", "nodes": children }],
            "properties": properties(40),
            "modules": modules(module_count, 40)
        }
    }))
    .unwrap()
}

fn bench_deep_structures(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_structure");
    for depth in [4, 16, 64] {
        let document = deep_document(depth);
        let mut engine = MappingEngine::new(MappingConfig::default()).unwrap();
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &document, |b, document| b.iter(|| engine.map(black_box(document)).unwrap()));
    }
    group.finish();
}

fn bench_wide_structures(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_structure");
    for width in [16, 128, 512] {
        let document = wide_document(width);
        let mut optimized = MappingEngine::new(MappingConfig::default()).unwrap();
        let mut unoptimized = MappingEngine::new(MappingConfig::unoptimized()).unwrap();
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::new("optimized", width), &document, |b, document| b.iter(|| optimized.map(black_box(document)).unwrap()));
        group.bench_with_input(BenchmarkId::new("unoptimized", width), &document, |b, document| b.iter(|| unoptimized.map(black_box(document)).unwrap()));
    }
    group.finish();
}

criterion_group!(benches, bench_deep_structures, bench_wide_structures);
criterion_main!(benches);
