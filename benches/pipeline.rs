//! Benchmarks for the fgmap pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fgmap::registry::MapRegistry;
use fgmap::types::{
    decode_pair, encode_float_pair, Layer, MapEntity, MapId, MapSettingsResolved, OccluderSource,
    Pair,
};
use fgmap::xml::{parse, render_document, Element};
use fgmap::{build_map_node, CampaignDatabase};

fn sample_map(index: u32) -> MapEntity {
    let name = format!("Map {}", index);
    let layers = (0..4)
        .map(|i| {
            let layer_name = (i > 0).then(|| format!("Level {}", i));
            Layer::image(i, layer_name, format!("/maps/{}/level{}_gridless.jpg", name, i))
        })
        .collect();
    let occluders = (0..8)
        .map(|i| {
            Element::new("occluder")
                .with_child(Element::new("id").with_text(i.to_string()))
                .with_child(Element::new("points").with_text("0,0,140,0,140,140,0,140"))
        })
        .collect();

    MapEntity::new(
        name.clone(),
        format!("/maps/{}", name),
        MapId::Assigned(index + 1),
        MapSettingsResolved {
            player_drawing: true,
            grid: true,
            grid_size: Pair::int(140, 140),
            grid_offset: Pair::int(0, 0),
            grid_snap: true,
            brush_size: Pair::float(14.0, 14.0),
        },
        layers,
        OccluderSource::Owned(occluders),
    )
}

fn sample_registry(maps: u32) -> MapRegistry {
    let mut registry = MapRegistry::new();
    for i in 0..maps {
        registry.insert(sample_map(i)).unwrap();
    }
    registry
}

// -- Codec benchmarks --

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    group.bench_function("decode_int_pair", |b| {
        b.iter(|| decode_pair("gridsize", black_box("140,140")).unwrap())
    });

    group.bench_function("decode_float_pair", |b| {
        b.iter(|| decode_pair("brushsize", black_box("12.5,12.5")).unwrap())
    });

    let pair = Pair::float(1.23456, 2.0);
    group.bench_function("encode_float_pair", |b| {
        b.iter(|| encode_float_pair(black_box(&pair)))
    });

    group.finish();
}

// -- Document benchmarks --

fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");

    let registry = sample_registry(1);
    let layers = registry.layers("Map 0").unwrap();
    let map = registry.get("Map 0").unwrap();

    group.bench_function("build_map_node", |b| {
        b.iter(|| build_map_node(black_box(map), black_box(&layers)).unwrap())
    });

    let registry = sample_registry(50);
    let mut db = CampaignDatabase::from_root("/campaign", Element::new("root"));
    db.update(&registry).unwrap();
    let rendered = db.render();

    group.bench_function("update_50_maps", |b| {
        b.iter(|| {
            let mut db = CampaignDatabase::from_root("/campaign", Element::new("root"));
            db.update(black_box(&registry)).unwrap()
        })
    });

    group.bench_function("render_50_maps", |b| {
        b.iter(|| render_document(black_box(db.root())))
    });

    group.bench_function("parse_50_maps", |b| {
        b.iter(|| parse(black_box(&rendered)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_codec, bench_document);
criterion_main!(benches);
