//! Benchmark: walk (extent only) vs full decode vs decode+encode on a synthetic
//! chunk-sized NBT tree (section palettes, packed block states, entity list).

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mcwire::{nbt_extent, read_nbt, DecoderConfig, Tag, TagType};

fn section(y: i8) -> Tag {
    let palette = (0..16)
        .map(|i| Tag::compound("", vec![Tag::string("Name", &format!("minecraft:block_{}", i))]))
        .collect();
    let states: Vec<i64> = (0..256).map(|i| i * 0x0101_0101).collect();
    Tag::compound(
        "",
        vec![
            Tag::byte("Y", y),
            Tag::list("Palette", TagType::Compound, palette),
            Tag::long_array("BlockStates", &states),
            Tag::byte_array("SkyLight", vec![0xff; 2048]),
        ],
    )
}

fn chunk() -> Tag {
    let sections = (0..16).map(section).collect();
    let entities = (0..32)
        .map(|i| {
            Tag::compound(
                "",
                vec![
                    Tag::string("id", "minecraft:zombie"),
                    Tag::list(
                        "Pos",
                        TagType::Double,
                        vec![Tag::double("", i as f64), Tag::double("", 64.0), Tag::double("", -(i as f64))],
                    ),
                    Tag::int_array("UUID", &[i, i + 1, i + 2, i + 3]),
                ],
            )
        })
        .collect();
    Tag::compound(
        "",
        vec![Tag::compound(
            "Level",
            vec![
                Tag::int("xPos", 12),
                Tag::int("zPos", -3),
                Tag::list("Sections", TagType::Compound, sections),
                Tag::list("Entities", TagType::Compound, entities),
            ],
        )],
    )
}

fn bench_decode_nbt(c: &mut Criterion) {
    let bytes = chunk().to_bytes().expect("encode chunk");
    let config = DecoderConfig::default();
    eprintln!("decode_nbt: {} encoded bytes", bytes.len());

    let mut group = c.benchmark_group("chunk");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("walk", |b| {
        b.iter(|| nbt_extent(black_box(&bytes), &config).expect("walk"));
    });
    group.bench_function("decode", |b| {
        b.iter(|| read_nbt(&mut black_box(bytes.as_slice()), &config).expect("decode"));
    });
    group.bench_function("decode_encode", |b| {
        b.iter(|| {
            let tag = read_nbt(&mut black_box(bytes.as_slice()), &config).expect("decode");
            tag.to_bytes().expect("encode")
        });
    });
    group.finish();
}

criterion_group!(benches, bench_decode_nbt);
criterion_main!(benches);
