use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_nbt::{
    from_bytes, from_snbt, io, to_bytes, to_snbt, to_snbt_pretty, Accounter, CollectFields,
    Compound, FieldSelector, SkipAll, Tag, TagType,
};

#[derive(Serialize, Deserialize, Clone)]
struct Item {
    id: String,
    count: i8,
    slot: i8,
}

#[derive(Serialize, Deserialize, Clone)]
struct Player {
    name: String,
    health: f32,
    pos: Vec<f64>,
    inventory: Vec<Item>,
}

fn chunk(sections: usize) -> Tag {
    let mut root = Compound::new();
    root.insert("DataVersion", 3465i32);
    root.insert("Status", "minecraft:full");
    let sections: Vec<Tag> = (0..sections)
        .map(|y| {
            let mut section = Compound::new();
            section.insert("Y", y as i8);
            section.insert("BlockStates", Tag::LongArray((0..256).map(|i| i * y as i64).collect()));
            section.insert("SkyLight", Tag::ByteArray(vec![15; 2048]));
            let palette: Vec<Tag> = (0..8)
                .map(|i| {
                    let mut entry = Compound::new();
                    entry.insert("Name", format!("minecraft:block_{}", i));
                    Tag::Compound(entry)
                })
                .collect();
            section.insert("Palette", Tag::List(palette));
            Tag::Compound(section)
        })
        .collect();
    root.insert("sections", Tag::List(sections));
    Tag::Compound(root)
}

fn encode(tag: &Tag) -> Vec<u8> {
    let mut bytes = Vec::new();
    io::write_tag(&mut bytes, "", tag).unwrap();
    bytes
}

fn benchmark_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for size in [1, 8, 24].iter() {
        let tag = chunk(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &tag, |b, tag| {
            b.iter(|| encode(black_box(tag)))
        });
    }

    group.finish();
}

fn benchmark_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for size in [1, 8, 24].iter() {
        let bytes = encode(&chunk(*size));
        group.bench_with_input(BenchmarkId::new("eager", size), &bytes, |b, bytes| {
            b.iter(|| io::read_tag(black_box(bytes.as_slice()), &mut Accounter::unlimited()))
        });
        group.bench_with_input(BenchmarkId::new("skip", size), &bytes, |b, bytes| {
            b.iter(|| {
                io::parse(
                    black_box(bytes.as_slice()),
                    &mut SkipAll,
                    &mut Accounter::unlimited(),
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("fields", size), &bytes, |b, bytes| {
            b.iter(|| {
                let mut fields =
                    CollectFields::new(vec![FieldSelector::new(TagType::Int, "DataVersion")]);
                io::parse(
                    black_box(bytes.as_slice()),
                    &mut fields,
                    &mut Accounter::unlimited(),
                )
                .map(|_| fields.into_result())
            })
        });
    }

    group.finish();
}

fn benchmark_snbt(c: &mut Criterion) {
    let tag = chunk(2);
    let text = to_snbt(&tag);

    c.bench_function("snbt_print_compact", |b| b.iter(|| to_snbt(black_box(&tag))));
    c.bench_function("snbt_print_pretty", |b| {
        b.iter(|| to_snbt_pretty(black_box(&tag)))
    });
    c.bench_function("snbt_parse", |b| b.iter(|| from_snbt(black_box(&text))));
}

fn benchmark_serde(c: &mut Criterion) {
    let player = Player {
        name: "Steve".to_string(),
        health: 20.0,
        pos: vec![0.5, 64.0, -3.5],
        inventory: (0..36)
            .map(|slot| Item {
                id: format!("minecraft:item_{}", slot),
                count: 64,
                slot,
            })
            .collect(),
    };
    let bytes = to_bytes(&player).unwrap();

    c.bench_function("serialize_struct", |b| b.iter(|| to_bytes(black_box(&player))));
    c.bench_function("deserialize_struct", |b| {
        b.iter(|| from_bytes::<Player>(black_box(&bytes)))
    });
}

criterion_group!(
    benches,
    benchmark_write,
    benchmark_read,
    benchmark_snbt,
    benchmark_serde
);
criterion_main!(benches);
