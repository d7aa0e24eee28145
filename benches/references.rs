//! Benchmarks for the in-memory stages of an export.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench references -- collect`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatdump::Message;
use chatdump::output::to_pretty_string;
use chatdump::references::{collect_references, extract_emoji_ids};

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_history(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let id = 1_180_000_000_000_000_000 + i as u64;
            let author = (i % 50) as u64 + 1;
            let content = if i % 3 == 0 {
                format!("Message number {i} <:pog:{}> nice", 900 + i % 40)
            } else {
                format!("Message number {i}")
            };
            let mut msg = Message::new(id, author, content);
            if i % 5 == 0 {
                msg = msg.with_reaction(Some(800 + (i % 20) as u64)).with_reaction(None);
            }
            if i % 17 == 0 {
                msg = msg.with_sticker(Some(700 + (i % 7) as u64));
            }
            if i % 11 == 0 {
                msg = msg.with_attachment(
                    id,
                    format!("https://cdn.discordapp.com/attachments/1/{id}/f.png"),
                    Some("image/png"),
                );
            }
            msg
        })
        .collect()
}

fn generate_content(emojis: usize) -> String {
    (0..emojis)
        .map(|i| format!("word word <a:spin_{i}:{}> word ", 100_000 + i))
        .collect()
}

// =============================================================================
// Reference Benchmarks
// =============================================================================

fn bench_collect_references(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_references");

    for size in [100_usize, 1_000, 10_000, 50_000] {
        let messages = generate_history(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &messages, |b, messages| {
            b.iter(|| black_box(collect_references(black_box(messages))));
        });
    }
    group.finish();
}

fn bench_extract_emoji_ids(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_emoji_ids");

    for emojis in [0_usize, 1, 10, 100] {
        let content = generate_content(emojis);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(emojis), &content, |b, content| {
            b.iter(|| black_box(extract_emoji_ids(black_box(content)).count()));
        });
    }
    group.finish();
}

// =============================================================================
// Output Benchmarks
// =============================================================================

fn bench_messages_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("messages_json");

    for size in [100_usize, 1_000, 10_000] {
        let messages = generate_history(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &messages, |b, messages| {
            b.iter(|| black_box(to_pretty_string(black_box(messages)).unwrap()));
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_collect_references,
    bench_extract_emoji_ids,
    bench_messages_json,
);

criterion_main!(benches);
