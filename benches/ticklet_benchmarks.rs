use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ticklet::core::{Notes, TicketId};
use ticklet::templates::NotesTemplate;

/// Notes document with `files` referenced files and a long free-text tail
fn document(files: usize) -> String {
    let id = TicketId::parse("BENCH-1").expect("valid ticket id");
    let mut content = NotesTemplate::default().render(&id);
    let bullets: String = (0..files)
        .map(|i| format!("- /home/user/src/project/module_{i}.rs\n"))
        .collect();
    content = content.replacen("- \n", &bullets, 1);
    for i in 0..200 {
        content.push_str(&format!("Line {i} of free-form notes that must survive rewrites.\n"));
    }
    content
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("notes.parse");

    for files in [1, 10, 100] {
        let content = document(files);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(files), &content, |b, content| {
            b.iter(|| black_box(Notes::parse("notes.md", content)));
        });
    }

    group.finish();
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("notes.rewrite");

    for files in [1, 10, 100] {
        let content = document(files);
        let notes = Notes::parse("notes.md", &content)
            .with_status("In progress")
            .with_files(vec!["/home/user/src/project/main.rs".to_string()]);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(files), &content, |b, content| {
            b.iter(|| black_box(notes.rewrite(content)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_rewrite);
criterion_main!(benches);
