use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pie::{parse, Column, Database};
use tempfile::TempDir;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_select", |b| {
        b.iter(|| parse(black_box("SELECT first_name, last_name, company FROM people")).unwrap())
    });
}

fn bench_execute(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let mut db = Database::new();
    db.open(temp_dir.path()).unwrap();
    db.create_table(
        "people",
        vec![Column::new("first_name"), Column::new("last_name"), Column::new("company")],
    )
    .unwrap();

    let rows: Vec<Vec<String>> = (0..1000)
        .map(|i| vec![format!("first_{}", i), format!("last_{}", i), format!("co_{}", i % 10)])
        .collect();
    db.set_table_rows("people", &rows).unwrap();

    let stmt = parse("SELECT company, first_name FROM people").unwrap();
    c.bench_function("execute_1000_rows", |b| {
        b.iter(|| db.execute(black_box(&stmt)).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_execute);
criterion_main!(benches);
