//! Benchmarks for the daily log and document rendering
//!
//! Run with: cargo bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use haccp_desk::documents::{LabelSpec, MonthlyReport};
use haccp_desk::storage::{
    DailyLog, FileKvStore, Fridge, KeyValueStore, LogStore, MemoryKvStore, Settings,
    SignatureImage, TemperatureReading,
};
use std::sync::Arc;
use tempfile::tempdir;

fn fridges() -> Vec<Fridge> {
    vec![
        Fridge::new("1", "Frigo Carni"),
        Fridge::new("2", "Frigo Verdure"),
        Fridge::new("3", "Congelatore"),
    ]
}

fn signature() -> SignatureImage {
    let image = image::GrayImage::from_pixel(120, 60, image::Luma([255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageLuma8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    SignatureImage::from_png(&bytes)
}

fn create_logs(count: usize) -> Vec<DailyLog> {
    let fridges = fridges();
    let signature = signature();
    let start = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();

    (0..count)
        .map(|i| {
            let readings = fridges
                .iter()
                .map(|f| TemperatureReading::new(f, i as f64 / 10.0))
                .collect();
            DailyLog::new(readings, signature.clone(), start + Duration::hours(i as i64 * 12))
        })
        .collect()
}

fn bench_log_append(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("log_append");

    for existing in [0, 100, 1000] {
        let seed = create_logs(existing);
        let entry = create_logs(1).remove(0);

        group.bench_with_input(BenchmarkId::new("memory", existing), &existing, |b, _| {
            b.iter_batched(
                || {
                    let store = LogStore::open(Arc::new(MemoryKvStore::new()));
                    rt.block_on(async {
                        for log in &seed {
                            store.append(log.clone()).await.unwrap();
                        }
                    });
                    store
                },
                |store| rt.block_on(store.append(black_box(entry.clone()))).unwrap(),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.bench_function("file", |b| {
        let dir = tempdir().unwrap();
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::open(dir.path()).unwrap());
        let store = LogStore::open(kv);
        let entry = create_logs(1).remove(0);

        b.iter(|| rt.block_on(store.append(black_box(entry.clone()))).unwrap());
    });

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");
    let settings = Settings {
        fridges: fridges(),
        company_name: "Trattoria Da Mario".to_string(),
        company_address: "Via Roma 1, Bologna".to_string(),
        company_vat: "01234567890".to_string(),
        ..Settings::default()
    };
    let now = Utc.with_ymd_and_hms(2026, 10, 31, 20, 0, 0).unwrap();

    for size in [10, 60] {
        let mut logs = create_logs(size);
        logs.reverse();
        let report = MonthlyReport::build(&logs, &settings, &now).unwrap();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("build_{}", size), |b| {
            b.iter(|| MonthlyReport::build(black_box(&logs), &settings, &now).unwrap())
        });
        group.bench_function(format!("render_{}", size), |b| {
            b.iter(|| report.render().unwrap())
        });
    }

    group.finish();
}

fn bench_label(c: &mut Criterion) {
    let prep = chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let label = LabelSpec::preparation(
        "Ragù alla bolognese",
        "carne di manzo, pomodoro, sedano (SEDANO), carota, cipolla, vino rosso (SOLFITI)",
        prep,
    );

    c.bench_function("label_render", |b| b.iter(|| black_box(&label).render().unwrap()));
}

criterion_group!(benches, bench_log_append, bench_report, bench_label);
criterion_main!(benches);
