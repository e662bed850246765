use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use class_scanner::{inline_classes, occurrences_from_content, scan, ExtractorKind, ScanArgs};

/// Build synthetic component markup with inline class bindings
fn create_content(size: &str) -> String {
    match size {
        "small" => r#"
            view! {
                <div class="flex flex-col items-center p-4" class:loading=move || pending()>
                    "Hello"
                </div>
            }
        "#
        .to_string(),
        "medium" => {
            let mut content = String::new();
            for i in 0..20 {
                content.push_str(&format!("pub fn Component{}() -> impl IntoView {{\n", i));
                content.push_str("    view! {\n");
                content.push_str(
                    "        <div class=\"m-5 grid grid-cols-3 gap-4\" class:text-neutral-200=move || value().is_none()>\n",
                );
                content.push_str("            <span class=(\"btn-primary\", is_active)>{value}</span>\n");
                content.push_str("        </div>\n    }\n}\n\n");
            }
            content
        }
        "large" => {
            let classes = [
                "flex", "flex-col", "items-center", "justify-center", "p-4", "m-2",
                "bg-blue-500", "text-white", "rounded-lg", "shadow-md", "hover:bg-blue-600",
                "transition-all", "duration-300", "grid", "grid-cols-3", "gap-4",
            ];

            let mut content = String::new();
            for i in 0..50 {
                content.push_str(&format!("pub fn Component{}() -> impl IntoView {{\n", i));
                content.push_str("    view! {\n");
                for j in 0..10 {
                    let class_list = classes
                        .iter()
                        .cycle()
                        .skip(j % classes.len())
                        .take(8)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(" ");
                    content.push_str(&format!(
                        "        <div class=\"{}\" class:hidden=move || row_{}_hidden()>\n",
                        class_list, j
                    ));
                    content.push_str("        </div>\n");
                }
                content.push_str("    }\n}\n\n");
            }
            content
        }
        _ => panic!("Unknown size: {}", size),
    }
}

/// Create component files on disk for the full scan benchmark
fn create_test_files(dir: &Path, count: usize, size: &str) -> Vec<PathBuf> {
    let content = create_content(size);
    let mut files = Vec::new();
    for i in 0..count {
        let file_path = dir.join(format!("component_{}.rs", i));
        fs::write(&file_path, &content).unwrap();
        files.push(file_path);
    }
    files
}

fn benchmark_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");

    for size in ["small", "medium", "large"].iter() {
        let content = create_content(size);

        group.bench_with_input(BenchmarkId::new("inline_classes", size), &content, |b, content| {
            b.iter(|| inline_classes(black_box(content)));
        });

        group.bench_with_input(
            BenchmarkId::new("occurrences", size),
            &content,
            |b, content| {
                b.iter(|| {
                    occurrences_from_content(
                        black_box(content),
                        "bench.rs",
                        ExtractorKind::InlineClass,
                    )
                });
            },
        );
    }

    group.finish();
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.sample_size(10); // Reduce sample size for faster benchmarking

    for count in [10, 100, 500].iter() {
        group.bench_with_input(BenchmarkId::new("file_count", count), count, |b, &count| {
            b.iter_with_setup(
                || {
                    let temp_dir = TempDir::new().unwrap();
                    let files = create_test_files(temp_dir.path(), count, "medium");

                    let args = ScanArgs {
                        input: files,
                        output_tokens: temp_dir.path().join("tokens.txt"),
                        output_report: temp_dir.path().join("report.json"),
                        config: None,
                        verbose: false,
                        jobs: Some(4),
                        exclude: vec![],
                        dry_run: true, // Don't write files in benchmarks
                    };
                    (temp_dir, args)
                },
                |(temp_dir, args)| {
                    let rt = tokio::runtime::Runtime::new().unwrap();
                    rt.block_on(async {
                        scan(args).await.unwrap();
                    });
                    black_box(temp_dir); // Keep temp_dir alive
                },
            );
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_rules, benchmark_scan);
criterion_main!(benches);
