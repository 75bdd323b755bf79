//! Benchmarks for undocx processing and workbook output.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic Word packages built in memory.

use std::io::{Cursor, Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
</w:styles>"#;

/// Creates a Word package with the given number of sections.
fn create_test_docx(section_count: usize) -> Vec<u8> {
    let mut body = String::new();
    for i in 0..section_count {
        body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Section {}</w:t></w:r></w:p>"#,
            i + 1
        ));
        for _ in 0..5 {
            body.push_str(
                "<w:p><w:r><w:t>Benchmark paragraph text for undocx performance measurement.</w:t></w:r></w:p>",
            );
        }
    }

    let parts = [
        (
            "_rels/.rels",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#.to_string(),
        ),
        (
            "word/_rels/document.xml.rels",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#.to_string(),
        ),
        (
            "word/document.xml",
            format!(
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
                body
            ),
        ),
        ("word/styles.xml", STYLES.to_string()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Benchmark document processing at various sizes.
fn bench_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("docx_processing");

    for section_count in [1, 10, 100].iter() {
        let data = create_test_docx(*section_count);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| undocx::process_bytes(black_box(&data), "bench.docx").unwrap());
        });
    }

    group.finish();
}

/// Benchmark workbook generation.
fn bench_workbook(c: &mut Criterion) {
    let data = create_test_docx(20);
    let mut documents: Vec<_> = (0..10)
        .map(|i| undocx::process_bytes(&data, format!("doc{}.docx", i)).unwrap())
        .collect();
    undocx::assign_ids(&mut documents);
    let writer = undocx::SpreadsheetWriter::default();

    c.bench_function("workbook_10_documents", |b| {
        b.iter(|| {
            writer
                .write_to(black_box(&documents), Cursor::new(Vec::new()))
                .unwrap()
        });
    });
}

/// Benchmark script detection on mixed text.
fn bench_script_detection(c: &mut Criterion) {
    let text = "Annual report التقرير السنوي ".repeat(200);

    c.bench_function("detect_script", |b| {
        b.iter(|| undocx::text::detect_script(black_box(&text)));
    });
}

criterion_group!(
    benches,
    bench_processing,
    bench_workbook,
    bench_script_detection,
);
criterion_main!(benches);
