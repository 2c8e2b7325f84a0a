//! This bench measures parsing and building a collection from a large
//! Markdown document.

#![allow(missing_docs)]

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

/// Generates a document with the given number of folders, each holding ten
/// requests.
fn document(folders: usize) -> String {
    let mut markdown = String::new();
    for folder in 0..folders {
        writeln!(markdown, "# Folder {folder}\n").unwrap();
        for request in 0..10 {
            write!(
                markdown,
                "## Request {folder}-{request}\n\
                 **Description:** Request number {request}\n\
                 **Requires:** token\n\
                 **Save Response Variable:** id_{folder}_{request}\n\n\
                 ```curl\n\
                 curl -X POST '{{{{base_url}}}}/items/{request}?page={{{{page}}}}' \\\n  \
                 -H 'Authorization: Bearer {{{{token}}}}' \\\n  \
                 -d '{{\"name\": \"item {request}\", \"tags\": [1, 2, 3]}}'\n\
                 ```\n\n"
            )
            .unwrap();
        }
    }
    markdown
}

fn parse_and_build(c: &mut Criterion) {
    let markdown = document(50);

    c.bench_function("parse", |b| b.iter(|| md2postman::parse(&markdown)));

    let requests = md2postman::parse(&markdown);
    c.bench_function("build", |b| {
        b.iter(|| md2postman::build(&requests, "Bench", "Generated"));
    });
}

criterion_group!(benches, parse_and_build);
criterion_main!(benches);
