//! Hygiene: enforces coding standards at test time
//!
//! These tests scan the cropper source tree for antipatterns. Each has a
//! budget of zero; the editor runs inside someone else's settings page, so a
//! panic or a stray console print is never acceptable.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

/// (pattern, budget, why)
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics on None/Err"),
    (".expect(", 0, "panics on None/Err"),
    ("panic!(", 0, "crashes the page"),
    ("unreachable!(", 0, "crashes the page"),
    ("todo!(", 0, "unfinished stub"),
    ("unimplemented!(", 0, "unfinished stub"),
    ("let _ =", 0, "discards a result without inspecting it"),
    (".ok()", 0, "discards an error without inspecting it"),
    ("#[allow(dead_code)]", 0, "hides unused code"),
    ("println!(", 0, "use the log facade"),
    ("eprintln!(", 0, "use the log facade"),
    ("dbg!(", 0, "leftover debugging"),
];

/// Only these modules may touch the DOM; the rest must run natively.
const DOM_MODULES: &[&str] = &["engine.rs", "render.rs"];

struct SourceFile {
    path: String,
    content: String,
}

/// Collect production `.rs` files from `cropper/src/`, excluding test files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

fn count_in_source(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| line.contains(pattern))
                .count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")), "hygiene scan found no sources");
}

#[test]
fn antipattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for (pattern, budget, why) in BUDGETS {
        let hits = count_in_source(&files, pattern);
        let count: usize = hits.iter().map(|(_, c)| c).sum();
        if count > *budget {
            let detail = hits
                .iter()
                .map(|(path, c)| format!("    {path}: {c}"))
                .collect::<Vec<_>>()
                .join("\n");
            failures.push(format!("{pattern} ({why}): found {count}, max {budget}\n{detail}"));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn dom_stays_in_engine_and_render() {
    let leaks: Vec<String> = source_files()
        .into_iter()
        .filter(|f| !DOM_MODULES.iter().any(|m| f.path.ends_with(m)))
        .filter(|f| f.content.contains("web_sys") || f.content.contains("wasm_bindgen"))
        .map(|f| f.path)
        .collect();
    assert!(leaks.is_empty(), "browser bindings outside engine/render: {leaks:?}");
}
