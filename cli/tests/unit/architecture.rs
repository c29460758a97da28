//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain is pure, application talks only to ports, and cloud SDKs stay in
//! `infra/`.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and strip comment lines to avoid false positives.
fn read_non_comment_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

fn src(sub: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(sub)
}

/// Every line under `dir` that contains one of `forbidden`.
fn find_violations(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            for needle in forbidden {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{}: `{needle}`: {line}", i + 1));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_has_no_io_or_outer_layer_imports() {
    let violations = find_violations(
        &src("domain"),
        &[
            "crate::infra",
            "crate::commands",
            "crate::output",
            "crate::application",
            "tokio::",
            "aws_sdk_",
            "std::fs",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_has_no_imports_from_outer_layers() {
    let violations = find_violations(
        &src("application"),
        &["crate::infra", "crate::commands", "crate::output", "aws_sdk_", "aws_config"],
    );
    assert!(
        violations.is_empty(),
        "application/ must only use ports:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = find_violations(&src("infra"), &["crate::commands", "crate::output"]);
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn cloud_sdk_is_confined_to_infra() {
    let mut violations = Vec::new();
    for dir in ["commands", "output", "app.rs", "cli.rs"] {
        let path = src(dir);
        if path.is_file() {
            for (i, line) in read_non_comment_lines(&path).iter().enumerate() {
                if line.contains("aws_sdk_") {
                    violations.push(format!("src/{dir}:{}: {line}", i + 1));
                }
            }
        } else {
            violations.extend(find_violations(&path, &["aws_sdk_"]));
        }
    }
    assert!(
        violations.is_empty(),
        "AWS SDK types must stay in infra/:\n{}",
        violations.join("\n")
    );
}
