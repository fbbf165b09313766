//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layering holds:
//! `domain` is pure, `application` depends only on `domain`, and
//! commands render through `app.renderer()`.

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

/// Read a file and drop comment lines and everything from `#[cfg(test)]` on.
fn read_production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .take_while(|l| !l.trim().starts_with("#[cfg(test)]"))
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

fn forbidden_imports(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (i, line) in read_production_lines(&file).iter().enumerate() {
            for module in forbidden {
                if line.contains(module) {
                    violations.push(format!("{rel}:{}: {line}", i + 1));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_has_no_outward_imports() {
    let violations = forbidden_imports(
        &src_dir().join("domain"),
        &[
            "crate::application",
            "crate::infra",
            "crate::commands",
            "crate::output",
            "crate::app",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_does_not_reach_presentation_or_infra() {
    let violations = forbidden_imports(
        &src_dir().join("application"),
        &["crate::infra", "crate::commands", "crate::output", "crate::app::"],
    );
    assert!(
        violations.is_empty(),
        "application/ may depend on domain/ only:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_concrete_client_in_services() {
    let violations = forbidden_imports(
        &src_dir().join("application").join("services"),
        &["DigitalOceanClient", "ureq::"],
    );
    assert!(
        violations.is_empty(),
        "services must take port traits, not the HTTP client:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_inline_json_branching_in_commands() {
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir().join("commands")) {
        for (i, line) in read_production_lines(&file).iter().enumerate() {
            let trimmed = line.trim();
            if line.contains("json: bool")
                || trimmed.starts_with("if json")
                || trimmed.starts_with("if !json")
                || trimmed.contains("is_json()")
            {
                violations.push(format!("{}:{}: {line}", file.display(), i + 1));
            }
        }
    }
    assert!(
        violations.is_empty(),
        "Found inline JSON branching in commands/ — use app.renderer() instead:\n{}",
        violations.join("\n")
    );
}
