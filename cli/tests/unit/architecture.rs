//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain is pure, application only knows domain, infra never renders.

use std::path::Path;

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<std::path::PathBuf> {
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

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Count non-test, non-comment, non-empty lines in a file.
fn count_non_test_lines(content: &str) -> usize {
    let mut tracker = CfgTestTracker::new();
    content
        .lines()
        .filter(|line| {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            !in_test && !trimmed.is_empty() && !trimmed.starts_with("//")
        })
        .count()
}

/// Scan `dir` for non-comment lines containing any of `needles`.
fn find_forbidden(dir: &Path, needles: &[&str], skip_tests: bool) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if (skip_tests && in_test) || trimmed.starts_with("//") {
                continue;
            }
            for needle in needles {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{}: `{needle}`: {line}", i + 1));
                }
            }
        }
    }
    violations
}

fn src_dir(sub: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(sub)
}

// ── Layer boundaries ──────────────────────────────────────────────────────────

#[test]
fn domain_has_no_io_or_outer_layer_imports() {
    let violations = find_forbidden(
        &src_dir("domain"),
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
            "ureq",
        ],
        false,
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay free of I/O and outer layers:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_depends_only_on_domain() {
    let violations = find_forbidden(
        &src_dir("application"),
        &["crate::infra", "crate::commands", "crate::output", "crate::app::", "ureq::"],
        true,
    );
    assert!(
        violations.is_empty(),
        "application/ must only import from domain/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = find_forbidden(
        &src_dir("infra"),
        &["crate::commands", "crate::output"],
        false,
    );
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = find_forbidden(&src_dir("infra"), &["println!", "eprintln!"], true);
    assert!(
        violations.is_empty(),
        "infra/ must not use println!/eprintln! outside #[cfg(test)]:\n{}",
        violations.join("\n")
    );
}

#[test]
fn services_do_not_print() {
    let violations = find_forbidden(
        &src_dir("application"),
        &["println!", "eprintln!", "print!("],
        true,
    );
    assert!(
        violations.is_empty(),
        "application services must report through ports, not print:\n{}",
        violations.join("\n")
    );
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[test]
fn no_inline_json_branching_in_commands() {
    let mut violations: Vec<String> = Vec::new();

    for file in collect_rs_files(&src_dir("commands")) {
        let lines = read_non_comment_lines(&file);
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();

        for (i, line) in lines.iter().enumerate() {
            let lineno = i + 1;
            if line.contains("json: bool") {
                violations.push(format!(
                    "{rel}:{lineno}: found `json: bool` parameter: {line}"
                ));
            }
            let trimmed = line.trim();
            if trimmed.starts_with("if json") || trimmed.starts_with("if !json") {
                violations.push(format!("{rel}:{lineno}: found inline JSON branch: {line}"));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Found inline JSON branching in commands/ — use app.renderer() instead:\n{}",
        violations.join("\n")
    );
}

#[test]
fn command_handlers_accept_app_context() {
    let mut violations: Vec<String> = Vec::new();

    for file in collect_rs_files(&src_dir("commands")) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        for line in content.lines().filter(|l| l.contains("pub fn run(")) {
            if !line.contains("app: &AppContext") {
                violations.push(format!("{}: {line}", file.display()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Command handlers must take `app: &AppContext`:\n{}",
        violations.join("\n")
    );
}

// ── Command handler size limits ───────────────────────────────────────────────

/// Each file in `commands/` must be ≤125 lines of non-test code.
#[test]
fn command_handlers_are_reasonably_sized() {
    let mut violations: Vec<String> = Vec::new();

    for file in collect_rs_files(&src_dir("commands")) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };

        let line_count = count_non_test_lines(&content);

        if line_count > 125 {
            let rel = file
                .strip_prefix(env!("CARGO_MANIFEST_DIR"))
                .unwrap_or(&file)
                .display()
                .to_string();
            violations.push(format!("{rel}: {line_count} non-test lines (limit: 125)"));
        }
    }

    assert!(
        violations.is_empty(),
        "Command handler files exceed 125-line limit — extract logic to application services:\n{}",
        violations.join("\n")
    );
}
