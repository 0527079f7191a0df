//! CLI output formatting.
//!
//! # Task-First Display
//!
//! Output is organised by **task**, not by file. Each task leads with its
//! positional index and label; the files it wrote (or would write) follow as
//! indented context, shown relative to the output root so the listing reads
//! like the project tree.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! Acme → ./
//! Platforms: iOS, Android · Orientation: all
//!
//! 001 iOS icons (10 files)
//!     Source: assets/icon.png
//!     ios/Acme/Images.xcassets/AppIcon.appiconset/Icon-20@2x.png
//!     ...
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 iOS icons → 9 images
//!     ios/Acme/Images.xcassets/AppIcon.appiconset/Contents.json
//! 002 Android splash → 10 images
//!     Background: #ff0000
//!     android/app/src/main/res/values/colors.xml
//! 003 iOS splash → 11 images
//!     ios/Acme.xcodeproj/project.pbxproj: register LaunchImage asset catalog (2 changes)
//!
//! Generated 30 images in 3 tasks
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::config::{Notice, RunConfig};
use crate::pipeline::{RunSummary, Task, TaskFailure};
use crate::render::PatchOutcome;
use crate::types::Platform;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Show `path` relative to `root` when it lives underneath it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

fn platforms_line(config: &RunConfig) -> String {
    let names: Vec<String> = [Platform::Ios, Platform::Android]
        .into_iter()
        .filter(|p| config.platforms.includes(*p))
        .map(|p| p.to_string())
        .collect();
    format!(
        "Platforms: {} \u{b7} Orientation: {}",
        names.join(", "),
        config.orientation
    )
}

// ============================================================================
// Plan
// ============================================================================

/// Format the tasks a run would execute and every file each one touches.
pub fn format_plan(config: &RunConfig, tasks: &[Task]) -> Vec<String> {
    let root = &config.output_root;
    let mut lines = vec![
        format!("{} \u{2192} {}", config.project_name, root.display()),
        platforms_line(config),
    ];
    lines.extend(format_notices(&config.notices));
    lines.push(String::new());

    if tasks.is_empty() {
        lines.push("Nothing to generate".to_string());
        return lines;
    }

    for (i, task) in tasks.iter().enumerate() {
        let destinations = task.destinations(config);
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            task,
            plural(destinations.len(), "file", "files")
        ));
        for request in task.requests(config) {
            lines.push(format!("{}Source: {}", indent(1), request.source.display()));
        }
        for path in destinations {
            lines.push(format!("{}{}", indent(1), display_path(&path, root)));
        }
    }
    lines
}

/// Print the plan to stdout.
pub fn print_plan(config: &RunConfig, tasks: &[Task]) {
    for line in format_plan(config, tasks) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format a finished run: one header per task, then its non-image outputs.
///
/// Images are counted rather than listed; `--verbose` logs each one.
pub fn format_report(summary: &RunSummary, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, report) in summary.reports.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            report.task,
            plural(report.images.len(), "image", "images")
        ));
        if let Some(color) = &report.background_color {
            lines.push(format!("{}Background: {}", indent(1), color.hex));
        }
        for document in &report.documents {
            lines.push(format!("{}{}", indent(1), display_path(document, root)));
        }
        for patch in &report.patches {
            let status = match patch.outcome {
                PatchOutcome::Applied(count) => plural(count, "change", "changes"),
                PatchOutcome::AlreadyApplied => "already applied".to_string(),
                PatchOutcome::PatternNotFound => "nothing to patch".to_string(),
            };
            lines.push(format!(
                "{}{}: {} ({})",
                indent(1),
                display_path(&patch.path, root),
                patch.description,
                status
            ));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Generated {} in {}",
        plural(summary.image_count(), "image", "images"),
        plural(summary.reports.len(), "task", "tasks")
    ));
    lines
}

/// Print a finished run to stdout.
pub fn print_report(summary: &RunSummary, root: &Path) {
    for line in format_report(summary, root) {
        println!("{}", line);
    }
}

/// Format every failed task, one per line.
pub fn format_failures(failures: &[TaskFailure]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} failed:",
        plural(failures.len(), "task", "tasks")
    )];
    for failure in failures {
        lines.push(format!("{}{}", indent(1), failure));
    }
    lines
}

/// Print failed tasks to stderr.
pub fn print_failures(failures: &[TaskFailure]) {
    for line in format_failures(failures) {
        eprintln!("{}", line);
    }
}

/// Format recovered config problems.
pub fn format_notices(notices: &[Notice]) -> Vec<String> {
    notices
        .iter()
        .map(|notice| format!("warning: {notice}"))
        .collect()
}
