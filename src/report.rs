//! Diff and version report rendering.
//!
//! Pure formatting over [`SemanticDiffResult`] and [`Version`] values: the
//! terminal views used by `rl diff` and the banner-delimited archival
//! layouts written by `rl export`. No decision logic lives here.

use console::style;
use similar::TextDiff;

use crate::models::{ChangeKind, SemanticDiffResult, Version};

const BANNER_WIDTH: usize = 80;

fn banner() -> String {
    "=".repeat(BANNER_WIDTH)
}

/// One-glance summary: similarity percentage, change score, section counts.
pub fn summary(result: &SemanticDiffResult) -> String {
    format!(
        "Overall similarity: {:.1}% (change score: {:.3})\nSections: {} total | {} changed",
        result.overall_similarity * 100.0,
        result.change_score,
        result.total_sections,
        result.sections.len(),
    )
}

/// Per-section listing with kind, distance, and excerpts.
///
/// With `color`, section headers are tinted by kind: added green, removed
/// red, modified yellow.
pub fn sections(result: &SemanticDiffResult, color: bool) -> String {
    let mut out = String::new();

    for section in &result.sections {
        let header = format!(
            "[section {}] {} (distance: {})",
            section.section,
            section.kind.to_string().to_uppercase(),
            section.distance,
        );
        if color {
            let styled = match section.kind {
                ChangeKind::Added => style(header).green(),
                ChangeKind::Removed => style(header).red(),
                ChangeKind::Modified => style(header).yellow(),
            };
            out.push_str(&styled.to_string());
        } else {
            out.push_str(&header);
        }
        out.push('\n');

        if !section.old_excerpt.is_empty() {
            out.push_str(&format!("  old: {}\n", section.old_excerpt));
        }
        if !section.new_excerpt.is_empty() {
            out.push_str(&format!("  new: {}\n", section.new_excerpt));
        }
        out.push('\n');
    }

    out
}

/// Standard unified line diff between two findings texts.
pub fn unified(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .header(old_label, new_label)
        .to_string()
}

/// Colorize a unified diff for the terminal: additions green, removals red,
/// context unchanged. File headers (`+++` / `---`) stay plain.
pub fn colorize_unified(diff: &str) -> String {
    let mut out = String::new();
    for line in diff.lines() {
        if line.starts_with('+') && !line.starts_with("+++") {
            out.push_str(&style(line).green().to_string());
        } else if line.starts_with('-') && !line.starts_with("---") {
            out.push_str(&style(line).red().to_string());
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Count added/removed lines in a unified diff, excluding file headers.
fn diff_counts(diff: &str) -> (usize, usize) {
    let added = diff
        .lines()
        .filter(|l| l.starts_with('+') && !l.starts_with("+++"))
        .count();
    let removed = diff
        .lines()
        .filter(|l| l.starts_with('-') && !l.starts_with("---"))
        .count();
    (added, removed)
}

/// Archival report for one version: metadata header, findings body, source
/// and delta footer.
pub fn version_report(id: &str, version: &Version) -> String {
    format!(
        "{banner}\n\
         Research ID: {id}\n\
         Version: {ver}\n\
         Timestamp: {ts}\n\
         Query: {query}\n\
         {banner}\n\n\
         {findings}\n\n\
         {banner}\n\
         Sources: {sources}\n\
         Delta: {delta}\n\
         {banner}\n",
        banner = banner(),
        id = id,
        ver = version.version,
        ts = version.timestamp,
        query = version.query,
        findings = version.findings,
        sources = version.sources.join(", "),
        delta = version.delta,
    )
}

/// Archival diff report between two versions: metadata, line-count summary,
/// semantic section listing, unified diff, and both full texts.
pub fn diff_report(
    id: &str,
    old: &Version,
    new: &Version,
    semantic: &SemanticDiffResult,
    generated_at: &str,
) -> String {
    let old_label = format!("Version {} ({})", old.version, old.timestamp);
    let new_label = format!("Version {} ({})", new.version, new.timestamp);
    let diff = unified(&old.findings, &new.findings, &old_label, &new_label);
    let (added, removed) = diff_counts(&diff);

    let mut out = String::new();
    let banner = banner();

    out.push_str(&format!(
        "{banner}\n\
         DIFF REPORT\n\
         Research ID: {id}\n\
         Comparison: Version {} -> Version {}\n\
         Generated: {generated_at}\n\
         {banner}\n\n",
        old.version, new.version,
    ));

    out.push_str(&format!(
        "[Version {}]\n  Timestamp: {}\n  Query: {}\n\n",
        old.version, old.timestamp, old.query
    ));
    out.push_str(&format!(
        "[Version {}]\n  Timestamp: {}\n  Query: {}\n\n",
        new.version, new.timestamp, new.query
    ));

    out.push_str(&format!("{banner}\nSUMMARY\n{banner}\n"));
    out.push_str(&format!("  {}\n", summary(semantic).replace('\n', "\n  ")));
    out.push_str(&format!("  Lines added:   +{added}\n"));
    out.push_str(&format!("  Lines removed: -{removed}\n\n"));

    out.push_str(&format!("{banner}\nSEMANTIC CHANGES\n{banner}\n"));
    if semantic.sections.is_empty() {
        out.push_str("  (none above threshold)\n\n");
    } else {
        out.push_str(&sections(semantic, false));
    }

    out.push_str(&format!("{banner}\nUNIFIED DIFF\n{banner}\n"));
    out.push_str(&diff);

    out.push_str(&format!(
        "\n{banner}\nVERSION {} FULL TEXT\n{banner}\n{}\n",
        old.version, old.findings
    ));
    out.push_str(&format!(
        "\n{banner}\nVERSION {} FULL TEXT\n{banner}\n{}\n",
        new.version, new.findings
    ));

    out
}
