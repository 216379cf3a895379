//! Human-readable summary renderer for result documents.

use crate::aggregate::{AggregatedResult, SectionPayload, SectionSeverity};
use crate::model::BundleDiffEntry;

/// Render a short text summary of an [`AggregatedResult`].
///
/// Intended for terminal output and review. It is informational only and
/// never feeds back into the structured document.
pub fn render_summary(result: &AggregatedResult) -> String {
    let mut out = String::new();

    out.push_str("## Certification Comparison\n\n");

    let actionable = result.actionable_sections().count();
    let verdict = if actionable == 0 {
        "No actionable differences"
    } else {
        "Actionable differences found"
    };
    out.push_str(&format!(
        "**Result**: {verdict}  \n**Sections**: {} ({} actionable)\n\n",
        result.len(),
        actionable
    ));

    if result.is_empty() {
        out.push_str("_Nothing to report._\n");
        return out;
    }

    for severity in [SectionSeverity::Actionable, SectionSeverity::Informative] {
        let sections: Vec<_> = result
            .sections()
            .iter()
            .filter(|s| s.severity == severity)
            .collect();
        if sections.is_empty() {
            continue;
        }
        match severity {
            SectionSeverity::Actionable => out.push_str("### Actionable\n\n"),
            SectionSeverity::Informative => out.push_str("### Informative\n\n"),
        }
        for section in sections {
            match &section.payload {
                SectionPayload::BundleDiff(entries) => {
                    out.push_str(&format!(
                        "- `{}`: {} file(s) differ\n",
                        section.name,
                        entries.len()
                    ));
                    for entry in entries {
                        out.push_str(&format!("  - {} {}\n", marker(entry), entry.path()));
                    }
                }
                SectionPayload::Unexpected(entries) => {
                    out.push_str(&format!(
                        "- `{}`: {} unexpected result(s)\n",
                        section.name,
                        entries.len()
                    ));
                }
                SectionPayload::Names(names) => {
                    out.push_str(&format!(
                        "- `{}` ({}): {}\n",
                        section.name,
                        names.len(),
                        names.join(", ")
                    ));
                }
                SectionPayload::Informative(_) => {
                    out.push_str(&format!("- `{}`: recorded\n", section.name));
                }
            }
        }
        out.push('\n');
    }

    out
}

fn marker(entry: &BundleDiffEntry) -> &'static str {
    match entry {
        BundleDiffEntry::Added { .. } => "+",
        BundleDiffEntry::Removed { .. } => "-",
        BundleDiffEntry::Changed { .. } => "~",
    }
}
