/// Markdown rendering of entries (Obsidian-friendly)

use chrono::NaiveDate;
use crate::domain::{DiaryEntry, Metric};

/// Separator placed between entry sections in a combined document
pub const SECTION_SEPARATOR: &str = "\n---\n\n";

/// Escape lines that would read as the section separator
fn escape_rules(text: &str) -> String {
    text.split('\n')
        .map(|line| if line == "---" { "\\---" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one entry as a markdown section
pub fn entry_to_markdown(entry: &DiaryEntry) -> String {
    let analysis = &entry.analysis;
    let mut md = format!("# Diary: {}\n\n", entry.date);

    md.push_str(&format!("## 📝 Entry\n{}\n\n", escape_rules(&entry.content)));

    md.push_str("## 🤖 Analysis\n");
    md.push_str(&format!("### 💡 Summary\n{}\n\n", escape_rules(&analysis.summary)));

    md.push_str("### 📊 Emotion\n");
    md.push_str(&format!("- Positive: {}%\n", analysis.emotional_score.positive));
    md.push_str(&format!("- Negative: {}%\n\n", analysis.emotional_score.negative));

    md.push_str("### 📌 Metrics\n");
    for metric in Metric::ALL {
        let score = analysis.metric_scores.get(metric).unwrap_or(0);
        md.push_str(&format!("- {} {}: {}/5\n", metric.icon(), metric.display_name(), score));
    }
    md.push('\n');

    md.push_str(&format!("### 💬 Feedback\n{}\n", escape_rules(&analysis.feedback)));
    md
}

/// Render every entry into one document
pub fn export_all_to_markdown(entries: &[DiaryEntry], exported_on: NaiveDate) -> String {
    let mut md = format!("# Diary Backup ({})\n\n", exported_on);
    md.push_str(&format!("{} entries included.\n\n---\n\n", entries.len()));

    let sections: Vec<String> = entries.iter().map(entry_to_markdown).collect();
    md.push_str(&sections.join(SECTION_SEPARATOR));
    md
}
