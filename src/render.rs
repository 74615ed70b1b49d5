// 🖨️ Rendering - write-only sinks for labels and reports
//
// The core never reads rendered output back. TextRenderer writes plain text
// documents; other renderers only need to implement the trait.

use crate::entities::{AllocatedEntry, Contestant, ResultRow};
use crate::error::Result;
use crate::storage::write_atomic;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Result table for one class, as handed to renderers
#[derive(Debug, Clone, PartialEq)]
pub struct ClassResult {
    pub class_id: String,
    pub class_name: String,
    pub rows: Vec<ResultRow>,
}

pub trait Renderer {
    /// Printable entry labels for one contestant, with the amount still owed
    fn render_entries(
        &self,
        contestant: &Contestant,
        entries: &[AllocatedEntry],
        owed: f64,
    ) -> Result<PathBuf>;

    /// All class result tables in one document
    fn render_class_results(&self, results: &[ClassResult]) -> Result<PathBuf>;

    /// Titled list of lines (prize winners, rankings)
    fn render_summary(&self, title: &str, lines: &[String]) -> Result<PathBuf>;
}

// ============================================================================
// TEXT RENDERER
// ============================================================================

pub struct TextRenderer {
    directory: PathBuf,
}

impl TextRenderer {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        TextRenderer {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn write(&self, file_name: &str, body: &str) -> Result<PathBuf> {
        let path = self.directory.join(file_name);
        write_atomic(&path, body.as_bytes())?;
        tracing::debug!(path = %path.display(), "rendered document");
        Ok(path)
    }
}

/// Letters and digits of any script, runs of anything else collapsed to '-'
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Label file name, unique per contestant identity
fn label_stem(contestant: &Contestant) -> String {
    let hash = contestant.unique_id();
    match file_stem(&contestant.name) {
        stem if stem.is_empty() => hash,
        stem => format!("{}-{}", stem, hash),
    }
}

fn header(title: &str) -> String {
    format!(
        "{}\n{}\nGenerated {}\n\n",
        title,
        "=".repeat(title.chars().count()),
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    )
}

impl Renderer for TextRenderer {
    fn render_entries(
        &self,
        contestant: &Contestant,
        entries: &[AllocatedEntry],
        owed: f64,
    ) -> Result<PathBuf> {
        let mut body = header(&format!("Entries for {}", contestant.name));
        for entry in entries {
            body.push_str("+-----------+\n");
            body.push_str(&format!("| Class {:>3} |\n", entry.class_id));
            body.push_str(&format!("| Entry {:>3} |\n", entry.number));
            body.push_str("+-----------+\n");
        }
        body.push_str(&format!("\nAmount owed: {:.2}\n", owed));

        self.write(&format!("labels/{}.txt", label_stem(contestant)), &body)
    }

    fn render_class_results(&self, results: &[ClassResult]) -> Result<PathBuf> {
        let mut body = header("Class Results");
        for result in results {
            body.push_str(&format!(
                "Results for class {} --- {}\n",
                result.class_id, result.class_name
            ));
            if result.rows.is_empty() {
                body.push_str("  (not judged)\n");
            }
            for row in &result.rows {
                body.push_str(&format!(
                    "  {:<10} {:>6}  {}\n",
                    row.placing.as_str(),
                    row.entry,
                    row.contestant
                ));
            }
            body.push('\n');
        }

        self.write("final-class-report.txt", &body)
    }

    fn render_summary(&self, title: &str, lines: &[String]) -> Result<PathBuf> {
        let mut body = header(title);
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }

        self.write(&format!("{}.txt", file_stem(&title.to_lowercase())), &body)
    }
}
