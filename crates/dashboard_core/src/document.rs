//! Headless rendering target for the dashboard page.
//!
//! The page is modelled as a small document tree (banner, one table, footer)
//! that receives [`DocumentCommand`]s and serializes itself to HTML.

use std::fmt::Write;

use crate::render::DocumentCommand;
use crate::view_model::{JobRowView, ProgressView};

/// Anything that can receive document commands.
pub trait RenderTarget {
    fn apply(&mut self, command: DocumentCommand);

    fn apply_all(&mut self, commands: Vec<DocumentCommand>) {
        for command in commands {
            self.apply(command);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRow {
    pub key: String,
    /// ID, cluster name and status, in that order.
    pub cells: [String; 3],
    pub progress: ProgressView,
}

impl From<JobRowView> for HtmlRow {
    fn from(row: JobRowView) -> Self {
        Self {
            key: row.key,
            cells: [row.run_id, row.cluster, row.status],
            progress: row.progress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTable {
    pub header: Vec<String>,
    pub rows: Vec<HtmlRow>,
}

impl HtmlTable {
    /// Header row plus data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlDocument {
    banner: Option<String>,
    table: Option<HtmlTable>,
    footer: Option<String>,
}

const PAGE_TITLE: &str = "Cluster overview";

impl HtmlDocument {
    pub fn table(&self) -> Option<&HtmlTable> {
        self.table.as_ref()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{}</title>", escape_html(PAGE_TITLE));
        out.push_str("</head>\n<body>\n");

        if let Some(banner) = &self.banner {
            let _ = writeln!(out, "<p class=\"error\">{}</p>", escape_html(banner));
        }

        if let Some(table) = &self.table {
            out.push_str("<table>\n<thead>\n<tr>");
            for label in &table.header {
                let _ = write!(out, "<th>{}</th>", escape_html(label));
            }
            out.push_str("</tr>\n</thead>\n<tbody>\n");
            for row in &table.rows {
                write_row(&mut out, row);
            }
            out.push_str("</tbody>\n</table>\n");
        }

        if let Some(footer) = &self.footer {
            let _ = writeln!(out, "<p class=\"updated\">{}</p>", escape_html(footer));
        }

        out.push_str("</body>\n</html>\n");
        out
    }
}

impl RenderTarget for HtmlDocument {
    fn apply(&mut self, command: DocumentCommand) {
        match command {
            DocumentCommand::CreateTable { header } => {
                // The page holds a single table.
                if self.table.is_none() {
                    self.table = Some(HtmlTable {
                        header: header.iter().map(|label| label.to_string()).collect(),
                        rows: Vec::new(),
                    });
                }
            }
            DocumentCommand::RemoveTable => self.table = None,
            DocumentCommand::InsertRow { index, row } => {
                if let Some(table) = self.table.as_mut() {
                    let index = index.min(table.rows.len());
                    table.rows.insert(index, row.into());
                }
            }
            DocumentCommand::MoveRow { key, index } => {
                if let Some(table) = self.table.as_mut() {
                    if let Some(pos) = table.position(&key) {
                        let row = table.rows.remove(pos);
                        let index = index.min(table.rows.len());
                        table.rows.insert(index, row);
                    }
                }
            }
            DocumentCommand::UpdateRow { row } => {
                if let Some(table) = self.table.as_mut() {
                    if let Some(pos) = table.position(&row.key) {
                        table.rows[pos] = row.into();
                    }
                }
            }
            DocumentCommand::RemoveRow { key } => {
                if let Some(table) = self.table.as_mut() {
                    if let Some(pos) = table.position(&key) {
                        table.rows.remove(pos);
                    }
                }
            }
            DocumentCommand::ShowBanner { text } => self.banner = Some(text),
            DocumentCommand::ClearBanner => self.banner = None,
            DocumentCommand::SetFooter { text } => self.footer = text,
        }
    }
}

fn write_row(out: &mut String, row: &HtmlRow) {
    let _ = write!(out, "<tr data-key=\"{}\">", escape_html(&row.key));
    for cell in &row.cells {
        let _ = write!(out, "<td>{}</td>", escape_html(cell));
    }
    out.push_str("<td><progress");
    if let Some(value) = row.progress.value {
        let _ = write!(out, " value=\"{value}\"");
    }
    if let Some(max) = row.progress.max {
        let _ = write!(out, " max=\"{max}\"");
    }
    out.push_str("></progress></td></tr>\n");
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_model::TABLE_HEADER;

    fn row(key: &str, run_id: &str) -> JobRowView {
        JobRowView {
            key: key.to_string(),
            run_id: run_id.to_string(),
            cluster: "west".to_string(),
            status: "RUNNING".to_string(),
            progress: ProgressView {
                value: Some(1),
                max: Some(2),
            },
        }
    }

    #[test]
    fn second_table_is_ignored() {
        let mut doc = HtmlDocument::default();
        doc.apply(DocumentCommand::CreateTable {
            header: TABLE_HEADER,
        });
        doc.apply(DocumentCommand::InsertRow {
            index: 0,
            row: row("a", "1"),
        });
        doc.apply(DocumentCommand::CreateTable {
            header: TABLE_HEADER,
        });

        assert_eq!(doc.table().unwrap().rows.len(), 1);
        assert_eq!(doc.to_html().matches("<table>").count(), 1);
    }

    #[test]
    fn row_commands_without_table_are_dropped() {
        let mut doc = HtmlDocument::default();
        doc.apply(DocumentCommand::InsertRow {
            index: 0,
            row: row("a", "1"),
        });
        assert!(doc.table().is_none());
        assert!(!doc.to_html().contains("<tr"));
    }

    #[test]
    fn cells_are_escaped() {
        assert_eq!(
            escape_html(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn progress_omits_absent_bounds() {
        let mut doc = HtmlDocument::default();
        doc.apply(DocumentCommand::CreateTable {
            header: TABLE_HEADER,
        });
        let mut bare = row("a", "1");
        bare.progress = ProgressView {
            value: Some(0),
            max: None,
        };
        doc.apply(DocumentCommand::InsertRow { index: 0, row: bare });

        let html = doc.to_html();
        assert!(html.contains("<progress value=\"0\"></progress>"));
    }
}
