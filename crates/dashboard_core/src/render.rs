use std::collections::{HashMap, HashSet};

use crate::view_model::{DashboardViewModel, JobRowView, TableView};

/// A single change to the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentCommand {
    CreateTable { header: [&'static str; 4] },
    RemoveTable,
    InsertRow { index: usize, row: JobRowView },
    MoveRow { key: String, index: usize },
    UpdateRow { row: JobRowView },
    RemoveRow { key: String },
    ShowBanner { text: String },
    ClearBanner,
    SetFooter { text: Option<String> },
}

/// Computes the commands that turn a document showing `previous` into one
/// showing `next`. Rows are matched by key so unchanged rows are left alone.
pub fn diff(previous: &DashboardViewModel, next: &DashboardViewModel) -> Vec<DocumentCommand> {
    let mut cmds = Vec::new();

    if previous.banner != next.banner {
        cmds.push(match &next.banner {
            Some(text) => DocumentCommand::ShowBanner { text: text.clone() },
            None => DocumentCommand::ClearBanner,
        });
    }

    match (&previous.table, &next.table) {
        (None, None) => {}
        (Some(_), None) => cmds.push(DocumentCommand::RemoveTable),
        (None, Some(table)) => {
            cmds.push(DocumentCommand::CreateTable {
                header: table.header,
            });
            cmds.extend(
                table
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(index, row)| DocumentCommand::InsertRow {
                        index,
                        row: row.clone(),
                    }),
            );
        }
        (Some(before), Some(after)) => diff_rows(before, after, &mut cmds),
    }

    if previous.footer != next.footer {
        cmds.push(DocumentCommand::SetFooter {
            text: next.footer.clone(),
        });
    }

    cmds
}

/// Full render of a view onto an empty document.
pub fn render(view: &DashboardViewModel) -> Vec<DocumentCommand> {
    diff(&DashboardViewModel::default(), view)
}

fn diff_rows(before: &TableView, after: &TableView, cmds: &mut Vec<DocumentCommand>) {
    let previous: HashMap<&str, &JobRowView> = before
        .rows
        .iter()
        .map(|row| (row.key.as_str(), row))
        .collect();
    let kept: HashSet<&str> = after.rows.iter().map(|row| row.key.as_str()).collect();

    let mut pending: Vec<&str> = Vec::with_capacity(before.rows.len());
    for row in &before.rows {
        if kept.contains(row.key.as_str()) {
            pending.push(row.key.as_str());
        } else {
            cmds.push(DocumentCommand::RemoveRow {
                key: row.key.clone(),
            });
        }
    }

    // Rows before `index` already match `after`; the document continues with
    // the pending rows that have not been moved ahead yet.
    let mut moved: HashSet<&str> = HashSet::new();
    let mut next = 0;
    for (index, row) in after.rows.iter().enumerate() {
        let key = row.key.as_str();
        let Some(old) = previous.get(key) else {
            cmds.push(DocumentCommand::InsertRow {
                index,
                row: row.clone(),
            });
            continue;
        };

        while next < pending.len() && moved.contains(pending[next]) {
            next += 1;
        }
        if pending.get(next) == Some(&key) {
            next += 1;
        } else {
            moved.insert(key);
            cmds.push(DocumentCommand::MoveRow {
                key: row.key.clone(),
                index,
            });
        }
        if *old != row {
            cmds.push(DocumentCommand::UpdateRow { row: row.clone() });
        }
    }
}
