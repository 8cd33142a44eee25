use std::path::PathBuf;

use dashboard_core::{diff, DashboardViewModel, HtmlDocument, RenderTarget};
use dashboard_engine::{PagePublisher, PersistError};
use dashboard_logging::dashboard_debug;

/// Keeps the live document in step with the latest view and publishes it.
pub struct PageRenderer {
    document: HtmlDocument,
    shown: DashboardViewModel,
    publisher: PagePublisher,
}

impl PageRenderer {
    pub fn new(publisher: PagePublisher) -> Self {
        Self {
            document: HtmlDocument::default(),
            shown: DashboardViewModel::default(),
            publisher,
        }
    }

    pub fn render(&mut self, view: &DashboardViewModel) -> Result<PathBuf, PersistError> {
        let commands = diff(&self.shown, view);
        dashboard_debug!("applying {} document changes", commands.len());
        self.document.apply_all(commands);
        self.shown = view.clone();
        self.publisher.publish(&self.document.to_html())
    }

    #[cfg(test)]
    pub fn document(&self) -> &HtmlDocument {
        &self.document
    }
}
