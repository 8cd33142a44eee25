//! Dashboard core: overview parsing, pure state machine, view model and
//! document rendering.
mod document;
mod effect;
mod msg;
mod record;
mod render;
mod state;
mod update;
mod view_model;

pub use document::{escape_html, HtmlDocument, HtmlRow, HtmlTable, RenderTarget};
pub use effect::Effect;
pub use msg::Msg;
pub use record::{JobCollection, JobRecord, KeyedRecord, ParseError};
pub use render::{diff, render, DocumentCommand};
pub use state::{DashboardState, LoadError, LoadErrorKind, LoadStatus};
pub use update::update;
pub use view_model::{DashboardViewModel, JobRowView, ProgressView, TableView, TABLE_HEADER};
