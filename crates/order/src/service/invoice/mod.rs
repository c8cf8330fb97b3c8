mod command;
mod document;
mod query;

pub use self::command::{InvoiceCommandService, InvoiceCommandServiceDeps};
pub use self::document::render_document;
pub use self::query::{InvoiceQueryService, InvoiceQueryServiceDeps};
