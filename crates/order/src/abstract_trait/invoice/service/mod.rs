mod command;
mod query;

pub use self::command::{
    DynInvoiceCommandService, InvoiceCommandServiceTrait, MockInvoiceCommandServiceTrait,
};
pub use self::query::{DynInvoiceQueryService, InvoiceQueryServiceTrait, MockInvoiceQueryServiceTrait};
