mod command;
mod query;

pub use self::command::{
    DynInvoiceCommandRepository, InvoiceCommandRepositoryTrait, MockInvoiceCommandRepositoryTrait,
};
pub use self::query::{
    DynInvoiceQueryRepository, InvoiceQueryRepositoryTrait, MockInvoiceQueryRepositoryTrait,
};
