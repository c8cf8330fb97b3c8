mod command;
mod query;

pub use self::command::{DynOrderCommandService, MockOrderCommandServiceTrait, OrderCommandServiceTrait};
pub use self::query::{DynOrderQueryService, MockOrderQueryServiceTrait, OrderQueryServiceTrait};
