mod command;
mod query;
mod totals;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::query::{OrderQueryService, OrderQueryServiceDeps};
pub use self::totals::compute_totals;
