mod identity;
pub mod responses;

pub use self::identity::{Caller, Identity, Role};
