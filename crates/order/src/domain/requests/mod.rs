pub mod invoice;
pub mod notification;
pub mod order;
pub mod payment;
mod validation;

pub use self::validation::validation_error;
