pub mod invoice;
pub mod notification;
pub mod order;
pub mod payment;
pub mod step;
