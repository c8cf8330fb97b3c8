pub mod invoice;
pub mod lifecycle;
pub mod notification;
pub mod order;
pub mod payment;
