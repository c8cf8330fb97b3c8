pub mod invoice;
pub mod notification;
pub mod order;
pub mod payment_event;
pub mod status;
