mod invoice;
mod memory;
mod notification;
mod order;
mod payment_event;

pub use self::invoice::{InvoiceCommandRepository, InvoiceQueryRepository};
pub use self::memory::MemoryStore;
pub use self::notification::NotificationRepository;
pub use self::order::{OrderCommandRepository, OrderQueryRepository};
pub use self::payment_event::PaymentEventRepository;
