use crate::{
    abstract_trait::{
        invoice::repository::{InvoiceCommandRepositoryTrait, InvoiceQueryRepositoryTrait},
        notification::NotificationRepositoryTrait,
        order::repository::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
        payment::PaymentEventRepositoryTrait,
    },
    domain::requests::{
        invoice::{CreateInvoiceRecordRequest, FindAllInvoices},
        order::{CreateOrderRecordRequest, FindAllOrders, UpdateOrderRecordRequest},
    },
    model::{
        invoice::Invoice,
        notification::NotificationRecord,
        order::Order,
        payment_event::ProcessedPaymentEvent,
        status::{InvoiceStatus, OrderStatus, PaymentStatus},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::errors::RepositoryError;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

const FIRST_ORDER_NUMBER: u64 = 1001;

#[derive(Default)]
struct Tables {
    orders: HashMap<Uuid, Order>,
    invoices: HashMap<Uuid, Invoice>,
    payment_events: HashMap<String, ProcessedPaymentEvent>,
    notifications: Vec<NotificationRecord>,
}

/// Process-local store implementing every repository trait. Used when no
/// database is configured and by the test harness.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    next_order_number: Arc<AtomicU64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            next_order_number: Arc::new(AtomicU64::new(FIRST_ORDER_NUMBER)),
        }
    }

    pub async fn notifications(&self) -> Vec<NotificationRecord> {
        self.tables.read().await.notifications.clone()
    }

    pub async fn processed_events(&self) -> usize {
        self.tables.read().await.payment_events.len()
    }
}

fn matches_search(haystacks: &[&str], search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    haystacks
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
}

fn paginate<T: Clone>(mut rows: Vec<T>, page: i32, page_size: i32) -> (Vec<T>, i64) {
    let total = rows.len() as i64;
    let size = page_size.max(1) as usize;
    let skip = (page.max(1) as usize - 1) * size;
    let page_rows = if skip >= rows.len() {
        Vec::new()
    } else {
        rows.drain(skip..).take(size).collect()
    };
    (page_rows, total)
}

#[async_trait]
impl OrderCommandRepositoryTrait for MemoryStore {
    async fn create_order(&self, req: &CreateOrderRecordRequest) -> Result<Order, RepositoryError> {
        let number = self.next_order_number.fetch_add(1, Ordering::SeqCst);

        let order = Order {
            order_id: req.order_id,
            order_number: format!("GF-{number}"),
            customer: req.customer.clone(),
            items: req.items.clone(),
            totals: req.totals,
            shipping_address: req.shipping_address.clone(),
            billing_address: req.billing_address.clone(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            invoice_id: None,
            tracking_number: None,
            notes: req.notes.clone(),
            estimated_delivery: req.estimated_delivery,
            status_updated_at: req.created_at,
            created_at: req.created_at,
            updated_at: req.created_at,
        };

        let mut tables = self.tables.write().await;
        if tables.orders.contains_key(&order.order_id) {
            return Err(RepositoryError::AlreadyExists(order.order_id.to_string()));
        }
        tables.orders.insert(order.order_id, order.clone());

        info!("✅ Created order {} ({})", order.order_number, order.order_id);
        Ok(order)
    }

    async fn update_order(&self, req: &UpdateOrderRecordRequest) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        let order = tables
            .orders
            .get_mut(&req.order_id)
            .ok_or(RepositoryError::NotFound)?;

        if order.status != req.expected_status {
            warn!(
                "⚠️ Order {} changed status concurrently (expected {})",
                req.order_id, req.expected_status
            );
            return Err(RepositoryError::Conflict(format!(
                "order {} was modified concurrently",
                req.order_id
            )));
        }

        if let Some(status) = req.status {
            order.status = status;
        }
        if let Some(payment_status) = req.payment_status {
            order.payment_status = payment_status;
        }
        if let Some(tracking_number) = &req.tracking_number {
            order.tracking_number = Some(tracking_number.clone());
        }
        if let Some(invoice_id) = req.invoice_id {
            order.invoice_id = Some(invoice_id);
        }
        if let Some(notes) = &req.notes {
            order.notes = Some(notes.clone());
        }
        if let Some(at) = req.status_updated_at {
            order.status_updated_at = at;
        }
        order.updated_at = req.updated_at;

        Ok(order.clone())
    }

    async fn clear_invoice(
        &self,
        order_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&order_id) {
            Some(order) if order.invoice_id == Some(invoice_id) => {
                order.invoice_id = None;
                order.updated_at = Utc::now();
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for MemoryStore {
    async fn find_all(&self, req: &FindAllOrders) -> Result<(Vec<Order>, i64), RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| req.status.is_none_or(|status| order.status == status))
            .filter(|order| {
                matches_search(
                    &[
                        &order.order_number,
                        &order.customer.name,
                        &order.customer.email,
                    ],
                    &req.search,
                )
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(paginate(rows, req.page, req.page_size))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn find_by_number(&self, order_number: &str) -> Result<Option<Order>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .orders
            .values()
            .find(|order| order.order_number == order_number)
            .cloned())
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| order.customer_id() == Some(customer_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl InvoiceCommandRepositoryTrait for MemoryStore {
    async fn create_invoice(
        &self,
        req: &CreateInvoiceRecordRequest,
    ) -> Result<Invoice, RepositoryError> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .invoices
            .values()
            .find(|invoice| invoice.order_id == req.order_id)
        {
            info!(
                "ℹ️ Invoice {} already exists for order {}",
                existing.invoice_number, existing.order_number
            );
            return Ok(existing.clone());
        }

        if tables
            .invoices
            .values()
            .any(|invoice| invoice.invoice_number == req.invoice_number)
        {
            return Err(RepositoryError::AlreadyExists(req.invoice_number.clone()));
        }

        let invoice = Invoice {
            invoice_id: req.invoice_id,
            invoice_number: req.invoice_number.clone(),
            order_id: req.order_id,
            order_number: req.order_number.clone(),
            customer: req.customer.clone(),
            items: req.items.clone(),
            totals: req.totals,
            status: InvoiceStatus::Draft,
            due_date: req.due_date,
            notes: req.notes.clone(),
            created_at: req.created_at,
            updated_at: req.created_at,
        };
        tables.invoices.insert(invoice.invoice_id, invoice.clone());

        info!(
            "✅ Created invoice {} for order {}",
            invoice.invoice_number, invoice.order_number
        );
        Ok(invoice)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Invoice, RepositoryError> {
        let mut tables = self.tables.write().await;
        let invoice = tables
            .invoices
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        invoice.status = status;
        invoice.updated_at = updated_at;
        Ok(invoice.clone())
    }

    async fn delete_invoice(&self, id: Uuid) -> Result<Invoice, RepositoryError> {
        self.tables
            .write()
            .await
            .invoices
            .remove(&id)
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl InvoiceQueryRepositoryTrait for MemoryStore {
    async fn find_all(
        &self,
        req: &FindAllInvoices,
    ) -> Result<(Vec<Invoice>, i64), RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Invoice> = tables
            .invoices
            .values()
            .filter(|invoice| req.status.is_none_or(|status| invoice.status == status))
            .filter(|invoice| {
                matches_search(
                    &[
                        &invoice.invoice_number,
                        &invoice.order_number,
                        &invoice.customer.name,
                        &invoice.customer.email,
                    ],
                    &req.search,
                )
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(paginate(rows, req.page, req.page_size))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, RepositoryError> {
        Ok(self.tables.read().await.invoices.get(&id).cloned())
    }

    async fn find_by_order_id(&self, order_id: Uuid) -> Result<Option<Invoice>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .invoices
            .values()
            .find(|invoice| invoice.order_id == order_id)
            .cloned())
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Invoice>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Invoice> = tables
            .invoices
            .values()
            .filter(|invoice| invoice.customer_id() == Some(customer_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl PaymentEventRepositoryTrait for MemoryStore {
    async fn is_processed(&self, event_id: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .payment_events
            .contains_key(event_id))
    }

    async fn record_processed(&self, event: &ProcessedPaymentEvent) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .payment_events
            .entry(event.event_id.clone())
            .or_insert_with(|| event.clone());
        Ok(())
    }
}

#[async_trait]
impl NotificationRepositoryTrait for MemoryStore {
    async fn create(&self, record: &NotificationRecord) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .notifications
            .iter()
            .all(|existing| existing.notification_id != record.notification_id)
        {
            tables.notifications.push(record.clone());
        }
        Ok(())
    }

    async fn find_by_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<NotificationRecord>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .notifications
            .iter()
            .filter(|record| record.order_id == Some(order_id))
            .cloned()
            .collect())
    }
}
