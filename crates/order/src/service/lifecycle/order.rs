use crate::{
    abstract_trait::lifecycle::OrderLifecycleTrait,
    domain::{
        requests::{
            order::{
                CreateOrderRequest, FindAllOrders, TrackOrderQuery, UpdateOrderRequest,
                UpdateOrderStatusRequest,
            },
            validation_error,
        },
        response::{
            order::{CreateOrderResponse, CreationSteps, OrderResponse},
            step::StepOutcome,
        },
    },
    model::{notification::Channel, status::Transition},
    service::{lifecycle::OrderLifecycleOrchestrator, notification::MessageKind},
};
use async_trait::async_trait;
use shared::{
    domain::{
        Caller, Identity,
        responses::{ApiResponse, ApiResponsePagination, Pagination},
    },
    errors::ServiceError,
};
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

#[async_trait]
impl OrderLifecycleTrait for OrderLifecycleOrchestrator {
    async fn create_order(
        &self,
        caller: &Caller,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<CreateOrderResponse>, ServiceError> {
        req.validate().map_err(|e| validation_error(&e))?;

        let customer_id = caller.identity().map(|identity| identity.subject_id.clone());
        let mut order = self.order_command.create_order(req, customer_id).await?;

        info!(
            "✅ Order {} persisted, running follow-up steps",
            order.order_number
        );

        let (invoice, invoice_link) = match self.invoice_command.generate_invoice(&order).await {
            Ok(invoice) => match self.link_invoice(order.order_id, invoice.invoice_id).await {
                Ok(linked) => {
                    order = linked;
                    (StepOutcome::Ok, StepOutcome::Ok)
                }
                Err(e) => (StepOutcome::Ok, StepOutcome::failed(e.to_string())),
            },
            Err(e) => {
                error!(
                    "❌ Invoice generation failed for order {}: {e}",
                    order.order_number
                );
                (
                    StepOutcome::failed(e.to_string()),
                    StepOutcome::skipped("no invoice to link"),
                )
            }
        };

        let sms_notification = self
            .notify(&order, MessageKind::OrderConfirmation, Channel::Sms)
            .await;
        let email_notification = self
            .notify(&order, MessageKind::OrderConfirmation, Channel::Email)
            .await;

        let steps = CreationSteps {
            invoice,
            invoice_link,
            sms_notification,
            email_notification,
        };

        Ok(ApiResponse::success(
            "Order created successfully",
            CreateOrderResponse {
                order: order.into(),
                steps,
            },
        ))
    }

    async fn track_order(
        &self,
        query: &TrackOrderQuery,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let order = self
            .order_query
            .find_by_number_and_email(&query.order_number, &query.email)
            .await?;

        Ok(ApiResponse::success("Order found", order.into()))
    }

    async fn find_all_orders(
        &self,
        identity: &Identity,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        identity.ensure_admin()?;
        req.validate().map_err(|e| validation_error(&e))?;

        let (orders, total) = self.order_query.find_all(req).await?;

        Ok(ApiResponsePagination::success(
            "Orders retrieved successfully",
            orders.into_iter().map(OrderResponse::from).collect(),
            Pagination::new(req.page, req.page_size, total),
        ))
    }

    async fn find_my_orders(
        &self,
        identity: &Identity,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        let orders = self
            .order_query
            .find_by_customer(&identity.subject_id)
            .await?;

        Ok(ApiResponse::success(
            "Orders retrieved successfully",
            orders.into_iter().map(OrderResponse::from).collect(),
        ))
    }

    async fn get_order(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let mut order = self.order_query.find_by_id(id).await?;
        identity.ensure_owner_or_admin(order.customer_id())?;

        if order.invoice_id.is_none() {
            match self.invoice_query.find_by_order_id(id).await {
                Ok(invoice) => {
                    info!(
                        "🔗 Re-linking invoice {} to order {}",
                        invoice.invoice_number, order.order_number
                    );
                    if let Ok(linked) = self.link_invoice(id, invoice.invoice_id).await {
                        order = linked;
                    }
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => warn!("⚠️ Invoice lookup for order {id} failed: {e}"),
            }
        }

        Ok(ApiResponse::success("Order found", order.into()))
    }

    async fn update_order(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        identity.ensure_admin()?;
        req.validate().map_err(|e| validation_error(&e))?;

        let before = self.order_query.find_by_id(id).await?;
        let order = self.order_command.update_order(id, req).await?;

        if order.status != before.status {
            self.notify_status_change(&order).await;
        }

        Ok(ApiResponse::success("Order updated successfully", order.into()))
    }

    async fn update_order_status(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        identity.ensure_admin()?;
        req.validate().map_err(|e| validation_error(&e))?;

        let (order, transition) = self
            .order_command
            .update_order_status(id, req.status, req.tracking_number.clone())
            .await?;

        let message = match transition {
            Transition::Applied => {
                self.notify_status_change(&order).await;
                "Order status updated successfully"
            }
            Transition::Unchanged => "Order status unchanged",
        };

        Ok(ApiResponse::success(message, order.into()))
    }
}
