use crate::{
    abstract_trait::lifecycle::InvoiceLifecycleTrait,
    domain::{
        requests::{
            invoice::{FindAllInvoices, SendInvoiceRequest, UpdateInvoiceStatusRequest},
            order::UpdateOrderRequest,
            validation_error,
        },
        response::{
            invoice::{
                GeneratedInvoiceResponse, InvoiceDocument, InvoiceResponse,
                InvoiceStatusUpdateResponse,
            },
            notification::NotificationResult,
            step::StepOutcome,
        },
    },
    service::{invoice::render_document, lifecycle::OrderLifecycleOrchestrator},
};
use async_trait::async_trait;
use shared::{
    domain::{
        Identity,
        responses::{ApiResponse, ApiResponsePagination, Pagination},
    },
    errors::ServiceError,
};
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

#[async_trait]
impl InvoiceLifecycleTrait for OrderLifecycleOrchestrator {
    async fn generate_invoice(
        &self,
        identity: &Identity,
        order_id: Uuid,
    ) -> Result<ApiResponse<GeneratedInvoiceResponse>, ServiceError> {
        identity.ensure_admin()?;

        let order = self.order_query.find_by_id(order_id).await?;
        let invoice = self.invoice_command.generate_invoice(&order).await?;

        let order_link = if order.invoice_id == Some(invoice.invoice_id) {
            StepOutcome::Ok
        } else {
            match self.link_invoice(order_id, invoice.invoice_id).await {
                Ok(_) => StepOutcome::Ok,
                Err(e) => StepOutcome::failed(e.to_string()),
            }
        };

        Ok(ApiResponse::success(
            "Invoice generated successfully",
            GeneratedInvoiceResponse {
                invoice: invoice.into(),
                order_link,
            },
        ))
    }

    async fn find_all_invoices(
        &self,
        identity: &Identity,
        req: &FindAllInvoices,
    ) -> Result<ApiResponsePagination<Vec<InvoiceResponse>>, ServiceError> {
        identity.ensure_admin()?;
        req.validate().map_err(|e| validation_error(&e))?;

        let (invoices, total) = self.invoice_query.find_all(req).await?;

        Ok(ApiResponsePagination::success(
            "Invoices retrieved successfully",
            invoices.into_iter().map(InvoiceResponse::from).collect(),
            Pagination::new(req.page, req.page_size, total),
        ))
    }

    async fn find_my_invoices(
        &self,
        identity: &Identity,
    ) -> Result<ApiResponse<Vec<InvoiceResponse>>, ServiceError> {
        let invoices = self
            .invoice_query
            .find_by_customer(&identity.subject_id)
            .await?;

        Ok(ApiResponse::success(
            "Invoices retrieved successfully",
            invoices.into_iter().map(InvoiceResponse::from).collect(),
        ))
    }

    async fn get_invoice(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<ApiResponse<InvoiceResponse>, ServiceError> {
        let invoice = self.invoice_query.find_by_id(id).await?;
        identity.ensure_owner_or_admin(invoice.customer_id())?;

        Ok(ApiResponse::success("Invoice found", invoice.into()))
    }

    async fn get_invoice_by_order(
        &self,
        identity: &Identity,
        order_id: Uuid,
    ) -> Result<ApiResponse<InvoiceResponse>, ServiceError> {
        let invoice = self.invoice_query.find_by_order_id(order_id).await?;
        identity.ensure_owner_or_admin(invoice.customer_id())?;

        Ok(ApiResponse::success("Invoice found", invoice.into()))
    }

    async fn update_invoice_status(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateInvoiceStatusRequest,
    ) -> Result<ApiResponse<InvoiceStatusUpdateResponse>, ServiceError> {
        identity.ensure_admin()?;

        let invoice = self
            .invoice_command
            .update_invoice_status(id, req.status)
            .await?;

        let order_sync = match req.status.order_payment_status() {
            None => StepOutcome::skipped(format!("{} invoices do not affect the order", req.status)),
            Some(payment_status) => {
                let patch = UpdateOrderRequest {
                    payment_status: Some(payment_status),
                    ..Default::default()
                };

                match self.order_command.update_order(invoice.order_id, &patch).await {
                    Ok(order) => {
                        info!(
                            "🔄 Order {} payment status is now {payment_status}",
                            order.order_number
                        );
                        StepOutcome::Ok
                    }
                    Err(e) => {
                        error!(
                            "❌ Invoice {} updated but order {} was not synced: {e}",
                            invoice.invoice_number, invoice.order_id
                        );
                        StepOutcome::failed(e.to_string())
                    }
                }
            }
        };

        Ok(ApiResponse::success(
            "Invoice status updated successfully",
            InvoiceStatusUpdateResponse {
                invoice: invoice.into(),
                order_sync,
            },
        ))
    }

    async fn send_invoice(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &SendInvoiceRequest,
    ) -> Result<ApiResponse<NotificationResult>, ServiceError> {
        identity.ensure_admin()?;
        req.validate().map_err(|e| validation_error(&e))?;

        let invoice = self.invoice_query.find_by_id(id).await?;
        let destination = req
            .email
            .clone()
            .unwrap_or_else(|| invoice.customer.email.clone());

        let result = self
            .invoice_command
            .send_invoice_email(&invoice, &destination, req.message.clone())
            .await?;

        Ok(ApiResponse::success("Invoice sent successfully", result))
    }

    async fn download_invoice(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<InvoiceDocument, ServiceError> {
        let invoice = self.invoice_query.find_by_id(id).await?;
        identity.ensure_owner_or_admin(invoice.customer_id())?;

        render_document(&invoice)
    }

    async fn delete_invoice(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<ApiResponse<InvoiceResponse>, ServiceError> {
        identity.ensure_admin()?;

        let invoice = self.invoice_command.delete_invoice(id).await?;

        if let Err(e) = self
            .order_command
            .unlink_invoice(invoice.order_id, invoice.invoice_id)
            .await
        {
            warn!(
                "⚠️ Invoice {} deleted but order {} still references it: {e}",
                invoice.invoice_number, invoice.order_id
            );
        }

        Ok(ApiResponse::success(
            "Invoice deleted successfully",
            invoice.into(),
        ))
    }
}
