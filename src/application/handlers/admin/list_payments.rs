//! ListPaymentsHandler - Query handler for the admin payment listing.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::payment::PaymentStatus;
use crate::ports::{MemberDirectory, Page, PageRequest, PaymentListing, PAYMENTS_PER_PAGE};

#[derive(Debug, Clone, Default)]
pub struct ListPaymentsQuery {
    /// `None` lists every status.
    pub status: Option<PaymentStatus>,
    pub page: Option<u32>,
}

pub struct ListPaymentsHandler {
    directory: Arc<dyn MemberDirectory>,
}

impl ListPaymentsHandler {
    pub fn new(directory: Arc<dyn MemberDirectory>) -> Self {
        Self { directory }
    }

    pub async fn handle(
        &self,
        query: ListPaymentsQuery,
    ) -> Result<Page<PaymentListing>, DomainError> {
        let request = PageRequest::new(query.page.unwrap_or(1), PAYMENTS_PER_PAGE);
        self.directory.list_payments(query.status, request).await
    }
}
