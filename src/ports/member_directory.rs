//! MemberDirectory port (read side) - paged admin listings.
//!
//! Listings join member, account and payment rows so an administrator can
//! see who registered and whether they have paid.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{AccountId, DomainError, Money, PaymentId, Timestamp};
use crate::domain::member::CompanyDetails;
use crate::domain::payment::{PaymentMethod, PaymentStatus};

pub const MEMBERS_PER_PAGE: u32 = 50;
pub const PAYMENTS_PER_PAGE: u32 = 20;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Pages below 1 are clamped to 1.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            (self.total + u64::from(self.per_page) - 1) / u64::from(self.per_page)
        }
    }
}

/// Member row joined with its account and most recent payment.
#[derive(Debug, Clone, Serialize)]
pub struct MemberListing {
    pub account_id: AccountId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub details: CompanyDetails,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_amount: Option<Money>,
    pub created_at: Timestamp,
}

/// Payment row joined with its account and company name.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentListing {
    pub payment_id: PaymentId,
    pub account_id: AccountId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub company_name: Option<String>,
    pub method: PaymentMethod,
    pub amount: Money,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: Timestamp,
}

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Newest members first.
    async fn list_members(&self, page: PageRequest) -> Result<Page<MemberListing>, DomainError>;

    /// Newest payments first, optionally filtered by status.
    async fn list_payments(
        &self,
        status: Option<PaymentStatus>,
        page: PageRequest,
    ) -> Result<Page<PaymentListing>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_clamps_to_first_page() {
        let request = PageRequest::new(0, MEMBERS_PER_PAGE);
        assert_eq!(request.page, 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(3, PAYMENTS_PER_PAGE).offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<()> = Page::new(vec![], 51, PageRequest::new(1, 50));
        assert_eq!(page.total_pages(), 2);

        let empty: Page<()> = Page::new(vec![], 0, PageRequest::new(1, 50));
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn member_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn MemberDirectory) {}
    }
}
