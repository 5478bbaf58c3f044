//! ListMembersHandler - Query handler for the admin member listing.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{MemberDirectory, MemberListing, Page, PageRequest, MEMBERS_PER_PAGE};

#[derive(Debug, Clone, Default)]
pub struct ListMembersQuery {
    /// 1-based; values below 1 read the first page.
    pub page: Option<u32>,
}

pub struct ListMembersHandler {
    directory: Arc<dyn MemberDirectory>,
}

impl ListMembersHandler {
    pub fn new(directory: Arc<dyn MemberDirectory>) -> Self {
        Self { directory }
    }

    pub async fn handle(
        &self,
        query: ListMembersQuery,
    ) -> Result<Page<MemberListing>, DomainError> {
        let request = PageRequest::new(query.page.unwrap_or(1), MEMBERS_PER_PAGE);
        self.directory.list_members(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::AccountId;
    use crate::domain::member::{CompanyDetails, MemberRecord};
    use crate::ports::MemberRepository;

    async fn store_with_members(count: usize) -> InMemoryStore {
        let store = InMemoryStore::new();
        for i in 0..count {
            let details = CompanyDetails {
                company_name: format!("Company {}", i),
                ..Default::default()
            };
            store
                .upsert(&MemberRecord::new(AccountId::new(), details))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn first_page_holds_fifty_members() {
        let handler = ListMembersHandler::new(Arc::new(store_with_members(51).await));

        let page = handler.handle(ListMembersQuery::default()).await.unwrap();

        assert_eq!(page.items.len(), 50);
        assert_eq!(page.total, 51);
        assert_eq!(page.total_pages(), 2);
    }

    #[tokio::test]
    async fn page_zero_reads_first_page() {
        let handler = ListMembersHandler::new(Arc::new(store_with_members(3).await));

        let page = handler.handle(ListMembersQuery { page: Some(0) }).await.unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 3);
    }

    #[tokio::test]
    async fn members_without_account_have_no_email() {
        let handler = ListMembersHandler::new(Arc::new(store_with_members(1).await));

        let page = handler.handle(ListMembersQuery::default()).await.unwrap();

        assert!(page.items[0].email.is_none());
        assert!(page.items[0].payment_status.is_none());
    }
}
