//! Item request service: want-ads and their answering items.

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::models::{Item, ItemRequest, NewItemRequest};
use crate::repositories::{ItemRepository, Page, RequestRepository, UserRepository};

/// An item request joined with the items listed in answer to it.
#[derive(Debug, Clone)]
pub struct RequestWithItems {
    pub request: ItemRequest,
    pub items: Vec<Item>,
}

/// Item request service.
#[derive(Clone)]
pub struct RequestService {
    requests: Arc<dyn RequestRepository>,
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl RequestService {
    pub fn new(
        requests: Arc<dyn RequestRepository>,
        items: Arc<dyn ItemRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            requests,
            items,
            users,
            clock,
        }
    }

    /// Creates an item request for an existing user, stamped with "now".
    pub async fn create(&self, requester_id: i32, description: String) -> AppResult<ItemRequest> {
        self.get_existing_user(requester_id).await?;
        self.requests
            .create(NewItemRequest {
                description,
                requester_id,
                created: self.clock.now(),
            })
            .await
    }

    /// A single request with the items answering it.
    pub async fn get_by_id(&self, user_id: i32, request_id: i32) -> AppResult<RequestWithItems> {
        let request = self.requests.find_by_id(request_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Item request with id = {} not found.", request_id))
        })?;
        self.get_existing_user(user_id).await?;
        self.with_items(request).await
    }

    /// The acting user's own requests.
    pub async fn get_own(&self, user_id: i32) -> AppResult<Vec<RequestWithItems>> {
        self.get_existing_user(user_id).await?;
        let requests = self.requests.find_by_requester(user_id).await?;
        let mut result = Vec::with_capacity(requests.len());
        for request in requests {
            result.push(self.with_items(request).await?);
        }
        Ok(result)
    }

    /// Other users' requests, paged, oldest first.
    pub async fn get_from_others(
        &self,
        user_id: i32,
        page: Page,
    ) -> AppResult<Vec<RequestWithItems>> {
        self.get_existing_user(user_id).await?;
        let requests = self.requests.find_all_except(user_id, page).await?;
        let mut result = Vec::with_capacity(requests.len());
        for request in requests {
            result.push(self.with_items(request).await?);
        }
        Ok(result)
    }

    async fn with_items(&self, request: ItemRequest) -> AppResult<RequestWithItems> {
        let items = self.items.find_by_request(request.id).await?;
        Ok(RequestWithItems { request, items })
    }

    async fn get_existing_user(&self, user_id: i32) -> AppResult<()> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("User with id = {} not found.", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{NewItem, NewUser};
    use crate::repositories::Repositories;
    use chrono::NaiveDate;

    fn noon() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    async fn fixture() -> (Repositories, RequestService, i32, i32) {
        let repos = Repositories::in_memory();
        let service = RequestService::new(
            repos.requests.clone(),
            repos.items.clone(),
            repos.users.clone(),
            Arc::new(FixedClock(noon())),
        );
        let requester = repos
            .users
            .create(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .unwrap()
            .id;
        let owner = repos
            .users
            .create(NewUser {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            })
            .await
            .unwrap()
            .id;
        (repos, service, requester, owner)
    }

    #[tokio::test]
    async fn created_request_is_stamped_with_now() {
        let (_, service, requester, _) = fixture().await;
        let request = service
            .create(requester, "Need a drill".to_string())
            .await
            .unwrap();
        assert_eq!(request.created, noon());
        assert_eq!(request.requester_id, requester);
    }

    #[tokio::test]
    async fn answering_items_are_found_by_reverse_lookup() {
        let (repos, service, requester, owner) = fixture().await;
        let request = service
            .create(requester, "Need a drill".to_string())
            .await
            .unwrap();
        let item = repos
            .items
            .create(NewItem {
                name: "Drill".to_string(),
                description: "Answers the ad".to_string(),
                available: true,
                owner_id: owner,
                request_id: Some(request.id),
            })
            .await
            .unwrap();

        let fetched = service.get_by_id(owner, request.id).await.unwrap();
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].id, item.id);
    }

    #[tokio::test]
    async fn others_listing_excludes_own_requests() {
        let (_, service, requester, owner) = fixture().await;
        service
            .create(requester, "Need a drill".to_string())
            .await
            .unwrap();
        service
            .create(owner, "Need a ladder".to_string())
            .await
            .unwrap();

        let own = service.get_own(requester).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].request.description, "Need a drill");

        let others = service
            .get_from_others(requester, Page::from_query(0, 10))
            .await
            .unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].request.description, "Need a ladder");
    }

    #[tokio::test]
    async fn missing_request_is_not_found() {
        let (_, service, requester, _) = fixture().await;
        let err = service.get_by_id(requester, 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
