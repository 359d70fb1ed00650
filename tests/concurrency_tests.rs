//! Interleaved writes against one profile
//!
//! The store below yields to the scheduler before every call, so two
//! operations joined on one task interleave at each storage access.

use profiles::prelude::*;
use std::sync::Arc;

struct Yielding<T: Entity>(InMemoryStore<T>);

#[async_trait]
impl<T: Entity> QueryExecutor<T> for Yielding<T> {
    async fn execute_query(
        &self,
        predicate: &Predicate,
        order_by: &OrderBy,
        limit: usize,
    ) -> Result<Vec<T>, StorageError> {
        tokio::task::yield_now().await;
        self.0.execute_query(predicate, order_by, limit).await
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for Yielding<T> {
    async fn create(&self, entity: T) -> Result<T, StorageError> {
        tokio::task::yield_now().await;
        self.0.create(entity).await
    }

    async fn get(&self, id: i64) -> Result<Option<T>, StorageError> {
        tokio::task::yield_now().await;
        self.0.get(id).await
    }

    async fn list(&self) -> Result<Vec<T>, StorageError> {
        tokio::task::yield_now().await;
        self.0.list().await
    }

    async fn update(&self, entity: T) -> Result<T, StorageError> {
        tokio::task::yield_now().await;
        self.0.update(entity).await
    }

    async fn modify<'e>(&self, id: i64, edit: RowEdit<'e, T>) -> Result<Option<T>, StorageError> {
        tokio::task::yield_now().await;
        self.0.modify(id, edit).await
    }

    async fn create_if_absent(
        &self,
        entity: T,
        existing: &Predicate,
    ) -> Result<Option<T>, StorageError> {
        tokio::task::yield_now().await;
        self.0.create_if_absent(entity, existing).await
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        tokio::task::yield_now().await;
        self.0.delete(id).await
    }

    async fn find(&self, predicate: &Predicate) -> Result<Vec<T>, StorageError> {
        tokio::task::yield_now().await;
        self.0.find(predicate).await
    }
}

async fn fixture() -> (ProfileService, InMemoryStore<Profile>) {
    let profiles = InMemoryStore::<Profile>::new();
    let mut stores = Stores::in_memory();
    stores.profiles = Arc::new(Yielding(profiles.clone()));
    stores.courses.create(Course::new("Physics")).await.unwrap();
    stores
        .interests
        .create(Interest::new("Backend", "backend"))
        .await
        .unwrap();

    let codec = Arc::new(CursorCodec::from_secret("concurrency-secret", "HS256").unwrap());
    (ProfileService::new(stores, codec), profiles)
}

fn input(user_guid: Uuid, display_name: &str) -> CreateProfileInput {
    CreateProfileInput {
        user_guid,
        display_name: display_name.to_string(),
        bio: None,
    }
}

#[tokio::test]
async fn test_concurrent_links_both_persist() {
    let (service, profiles) = fixture().await;
    let view = service
        .create_profile(input(Uuid::new_v4(), "Ana"))
        .await
        .unwrap();

    let (course, interest) = tokio::join!(
        service.link_course(view.guid, 1),
        service.link_interest(view.guid, 1)
    );
    course.unwrap();
    interest.unwrap();

    let stored = profiles.get(view.id).await.unwrap().unwrap();
    assert_eq!(stored.course_ids, vec![1]);
    assert_eq!(stored.interest_ids, vec![1]);
}

#[tokio::test]
async fn test_concurrent_link_and_unlink_keep_other_relation() {
    let (service, profiles) = fixture().await;
    let view = service
        .create_profile(input(Uuid::new_v4(), "Ana"))
        .await
        .unwrap();
    service.link_interest(view.guid, 1).await.unwrap();

    let (course, interest) = tokio::join!(
        service.link_course(view.guid, 1),
        service.unlink_interest(view.guid, 1)
    );
    course.unwrap();
    interest.unwrap();

    let stored = profiles.get(view.id).await.unwrap().unwrap();
    assert_eq!(stored.course_ids, vec![1]);
    assert!(stored.interest_ids.is_empty());
}

#[tokio::test]
async fn test_same_link_twice_conflicts_once() {
    let (service, profiles) = fixture().await;
    let view = service
        .create_profile(input(Uuid::new_v4(), "Ana"))
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        service.link_course(view.guid, 1),
        service.link_course(view.guid, 1)
    );
    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let conflict = outcomes.into_iter().find_map(|outcome| outcome.err()).unwrap();
    assert_eq!(conflict.error_code(), "COURSE_LINK_CONFLICT");

    let stored = profiles.get(view.id).await.unwrap().unwrap();
    assert_eq!(stored.course_ids, vec![1]);
}

#[tokio::test]
async fn test_concurrent_creates_for_one_user() {
    let (service, profiles) = fixture().await;
    let user_guid = Uuid::new_v4();

    let (first, second) = tokio::join!(
        service.create_profile(input(user_guid, "Ana")),
        service.create_profile(input(user_guid, "Ana Twin"))
    );
    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let conflict = outcomes.into_iter().find_map(|outcome| outcome.err()).unwrap();
    assert_eq!(conflict.error_code(), "PROFILE_CONFLICT");

    assert_eq!(profiles.len().unwrap(), 1);
}
