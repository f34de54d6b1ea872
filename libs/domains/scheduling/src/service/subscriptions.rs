use std::sync::Arc;
use tracing::instrument;

use super::{deleted, found};
use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{
    CreateSubscription, ScheduleWithOwner, SubscribedSchedule, Subscriber, Subscription,
    SubscriptionDetails, SubscriptionType,
};
use crate::pagination::{Page, PageParams};
use crate::policy::{self, Principal};
use crate::repository::{ScheduleRepository, SubscriptionRepository, UserRepository};

#[derive(Clone)]
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    schedules: Arc<dyn ScheduleRepository>,
    users: Arc<dyn UserRepository>,
}

impl SubscriptionService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        schedules: Arc<dyn ScheduleRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            subscriptions,
            schedules,
            users,
        }
    }

    async fn load(&self, id: i32) -> SchedulingResult<SubscriptionDetails> {
        found(self.subscriptions.get_by_id(id).await?, "Subscription", id)
    }

    async fn load_schedule(&self, id: i32) -> SchedulingResult<ScheduleWithOwner> {
        found(self.schedules.get_by_id(id).await?, "Schedule", id)
    }

    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_subscriptions(
        &self,
        principal: &Principal,
        params: PageParams,
    ) -> SchedulingResult<Page<SubscriptionDetails>> {
        policy::require_superuser(principal)?;

        let window = params.window();
        let subscriptions = self.subscriptions.list(window).await?;
        let count = self.subscriptions.count().await?;

        Ok(window.paginate(subscriptions, count))
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn get_subscription(
        &self,
        principal: &Principal,
        id: i32,
    ) -> SchedulingResult<SubscriptionDetails> {
        let subscription = self.load(id).await?;
        policy::subscriber_or_superuser(principal, subscription.subscriber.id)?;

        Ok(subscription)
    }

    /// Admin route. Missing user or schedule surfaces as `MissingReference`,
    /// a duplicate link or second owner as `Conflict`.
    #[instrument(skip(self, input), fields(principal_id = principal.id))]
    pub async fn create_subscription(
        &self,
        principal: &Principal,
        input: CreateSubscription,
    ) -> SchedulingResult<Subscription> {
        policy::require_superuser(principal)?;

        self.subscriptions.create(input).await
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn delete_subscription(&self, principal: &Principal, id: i32) -> SchedulingResult<()> {
        let subscription = self.load(id).await?;
        policy::subscriber_or_superuser(principal, subscription.subscriber.id)?;
        policy::can_unsubscribe(subscription.subscription_type)?;

        deleted(self.subscriptions.delete(id).await?, "Subscription", id)
    }

    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_subscribers(
        &self,
        principal: &Principal,
        schedule_id: i32,
        params: PageParams,
    ) -> SchedulingResult<Page<Subscriber>> {
        let schedule = self.load_schedule(schedule_id).await?;
        policy::can_manage_schedule(principal, &schedule.schedule)?;

        let window = params.window();
        let subscribers = self
            .subscriptions
            .list_by_schedule(schedule_id, window)
            .await?;
        let count = self.subscriptions.count_by_schedule(schedule_id).await?;

        Ok(window.paginate(subscribers, count))
    }

    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_for_subscriber(
        &self,
        principal: &Principal,
        subscriber_id: i32,
        params: PageParams,
    ) -> SchedulingResult<Page<SubscribedSchedule>> {
        found(self.users.get_by_id(subscriber_id).await?, "User", subscriber_id)?;
        policy::self_or_superuser(principal, subscriber_id)?;

        self.subscribed_page(subscriber_id, None, params).await
    }

    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_mine_by_type(
        &self,
        principal: &Principal,
        subscription_type: SubscriptionType,
        params: PageParams,
    ) -> SchedulingResult<Page<SubscribedSchedule>> {
        self.subscribed_page(principal.id, Some(subscription_type), params)
            .await
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn follow(
        &self,
        principal: &Principal,
        schedule_id: i32,
    ) -> SchedulingResult<Subscription> {
        let schedule = self.load_schedule(schedule_id).await?;
        policy::can_follow(principal, &schedule.schedule)?;

        self.subscriptions
            .create(CreateSubscription {
                subscriber_id: principal.id,
                schedule_id,
                subscription_type: SubscriptionType::Follower,
            })
            .await
            .map_err(|e| match e {
                SchedulingError::Conflict(_) => SchedulingError::Conflict(format!(
                    "Already subscribed to schedule {}",
                    schedule_id
                )),
                other => other,
            })
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn delete_mine(&self, principal: &Principal, id: i32) -> SchedulingResult<()> {
        let subscription = self.load(id).await?;
        policy::is_subscriber(principal, subscription.subscriber.id)?;
        policy::can_unsubscribe(subscription.subscription_type)?;

        deleted(self.subscriptions.delete(id).await?, "Subscription", id)
    }

    async fn subscribed_page(
        &self,
        subscriber_id: i32,
        subscription_type: Option<SubscriptionType>,
        params: PageParams,
    ) -> SchedulingResult<Page<SubscribedSchedule>> {
        let window = params.window();
        let subscriptions = self
            .subscriptions
            .list_by_subscriber(subscriber_id, subscription_type, window)
            .await?;
        let count = self
            .subscriptions
            .count_by_subscriber(subscriber_id, subscription_type)
            .await?;

        Ok(window.paginate(subscriptions, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Schedule, ScheduleType, User};
    use crate::repository::{MockScheduleRepository, MockSubscriptionRepository, MockUserRepository};
    use chrono::Utc;
    use mockall::predicate::*;

    fn user(id: i32) -> User {
        let now = Utc::now();
        User {
            id,
            email: format!("user{}@example.com", id),
            is_active: true,
            is_superuser: false,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn schedule(id: i32, owner_id: i32, schedule_type: ScheduleType) -> Schedule {
        let now = Utc::now();
        Schedule {
            id,
            name: "Gym".to_string(),
            description: None,
            schedule_type,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn with_owner(id: i32, owner_id: i32, schedule_type: ScheduleType) -> ScheduleWithOwner {
        ScheduleWithOwner {
            schedule: schedule(id, owner_id, schedule_type),
            owner: user(owner_id),
        }
    }

    fn details(id: i32, subscriber_id: i32, subscription_type: SubscriptionType) -> SubscriptionDetails {
        let now = Utc::now();
        SubscriptionDetails {
            id,
            subscription_type,
            created_at: now,
            updated_at: now,
            subscriber: user(subscriber_id),
            schedule: schedule(1, 1, ScheduleType::Public),
        }
    }

    fn stored(input: CreateSubscription) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: 30,
            subscriber_id: input.subscriber_id,
            schedule_id: input.schedule_id,
            subscription_type: input.subscription_type,
            created_at: now,
            updated_at: now,
        }
    }

    struct Mocks {
        subscriptions: MockSubscriptionRepository,
        schedules: MockScheduleRepository,
        users: MockUserRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                subscriptions: MockSubscriptionRepository::new(),
                schedules: MockScheduleRepository::new(),
                users: MockUserRepository::new(),
            }
        }

        fn service(self) -> SubscriptionService {
            SubscriptionService::new(
                Arc::new(self.subscriptions),
                Arc::new(self.schedules),
                Arc::new(self.users),
            )
        }
    }

    #[tokio::test]
    async fn test_follow_public_schedule_creates_follower_link() {
        let mut mocks = Mocks::new();
        mocks
            .schedules
            .expect_get_by_id()
            .returning(|id| Ok(Some(with_owner(id, 1, ScheduleType::Public))));
        mocks
            .subscriptions
            .expect_create()
            .withf(|input: &CreateSubscription| {
                input.subscriber_id == 2
                    && input.schedule_id == 5
                    && input.subscription_type == SubscriptionType::Follower
            })
            .times(1)
            .returning(|input| Ok(stored(input)));

        let created = mocks.service().follow(&Principal::user(2), 5).await.unwrap();

        assert_eq!(created.subscription_type, SubscriptionType::Follower);
    }

    #[tokio::test]
    async fn test_follow_own_or_private_schedule_is_forbidden() {
        let mut mocks = Mocks::new();
        mocks.schedules.expect_get_by_id().returning(|id| {
            let schedule_type = if id == 5 {
                ScheduleType::Public
            } else {
                ScheduleType::Private
            };
            Ok(Some(with_owner(id, 1, schedule_type)))
        });
        mocks.subscriptions.expect_create().never();

        let svc = mocks.service();
        assert!(matches!(
            svc.follow(&Principal::user(1), 5).await,
            Err(SchedulingError::Forbidden(_))
        ));
        assert!(matches!(
            svc.follow(&Principal::user(2), 6).await,
            Err(SchedulingError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_twice_is_conflict() {
        let mut mocks = Mocks::new();
        mocks
            .schedules
            .expect_get_by_id()
            .returning(|id| Ok(Some(with_owner(id, 1, ScheduleType::Public))));
        mocks
            .subscriptions
            .expect_create()
            .returning(|_| Err(SchedulingError::Conflict("Resource already exists".into())));

        let err = mocks.service().follow(&Principal::user(2), 5).await.unwrap_err();

        assert_eq!(err.to_string(), "Already subscribed to schedule 5");
    }

    #[tokio::test]
    async fn test_get_subscription_missing_is_not_found() {
        let mut mocks = Mocks::new();
        mocks.subscriptions.expect_get_by_id().returning(|_| Ok(None));

        let result = mocks
            .service()
            .get_subscription(&Principal::superuser(1), 99)
            .await;

        assert!(matches!(
            result,
            Err(SchedulingError::NotFound { entity: "Subscription", id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_get_subscription_of_someone_else_is_forbidden() {
        let mut mocks = Mocks::new();
        mocks
            .subscriptions
            .expect_get_by_id()
            .returning(|id| Ok(Some(details(id, 2, SubscriptionType::Follower))));

        let svc = mocks.service();
        assert!(svc.get_subscription(&Principal::user(2), 4).await.is_ok());
        assert!(matches!(
            svc.get_subscription(&Principal::user(3), 4).await,
            Err(SchedulingError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_owner_link_cannot_be_deleted() {
        let mut mocks = Mocks::new();
        mocks
            .subscriptions
            .expect_get_by_id()
            .returning(|id| Ok(Some(details(id, 1, SubscriptionType::Owner))));
        mocks.subscriptions.expect_delete().never();

        let svc = mocks.service();
        assert!(matches!(
            svc.delete_mine(&Principal::user(1), 4).await,
            Err(SchedulingError::Forbidden(_))
        ));
        assert!(matches!(
            svc.delete_subscription(&Principal::superuser(9), 4).await,
            Err(SchedulingError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_mine_follower_link() {
        let mut mocks = Mocks::new();
        mocks
            .subscriptions
            .expect_get_by_id()
            .returning(|id| Ok(Some(details(id, 2, SubscriptionType::Follower))));
        mocks
            .subscriptions
            .expect_delete()
            .with(eq(4))
            .times(1)
            .returning(|_| Ok(true));

        mocks
            .service()
            .delete_mine(&Principal::user(2), 4)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_admin_create_requires_superuser() {
        let mut mocks = Mocks::new();
        mocks.subscriptions.expect_create().never();

        let result = mocks
            .service()
            .create_subscription(
                &Principal::user(1),
                CreateSubscription {
                    subscriber_id: 1,
                    schedule_id: 1,
                    subscription_type: SubscriptionType::Follower,
                },
            )
            .await;

        assert!(matches!(result, Err(SchedulingError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_subscribers_requires_owner() {
        let mut mocks = Mocks::new();
        mocks
            .schedules
            .expect_get_by_id()
            .returning(|id| Ok(Some(with_owner(id, 1, ScheduleType::Public))));
        mocks.subscriptions.expect_list_by_schedule().never();

        let result = mocks
            .service()
            .list_subscribers(&Principal::user(2), 5, PageParams::default())
            .await;

        assert!(matches!(result, Err(SchedulingError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_mine_by_type_counts_with_same_filter() {
        let mut mocks = Mocks::new();
        mocks
            .subscriptions
            .expect_list_by_subscriber()
            .with(eq(2), eq(Some(SubscriptionType::Follower)), always())
            .returning(|_, _, _| Ok(Vec::new()));
        mocks
            .subscriptions
            .expect_count_by_subscriber()
            .with(eq(2), eq(Some(SubscriptionType::Follower)))
            .times(1)
            .returning(|_, _| Ok(0));

        let page = mocks
            .service()
            .list_mine_by_type(
                &Principal::user(2),
                SubscriptionType::Follower,
                PageParams::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_list_for_subscriber_includes_every_type() {
        let mut mocks = Mocks::new();
        mocks.users.expect_get_by_id().returning(|id| Ok(Some(user(id))));
        mocks
            .subscriptions
            .expect_list_by_subscriber()
            .with(eq(3), eq(None), always())
            .returning(|_, _, _| Ok(Vec::new()));
        mocks
            .subscriptions
            .expect_count_by_subscriber()
            .with(eq(3), eq(None))
            .returning(|_, _| Ok(0));

        mocks
            .service()
            .list_for_subscriber(&Principal::user(3), 3, PageParams::default())
            .await
            .unwrap();
    }
}
