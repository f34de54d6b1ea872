//! Integration tests for the scheduling domain
//!
//! Services run against real PostgreSQL repositories so that transactions,
//! cascades and unique indexes are exercised.
//!
//! Run with: cargo test -p domain_scheduling --test integration_test

use chrono::NaiveTime;
use domain_scheduling::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

struct Fixture {
    db: TestDatabase,
    services: SchedulingServices,
    builder: TestDataBuilder,
}

impl Fixture {
    async fn new(test_name: &str) -> Self {
        let db = TestDatabase::new().await;
        let services = SchedulingServices::new(Repositories::postgres(db.connection()));

        Self {
            db,
            services,
            builder: TestDataBuilder::from_test_name(test_name),
        }
    }

    async fn user(&self, label: &str) -> Principal {
        let user = self
            .services
            .users
            .register(RegisterUser {
                email: self.builder.email(label),
                password: self.builder.password(),
            })
            .await
            .unwrap();
        Principal::user(user.id)
    }

    async fn admin(&self) -> Principal {
        let admin = self
            .services
            .users
            .ensure_superuser(&self.builder.email("admin"), &self.builder.password())
            .await
            .unwrap();
        Principal::superuser(admin.id)
    }

    async fn schedule(&self, owner: &Principal, schedule_type: ScheduleType) -> Schedule {
        self.services
            .schedules
            .create_mine(
                owner,
                NewSchedule {
                    name: self.builder.name("schedule", "main"),
                    description: None,
                    schedule_type: Some(schedule_type),
                },
            )
            .await
            .unwrap()
    }

    async fn event(&self, owner: &Principal, schedule_id: i32, hour: u32) -> Event {
        self.services
            .events
            .create_event(
                owner,
                CreateEvent {
                    name: self.builder.name("event", &hour.to_string()),
                    description: Some("Weekly".into()),
                    day_of_week: DayOfWeek::Monday,
                    start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(hour, 45, 0).unwrap(),
                    schedule_id,
                },
            )
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_creating_schedule_adds_owner_subscription() {
    let fx = Fixture::new("owner_subscription").await;
    let ana = fx.user("ana").await;

    let schedule = fx.schedule(&ana, ScheduleType::Public).await;
    assert_eq!(schedule.owner_id, ana.id);

    let owned = fx
        .services
        .subscriptions
        .list_mine_by_type(&ana, SubscriptionType::Owner, PageParams::default())
        .await
        .unwrap();

    assert_eq!(owned.count, 1);
    assert_eq!(owned.result[0].schedule.id, schedule.id);
    assert_eq!(owned.result[0].subscription_type, SubscriptionType::Owner);

    let followed = fx
        .services
        .subscriptions
        .list_mine_by_type(&ana, SubscriptionType::Follower, PageParams::default())
        .await
        .unwrap();
    assert_eq!(followed.count, 0);
}

#[tokio::test]
async fn test_schedule_defaults_to_private() {
    let fx = Fixture::new("default_private").await;
    let ana = fx.user("ana").await;
    let bob = fx.user("bob").await;

    let schedule = fx
        .services
        .schedules
        .create_mine(
            &ana,
            NewSchedule {
                name: "Reading".into(),
                description: None,
                schedule_type: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(schedule.schedule_type, ScheduleType::Private);
    assert!(matches!(
        fx.services.schedules.get_schedule(&bob, schedule.id).await,
        Err(SchedulingError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_follow_and_subscribers() {
    let fx = Fixture::new("follow").await;
    let ana = fx.user("ana").await;
    let bob = fx.user("bob").await;
    let gym = fx.schedule(&ana, ScheduleType::Public).await;

    let link = fx.services.subscriptions.follow(&bob, gym.id).await.unwrap();
    assert_eq!(link.subscription_type, SubscriptionType::Follower);
    assert_eq!(link.subscriber_id, bob.id);

    let subscribers = fx
        .services
        .subscriptions
        .list_subscribers(&ana, gym.id, PageParams::default())
        .await
        .unwrap();

    assert_eq!(subscribers.count, 2);
    assert_same_ids(
        subscribers.result.iter().map(|s| s.subscriber.id),
        &[ana.id, bob.id],
        "subscribers of gym",
    );

    let duplicate = fx.services.subscriptions.follow(&bob, gym.id).await;
    assert!(matches!(duplicate, Err(SchedulingError::Conflict(_))));
}

#[tokio::test]
async fn test_cannot_follow_private_or_own_schedule() {
    let fx = Fixture::new("follow_rules").await;
    let ana = fx.user("ana").await;
    let bob = fx.user("bob").await;
    let private = fx.schedule(&ana, ScheduleType::Private).await;
    let public = fx.schedule(&ana, ScheduleType::Public).await;

    assert!(matches!(
        fx.services.subscriptions.follow(&bob, private.id).await,
        Err(SchedulingError::Forbidden(_))
    ));
    assert!(matches!(
        fx.services.subscriptions.follow(&ana, public.id).await,
        Err(SchedulingError::Forbidden(_))
    ));
    assert!(matches!(
        fx.services.subscriptions.follow(&bob, 999_999).await,
        Err(SchedulingError::NotFound { entity: "Schedule", .. })
    ));
}

#[tokio::test]
async fn test_owner_subscription_cannot_be_deleted() {
    let fx = Fixture::new("owner_link_delete").await;
    let admin = fx.admin().await;
    let ana = fx.user("ana").await;
    fx.schedule(&ana, ScheduleType::Public).await;

    let owned = fx
        .services
        .subscriptions
        .list_for_subscriber(&ana, ana.id, PageParams::default())
        .await
        .unwrap();
    let owner_link = assert_some(owned.result.first(), "owner link").id;

    assert!(matches!(
        fx.services.subscriptions.delete_mine(&ana, owner_link).await,
        Err(SchedulingError::Forbidden(_))
    ));
    assert!(matches!(
        fx.services
            .subscriptions
            .delete_subscription(&admin, owner_link)
            .await,
        Err(SchedulingError::Forbidden(_))
    ));
    assert_eq!(fx.db.row_count("subscription").await, 1);
}

#[tokio::test]
async fn test_deleting_schedule_cascades_to_events_and_subscriptions() {
    let fx = Fixture::new("schedule_cascade").await;
    let ana = fx.user("ana").await;
    let bob = fx.user("bob").await;
    let gym = fx.schedule(&ana, ScheduleType::Public).await;

    fx.event(&ana, gym.id, 7).await;
    fx.event(&ana, gym.id, 18).await;
    fx.services.subscriptions.follow(&bob, gym.id).await.unwrap();

    assert_eq!(fx.db.row_count("event").await, 2);
    assert_eq!(fx.db.row_count("subscription").await, 2);

    fx.services.schedules.delete_mine(&ana, gym.id).await.unwrap();

    assert_eq!(fx.db.row_count("schedule").await, 0);
    assert_eq!(fx.db.row_count("event").await, 0);
    assert_eq!(fx.db.row_count("subscription").await, 0);
}

#[tokio::test]
async fn test_deleting_user_cascades_to_owned_schedules() {
    let fx = Fixture::new("user_cascade").await;
    let ana = fx.user("ana").await;
    let bob = fx.user("bob").await;
    let gym = fx.schedule(&ana, ScheduleType::Public).await;
    fx.event(&ana, gym.id, 6).await;
    fx.services.subscriptions.follow(&bob, gym.id).await.unwrap();

    fx.services.users.delete_user(&ana, ana.id).await.unwrap();

    assert_eq!(fx.db.row_count("user").await, 1);
    assert_eq!(fx.db.row_count("schedule").await, 0);
    assert_eq!(fx.db.row_count("event").await, 0);
    assert_eq!(fx.db.row_count("subscription").await, 0);
}

#[tokio::test]
async fn test_admin_writes_with_dangling_references() {
    let fx = Fixture::new("dangling").await;
    let admin = fx.admin().await;

    let schedule = fx
        .services
        .schedules
        .create_schedule(
            &admin,
            CreateSchedule {
                name: "Orphan".into(),
                description: None,
                schedule_type: None,
                owner_id: 424_242,
            },
        )
        .await;
    assert!(matches!(schedule, Err(SchedulingError::MissingReference)));

    let subscription = fx
        .services
        .subscriptions
        .create_subscription(
            &admin,
            CreateSubscription {
                subscriber_id: admin.id,
                schedule_id: 424_242,
                subscription_type: SubscriptionType::Follower,
            },
        )
        .await;
    assert!(matches!(subscription, Err(SchedulingError::MissingReference)));

    // A failed transaction leaves nothing behind
    assert_eq!(fx.db.row_count("schedule").await, 0);
    assert_eq!(fx.db.row_count("subscription").await, 0);
}

#[tokio::test]
async fn test_second_owner_link_is_conflict() {
    let fx = Fixture::new("second_owner").await;
    let admin = fx.admin().await;
    let ana = fx.user("ana").await;
    let bob = fx.user("bob").await;
    let gym = fx.schedule(&ana, ScheduleType::Public).await;

    let result = fx
        .services
        .subscriptions
        .create_subscription(
            &admin,
            CreateSubscription {
                subscriber_id: bob.id,
                schedule_id: gym.id,
                subscription_type: SubscriptionType::Owner,
            },
        )
        .await;

    assert!(matches!(result, Err(SchedulingError::Conflict(_))));
}

#[tokio::test]
async fn test_list_events_for_schedule_paginates() {
    let fx = Fixture::new("event_pages").await;
    let ana = fx.user("ana").await;
    let gym = fx.schedule(&ana, ScheduleType::Public).await;
    let other = fx.schedule(&ana, ScheduleType::Public).await;

    for hour in [6, 7, 8] {
        fx.event(&ana, gym.id, hour).await;
    }
    fx.event(&ana, other.id, 9).await;

    let page = fx
        .services
        .events
        .list_for_schedule(&ana, gym.id, PageParams::new(1, 2))
        .await
        .unwrap();

    assert_eq!(page.count, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.result.len(), 1);
    assert!(page.result.iter().all(|e| e.schedule_id == gym.id));

    let everything = fx
        .services
        .events
        .list_events(&fx.admin().await, PageParams::default())
        .await
        .unwrap();
    assert_eq!(everything.count, 4);
}

#[tokio::test]
async fn test_register_duplicate_email_and_login() {
    let fx = Fixture::new("register_login").await;
    fx.user("ana").await;

    let duplicate = fx
        .services
        .users
        .register(RegisterUser {
            email: fx.builder.email("ana"),
            password: fx.builder.password(),
        })
        .await;
    assert!(matches!(duplicate, Err(SchedulingError::Conflict(_))));

    let user = fx
        .services
        .users
        .authenticate(&fx.builder.email("ana"), &fx.builder.password())
        .await
        .unwrap();
    assert!(user.is_active);
    assert!(!user.is_superuser);

    assert!(matches!(
        fx.services
            .users
            .authenticate(&fx.builder.email("ana"), "not-the-password")
            .await,
        Err(SchedulingError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_ensure_superuser_promotes_registered_user() {
    let fx = Fixture::new("promote").await;
    let ana = fx.user("admin").await;

    let promoted = fx
        .services
        .users
        .ensure_superuser(&fx.builder.email("admin"), "ignored-password")
        .await
        .unwrap();

    assert_eq!(promoted.id, ana.id);
    assert!(promoted.is_superuser);
    assert_eq!(fx.db.row_count("user").await, 1);
}
