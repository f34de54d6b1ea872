use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Schedule visibility
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "schedule_type")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScheduleType {
    /// Readable and followable by every user
    #[sea_orm(string_value = "public")]
    Public,
    /// Visible to the owner and superusers only
    #[default]
    #[sea_orm(string_value = "private")]
    Private,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "day_of_week")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DayOfWeek {
    #[sea_orm(string_value = "monday")]
    Monday,
    #[sea_orm(string_value = "tuesday")]
    Tuesday,
    #[sea_orm(string_value = "wednesday")]
    Wednesday,
    #[sea_orm(string_value = "thursday")]
    Thursday,
    #[sea_orm(string_value = "friday")]
    Friday,
    #[sea_orm(string_value = "saturday")]
    Saturday,
    #[sea_orm(string_value = "sunday")]
    Sunday,
}

/// How a user is linked to a schedule
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "subscription_type")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionType {
    /// Created together with the schedule, one per schedule
    #[sea_orm(string_value = "owner")]
    Owner,
    #[sea_orm(string_value = "follower")]
    Follower,
}

// ============================================================================
// Read shapes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Schedule {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub schedule_type: ScheduleType,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleWithOwner {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub owner: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub day_of_week: DayOfWeek,
    #[schema(value_type = String, example = "07:30:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "08:45:00")]
    pub end_time: NaiveTime,
    pub schedule_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventWithSchedule {
    #[serde(flatten)]
    pub event: Event,
    pub schedule: Schedule,
}

/// Subscription row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Subscription {
    pub id: i32,
    pub subscriber_id: i32,
    pub schedule_id: i32,
    pub subscription_type: SubscriptionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscription seen from its schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Subscriber {
    pub id: i32,
    pub subscription_type: SubscriptionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub subscriber: User,
}

/// Subscription seen from its subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubscribedSchedule {
    pub id: i32,
    pub subscription_type: SubscriptionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionDetails {
    pub id: i32,
    pub subscription_type: SubscriptionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub subscriber: User,
    pub schedule: Schedule,
}

// ============================================================================
// Write shapes
// ============================================================================

/// Admin schedule creation with an explicit owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateSchedule {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `private`
    pub schedule_type: Option<ScheduleType>,
    pub owner_id: i32,
}

/// Schedule creation on behalf of the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct NewSchedule {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub schedule_type: Option<ScheduleType>,
}

impl NewSchedule {
    pub fn owned_by(self, owner_id: i32) -> CreateSchedule {
        CreateSchedule {
            name: self.name,
            description: self.description,
            schedule_type: self.schedule_type,
            owner_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_time_range"))]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub day_of_week: DayOfWeek,
    #[schema(value_type = String, example = "07:30:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "08:45:00")]
    pub end_time: NaiveTime,
    pub schedule_id: i32,
}

fn validate_time_range(event: &CreateEvent) -> Result<(), ValidationError> {
    if event.end_time <= event.start_time {
        let mut err = ValidationError::new("time_range");
        err.message = Some("end_time must be after start_time".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscription {
    pub subscriber_id: i32,
    pub schedule_id: i32,
    pub subscription_type: SubscriptionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Row inserted into `user`; the password is already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
}

/// Stored user together with the hash needed to check a login
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub user: User,
    pub hashed_password: String,
}

/// `application/x-www-form-urlencoded` login body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginForm {
    /// The account email
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
