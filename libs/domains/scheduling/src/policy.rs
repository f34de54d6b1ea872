//! Authorization rules.
//!
//! Every rule is a pure check over the acting [`Principal`] and an already
//! loaded target, so callers resolve `NotFound` before asking for permission.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_helpers::{AppError, JwtClaims};

use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{Schedule, ScheduleType, SubscriptionType, User};
use crate::service::SchedulingServices;

/// Token role granted to superusers at login.
pub const SUPERUSER_ROLE: &str = "superuser";

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub is_superuser: bool,
}

impl Principal {
    pub fn user(id: i32) -> Self {
        Self {
            id,
            is_superuser: false,
        }
    }

    pub fn superuser(id: i32) -> Self {
        Self {
            id,
            is_superuser: true,
        }
    }
}

/// Roles embedded in the access token issued for `user`.
pub fn roles_for(user: &User) -> Vec<String> {
    if user.is_superuser {
        vec![SUPERUSER_ROLE.to_string()]
    } else {
        Vec::new()
    }
}

/// Parses the numeric user id carried in the token subject.
pub fn subject_id(claims: &JwtClaims) -> Result<i32, AppError> {
    claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
}

/// Resolved from storage on every request: a deleted account is rejected and
/// `is_superuser` comes from the stored row, not the token roles.
impl FromRequestParts<SchedulingServices> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        services: &SchedulingServices,
    ) -> Result<Self, Self::Rejection> {
        let claims = JwtClaims::from_request_parts(parts, services).await?;
        let id = subject_id(&claims)?;

        services
            .users
            .principal(id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))
    }
}

pub fn require_superuser(principal: &Principal) -> SchedulingResult<()> {
    if principal.is_superuser {
        Ok(())
    } else {
        Err(SchedulingError::forbidden("Superuser privileges required"))
    }
}

/// Superuser, owner, or any caller when the schedule is public.
pub fn can_read_schedule(principal: &Principal, schedule: &Schedule) -> SchedulingResult<()> {
    if principal.is_superuser
        || schedule.owner_id == principal.id
        || schedule.schedule_type == ScheduleType::Public
    {
        Ok(())
    } else {
        Err(SchedulingError::forbidden(format!(
            "Schedule {} is private",
            schedule.id
        )))
    }
}

/// Superuser or owner. Covers schedule deletion and every event write or read.
pub fn can_manage_schedule(principal: &Principal, schedule: &Schedule) -> SchedulingResult<()> {
    if principal.is_superuser || schedule.owner_id == principal.id {
        Ok(())
    } else {
        Err(SchedulingError::forbidden(format!(
            "Only the owner of schedule {} or a superuser can do this",
            schedule.id
        )))
    }
}

/// Owner only; superuser status grants nothing on `/me` routes.
pub fn is_schedule_owner(principal: &Principal, schedule: &Schedule) -> SchedulingResult<()> {
    if schedule.owner_id == principal.id {
        Ok(())
    } else {
        Err(SchedulingError::forbidden(format!(
            "You do not own schedule {}",
            schedule.id
        )))
    }
}

pub fn self_or_superuser(principal: &Principal, user_id: i32) -> SchedulingResult<()> {
    if principal.is_superuser || principal.id == user_id {
        Ok(())
    } else {
        Err(SchedulingError::forbidden(format!(
            "Not allowed to access user {}",
            user_id
        )))
    }
}

pub fn subscriber_or_superuser(principal: &Principal, subscriber_id: i32) -> SchedulingResult<()> {
    if principal.is_superuser || principal.id == subscriber_id {
        Ok(())
    } else {
        Err(SchedulingError::forbidden(
            "Only the subscriber or a superuser can access this subscription",
        ))
    }
}

/// Subscriber only, for `/me` routes.
pub fn is_subscriber(principal: &Principal, subscriber_id: i32) -> SchedulingResult<()> {
    if principal.id == subscriber_id {
        Ok(())
    } else {
        Err(SchedulingError::forbidden("This subscription is not yours"))
    }
}

/// Owner links disappear only when their schedule or user is deleted.
pub fn can_unsubscribe(subscription_type: SubscriptionType) -> SchedulingResult<()> {
    match subscription_type {
        SubscriptionType::Follower => Ok(()),
        SubscriptionType::Owner => Err(SchedulingError::forbidden(
            "Owner subscriptions are removed together with their schedule",
        )),
    }
}

/// A caller may follow public schedules they do not own.
pub fn can_follow(principal: &Principal, schedule: &Schedule) -> SchedulingResult<()> {
    if schedule.owner_id == principal.id {
        return Err(SchedulingError::forbidden(format!(
            "You already own schedule {}",
            schedule.id
        )));
    }
    if schedule.schedule_type == ScheduleType::Private {
        return Err(SchedulingError::forbidden(format!(
            "Schedule {} is private",
            schedule.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn schedule(owner_id: i32, schedule_type: ScheduleType) -> Schedule {
        let now = Utc::now();
        Schedule {
            id: 10,
            name: "Gym".to_string(),
            description: None,
            schedule_type,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn claims(sub: &str, roles: &[&str]) -> JwtClaims {
        JwtClaims {
            sub: sub.to_string(),
            email: "someone@example.com".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_subject_id_from_claims() {
        assert_eq!(subject_id(&claims("7", &[SUPERUSER_ROLE])).unwrap(), 7);
        assert!(subject_id(&claims("not-a-number", &[])).is_err());
    }

    #[test]
    fn test_require_superuser() {
        assert!(require_superuser(&Principal::superuser(1)).is_ok());
        assert!(matches!(
            require_superuser(&Principal::user(1)),
            Err(SchedulingError::Forbidden(_))
        ));
    }

    #[test]
    fn test_private_schedule_readable_by_owner_and_superuser_only() {
        let private = schedule(1, ScheduleType::Private);

        assert!(can_read_schedule(&Principal::user(1), &private).is_ok());
        assert!(can_read_schedule(&Principal::superuser(99), &private).is_ok());
        assert!(can_read_schedule(&Principal::user(2), &private).is_err());
    }

    #[test]
    fn test_public_schedule_readable_by_anyone() {
        let public = schedule(1, ScheduleType::Public);
        assert!(can_read_schedule(&Principal::user(2), &public).is_ok());
    }

    #[test]
    fn test_manage_requires_owner_even_when_public() {
        let public = schedule(1, ScheduleType::Public);

        assert!(can_manage_schedule(&Principal::user(1), &public).is_ok());
        assert!(can_manage_schedule(&Principal::superuser(5), &public).is_ok());
        assert!(can_manage_schedule(&Principal::user(2), &public).is_err());
    }

    #[test]
    fn test_me_routes_ignore_superuser() {
        let owned_by_other = schedule(1, ScheduleType::Public);

        assert!(is_schedule_owner(&Principal::superuser(2), &owned_by_other).is_err());
        assert!(is_subscriber(&Principal::superuser(2), 1).is_err());
        assert!(is_subscriber(&Principal::user(1), 1).is_ok());
    }

    #[test]
    fn test_follow_rules() {
        let mine = schedule(1, ScheduleType::Public);
        let private = schedule(2, ScheduleType::Private);
        let public = schedule(2, ScheduleType::Public);
        let me = Principal::user(1);

        assert!(can_follow(&me, &mine).is_err());
        assert!(can_follow(&me, &private).is_err());
        assert!(can_follow(&me, &public).is_ok());
    }

    #[test]
    fn test_owner_links_cannot_be_removed_directly() {
        assert!(can_unsubscribe(SubscriptionType::Follower).is_ok());
        assert!(can_unsubscribe(SubscriptionType::Owner).is_err());
    }

    #[test]
    fn test_self_or_superuser() {
        assert!(self_or_superuser(&Principal::user(3), 3).is_ok());
        assert!(self_or_superuser(&Principal::superuser(1), 3).is_ok());
        assert!(self_or_superuser(&Principal::user(4), 3).is_err());

        assert!(subscriber_or_superuser(&Principal::user(4), 4).is_ok());
        assert!(subscriber_or_superuser(&Principal::user(5), 4).is_err());
    }

    #[test]
    fn test_roles_for_superuser() {
        let now = Utc::now();
        let mut user = User {
            id: 1,
            email: "root@example.com".into(),
            is_active: true,
            is_superuser: true,
            is_verified: true,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(roles_for(&user), vec![SUPERUSER_ROLE.to_string()]);

        user.is_superuser = false;
        assert!(roles_for(&user).is_empty());
    }
}
