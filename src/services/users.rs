use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::profile::{Profile, Role};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: Option<String>,
    pub display_name: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Buyer
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub banned: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Restrictions {
    pub banned: Option<bool>,
    pub restricted: Option<bool>,
}

pub async fn create_user(state: &AppState, new_user: NewUser) -> Result<Profile, AppError> {
    if new_user.display_name.trim().is_empty() {
        return Err(AppError::BadRequest("display_name cannot be empty".to_string()));
    }

    let profile = Profile {
        id: Uuid::new_v4(),
        email: new_user
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty()),
        display_name: new_user.display_name.trim().to_string(),
        role: new_user.role,
        banned: false,
        restricted: false,
        created_at: Utc::now(),
    };

    state.store.insert_profile(profile.clone()).await?;
    Ok(profile)
}

pub async fn list_users(state: &AppState, filter: &UserFilter) -> Result<Vec<Profile>, AppError> {
    let needle = filter
        .search
        .as_deref()
        .map(|search| search.trim().to_lowercase())
        .filter(|search| !search.is_empty());

    let mut users: Vec<Profile> = state
        .store
        .list_profiles()
        .await?
        .into_iter()
        .filter(|profile| filter.role.is_none_or(|role| profile.role == role))
        .filter(|profile| filter.banned.is_none_or(|banned| profile.banned == banned))
        .filter(|profile| match &needle {
            Some(needle) => {
                profile.display_name.to_lowercase().contains(needle)
                    || profile
                        .email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(needle))
            }
            None => true,
        })
        .collect();

    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(users)
}

pub async fn get_user(state: &AppState, id: Uuid) -> Result<Profile, AppError> {
    state
        .store
        .get_profile(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))
}

pub async fn update_role(state: &AppState, id: Uuid, role: Role) -> Result<Profile, AppError> {
    state.store.set_user_role(id, role).await?;
    info!(user_id = %id, role = ?role, "user role updated");
    get_user(state, id).await
}

pub async fn update_restrictions(
    state: &AppState,
    id: Uuid,
    restrictions: Restrictions,
) -> Result<Profile, AppError> {
    let profile = state
        .store
        .set_user_restrictions(id, restrictions.banned, restrictions.restricted)
        .await?;
    info!(
        user_id = %id,
        banned = profile.banned,
        restricted = profile.restricted,
        "user restrictions updated"
    );

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{create_user, update_restrictions, NewUser, Restrictions};
    use crate::error::AppError;
    use crate::models::profile::Role;
    use crate::state::AppState;
    use crate::store::Store;

    #[tokio::test]
    async fn restrictions_leave_a_newer_role_alone() {
        let state = AppState::in_memory(16);
        let user = create_user(
            &state,
            NewUser {
                email: Some("ada@example.com".to_string()),
                display_name: "Ada".to_string(),
                role: Role::Buyer,
            },
        )
        .await
        .unwrap();

        // Role changed by vendor approval after the admin opened the user.
        state.store.set_user_role(user.id, Role::Vendor).await.unwrap();

        let updated = update_restrictions(
            &state,
            user.id,
            Restrictions {
                banned: Some(true),
                restricted: None,
            },
        )
        .await
        .unwrap();

        assert!(updated.banned);
        assert!(!updated.restricted);
        assert_eq!(updated.role, Role::Vendor);
    }

    #[tokio::test]
    async fn restricting_missing_user_is_not_found() {
        let state = AppState::in_memory(16);
        let err = update_restrictions(&state, Uuid::new_v4(), Restrictions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
