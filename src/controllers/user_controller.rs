//! Controller de usuarios
//!
//! Listado, edición parcial y borrado. El borrado está bloqueado mientras
//! el usuario tenga un booking activo.

use sqlx::PgPool;

use crate::dto::user_dto::{UpdateUserRequest, UserResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::Role;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::{validate_not_empty, validate_positive_id};

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.repository.list_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: i32,
        caller: &AuthenticatedUser,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        let id = validate_positive_id(id, "userId")?;

        if caller.role != Role::Admin && caller.user_id != id {
            return Err(AppError::Forbidden(
                "You can only update your own profile".to_string(),
            ));
        }

        // Cambios de email o rol reservados al admin
        if (request.email.is_some() || request.role.is_some()) && caller.role != Role::Admin {
            return Err(AppError::Forbidden(
                "Only admins can change email or role".to_string(),
            ));
        }

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let name = match request.name {
            Some(name) => validate_not_empty(&name, "name")?,
            None => current.name.clone(),
        };

        let phone = match request.phone {
            Some(phone) => validate_not_empty(&phone, "phone")?,
            None => current.phone.clone(),
        };

        let email = match request.email {
            Some(email) => {
                let email = validate_not_empty(&email, "email")?.to_lowercase();
                if email != current.email && self.repository.email_exists(&email, Some(id)).await? {
                    return Err(AppError::Conflict("Email is already registered".to_string()));
                }
                email
            }
            None => current.email.clone(),
        };

        let role = match request.role {
            Some(role) => {
                if Role::parse(&role).is_none() {
                    return Err(AppError::Validation(
                        "role must be either 'admin' or 'customer'".to_string(),
                    ));
                }
                role
            }
            None => current.role.clone(),
        };

        let updated = self
            .repository
            .update(id, &name, &email, &phone, &role)
            .await?;

        Ok(ApiResponse::success_with_message(
            UserResponse::from(updated),
            "User updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let id = validate_positive_id(id, "userId")?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if self.repository.has_active_booking(id).await? {
            return Err(AppError::Conflict(
                "Cannot delete a user with an active booking".to_string(),
            ));
        }

        self.repository.delete(id).await
    }
}
