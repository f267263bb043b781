//! Controller de autenticación
//!
//! Signup y signin: hash de contraseña con bcrypt y emisión del JWT que
//! resuelve `{ user_id, role }` para el resto de la API.

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{SigninRequest, SigninResponse, SignupRequest};
use crate::dto::user_dto::UserResponse;
use crate::dto::ApiResponse;
use crate::models::user::Role;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};
use crate::utils::validation::check_request;

pub struct AuthController {
    repository: UserRepository,
    jwt_config: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt_config: JwtConfig::from(config),
        }
    }

    pub async fn signup(
        &self,
        request: SignupRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        check_request(&request)?;

        if Role::parse(&request.role).is_none() {
            return Err(AppError::Validation(
                "role must be either 'admin' or 'customer'".to_string(),
            ));
        }

        // Email normalizado a minúsculas (la columna tiene CHECK de lowercase)
        let email = request.email.trim().to_lowercase();

        if self.repository.email_exists(&email, None).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?;

        let user = self
            .repository
            .create(
                request.name.trim(),
                &email,
                &password_hash,
                request.phone.trim(),
                &request.role,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "User registered successfully".to_string(),
        ))
    }

    pub async fn signin(
        &self,
        request: SigninRequest,
    ) -> Result<ApiResponse<SigninResponse>, AppError> {
        check_request(&request)?;

        let email = request.email.trim().to_lowercase();

        // Mensaje uniforme: no se distingue email inexistente de password
        // incorrecta
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let valid = verify(&request.password, &user.password)
            .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized("Invalid email or password".to_string()));
        }

        let role = user
            .role()
            .ok_or_else(|| AppError::Internal(format!("Invalid role stored for user {}", user.id)))?;

        let token = generate_token(user.id, role, &self.jwt_config)?;

        Ok(ApiResponse::success_with_message(
            SigninResponse {
                token,
                user: UserResponse::from(user),
            },
            "Login successful".to_string(),
        ))
    }
}
