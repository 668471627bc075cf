use sqlx::PgPool;
use tracing::instrument;

use unidesk_auth::{Principal, create_session_token};
use unidesk_config::JwtConfig;
use unidesk_core::{AppError, Role, verify_dummy_password, verify_password};
use unidesk_models::{LoginRequest, LoginResponse, UserAccount};

use crate::metrics::track_login;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let account = sqlx::query_as::<_, UserAccount>(
            r#"SELECT id, email, password, name, role, related_id
               FROM users WHERE email = $1"#,
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?;

        let Some(account) = account else {
            verify_dummy_password(&dto.password);
            track_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &account.password)? {
            track_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let role = Role::from_claim(Some(&account.role));
        let token = create_session_token(
            account.id,
            &account.email,
            role,
            account.related_id,
            jwt_config,
        )?;

        track_login(true);
        tracing::info!(user_id = %account.id, role = %role, "session issued");

        Ok(LoginResponse {
            token,
            principal: Principal {
                id: account.id,
                email: account.email,
                role,
                related_id: account.related_id,
            },
        })
    }
}
