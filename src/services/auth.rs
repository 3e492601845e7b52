use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    db::Repositories,
    error::{AppError, AppResult},
    models::{
        auth::{AuthenticatedUser, Claims, BOOTSTRAP_ADMIN_ID, BOOTSTRAP_ADMIN_NAME},
        user::{
            AccountStatus, LoginResponse, NewUser, ParentSummary, RegisterRequest, User, UserRole,
        },
    },
    services::{metrics, normalize_email, parse_enum, require_text},
};

const MIN_PASSWORD_LEN: usize = 6;

pub struct AuthService;

impl AuthService {
    /// Check credentials and issue an access token.
    ///
    /// The configured bootstrap administrator is matched first and never
    /// touches the store. Unknown emails and wrong passwords are
    /// indistinguishable to the caller.
    pub async fn login(
        repos: &Repositories,
        config: &Config,
        email: &str,
        password: &str,
    ) -> AppResult<LoginResponse> {
        if let Some((admin_email, admin_password)) = config.bootstrap_admin() {
            if email == admin_email && password == admin_password {
                metrics::record_login("success");
                info!("Bootstrap administrator logged in");
                let token = Self::generate_token(BOOTSTRAP_ADMIN_ID, &config.jwt_secret, config.jwt_expiry_days)?;
                return Ok(LoginResponse {
                    id: BOOTSTRAP_ADMIN_ID.to_string(),
                    full_name: BOOTSTRAP_ADMIN_NAME.to_string(),
                    email: admin_email.to_string(),
                    role: UserRole::Admin,
                    token,
                });
            }
        }

        let user = match repos.users.find_by_email(&normalize_email(email)).await? {
            Some(u) => u,
            None => return Err(Self::reject_login(email)),
        };

        let valid = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(Self::reject_login(email));
        }

        metrics::record_login("success");
        let token = Self::generate_token(&user.id.to_string(), &config.jwt_secret, config.jwt_expiry_days)?;
        Ok(LoginResponse {
            id: user.id.to_string(),
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            token,
        })
    }

    fn reject_login(email: &str) -> AppError {
        metrics::record_login("failure");
        warn!(email = %email, "Failed login attempt");
        AppError::InvalidCredentials
    }

    /// Self-service account creation. Staff accounts start `pending` and are
    /// attached to an existing unlinked profile with the same email.
    pub async fn register(repos: &Repositories, config: &Config, req: RegisterRequest) -> AppResult<User> {
        let full_name = require_text(Some(req.full_name), "Full name")?;
        let email = normalize_email(&req.email);
        if !email.contains('@') {
            return Err(AppError::invalid("Please provide a valid email"));
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::invalid(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let role = match req.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            None => UserRole::Parent,
            Some(r) => parse_enum::<UserRole>(r)?,
        };
        if role == UserRole::Admin {
            return Err(AppError::invalid("Admin accounts cannot be self-registered"));
        }

        let password_hash = bcrypt::hash(&req.password, config.bcrypt_cost).map_err(anyhow::Error::from)?;
        let new_user = NewUser {
            full_name,
            email,
            password_hash,
            role,
            status: AccountStatus::initial_for(role),
        };
        let user = repos
            .users
            .create(&new_user)
            .await?
            .ok_or(AppError::EmailAlreadyExists)?;

        if user.role == UserRole::Staff {
            repos.staff.link_user(&user.email, user.id).await?;
        }

        metrics::record_registration(user.role.as_str());
        info!(user_id = %user.id, role = %user.role, "Account registered");
        Ok(user)
    }

    pub async fn list_parents(repos: &Repositories) -> AppResult<Vec<ParentSummary>> {
        Ok(repos.users.list_parents().await?)
    }

    pub fn generate_token(subject: &str, secret: &str, ttl_days: i64) -> anyhow::Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now as usize,
            exp: (now + ttl_days * 86_400) as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify signature and expiry.
    pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::AuthenticationFailed)
    }

    /// Turn verified claims into the request identity.
    pub async fn resolve(repos: &Repositories, claims: &Claims) -> AppResult<AuthenticatedUser> {
        if claims.sub == BOOTSTRAP_ADMIN_ID {
            return Ok(AuthenticatedUser::bootstrap_admin());
        }
        let id: Uuid = claims.sub.parse().map_err(|_| AppError::AuthenticationFailed)?;
        repos
            .users
            .find_by_id(id)
            .await?
            .map(AuthenticatedUser::from)
            .ok_or(AppError::UserNotFound)
    }
}
