//! 认证服务：注册、登录、令牌解析

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::{AppError, ConflictField},
    models::{
        auth::{AuthResponse, LoginRequest, SignupRequest},
        user::{NewUser, User, UserResponse},
    },
    repository::UserRepository,
};
use std::sync::Arc;

/// 登录失败统一提示，避免泄露账户是否存在
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            hasher,
            jwt_service,
        }
    }

    /// 用户注册
    pub async fn signup(&self, req: SignupRequest) -> Result<AuthResponse, AppError> {
        let (user, token) = self.register(req, String::new()).await?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
        })
    }

    /// 注册并设置简介，返回新用户与令牌
    pub async fn register(
        &self,
        req: SignupRequest,
        bio: String,
    ) -> Result<(User, String), AppError> {
        let username = req.username.trim().to_string();
        let email = normalize_email(&req.email);

        // 先检查邮箱，再检查用户名
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(ConflictField::Email));
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict(ConflictField::Username));
        }

        let password_hash = self.hash_password(req.password).await?;

        // 并发注册由存储层唯一约束兜底
        let user = self
            .users
            .create(NewUser {
                username,
                email,
                password_hash,
                bio,
            })
            .await?;

        let token = self.jwt_service.issue(&user.id)?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok((user, token))
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&req.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::warn!("Login failed: unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .verify_password(req.password, user.password_hash.clone())
            .await?
        {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.jwt_service.issue(&user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
        })
    }

    /// 解析 Bearer 令牌对应的用户；令牌只是弱引用，每次都重新查询
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let user_id = self.jwt_service.verify(token)?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
