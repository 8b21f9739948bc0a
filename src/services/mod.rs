//! Business logic services layer

pub mod article_service;
pub mod auth_service;
pub mod profile_service;

pub use article_service::ArticleService;
pub use auth_service::AuthService;
pub use profile_service::ProfileService;
