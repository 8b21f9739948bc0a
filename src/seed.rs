//! Sample data for local development (`blog-service --seed`)

use crate::{
    error::{AppError, ConflictField},
    middleware::AppState,
    models::{article::CreateArticleRequest, auth::SignupRequest, user::User},
};

const SAMPLE_PASSWORD: &str = "password123";

const SAMPLE_USERS: &[(&str, &str, &str)] = &[
    (
        "johndoe",
        "john@example.com",
        "Tech enthusiast and full-stack developer",
    ),
    (
        "janedoe",
        "jane@example.com",
        "Writer, designer, and creative thinker",
    ),
    (
        "alexsmith",
        "alex@example.com",
        "Software engineer passionate about clean code",
    ),
];

const SAMPLE_ARTICLES: &[(&str, &str)] = &[
    (
        "Getting Started with Axum",
        "Axum is a web framework built on tokio, tower and hyper. Handlers are plain async \
         functions and extractors pull typed data out of each request.",
    ),
    (
        "Understanding JWT Authentication",
        "JSON Web Tokens carry signed claims between client and server. The server checks \
         the signature and expiry on every request instead of keeping sessions.",
    ),
    (
        "Error Handling in Rust Services",
        "A single error enum that knows its HTTP status keeps handlers short. The question \
         mark operator does the rest of the plumbing.",
    ),
    (
        "Building RESTful APIs",
        "Resources, verbs and status codes. A small, consistent envelope for every response \
         makes clients simpler to write.",
    ),
    (
        "PostgreSQL Schema Design Tips",
        "Let the database enforce what it can: unique constraints, foreign keys and NOT NULL \
         columns catch bugs that application code misses.",
    ),
    (
        "CSS Grid vs Flexbox: When to Use Each",
        "Grid lays out in two dimensions, flexbox in one. Most pages end up using both, grid \
         for the frame and flexbox inside components.",
    ),
];

/// Summary of one seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users_created: usize,
    pub users_skipped: usize,
    pub articles_created: usize,
}

/// Create the sample users, skipping any that already exist.
///
/// The sample articles go round-robin to the users created in this run.
/// When every user already existed no articles are written.
pub async fn run(state: &AppState) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();
    let mut authors: Vec<User> = Vec::new();

    for (username, email, bio) in SAMPLE_USERS {
        let req = SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: SAMPLE_PASSWORD.to_string(),
        };

        match state.auth_service.register(req, bio.to_string()).await {
            Ok((user, _token)) => {
                report.users_created += 1;
                authors.push(user);
            }
            Err(AppError::Conflict(ConflictField::Email | ConflictField::Username)) => {
                tracing::info!(username = %username, "Sample user exists, skipping");
                report.users_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if authors.is_empty() {
        return Ok(report);
    }

    for (i, (title, content)) in SAMPLE_ARTICLES.iter().enumerate() {
        let author = &authors[i % authors.len()];
        let req = CreateArticleRequest {
            title: title.to_string(),
            content: content.to_string(),
        };

        state.article_service.create(author, req).await?;
        report.articles_created += 1;
    }

    tracing::info!(
        users_created = report.users_created,
        users_skipped = report.users_skipped,
        articles_created = report.articles_created,
        "Seeding complete"
    );

    Ok(report)
}
