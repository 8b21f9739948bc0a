//! 博客服务库
//! 账户、文章与个人主页的 REST 后端

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod services;
pub mod slug;
pub mod telemetry;
