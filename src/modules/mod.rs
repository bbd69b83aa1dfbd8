pub mod audit;
pub mod auth;
pub mod commands;
pub mod lessons;
pub mod media;
pub mod onboarding;
pub mod programs;
pub mod users;
