pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod event;
pub mod health;
pub mod manage;
