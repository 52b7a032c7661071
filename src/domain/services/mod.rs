pub mod auth_service;
pub mod calendar;
pub mod catalog;
pub mod dashboard;
pub mod management;
pub mod registration;
pub mod session;
