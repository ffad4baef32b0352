pub mod auth;
pub mod categories;
pub mod comments;
pub mod dashboard;
pub mod projects;
pub mod schedules;
pub mod search;
pub mod visitors;
pub mod web;
