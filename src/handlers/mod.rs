// src/handlers/mod.rs

pub mod auth;
pub mod dashboard;
pub mod pages;
pub mod quiz;
pub mod subject;
