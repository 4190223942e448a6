//! Team Service - CRUD over the `team` table, optionally joined with its department.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
