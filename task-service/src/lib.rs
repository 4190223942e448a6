//! Task Service - tasks, subtasks and per-user task trees.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
