//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into collaborator-facing operations.
//! - Keep presentation layers decoupled from storage details.

pub mod address_service;
pub mod building_service;
pub mod history_service;
