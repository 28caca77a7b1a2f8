//! GameRater API - Backend for a board game rating and review app
//!
//! This crate provides the REST API for GameRater, enabling:
//! - User registration and token-based sign-in
//! - Game listing management with category assignment
//! - Per-user ratings and reviews with computed average scores
//! - Base64 photo uploads attached to games

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
