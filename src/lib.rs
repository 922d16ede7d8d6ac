//! Homework Status Bot Library
//!
//! A Telegram bot that reports homework review status changes.
//!
//! This crate provides the core functionality for:
//! - Loading and checking credentials and settings
//! - Polling the homework status API
//! - Validating replies and translating statuses into messages
//! - Delivering messages through the Telegram Bot API on a fixed schedule

pub mod api;
pub mod config;
pub mod error;
pub mod homework;
pub mod scheduler;
pub mod telegram;

pub use error::BotError;
