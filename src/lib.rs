//! This crate provides a client for a task-tracking backend.
//!
//! Its core is made of two pure engines, that work on any collection of [`Task`]s:
//! * the [`notification`] module reports tasks that are starting or ending now,
//! * the [`statistics`] module counts tasks (completed, pending, overdue...).
//!
//! Tasks come from a [`TaskSource`](traits::TaskSource): usually a [`Client`](client::Client) connected to the server,
//! or a local [`Cache`](cache::Cache). \
//! A [`Session`] ties them together: it keeps the latest snapshot of tasks, and publishes notifications and statistics
//! to the channels created by [`feedback::feedback_channels`].

pub mod traits;
pub mod error;
pub use error::{Error, Result};

pub mod task;
pub use task::{Task, TaskId, NewTask, TaskUpdate, Priority, Category};
pub mod store;
pub use store::TaskStore;
pub mod notification;
pub use notification::{NotificationEngine, NotificationEvent, NotificationKind, ReloadPolicy};
pub mod statistics;
pub use statistics::{compute_statistics, StatisticsSnapshot};
pub mod filter;
pub mod feedback;
pub mod session;
pub use session::Session;

pub mod auth;
mod resource;
pub mod client;
pub mod cache;
pub mod mock_behaviour;

pub mod config;
pub mod utils;
