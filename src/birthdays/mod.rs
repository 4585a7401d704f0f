//! Birthday matching and greeting dispatch.
//!
//! - [`matches_today`] picks the contacts whose birthday falls on a day.
//! - [`dispatch_birthdays`] sends one greeting per match through a
//!   [`NotificationDispatcher`], pausing between sends and carrying on past
//!   individual failures.
//! - [`BirthdayService`] runs both against a [`crate::store::ContactStore`].

mod dispatch;
mod greeting;
mod matcher;
mod service;

pub use dispatch::*;
pub use greeting::*;
pub use matcher::*;
pub use service::*;
