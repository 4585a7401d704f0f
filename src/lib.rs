//! A contact book that remembers birthdays.
//!
//! Contacts are kept in a single file managed by [`store::ContactStore`],
//! checked by [`validation`] before they are admitted, and scanned by
//! [`birthdays`] to greet whoever has a birthday today through a
//! caller-supplied [`birthdays::NotificationDispatcher`].

pub mod birthdays;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod validation;
