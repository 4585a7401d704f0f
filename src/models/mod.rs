//! Domain models for the birthday book.
//!
//! - [`Contact`]: a stored person with a phone number and a birthday. Each
//!   contact carries a stable [`uuid::Uuid`] assigned at creation, so edits and
//!   deletes never depend on where the row happens to sit in the file.
//! - [`ContactCollection`]: the ordered set of contacts, loaded and saved as a
//!   whole.
//! - [`ContactInput`]: raw, unvalidated form fields for creating or editing a
//!   contact.
//! - [`BirthdayMatch`]: a contact whose birthday falls on a given day.

mod birthday;
mod contact;

pub use birthday::*;
pub use contact::*;
