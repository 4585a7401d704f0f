use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Contact;

/// A contact whose birthday falls on the day being checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayMatch {
    pub contact_id: Uuid,
    pub name: String,
    /// Phone number as stored, before normalization for sending.
    pub phone: String,
}

impl From<&Contact> for BirthdayMatch {
    fn from(contact: &Contact) -> Self {
        Self {
            contact_id: contact.id,
            name: contact.name.clone(),
            phone: contact.phone.clone(),
        }
    }
}
