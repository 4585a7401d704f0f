use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage and form representation of a birthday (`YYYY-MM-DD`).
pub const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

/// Human-readable birthday, e.g. `August 08, 2000`.
pub const BIRTHDAY_DISPLAY_FORMAT: &str = "%B %d, %Y";

/// A person in the birthday book.
///
/// `birthday` is `None` only for rows that were written by something other
/// than this crate and whose date cell could not be read. Contacts created
/// through [`crate::store::ContactStore`] are validated and always have one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub birthday: Option<NaiveDate>,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, birthday: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: phone.into(),
            birthday: Some(birthday),
        }
    }

    /// Birthday as `YYYY-MM-DD`, or an empty string when unknown.
    pub fn birthday_iso(&self) -> String {
        self.birthday
            .map(|d| d.format(BIRTHDAY_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Birthday as `August 08, 2000`, or an empty string when unknown.
    pub fn birthday_display(&self) -> String {
        self.birthday
            .map(|d| d.format(BIRTHDAY_DISPLAY_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// Raw form input for creating or editing a contact.
///
/// Fields are kept as submitted; [`ContactInput::validate`] trims and parses
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    /// Expected as `YYYY-MM-DD`.
    #[serde(default)]
    pub birthday: String,
}

impl ContactInput {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        birthday: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            birthday: birthday.into(),
        }
    }
}

impl From<&Contact> for ContactInput {
    fn from(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            birthday: contact.birthday_iso(),
        }
    }
}

/// Ordered contacts, in file order.
///
/// Positions are not identities: removing the contact at position `i` moves
/// every later contact down by one, so the contact formerly at `i + 1` is now
/// at `i`. Use [`Contact::id`] with [`ContactCollection::find`] and friends
/// to address a contact across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactCollection {
    contacts: Vec<Contact>,
}

impl ContactCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }

    pub fn as_slice(&self) -> &[Contact] {
        &self.contacts
    }

    /// Appends a contact at the end, preserving insertion order.
    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    pub fn get(&self, position: usize) -> Option<&Contact> {
        self.contacts.get(position)
    }

    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.contacts.iter().position(|c| c.id == id)
    }

    pub fn find(&self, id: Uuid) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Replaces the contact at `position`, returning the previous one.
    pub fn replace_at(&mut self, position: usize, contact: Contact) -> Option<Contact> {
        let slot = self.contacts.get_mut(position)?;
        Some(std::mem::replace(slot, contact))
    }

    /// Removes the contact at `position`, shifting later contacts down by one.
    pub fn remove_at(&mut self, position: usize) -> Option<Contact> {
        if position < self.contacts.len() {
            Some(self.contacts.remove(position))
        } else {
            None
        }
    }

    /// Replaces the contact with `id` in place, keeping its id and position.
    pub fn replace(&mut self, id: Uuid, mut contact: Contact) -> Option<Contact> {
        let position = self.position_of(id)?;
        contact.id = id;
        self.replace_at(position, contact)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Contact> {
        let position = self.position_of(id)?;
        self.remove_at(position)
    }
}

impl From<Vec<Contact>> for ContactCollection {
    fn from(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }
}

impl FromIterator<Contact> for ContactCollection {
    fn from_iter<I: IntoIterator<Item = Contact>>(iter: I) -> Self {
        Self {
            contacts: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ContactCollection {
    type Item = Contact;
    type IntoIter = std::vec::IntoIter<Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.contacts.into_iter()
    }
}

impl<'a> IntoIterator for &'a ContactCollection {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.contacts.iter()
    }
}
