//! The contacts file.
//!
//! Contacts live in a single SQLite file holding one `contacts` table with
//! `Name`, `Phone` and `Birthday` columns plus the stable `Id`. Every
//! operation reads the whole table and every mutation rewrites the whole
//! table inside one transaction, so a reader sees either the old or the new
//! collection. There is no locking between operations: a single writer is
//! assumed, and two writers racing on the same file end with the last save
//! winning.

mod schema;
mod seed;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use uuid::Uuid;

use crate::birthdays::today;
use crate::config::BookConfig;
use crate::error::{ContactError, StoreError};
use crate::models::*;

pub use seed::demo_contacts;

pub struct ContactStore {
    path: PathBuf,
    seed_demo_contacts: bool,
}

impl ContactStore {
    /// A store backed by the file at `path`. Seeding is enabled.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed_demo_contacts: true,
        }
    }

    pub fn from_config(config: &BookConfig) -> Self {
        Self::new(config.contacts_file.clone()).with_seeding(config.seed_demo_contacts)
    }

    /// Whether a missing or zero-byte file is created with [`demo_contacts`] on first load.
    pub fn with_seeding(mut self, enabled: bool) -> Self {
        self.seed_demo_contacts = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ============================================================
    // Whole-collection operations
    // ============================================================

    /// Load every contact, never failing.
    ///
    /// A missing or zero-byte file is seeded (and written) first. A SQLite
    /// file without a contacts table is refused, not adopted. Any read failure is
    /// logged and an empty collection is returned; use [`Self::try_load`]
    /// to tell a corrupt file apart from an empty one.
    pub fn load(&self) -> ContactCollection {
        self.load_as_of(today())
    }

    /// [`Self::load`] with an explicit date for the seeded birthday.
    pub fn load_as_of(&self, today: NaiveDate) -> ContactCollection {
        match self.try_load_as_of(today) {
            Ok(contacts) => contacts,
            Err(e) => {
                tracing::error!("Error loading contacts: {}", e);
                ContactCollection::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<ContactCollection, StoreError> {
        self.try_load_as_of(today())
    }

    pub fn try_load_as_of(&self, today: NaiveDate) -> Result<ContactCollection, StoreError> {
        if self.is_absent() {
            if !self.seed_demo_contacts {
                tracing::info!("{} not found, starting empty", self.path.display());
                return Ok(ContactCollection::new());
            }

            tracing::info!(
                "{} not found. Creating with default data...",
                self.path.display()
            );
            let contacts = demo_contacts(today);
            self.try_save(&contacts)?;
            tracing::info!("Default contacts created successfully");
            return Ok(contacts);
        }

        let mut conn = self.open_existing()?;
        schema::run_migrations(&mut conn).map_err(StoreError::Migration)?;
        let contacts = read_contacts(&mut conn)?;

        tracing::info!(
            "Loaded {} contacts from {}",
            contacts.len(),
            self.path.display()
        );
        Ok(contacts)
    }

    /// Overwrite the file with `contacts`, never failing.
    ///
    /// Returns `false` after logging when the write did not happen.
    pub fn save(&self, contacts: &ContactCollection) -> bool {
        match self.try_save(contacts) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error saving contacts: {}", e);
                false
            }
        }
    }

    pub fn try_save(&self, contacts: &ContactCollection) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = if self.is_absent() {
            Connection::open(&self.path)?
        } else {
            self.open_existing()?
        };
        schema::run_migrations(&mut conn).map_err(StoreError::Migration)?;

        let tx = conn.transaction()?;
        let kept = unreadable_birthdays(&tx)?;
        tx.execute("DELETE FROM contacts", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO contacts (Id, Name, Phone, Birthday) VALUES (?, ?, ?, ?)",
            )?;
            for contact in contacts {
                let birthday = match contact.birthday {
                    Some(date) => Some(date.format(BIRTHDAY_FORMAT).to_string()),
                    None => kept.get(&contact.id).cloned(),
                };
                stmt.execute((
                    contact.id.to_string(),
                    &contact.name,
                    &contact.phone,
                    birthday,
                ))?;
            }
        }
        tx.commit()?;

        tracing::info!(
            "Saved {} contacts to {}",
            contacts.len(),
            self.path.display()
        );
        Ok(())
    }

    // ============================================================
    // Contact operations
    // ============================================================

    pub fn list_contacts(&self) -> Result<ContactCollection, StoreError> {
        self.try_load()
    }

    pub fn get_contact(&self, id: Uuid) -> Result<Option<Contact>, StoreError> {
        Ok(self.try_load()?.find(id).cloned())
    }

    /// The contact currently at `position`. Positions shift whenever an
    /// earlier contact is deleted.
    pub fn contact_at(&self, position: usize) -> Result<Option<Contact>, StoreError> {
        Ok(self.try_load()?.get(position).cloned())
    }

    pub fn add_contact(&self, input: &ContactInput) -> Result<Contact, ContactError> {
        let valid = input.validate().map_err(ContactError::Invalid)?;

        let mut contacts = self.try_load()?;
        let contact = Contact::new(valid.name, valid.phone, valid.birthday);
        contacts.push(contact.clone());
        self.try_save(&contacts)?;

        tracing::info!("Added contact {} ({})", contact.name, contact.id);
        Ok(contact)
    }

    pub fn update_contact(&self, id: Uuid, input: &ContactInput) -> Result<Contact, ContactError> {
        let valid = input.validate().map_err(ContactError::Invalid)?;

        let mut contacts = self.try_load()?;
        let updated = Contact {
            id,
            name: valid.name,
            phone: valid.phone,
            birthday: Some(valid.birthday),
        };
        contacts
            .replace(id, updated.clone())
            .ok_or(ContactError::NotFound)?;
        self.try_save(&contacts)?;

        tracing::info!("Updated contact {} ({})", updated.name, id);
        Ok(updated)
    }

    pub fn delete_contact(&self, id: Uuid) -> Result<Contact, ContactError> {
        let mut contacts = self.try_load()?;
        let removed = contacts.remove(id).ok_or(ContactError::NotFound)?;
        self.try_save(&contacts)?;

        tracing::info!("Deleted contact {} ({})", removed.name, id);
        Ok(removed)
    }

    /// Delete by position. Every later contact moves down by one.
    pub fn delete_at(&self, position: usize) -> Result<Contact, ContactError> {
        let mut contacts = self.try_load()?;
        let removed = contacts
            .remove_at(position)
            .ok_or(ContactError::NotFound)?;
        self.try_save(&contacts)?;

        tracing::info!("Deleted contact {} at position {}", removed.name, position);
        Ok(removed)
    }

    /// A missing or zero-byte file holds no contacts yet.
    fn is_absent(&self) -> bool {
        match std::fs::metadata(&self.path) {
            Ok(meta) => meta.is_file() && meta.len() == 0,
            Err(_) => true,
        }
    }

    fn open_existing(&self) -> Result<Connection, StoreError> {
        let unreadable = |source| StoreError::Unreadable {
            path: self.path.clone(),
            source,
        };

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(unreadable)?;

        // SQLite opens lazily; reading the schema makes a non-database file fail here
        let known_tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('contacts', 'schema_migrations')",
                [],
                |row| row.get(0),
            )
            .map_err(unreadable)?;

        // Never migrate someone else's database
        if known_tables == 0 {
            return Err(StoreError::NotAContactsFile {
                path: self.path.clone(),
            });
        }

        Ok(conn)
    }
}

struct StoredRow {
    rowid: i64,
    id: Option<Uuid>,
    name: String,
    phone: String,
    birthday: Option<String>,
}

fn read_contacts(conn: &mut Connection) -> Result<ContactCollection, StoreError> {
    let rows = {
        let mut stmt =
            conn.prepare("SELECT rowid, Id, Name, Phone, Birthday FROM contacts ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRow {
                    rowid: row.get(0)?,
                    id: text_cell(row, 1)?.and_then(|s| Uuid::parse_str(s.trim()).ok()),
                    name: text_cell(row, 2)?.unwrap_or_default(),
                    phone: text_cell(row, 3)?.unwrap_or_default(),
                    birthday: text_cell(row, 4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    // Rows written without an Id get one now, so it stays stable across loads
    let missing: Vec<(i64, Uuid)> = rows
        .iter()
        .filter(|row| row.id.is_none())
        .map(|row| (row.rowid, Uuid::new_v4()))
        .collect();
    if !missing.is_empty() {
        let tx = conn.transaction()?;
        for (rowid, id) in &missing {
            tx.execute(
                "UPDATE contacts SET Id = ? WHERE rowid = ?",
                (id.to_string(), rowid),
            )?;
        }
        tx.commit()?;
        tracing::info!("Assigned ids to {} contacts", missing.len());
    }

    let contacts = rows
        .into_iter()
        .map(|row| {
            let id = row.id.or_else(|| {
                missing
                    .iter()
                    .find(|(rowid, _)| *rowid == row.rowid)
                    .map(|(_, id)| *id)
            });
            let birthday = row.birthday.as_deref().and_then(|raw| {
                let parsed = parse_stored_birthday(raw);
                if parsed.is_none() && !raw.trim().is_empty() {
                    tracing::warn!(
                        "Ignoring unreadable birthday {:?} for {}, leaving it in the file",
                        raw,
                        row.name
                    );
                }
                parsed
            });

            Contact {
                id: id.unwrap_or_else(Uuid::new_v4),
                name: row.name,
                phone: row.phone,
                birthday,
            }
        })
        .collect();

    Ok(contacts)
}

/// Birthday cells that load as no birthday, keyed by contact id, so a rewrite
/// puts the original text back.
fn unreadable_birthdays(conn: &Connection) -> Result<HashMap<Uuid, String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT Id, Birthday FROM contacts WHERE Id IS NOT NULL AND Birthday IS NOT NULL",
    )?;
    let cells = stmt
        .query_map([], |row| Ok((text_cell(row, 0)?, text_cell(row, 1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(cells
        .into_iter()
        .filter_map(|(id, raw)| {
            let id = Uuid::parse_str(id?.trim()).ok()?;
            let raw = raw?;
            let unreadable = !raw.trim().is_empty() && parse_stored_birthday(&raw).is_none();
            unreadable.then_some((id, raw))
        })
        .collect())
}

/// Read a cell as text whatever storage class it was written with.
fn text_cell(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    })
}

/// Stored birthdays are `YYYY-MM-DD`; a timestamp written by another tool is
/// accepted too.
fn parse_stored_birthday(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, BIRTHDAY_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .ok()
}
