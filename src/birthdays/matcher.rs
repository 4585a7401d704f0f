use chrono::{Datelike, Local, NaiveDate};

use crate::models::{BirthdayMatch, Contact, ContactCollection};

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Heading date for a birthday check, e.g. `October 16, 2026`.
pub fn format_today(today: NaiveDate) -> String {
    today.format("%B %d, %Y").to_string()
}

/// Whether `birthday` recurs on `day`. The year is ignored; a February 29
/// birthday only matches on February 29.
pub fn is_birthday_on(birthday: NaiveDate, day: NaiveDate) -> bool {
    birthday.month() == day.month() && birthday.day() == day.day()
}

/// Contacts whose birthday falls on `today`, in collection order.
///
/// Contacts without a readable birthday are skipped.
pub fn matches_today(contacts: &ContactCollection, today: NaiveDate) -> Vec<BirthdayMatch> {
    contacts
        .iter()
        .filter(|contact| has_birthday_on(contact, today))
        .map(BirthdayMatch::from)
        .collect()
}

fn has_birthday_on(contact: &Contact, day: NaiveDate) -> bool {
    contact
        .birthday
        .is_some_and(|birthday| is_birthday_on(birthday, day))
}
