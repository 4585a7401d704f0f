use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::models::{Contact, ContactCollection};

/// Demo contacts written when the contacts file does not exist yet.
///
/// The second contact's birthday lands on `today` so a fresh install has
/// something to show on the birthday check.
pub fn demo_contacts(today: NaiveDate) -> ContactCollection {
    let todays_birthday = NaiveDate::from_ymd_opt(2000, today.month(), today.day());

    vec![
        demo("Alice Johnson", "+1234567890", NaiveDate::from_ymd_opt(1995, 3, 15)),
        demo("Today Birthday Person", "+9876543210", todays_birthday),
        demo("Bob Smith", "+5555555555", NaiveDate::from_ymd_opt(1988, 12, 25)),
    ]
    .into()
}

fn demo(name: &str, phone: &str, birthday: Option<NaiveDate>) -> Contact {
    Contact {
        id: Uuid::new_v4(),
        name: name.to_string(),
        phone: phone.to_string(),
        birthday,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_contacts_include_todays_birthday() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let contacts = demo_contacts(today);

        assert_eq!(contacts.len(), 3);
        let person = contacts.get(1).unwrap();
        assert_eq!(person.name, "Today Birthday Person");
        assert_eq!(person.birthday, NaiveDate::from_ymd_opt(2000, 2, 28));
    }

    #[test]
    fn test_leap_day_seed_is_valid() {
        let today = NaiveDate::from_ymd_opt(2028, 2, 29).unwrap();
        let contacts = demo_contacts(today);
        assert_eq!(
            contacts.get(1).unwrap().birthday,
            NaiveDate::from_ymd_opt(2000, 2, 29)
        );
    }
}
