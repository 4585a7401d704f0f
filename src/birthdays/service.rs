use std::time::Duration;

use chrono::NaiveDate;

use super::dispatch::{dispatch_birthdays, DispatchReport, NotificationDispatcher};
use super::greeting::GreetingTemplate;
use super::matcher::matches_today;
use crate::config::{BookConfig, DEFAULT_SEND_DELAY_MS};
use crate::error::StoreError;
use crate::models::BirthdayMatch;
use crate::store::ContactStore;

/// Birthday checks and greetings over a contact store.
pub struct BirthdayService<'a> {
    store: &'a ContactStore,
    greeting: GreetingTemplate,
    pacing: Duration,
}

impl<'a> BirthdayService<'a> {
    pub fn new(store: &'a ContactStore) -> Self {
        Self {
            store,
            greeting: GreetingTemplate::default(),
            pacing: Duration::from_millis(DEFAULT_SEND_DELAY_MS),
        }
    }

    pub fn from_config(store: &'a ContactStore, config: &BookConfig) -> Self {
        Self {
            store,
            greeting: config.greeting(),
            pacing: config.send_delay(),
        }
    }

    pub fn with_greeting(mut self, greeting: GreetingTemplate) -> Self {
        self.greeting = greeting;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Contacts with a birthday on `today`. An unreadable store yields none.
    pub fn todays_birthdays(&self, today: NaiveDate) -> Vec<BirthdayMatch> {
        matches_today(&self.store.load_as_of(today), today)
    }

    /// Greet everyone whose birthday is `today`.
    ///
    /// Fails only when the store cannot be read; send failures are in the
    /// report.
    pub fn send_birthday_messages<D: NotificationDispatcher + ?Sized>(
        &self,
        today: NaiveDate,
        dispatcher: &D,
    ) -> Result<DispatchReport, StoreError> {
        let contacts = self.store.try_load_as_of(today)?;
        let matches = matches_today(&contacts, today);

        tracing::info!(
            "Found {} birthday(s) on {}",
            matches.len(),
            today.format("%m-%d")
        );

        Ok(dispatch_birthdays(
            &matches,
            dispatcher,
            &self.greeting,
            self.pacing,
        ))
    }
}
