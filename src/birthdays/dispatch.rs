use std::time::Duration;

use serde::Serialize;

use super::greeting::{normalize_phone, GreetingTemplate};
use crate::error::DispatchError;
use crate::models::BirthdayMatch;

/// Something that can deliver a text message to a phone number.
///
/// Implementations are free to block; the dispatch loop has no timeout and
/// does not retry.
pub trait NotificationDispatcher {
    /// Send `message` to `phone`, which always starts with `+`.
    fn send(&self, phone: &str, message: &str) -> Result<(), DispatchError>;
}

impl<T: NotificationDispatcher + ?Sized> NotificationDispatcher for &T {
    fn send(&self, phone: &str, message: &str) -> Result<(), DispatchError> {
        (**self).send(phone, message)
    }
}

impl<T: NotificationDispatcher + ?Sized> NotificationDispatcher for Box<T> {
    fn send(&self, phone: &str, message: &str) -> Result<(), DispatchError> {
        (**self).send(phone, message)
    }
}

/// Dry-run dispatcher: logs each message and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn send(&self, phone: &str, message: &str) -> Result<(), DispatchError> {
        tracing::info!("[dry run] message to {}: {}", phone, message);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentGreeting {
    pub recipient: BirthdayMatch,
    /// Normalized number the message went to.
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedGreeting {
    pub recipient: BirthdayMatch,
    pub error: DispatchError,
}

/// Outcome of one dispatch run, per recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: Vec<SentGreeting>,
    pub failed: Vec<FailedGreeting>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    Success,
    Info,
    Error,
}

/// A message to show the user after a dispatch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
}

impl Feedback {
    fn new(level: FeedbackLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl DispatchReport {
    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    pub fn attempted(&self) -> usize {
        self.sent.len() + self.failed.len()
    }

    /// One error per failed recipient, then a summary.
    ///
    /// The "nothing to send" note is only given when there was nobody to
    /// send to; a run where every send failed is summarized by its errors.
    pub fn feedback(&self) -> Vec<Feedback> {
        let mut feedback: Vec<Feedback> = self
            .failed
            .iter()
            .map(|f| {
                Feedback::new(
                    FeedbackLevel::Error,
                    format!("Error sending message to {}: {}", f.recipient.name, f.error),
                )
            })
            .collect();

        if !self.sent.is_empty() {
            feedback.push(Feedback::new(
                FeedbackLevel::Success,
                format!("Successfully sent {} birthday messages!", self.sent.len()),
            ));
        } else if self.failed.is_empty() {
            feedback.push(Feedback::new(
                FeedbackLevel::Info,
                "No birthday messages to send today.",
            ));
        }

        feedback
    }
}

/// Send one greeting per recipient, in order.
///
/// Sleeps `pacing` between consecutive attempts. A failed send is recorded
/// and the loop moves on to the next recipient.
pub fn dispatch_birthdays<D: NotificationDispatcher + ?Sized>(
    recipients: &[BirthdayMatch],
    dispatcher: &D,
    greeting: &GreetingTemplate,
    pacing: Duration,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for (i, recipient) in recipients.iter().enumerate() {
        if i > 0 && !pacing.is_zero() {
            std::thread::sleep(pacing);
        }

        let phone = normalize_phone(&recipient.phone);
        if phone.len() == 1 {
            tracing::warn!("Skipping {}: no phone number", recipient.name);
            report.failed.push(FailedGreeting {
                recipient: recipient.clone(),
                error: DispatchError::InvalidPhone(recipient.phone.clone()),
            });
            continue;
        }

        let message = greeting.render(&recipient.name);
        tracing::info!("Sending birthday message to {} at {}", recipient.name, phone);

        match dispatcher.send(&phone, &message) {
            Ok(()) => {
                tracing::info!("Sent birthday message to {} at {}", recipient.name, phone);
                report.sent.push(SentGreeting {
                    recipient: recipient.clone(),
                    phone,
                    message,
                });
            }
            Err(error) => {
                tracing::warn!(
                    "Error sending message to {} at {}: {}",
                    recipient.name,
                    phone,
                    error
                );
                report.failed.push(FailedGreeting {
                    recipient: recipient.clone(),
                    error,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Instant;

    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, String, Instant)>>,
        fail_for: Vec<String>,
    }

    impl NotificationDispatcher for Recorder {
        fn send(&self, phone: &str, message: &str) -> Result<(), DispatchError> {
            self.calls
                .borrow_mut()
                .push((phone.to_string(), message.to_string(), Instant::now()));
            if self.fail_for.iter().any(|p| p == phone) {
                return Err(DispatchError::Failed("session closed".to_string()));
            }
            Ok(())
        }
    }

    fn recipient(name: &str, phone: &str) -> BirthdayMatch {
        BirthdayMatch {
            contact_id: Uuid::new_v4(),
            name: name.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_sends_normalized_phone_and_greeting() {
        let recorder = Recorder::default();
        let report = dispatch_birthdays(
            &[recipient("Ann", "441234")],
            &recorder,
            &GreetingTemplate::new("Hi {name}"),
            Duration::ZERO,
        );

        let calls = recorder.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "+441234");
        assert_eq!(calls[0].1, "Hi Ann");
        assert_eq!(report.sent_count(), 1);
        assert_eq!(report.sent[0].phone, "+441234");
    }

    #[test]
    fn test_failure_does_not_stop_remaining_sends() {
        let recorder = Recorder {
            fail_for: vec!["+2".to_string()],
            ..Recorder::default()
        };
        let recipients = [recipient("a", "+1"), recipient("b", "+2"), recipient("c", "3")];

        let report = dispatch_birthdays(
            &recipients,
            &recorder,
            &GreetingTemplate::default(),
            Duration::ZERO,
        );

        assert_eq!(recorder.calls.borrow().len(), 3);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.sent_count(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].recipient.name, "b");
        assert_eq!(
            report.feedback(),
            vec![
                Feedback::new(FeedbackLevel::Error, "Error sending message to b: session closed"),
                Feedback::new(FeedbackLevel::Success, "Successfully sent 2 birthday messages!"),
            ]
        );
    }

    #[test]
    fn test_empty_phone_is_reported_without_sending() {
        let recorder = Recorder::default();
        let report = dispatch_birthdays(
            &[recipient("nobody", "  ")],
            &recorder,
            &GreetingTemplate::default(),
            Duration::ZERO,
        );

        assert!(recorder.calls.borrow().is_empty());
        assert_eq!(
            report.failed[0].error,
            DispatchError::InvalidPhone("  ".to_string())
        );
    }

    #[test]
    fn test_pacing_between_sends() {
        let recorder = Recorder::default();
        let pacing = Duration::from_millis(30);

        dispatch_birthdays(
            &[recipient("a", "+1"), recipient("b", "+2"), recipient("c", "+3")],
            &recorder,
            &GreetingTemplate::default(),
            pacing,
        );

        let calls = recorder.calls.borrow();
        for pair in calls.windows(2) {
            assert!(pair[1].2.duration_since(pair[0].2) >= pacing);
        }
    }

    #[test]
    fn test_feedback_when_nobody_to_send_to() {
        let report = dispatch_birthdays(
            &[],
            &LogDispatcher,
            &GreetingTemplate::default(),
            Duration::ZERO,
        );

        assert_eq!(
            report.feedback(),
            vec![Feedback::new(
                FeedbackLevel::Info,
                "No birthday messages to send today."
            )]
        );
    }

    #[test]
    fn test_feedback_when_every_send_failed() {
        let recorder = Recorder {
            fail_for: vec!["+1".to_string()],
            ..Recorder::default()
        };
        let report = dispatch_birthdays(
            &[recipient("a", "+1")],
            &recorder,
            &GreetingTemplate::default(),
            Duration::ZERO,
        );

        let feedback = report.feedback();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].level, FeedbackLevel::Error);
    }
}
