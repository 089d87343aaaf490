//! Best-effort notification side channel.
//!
//! Stands in for a real mail transport: the message is written to the log at
//! info level and the outcome never influences the HTTP response.

#[derive(Clone)]
pub struct Mailer {
    from: String,
    to: String,
}

impl Mailer {
    pub fn new(from: String, to: String) -> Self {
        Self { from, to }
    }

    pub fn send(&self, subject: &str, message: &str) {
        tracing::info!(
            from = %self.from,
            to = %self.to,
            subject,
            message,
            "mail notification"
        );
    }
}
