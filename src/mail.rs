/// An outgoing email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mail {
	pub to: String,
	pub from: String,
	pub subject: String,
	pub body: String,
}

/// Delivers outgoing email.
#[axum::async_trait]
pub trait Mailer: Send + Sync {
	async fn send(&self, mail: Mail);
}

/// A mailer that writes every message to the log instead of delivering it.
///
/// Bodies carry live reset links, so they are only logged at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogMailer;

#[axum::async_trait]
impl Mailer for LogMailer {
	async fn send(&self, mail: Mail) {
		tracing::info!(
			to = %mail.to,
			from = %mail.from,
			subject = %mail.subject,
			"outgoing mail"
		);
		tracing::debug!(to = %mail.to, "mail body:\n{}", mail.body);
	}
}

/// The message sent when a password reset is requested.
pub fn reset_requested(from: &str, to: &str, link: &str) -> Mail {
	Mail {
		to: to.into(),
		from: from.into(),
		subject: "Campground password reset".into(),
		body: format!(
			"You are receiving this because you (or someone else) have requested \
			 the reset of the password for your account.\n\n\
			 Please open the following link to complete the process:\n\n\
			 {link}\n\n\
			 If you did not request this, please ignore this email and your password \
			 will remain unchanged.\n"
		),
	}
}

/// The message sent once a password has been changed.
pub fn password_changed(from: &str, to: &str, username: &str) -> Mail {
	Mail {
		to: to.into(),
		from: from.into(),
		subject: "Your password has been changed".into(),
		body: format!(
			"Hello {username},\n\n\
			 This is a confirmation that the password for your account {to} has just been changed.\n"
		),
	}
}
