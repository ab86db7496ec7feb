//! Out-of-band delivery of signup confirmation codes.
//!
//! The API depends only on the [`ConfirmationMailer`] trait. [`SmtpMailer`]
//! sends real mail; [`LogMailer`] writes codes to the log when SMTP is not
//! configured; [`RecordingMailer`] keeps them in memory for tests.

pub mod email;
pub mod mailer;

pub use email::{EmailConfig, EmailError, SmtpMailer};
pub use mailer::{ConfirmationMailer, LogMailer, RecordingMailer, SentCode};
