//! Outbound notification handling.
//!
//! This module renders report emails and hands them to the mail
//! transport. The transport itself is a collaborator behind a trait;
//! the default implementation spools messages to an outbox directory.

pub mod dispatcher;
pub mod outbox;

pub use dispatcher::EmailDispatcher;
pub use outbox::{EmailMessage, MailTransport, OutboxMailer};
