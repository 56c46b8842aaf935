//! Alert formatting and delivery channels

pub mod channels;
pub mod message;

pub use channels::{Channel, Notifier, NotifyError};
pub use message::AlertMessage;
