//! watchdog-notify — relays a finished report to Telegram chats.
//!
//! Delivery is best-effort: each chat gets one attempt, a failed chat is
//! logged and skipped, and nothing here is ever fatal to the caller.

pub mod telegram;

pub use telegram::{Delivery, NotifyError, TelegramNotifier};
