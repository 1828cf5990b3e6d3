//! Change-notification plumbing shared by observable containers.

pub mod notification;
pub mod subscribers;

pub use notification::ChangeNotification;
pub use subscribers::{ChangeHandler, SubscriberList, SubscriptionId};
