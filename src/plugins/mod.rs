pub mod dispatcher;
pub mod notifiers;
pub mod traits;

pub use dispatcher::{DispatchSummary, NotifierDispatcher};
pub use traits::{NotificationEvent, NotificationResult, NotifierPlugin};
