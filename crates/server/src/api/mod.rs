#[cfg(feature = "server")]
pub(crate) mod auth;

mod session;
pub use session::*;

mod account;
pub use account::*;

mod staff;
pub use staff::*;

mod task;
pub use task::*;

mod leave;
pub use leave::*;

mod attendance;
pub use attendance::*;

mod report;
pub use report::*;

mod notification;
pub use notification::*;
