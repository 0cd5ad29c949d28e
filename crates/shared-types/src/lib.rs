pub mod error;
pub mod feature_flags;
pub mod models;

// Organisation model
pub mod navigation;
pub mod role;
pub mod search;

// HR domain
pub mod account;
pub mod attendance;
pub mod dashboard;
pub mod leave;
pub mod notification;
pub mod report;
pub mod staff;
pub mod task;

pub use error::*;
pub use feature_flags::*;
pub use models::*;

pub use navigation::*;
pub use role::*;
pub use search::*;

pub use account::*;
pub use attendance::*;
pub use dashboard::*;
pub use leave::*;
pub use notification::*;
pub use report::*;
pub use staff::*;
pub use task::*;
