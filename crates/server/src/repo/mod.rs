pub mod attendance;
pub mod leave;
pub mod notification;
pub mod report;
pub mod settings;
pub mod staff;
pub mod task;
pub mod token;
