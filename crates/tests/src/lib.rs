#[cfg(test)]
mod common;

#[cfg(test)]
mod staff_tests;

#[cfg(test)]
mod role_access_tests;

#[cfg(test)]
mod task_tests;

#[cfg(test)]
mod leave_tests;

#[cfg(test)]
mod attendance_tests;

#[cfg(test)]
mod report_tests;

#[cfg(test)]
mod notification_tests;

#[cfg(test)]
mod account_tests;
