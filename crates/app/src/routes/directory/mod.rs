mod form_sheet;
mod list;

pub use list::Directory;
