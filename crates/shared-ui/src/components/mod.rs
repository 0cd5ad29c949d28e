// Standalone components
pub mod badge;
pub mod button;
pub mod card;
pub mod data_table;
pub mod detail_list;
pub mod form;
pub mod form_select;
pub mod input;
pub mod page_header;
pub mod search_bar;
pub mod sheet;
pub mod skeleton;
pub mod textarea;

// Primitive wrappers
pub mod avatar;
pub mod switch;
pub mod toast;

// Depends on the sidebar context
pub mod sidebar;

pub use avatar::*;
pub use badge::*;
pub use button::*;
pub use card::*;
pub use data_table::*;
pub use detail_list::*;
pub use form::*;
pub use form_select::*;
pub use input::*;
pub use page_header::*;
pub use search_bar::*;
pub use sheet::*;
pub use sidebar::*;
pub use skeleton::*;
pub use switch::*;
pub use textarea::*;
pub use toast::*;
