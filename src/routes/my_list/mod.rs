mod add_entry;
mod get_list;
mod remove_entry;

pub use add_entry::*;
pub use get_list::*;
pub use remove_entry::*;
