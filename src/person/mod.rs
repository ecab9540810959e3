//! Person management: the model, database queries, and the person pages.

pub(crate) mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod detail_page;
mod edit_endpoint;
mod edit_page;
mod persons_page;

pub use core::{
    Person, PersonFields, RowsAffected, create_person, create_person_table, get_person,
    map_row_to_person,
};
pub use create_endpoint::create_person_endpoint;
pub use create_page::get_create_person_page;
pub use delete_endpoint::delete_person_endpoint;
pub use detail_page::get_person_detail_page;
pub use edit_endpoint::edit_person_endpoint;
pub use edit_page::get_edit_person_page;
pub use persons_page::get_persons_page;
