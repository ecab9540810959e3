//! Account management: the model, database queries, and the account pages.

mod accounts_page;
pub(crate) mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod detail_page;
mod edit_endpoint;
mod edit_page;

pub use accounts_page::get_accounts_page;
pub use core::{
    Account, create_account, create_account_table, get_account, get_accounts_by_person,
    map_row_to_account,
};
pub use create_endpoint::create_account_endpoint;
pub use create_page::get_create_account_page;
pub use delete_endpoint::delete_account_endpoint;
pub use detail_page::get_account_detail_page;
pub use edit_endpoint::edit_account_endpoint;
pub use edit_page::get_edit_account_page;
