//! Transaction management: the model, the balance-maintaining ledger
//! operations, and the transaction pages.

pub(crate) mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod detail_page;
mod edit_endpoint;
mod edit_page;
pub(crate) mod ledger;
mod transactions_page;

pub use core::{
    Transaction, create_transaction_table, get_transaction, get_transactions_by_account,
    map_row_to_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use detail_page::get_transaction_detail_page;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use ledger::{
    TransactionInput, TransactionRevision, post_transaction, retract_transaction,
    revise_transaction,
};
pub use transactions_page::get_transactions_page;
