//! The application's route URIs.
//!
//! For routes that take a parameter, e.g., '/persons/{person_id}', use
//! [format_endpoint].

/// The root route which redirects to the persons list.
pub const ROOT: &str = "/";

/// The page listing persons with search, sorting, and pagination.
pub const PERSONS_VIEW: &str = "/persons";
/// The page for creating a new person.
pub const NEW_PERSON_VIEW: &str = "/persons/new";
/// The page showing one person and their accounts.
pub const PERSON_DETAIL_VIEW: &str = "/persons/{person_id}";
/// The page for editing an existing person.
pub const EDIT_PERSON_VIEW: &str = "/persons/{person_id}/edit";
/// The route to create a person.
pub const POST_PERSON: &str = "/persons";
/// The route to update a person.
pub const PUT_PERSON: &str = "/persons/{person_id}";
/// The route to delete a person.
pub const DELETE_PERSON: &str = "/persons/{person_id}";

/// The page listing accounts with search, sorting, and pagination.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The page for creating a new account. Takes a `person` query parameter to
/// preselect the owner.
pub const NEW_ACCOUNT_VIEW: &str = "/accounts/new";
/// The page showing one account, its owner, and its transactions.
pub const ACCOUNT_DETAIL_VIEW: &str = "/accounts/{account_id}";
/// The page for editing an existing account.
pub const EDIT_ACCOUNT_VIEW: &str = "/accounts/{account_id}/edit";
/// The route to create an account.
pub const POST_ACCOUNT: &str = "/accounts";
/// The route to update an account.
pub const PUT_ACCOUNT: &str = "/accounts/{account_id}";
/// The route to delete an account.
pub const DELETE_ACCOUNT: &str = "/accounts/{account_id}";

/// The page listing transactions with search, sorting, and pagination.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for posting a new transaction against an account.
pub const NEW_TRANSACTION_VIEW: &str = "/accounts/{account_id}/transactions/new";
/// The page showing one transaction.
pub const TRANSACTION_DETAIL_VIEW: &str = "/transactions/{transaction_id}";
/// The page for revising an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The route to post a transaction.
pub const POST_TRANSACTION: &str = "/transactions";
/// The route to revise a transaction.
pub const PUT_TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route to retract a transaction.
pub const DELETE_TRANSACTION: &str = "/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/persons/{person_id}', '{person_id}' is
/// the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
