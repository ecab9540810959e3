//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_account_detail_page, get_accounts_page, get_create_account_page,
        get_edit_account_page,
    },
    endpoints,
    not_found::get_404_not_found,
    person::{
        create_person_endpoint, delete_person_endpoint, edit_person_endpoint,
        get_create_person_page, get_edit_person_page, get_person_detail_page, get_persons_page,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_create_transaction_page, get_edit_transaction_page, get_transaction_detail_page,
        get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let person_routes = Router::new()
        .route(endpoints::PERSONS_VIEW, get(get_persons_page))
        .route(endpoints::NEW_PERSON_VIEW, get(get_create_person_page))
        .route(endpoints::PERSON_DETAIL_VIEW, get(get_person_detail_page))
        .route(endpoints::EDIT_PERSON_VIEW, get(get_edit_person_page))
        .route(endpoints::POST_PERSON, post(create_person_endpoint))
        .route(endpoints::PUT_PERSON, put(edit_person_endpoint))
        .route(endpoints::DELETE_PERSON, delete(delete_person_endpoint));

    let account_routes = Router::new()
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::NEW_ACCOUNT_VIEW, get(get_create_account_page))
        .route(endpoints::ACCOUNT_DETAIL_VIEW, get(get_account_detail_page))
        .route(endpoints::EDIT_ACCOUNT_VIEW, get(get_edit_account_page))
        .route(endpoints::POST_ACCOUNT, post(create_account_endpoint))
        .route(endpoints::PUT_ACCOUNT, put(edit_account_endpoint))
        .route(endpoints::DELETE_ACCOUNT, delete(delete_account_endpoint));

    let transaction_routes = Router::new()
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::TRANSACTION_DETAIL_VIEW,
            get(get_transaction_detail_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::POST_TRANSACTION, post(create_transaction_endpoint))
        .route(endpoints::PUT_TRANSACTION, put(edit_transaction_endpoint))
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        );

    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .merge(person_routes)
        .merge(account_routes)
        .merge(transaction_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the persons page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::PERSONS_VIEW)
}
