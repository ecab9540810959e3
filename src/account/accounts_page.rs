//! Defines the route handler for the page that lists accounts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::{Connection, named_params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    currency::{decimal_from_row, format_currency},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        edit_delete_action_links, pagination_nav, sort_header_link,
    },
    navigation::NavBar,
    pagination::{Pagination, PaginationConfig, create_pagination_indicators},
};

/// The sort orders accepted by the accounts list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSortOrder {
    /// Account number, ascending. The default.
    #[default]
    Account,
    /// Account number, descending.
    AccountDesc,
    /// Outstanding balance, ascending.
    Balance,
    /// Outstanding balance, descending.
    BalanceDesc,
}

impl AccountSortOrder {
    // The balance column holds decimal text, sorting it lexically would put
    // "9.00" after "10.00".
    fn order_by_clause(self) -> &'static str {
        match self {
            AccountSortOrder::Account => "ORDER BY account.account_number ASC",
            AccountSortOrder::AccountDesc => "ORDER BY account.account_number DESC",
            AccountSortOrder::Balance => "ORDER BY CAST(account.outstanding_balance AS REAL) ASC",
            AccountSortOrder::BalanceDesc => {
                "ORDER BY CAST(account.outstanding_balance AS REAL) DESC"
            }
        }
    }
}

/// The query parameters of the accounts list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountsQuery {
    /// Substring filter matched against the account number and the owner's
    /// surname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// The sort order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<AccountSortOrder>,
    /// The 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

impl AccountsQuery {
    fn sort(&self) -> AccountSortOrder {
        self.sort.unwrap_or_default()
    }

    fn to_url(&self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query) if !query.is_empty() => format!("{}?{query}", endpoints::ACCOUNTS_VIEW),
            _ => endpoints::ACCOUNTS_VIEW.to_owned(),
        }
    }

    fn sort_url(&self, sort: AccountSortOrder) -> String {
        Self {
            sort: Some(sort),
            page: None,
            ..self.clone()
        }
        .to_url()
    }

    fn page_url(&self, page: u64) -> String {
        Self {
            page: Some(page),
            ..self.clone()
        }
        .to_url()
    }

    fn toggled(
        &self,
        ascending: AccountSortOrder,
        descending: AccountSortOrder,
    ) -> AccountSortOrder {
        if self.sort() == ascending {
            descending
        } else {
            ascending
        }
    }

    fn search_pattern(&self) -> String {
        match &self.search {
            Some(text) if !text.trim().is_empty() => format!("%{}%", text.trim()),
            _ => "%".to_owned(),
        }
    }
}

/// The account data to display in the list view.
#[derive(Debug, PartialEq)]
struct AccountTableRow {
    account_number: String,
    owner_name: String,
    outstanding_balance: Decimal,
    is_closed: bool,
    detail_url: String,
    owner_url: String,
    edit_url: String,
    delete_url: String,
}

/// The state needed for the accounts list page.
#[derive(Debug, Clone)]
pub struct AccountsPageState {
    /// The database connection for reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for AccountsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Renders the accounts list with search, sorting, and pagination.
pub async fn get_accounts_page(
    State(state): State<AccountsPageState>,
    Query(query): Query<AccountsQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let row_count = count_accounts(&query, &connection)
        .inspect_err(|error| tracing::error!("could not count accounts: {error}"))?;
    let pagination = Pagination::new(
        query.page,
        state.pagination_config.accounts_page_size,
        row_count,
    );
    let accounts = get_account_table_rows(&query, &pagination, &connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    Ok(accounts_view(
        &accounts,
        &query,
        &pagination,
        state.pagination_config.max_pages,
    )
    .into_response())
}

const FILTER_SQL: &str = "(account.account_number LIKE :search OR person.surname LIKE :search)";

fn count_accounts(query: &AccountsQuery, connection: &Connection) -> Result<u64, Error> {
    // SQLite integers are i64, convert to u64 for the paginator.
    let row_count: i64 = connection.query_row(
        &format!(
            "SELECT COUNT(account.id)
             FROM account INNER JOIN person ON person.id = account.person_id
             WHERE {FILTER_SQL}"
        ),
        named_params! { ":search": query.search_pattern() },
        |row| row.get(0),
    )?;

    Ok(row_count as u64)
}

fn get_account_table_rows(
    query: &AccountsQuery,
    pagination: &Pagination,
    connection: &Connection,
) -> Result<Vec<AccountTableRow>, Error> {
    let sql = format!(
        "SELECT account.id, account.account_number, account.outstanding_balance,
            account.is_closed, person.id, person.first_name, person.surname
         FROM account INNER JOIN person ON person.id = account.person_id
         WHERE {FILTER_SQL}
         {}
         LIMIT :limit OFFSET :offset",
        query.sort().order_by_clause()
    );

    connection
        .prepare(&sql)?
        .query_map(
            named_params! {
                ":search": query.search_pattern(),
                ":limit": pagination.page_size as i64,
                ":offset": pagination.offset() as i64,
            },
            |row| {
                let account_id: i64 = row.get(0)?;
                let person_id: i64 = row.get(4)?;
                let first_name: Option<String> = row.get(5)?;
                let surname: String = row.get(6)?;
                let owner_name = match first_name {
                    Some(first_name) => format!("{first_name} {surname}"),
                    None => surname,
                };

                Ok(AccountTableRow {
                    account_number: row.get(1)?,
                    owner_name,
                    outstanding_balance: decimal_from_row(row, 2)?,
                    is_closed: row.get(3)?,
                    detail_url: format_endpoint(endpoints::ACCOUNT_DETAIL_VIEW, account_id),
                    owner_url: format_endpoint(endpoints::PERSON_DETAIL_VIEW, person_id),
                    edit_url: format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account_id),
                    delete_url: format_endpoint(endpoints::DELETE_ACCOUNT, account_id),
                })
            },
        )?
        .map(|account_result| account_result.map_err(Error::from))
        .collect()
}

fn accounts_view(
    accounts: &[AccountTableRow],
    query: &AccountsQuery,
    pagination: &Pagination,
    max_pages: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let account_sort_url = query.sort_url(query.toggled(
        AccountSortOrder::Account,
        AccountSortOrder::AccountDesc,
    ));
    let balance_sort_url = query.sort_url(query.toggled(
        AccountSortOrder::Balance,
        AccountSortOrder::BalanceDesc,
    ));

    let table_row = |account: &AccountTableRow| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(account.detail_url) class=(LINK_STYLE) { (account.account_number) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    a href=(account.owner_url) class=(LINK_STYLE) { (account.owner_name) }
                }

                td class="px-6 py-4 text-right"
                {
                    (format_currency(account.outstanding_balance))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if account.is_closed { "Closed" } @else { "Open" }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &account.edit_url,
                            &account.delete_url,
                            &format!(
                                "Are you sure you want to delete account '{}'? This cannot be undone.",
                                account.account_number
                            ),
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE) { "Add Account" }
                }

                form method="get" action=(endpoints::ACCOUNTS_VIEW)
                    class="flex flex-wrap items-end gap-4"
                {
                    div
                    {
                        label for="search" class=(FORM_LABEL_STYLE)
                        {
                            "Account Number or Surname"
                        }
                        input id="search" type="text" name="search"
                            value=(query.search.clone().unwrap_or_default())
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Search" }
                }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    (sort_header_link("Account Number", &account_sort_url))
                                }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Owner" }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    (sort_header_link("Balance", &balance_sort_url))
                                }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for account in accounts {
                                (table_row(account))
                            }

                            @if accounts.is_empty() {
                                tr
                                {
                                    td colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No accounts found. Create an account "
                                        a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }

                @if pagination.has_multiple_pages() {
                    div class="flex justify-center"
                    {
                        (pagination_nav(
                            &create_pagination_indicators(pagination, max_pages),
                            |page| query.page_url(page),
                        ))
                    }
                }
            }
        }
    );

    crate::html::base("Accounts", &content)
}
