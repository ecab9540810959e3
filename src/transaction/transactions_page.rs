//! Defines the route handler for the page that lists transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::{Connection, named_params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

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

/// The sort orders accepted by the transactions list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSortOrder {
    /// Transaction date, ascending. The default.
    #[default]
    Date,
    /// Transaction date, descending.
    DateDesc,
    /// Amount, ascending.
    Amount,
    /// Amount, descending.
    AmountDesc,
}

impl TransactionSortOrder {
    // The amount column holds decimal text, sorting it lexically would put
    // "9.00" after "10.00".
    fn order_by_clause(self) -> &'static str {
        match self {
            TransactionSortOrder::Date => {
                "ORDER BY \"transaction\".transaction_date ASC, \"transaction\".id ASC"
            }
            TransactionSortOrder::DateDesc => {
                "ORDER BY \"transaction\".transaction_date DESC, \"transaction\".id DESC"
            }
            TransactionSortOrder::Amount => "ORDER BY CAST(\"transaction\".amount AS REAL) ASC",
            TransactionSortOrder::AmountDesc => {
                "ORDER BY CAST(\"transaction\".amount AS REAL) DESC"
            }
        }
    }
}

/// The query parameters of the transactions list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionsQuery {
    /// Substring filter matched against the description and the account
    /// number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// The sort order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<TransactionSortOrder>,
    /// The 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

impl TransactionsQuery {
    fn sort(&self) -> TransactionSortOrder {
        self.sort.unwrap_or_default()
    }

    fn to_url(&self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query) if !query.is_empty() => {
                format!("{}?{query}", endpoints::TRANSACTIONS_VIEW)
            }
            _ => endpoints::TRANSACTIONS_VIEW.to_owned(),
        }
    }

    fn sort_url(&self, sort: TransactionSortOrder) -> String {
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
        ascending: TransactionSortOrder,
        descending: TransactionSortOrder,
    ) -> TransactionSortOrder {
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

/// The transaction data to display in the list view.
#[derive(Debug, PartialEq)]
struct TransactionTableRow {
    transaction_date: Date,
    account_number: String,
    description: String,
    amount: Decimal,
    detail_url: String,
    account_url: String,
    edit_url: String,
    delete_url: String,
}

/// The state needed for the transactions list page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Renders the transactions list with search, sorting, and pagination.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let row_count = count_transactions(&query, &connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;
    let pagination = Pagination::new(
        query.page,
        state.pagination_config.transactions_page_size,
        row_count,
    );
    let transactions = get_transaction_table_rows(&query, &pagination, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(transactions_view(
        &transactions,
        &query,
        &pagination,
        state.pagination_config.max_pages,
    )
    .into_response())
}

const FILTER_SQL: &str =
    "(\"transaction\".description LIKE :search OR account.account_number LIKE :search)";

fn count_transactions(query: &TransactionsQuery, connection: &Connection) -> Result<u64, Error> {
    // SQLite integers are i64, convert to u64 for the paginator.
    let row_count: i64 = connection.query_row(
        &format!(
            "SELECT COUNT(\"transaction\".id)
             FROM \"transaction\"
             INNER JOIN account ON account.id = \"transaction\".account_id
             WHERE {FILTER_SQL}"
        ),
        named_params! { ":search": query.search_pattern() },
        |row| row.get(0),
    )?;

    Ok(row_count as u64)
}

fn get_transaction_table_rows(
    query: &TransactionsQuery,
    pagination: &Pagination,
    connection: &Connection,
) -> Result<Vec<TransactionTableRow>, Error> {
    let sql = format!(
        "SELECT \"transaction\".id, \"transaction\".transaction_date,
            \"transaction\".amount, \"transaction\".description,
            account.id, account.account_number
         FROM \"transaction\"
         INNER JOIN account ON account.id = \"transaction\".account_id
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
                let transaction_id: i64 = row.get(0)?;
                let account_id: i64 = row.get(4)?;

                Ok(TransactionTableRow {
                    transaction_date: row.get(1)?,
                    amount: decimal_from_row(row, 2)?,
                    description: row.get(3)?,
                    account_number: row.get(5)?,
                    detail_url: format_endpoint(
                        endpoints::TRANSACTION_DETAIL_VIEW,
                        transaction_id,
                    ),
                    account_url: format_endpoint(endpoints::ACCOUNT_DETAIL_VIEW, account_id),
                    edit_url: format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id),
                    delete_url: format_endpoint(endpoints::DELETE_TRANSACTION, transaction_id),
                })
            },
        )?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

fn transactions_view(
    transactions: &[TransactionTableRow],
    query: &TransactionsQuery,
    pagination: &Pagination,
    max_pages: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let date_sort_url = query.sort_url(query.toggled(
        TransactionSortOrder::Date,
        TransactionSortOrder::DateDesc,
    ));
    let amount_sort_url = query.sort_url(query.toggled(
        TransactionSortOrder::Amount,
        TransactionSortOrder::AmountDesc,
    ));

    let table_row = |transaction: &TransactionTableRow| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(transaction.detail_url) class=(LINK_STYLE)
                    {
                        (transaction.transaction_date)
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    a href=(transaction.account_url) class=(LINK_STYLE)
                    {
                        (transaction.account_number)
                    }
                }

                td class=(TABLE_CELL_STYLE) { (transaction.description) }

                td class="px-6 py-4 text-right" { (format_currency(transaction.amount)) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &transaction.edit_url,
                            &transaction.delete_url,
                            &format!(
                                "Are you sure you want to delete this transaction of {}? \
                                The account balance will be adjusted.",
                                format_currency(transaction.amount)
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
                    h1 class="text-xl font-bold" { "Transactions" }
                }

                form method="get" action=(endpoints::TRANSACTIONS_VIEW)
                    class="flex flex-wrap items-end gap-4"
                {
                    div
                    {
                        label for="search" class=(FORM_LABEL_STYLE)
                        {
                            "Description or Account Number"
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
                                    (sort_header_link("Date", &date_sort_url))
                                }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    (sort_header_link("Amount", &amount_sort_url))
                                }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (table_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions found. Post transactions from an \
                                        account's detail page."
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

    crate::html::base("Transactions", &content)
}
