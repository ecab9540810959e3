//! Defines the route handler for the page that lists persons.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::{Connection, named_params};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        edit_delete_action_links, pagination_nav, sort_header_link,
    },
    navigation::NavBar,
    pagination::{Pagination, PaginationConfig, create_pagination_indicators},
};

/// The sort orders accepted by the persons list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonSortOrder {
    /// First name, ascending. The default.
    #[default]
    Name,
    /// First name, descending.
    NameDesc,
    /// Surname, ascending.
    Surname,
    /// Surname, descending.
    SurnameDesc,
}

impl PersonSortOrder {
    fn order_by_clause(self) -> &'static str {
        match self {
            PersonSortOrder::Name => "ORDER BY person.first_name ASC",
            PersonSortOrder::NameDesc => "ORDER BY person.first_name DESC",
            PersonSortOrder::Surname => "ORDER BY person.surname ASC",
            PersonSortOrder::SurnameDesc => "ORDER BY person.surname DESC",
        }
    }
}

/// The query parameters of the persons list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonsQuery {
    /// Substring filter on the ID number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    /// Substring filter on the surname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// Substring filter on the account numbers owned by the person.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    /// The sort order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<PersonSortOrder>,
    /// The 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

impl PersonsQuery {
    fn sort(&self) -> PersonSortOrder {
        self.sort.unwrap_or_default()
    }

    fn to_url(&self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query) if !query.is_empty() => format!("{}?{query}", endpoints::PERSONS_VIEW),
            _ => endpoints::PERSONS_VIEW.to_owned(),
        }
    }

    /// The URL for the same filters with `sort`, back on the first page.
    fn sort_url(&self, sort: PersonSortOrder) -> String {
        Self {
            sort: Some(sort),
            page: None,
            ..self.clone()
        }
        .to_url()
    }

    /// The URL for the same filters and sort on `page`.
    fn page_url(&self, page: u64) -> String {
        Self {
            page: Some(page),
            ..self.clone()
        }
        .to_url()
    }

    /// The next sort order when clicking a column that may already be the
    /// active sort column.
    fn toggled(&self, ascending: PersonSortOrder, descending: PersonSortOrder) -> PersonSortOrder {
        if self.sort() == ascending {
            descending
        } else {
            ascending
        }
    }

    fn filter_pattern(filter: &Option<String>) -> String {
        match filter {
            Some(text) if !text.trim().is_empty() => format!("%{}%", text.trim()),
            _ => "%".to_owned(),
        }
    }
}

/// The person data to display in the list view.
#[derive(Debug, PartialEq)]
struct PersonTableRow {
    first_name: String,
    surname: String,
    id_number: String,
    account_count: i64,
    detail_url: String,
    edit_url: String,
    delete_url: String,
}

/// The state needed for the persons list page.
#[derive(Debug, Clone)]
pub struct PersonsPageState {
    /// The database connection for reading persons.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for PersonsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Renders the persons list with search, sorting, and pagination.
pub async fn get_persons_page(
    State(state): State<PersonsPageState>,
    Query(query): Query<PersonsQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let row_count = count_persons(&query, &connection)
        .inspect_err(|error| tracing::error!("could not count persons: {error}"))?;
    let pagination = Pagination::new(
        query.page,
        state.pagination_config.persons_page_size,
        row_count,
    );
    let persons = get_person_table_rows(&query, &pagination, &connection)
        .inspect_err(|error| tracing::error!("could not get persons: {error}"))?;

    Ok(persons_view(
        &persons,
        &query,
        &pagination,
        state.pagination_config.max_pages,
    )
    .into_response())
}

const FILTER_SQL: &str = "person.id_number LIKE :id_number
      AND person.surname LIKE :surname
      AND (:account_number = '%' OR EXISTS (
            SELECT 1 FROM account
            WHERE account.person_id = person.id
              AND account.account_number LIKE :account_number))";

fn count_persons(query: &PersonsQuery, connection: &Connection) -> Result<u64, Error> {
    // SQLite integers are i64, convert to u64 for the paginator.
    let row_count: i64 = connection.query_row(
        &format!("SELECT COUNT(person.id) FROM person WHERE {FILTER_SQL}"),
        named_params! {
            ":id_number": PersonsQuery::filter_pattern(&query.id_number),
            ":surname": PersonsQuery::filter_pattern(&query.surname),
            ":account_number": PersonsQuery::filter_pattern(&query.account_number),
        },
        |row| row.get(0),
    )?;

    Ok(row_count as u64)
}

fn get_person_table_rows(
    query: &PersonsQuery,
    pagination: &Pagination,
    connection: &Connection,
) -> Result<Vec<PersonTableRow>, Error> {
    let sql = format!(
        "SELECT person.id, person.first_name, person.surname, person.id_number,
            (SELECT COUNT(id) FROM account WHERE account.person_id = person.id)
         FROM person
         WHERE {FILTER_SQL}
         {}
         LIMIT :limit OFFSET :offset",
        query.sort().order_by_clause()
    );

    connection
        .prepare(&sql)?
        .query_map(
            named_params! {
                ":id_number": PersonsQuery::filter_pattern(&query.id_number),
                ":surname": PersonsQuery::filter_pattern(&query.surname),
                ":account_number": PersonsQuery::filter_pattern(&query.account_number),
                ":limit": pagination.page_size as i64,
                ":offset": pagination.offset() as i64,
            },
            |row| {
                let id: i64 = row.get(0)?;
                let first_name: Option<String> = row.get(1)?;

                Ok(PersonTableRow {
                    first_name: first_name.unwrap_or_default(),
                    surname: row.get(2)?,
                    id_number: row.get(3)?,
                    account_count: row.get(4)?,
                    detail_url: format_endpoint(endpoints::PERSON_DETAIL_VIEW, id),
                    edit_url: format_endpoint(endpoints::EDIT_PERSON_VIEW, id),
                    delete_url: format_endpoint(endpoints::DELETE_PERSON, id),
                })
            },
        )?
        .map(|person_result| person_result.map_err(Error::from))
        .collect()
}

fn persons_view(
    persons: &[PersonTableRow],
    query: &PersonsQuery,
    pagination: &Pagination,
    max_pages: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::PERSONS_VIEW).into_html();

    let name_sort_url = query.sort_url(query.toggled(
        PersonSortOrder::Name,
        PersonSortOrder::NameDesc,
    ));
    let surname_sort_url = query.sort_url(query.toggled(
        PersonSortOrder::Surname,
        PersonSortOrder::SurnameDesc,
    ));

    let table_row = |person: &PersonTableRow| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(person.detail_url) class=(LINK_STYLE)
                    {
                        (person.first_name)
                    }
                }

                td class=(TABLE_CELL_STYLE) { (person.surname) }

                td class=(TABLE_CELL_STYLE) { (person.id_number) }

                td class="px-6 py-4 text-right" { (person.account_count) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &person.edit_url,
                            &person.delete_url,
                            &format!(
                                "Are you sure you want to delete '{} {}'? This cannot be undone.",
                                person.first_name, person.surname
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
                    h1 class="text-xl font-bold" { "Persons" }

                    a href=(endpoints::NEW_PERSON_VIEW) class=(LINK_STYLE) { "Add Person" }
                }

                (search_form(query))

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
                                    (sort_header_link("First Name", &name_sort_url))
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    (sort_header_link("Surname", &surname_sort_url))
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "ID Number"
                                }
                                th scope="col" class="px-6 py-3 text-right" { "Accounts" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for person in persons {
                                (table_row(person))
                            }

                            @if persons.is_empty() {
                                tr
                                {
                                    td colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No persons found. Create a person "
                                        a href=(endpoints::NEW_PERSON_VIEW) class=(LINK_STYLE)
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

    crate::html::base("Persons", &content)
}

fn search_form(query: &PersonsQuery) -> Markup {
    html!(
        form method="get" action=(endpoints::PERSONS_VIEW)
            class="flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="id_number" class=(FORM_LABEL_STYLE) { "ID Number" }
                input id="id_number" type="text" name="id_number"
                    value=(query.id_number.clone().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="surname" class=(FORM_LABEL_STYLE) { "Surname" }
                input id="surname" type="text" name="surname"
                    value=(query.surname.clone().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="account_number" class=(FORM_LABEL_STYLE) { "Account Number" }
                input id="account_number" type="text" name="account_number"
                    value=(query.account_number.clone().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Search" }
        }
    )
}


#[cfg(test)]
mod list_query_tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        pagination::Pagination,
        person::core::{PersonFields, create_person},
    };

    use super::{PersonSortOrder, PersonsQuery, count_persons, get_person_table_rows};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert_person(first_name: &str, surname: &str, id_number: &str, connection: &Connection) {
        create_person(
            &PersonFields::new(first_name, surname, id_number).unwrap(),
            connection,
        )
        .unwrap();
    }

    #[test]
    fn filters_by_surname_substring() {
        let connection = get_test_connection();
        insert_person("John", "Doe", "8501015000089", &connection);
        insert_person("Jane", "Smith", "9002026000098", &connection);

        let query = PersonsQuery {
            surname: Some("mit".to_owned()),
            ..Default::default()
        };

        let row_count = count_persons(&query, &connection).unwrap();
        let rows =
            get_person_table_rows(&query, &Pagination::new(None, 10, row_count), &connection)
                .unwrap();

        assert_eq!(row_count, 1);
        assert_eq!(rows[0].surname, "Smith");
    }

    #[test]
    fn filters_by_owned_account_number() {
        let connection = get_test_connection();
        insert_person("John", "Doe", "8501015000089", &connection);
        insert_person("Jane", "Smith", "9002026000098", &connection);
        connection
            .execute(
                "INSERT INTO account (person_id, account_number, outstanding_balance, is_closed)
                 VALUES (2, 'ACC10002', '0.00', 0)",
                [],
            )
            .unwrap();

        let query = PersonsQuery {
            account_number: Some("10002".to_owned()),
            ..Default::default()
        };

        let row_count = count_persons(&query, &connection).unwrap();
        let rows =
            get_person_table_rows(&query, &Pagination::new(None, 10, row_count), &connection)
                .unwrap();

        assert_eq!(row_count, 1);
        assert_eq!(rows[0].surname, "Smith");
        assert_eq!(rows[0].account_count, 1);
    }

    #[test]
    fn sorts_by_surname_descending() {
        let connection = get_test_connection();
        insert_person("John", "Doe", "8501015000089", &connection);
        insert_person("Jane", "Smith", "9002026000098", &connection);

        let query = PersonsQuery {
            sort: Some(PersonSortOrder::SurnameDesc),
            ..Default::default()
        };

        let rows = get_person_table_rows(&query, &Pagination::new(None, 10, 2), &connection)
            .unwrap();

        assert_eq!(rows[0].surname, "Smith");
        assert_eq!(rows[1].surname, "Doe");
    }

    #[test]
    fn pages_through_results() {
        let connection = get_test_connection();
        for i in 0..12 {
            insert_person(
                "Person",
                &format!("Surname{i:02}"),
                &format!("85010150000{i:02}"),
                &connection,
            );
        }

        let query = PersonsQuery {
            sort: Some(PersonSortOrder::Surname),
            page: Some(2),
            ..Default::default()
        };
        let row_count = count_persons(&query, &connection).unwrap();
        let pagination = Pagination::new(query.page, 10, row_count);

        let rows = get_person_table_rows(&query, &pagination, &connection).unwrap();

        assert_eq!(row_count, 12);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].surname, "Surname10");
    }
}
