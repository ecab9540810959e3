//! The shared page layout and the Tailwind utility-class constants used
//! across views.

use maud::{DOCTYPE, Markup, html};

use crate::pagination::PaginationIndicator;

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// Wrap `content` in the shared HTML document layout.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Tally" }
                link href="https://cdn.jsdelivr.net/npm/tailwindcss@3.4.17/base.min.css" rel="stylesheet";

                script src="https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://cdn.jsdelivr.net/npm/htmx-ext-response-targets@2.0.4" {}
            }

            body class="bg-gray-100 dark:bg-gray-900" hx-ext="response-targets"
            {
                (content)

                div id="alert-container" class="fixed bottom-4 inset-x-0 mx-auto max-w-md px-4" {}
            }
        }
    }
}

/// Edit/delete links shown in the actions column of a table row.
///
/// The delete button targets the alert container on failure and removes the
/// closest table row on success.
pub fn edit_delete_action_links(edit_url: &str, delete_url: &str, confirm_message: &str) -> Markup {
    html!(
        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

        button
            type="button"
            class=(BUTTON_DELETE_STYLE)
            hx-delete=(delete_url)
            hx-confirm=(confirm_message)
            hx-target="closest tr"
            hx-swap="delete"
            hx-target-error="#alert-container"
        {
            "Delete"
        }
    )
}

/// A column header that toggles the sort order when clicked.
///
/// `url` must already carry the matching sort parameter.
pub fn sort_header_link(title: &str, url: &str) -> Markup {
    html!(
        a href=(url) class="flex items-center gap-1 hover:text-blue-600 dark:hover:text-blue-400"
        {
            (title)
        }
    )
}

/// Render the pagination indicator strip for a list view.
///
/// `page_url` builds the URL for a given page number, preserving the other
/// query parameters of the current view.
pub fn pagination_nav(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    const PAGE_LINK_STYLE: &str = "flex items-center justify-center px-3 h-8 leading-tight \
        text-gray-500 bg-white border border-gray-300 hover:bg-gray-100 hover:text-gray-700 \
        dark:bg-gray-800 dark:border-gray-700 dark:text-gray-400 dark:hover:bg-gray-700 \
        dark:hover:text-white";
    const CURR_PAGE_STYLE: &str = "flex items-center justify-center px-3 h-8 leading-tight \
        text-blue-600 bg-blue-50 border border-gray-300 dark:bg-gray-700 \
        dark:border-gray-700 dark:text-white";

    html!(
        nav aria-label="pagination"
        {
            ul class="inline-flex -space-x-px text-sm"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) class=(PAGE_LINK_STYLE) { "Previous" }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(PAGE_LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class=(CURR_PAGE_STYLE) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(PAGE_LINK_STYLE) { "…" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) class=(PAGE_LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod pagination_nav_tests {
    use scraper::{Html, Selector};

    use crate::pagination::PaginationIndicator;

    use super::pagination_nav;

    #[test]
    fn renders_links_and_current_page() {
        let indicators = [
            PaginationIndicator::BackButton(1),
            PaginationIndicator::Page(1),
            PaginationIndicator::CurrPage(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::NextButton(3),
        ];

        let markup = pagination_nav(&indicators, |page| format!("/persons?page={page}"));

        let html = Html::parse_fragment(&markup.into_string());
        let link_selector = Selector::parse("a").unwrap();
        let links: Vec<_> = html
            .select(&link_selector)
            .filter_map(|link| link.attr("href"))
            .collect();
        assert_eq!(
            links,
            vec![
                "/persons?page=1",
                "/persons?page=1",
                "/persons?page=3",
                "/persons?page=3"
            ]
        );

        let current_selector = Selector::parse("span[aria-current='page']").unwrap();
        let current = html
            .select(&current_selector)
            .next()
            .expect("no current page indicator");
        assert_eq!(current.text().collect::<String>(), "2");
    }
}
