//! Defines the route handler for the page for creating a new person.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    person::core::NAME_MAX_LENGTH,
};

fn create_person_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::PERSONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_PERSON)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Person" }

                div
                {
                    label for="first_name" class=(FORM_LABEL_STYLE) { "First Name" }

                    input
                        name="first_name"
                        id="first_name"
                        type="text"
                        maxlength=(NAME_MAX_LENGTH)
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="surname" class=(FORM_LABEL_STYLE) { "Surname" }

                    input
                        name="surname"
                        id="surname"
                        type="text"
                        maxlength=(NAME_MAX_LENGTH)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="id_number" class=(FORM_LABEL_STYLE) { "ID Number" }

                    input
                        name="id_number"
                        id="id_number"
                        type="text"
                        pattern="[0-9]{13}"
                        title="Exactly 13 digits"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Person" }
            }
        }
    };

    base("Create Person", &content)
}

/// Renders the page for creating a person.
pub async fn get_create_person_page() -> Response {
    create_person_view().into_response()
}

#[cfg(test)]
mod view_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::get_create_person_page;

    #[tokio::test]
    async fn new_person_returns_form() {
        let response = get_create_person_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_eq!(
            form.value().attr("hx-post"),
            Some(endpoints::POST_PERSON),
            "want form posting to {}",
            endpoints::POST_PERSON
        );
        assert_form_input(&form, "first_name", "text");
        assert_form_input(&form, "surname", "text");
        assert_form_input(&form, "id_number", "text");
    }
}
