use crate::templates::{components::access_code_form, desktop_layout, PageChrome};
use maud::{html, Markup};

pub fn login_page(error: Option<&str>) -> Markup {
    desktop_layout(
        "Dashboard (Acesso Restrito)",
        &PageChrome::default(),
        html! {
            main {
                h2 { "Acesso restrito" }
                (access_code_form(error))
            }
        },
    )
}
