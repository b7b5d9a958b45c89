use maud::{html, Markup};

pub mod access_form;
pub mod charts;
pub mod error;

pub use access_form::access_code_form;
pub use charts::{bar_chart, count_table};
pub use error::html_error_response;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h3 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn metric(label: &str, value: impl maud::Render) -> Markup {
    html! {
        div class="metric" {
            span class="metric-label" { (label) }
            span class="metric-value" { (value) }
        }
    }
}

pub fn warning_banner(message: &str) -> Markup {
    html! {
        div class="warning" role="alert" { "⚠️ " (message) }
    }
}
