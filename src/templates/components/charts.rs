use crate::domain::Counts;
use maud::{html, Markup};

const EMPTY_LABEL: &str = "(vazio)";

fn label(name: &str) -> &str {
    if name.is_empty() {
        EMPTY_LABEL
    } else {
        name
    }
}

/// Horizontal bars scaled against the largest count. Pure HTML/CSS.
pub fn bar_chart(counts: &Counts) -> Markup {
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);

    html! {
        @if counts.is_empty() {
            p class="muted" { "Nenhum registro." }
        } @else {
            div class="bars" {
                @for (name, n) in counts {
                    div class="bar-row" {
                        span class="bar-label" title=(label(name)) { (label(name)) }
                        span class="bar-track" {
                            span class="bar-fill" style=(format!("width: {:.1}%", *n as f64 * 100.0 / max as f64)) {}
                        }
                        span class="bar-value" { (n) }
                    }
                }
            }
        }
    }
}

pub fn count_table(heading: &str, counts: &Counts) -> Markup {
    html! {
        div class="scroll" {
            table {
                thead { tr { th { (heading) } th { "Qtd" } } }
                tbody {
                    @for (name, n) in counts {
                        tr { td { (label(name)) } td class="num" { (n) } }
                    }
                }
            }
        }
    }
}
