use crate::data::Listing;
use crate::domain::filters::{
    ALL_STATES_LABEL, CATEGORY_FORM_KEY, CATEGORY_KEY, QUERY_KEY, STATE_KEY,
};
use crate::domain::{FilterOptions, FilterSelection, StateChoice, Summary};
use crate::templates::components::{bar_chart, card, count_table, metric, warning_banner};
use crate::templates::{desktop_layout, PageChrome};
use maud::{html, Markup};

pub const PAGE_TITLE: &str = "Dashboard Coordenadores CDL Jovem - DLI 2025";

pub struct DashboardVm<'a> {
    /// "dd/mm HH:MM" of the cached export, when one exists.
    pub updated_at: Option<String>,
    pub warnings: Vec<String>,
    pub auto_refresh_secs: u64,
    /// `None` until a first export has been downloaded.
    pub data: Option<DashboardData<'a>>,
}

pub struct DashboardData<'a> {
    pub options: &'a FilterOptions,
    pub selection: &'a FilterSelection,
    pub summary: &'a Summary,
    /// Filtered and searched rows for the store list.
    pub stores: &'a [Listing<'a>],
}

/// 12345 -> "12,345"
fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn dashboard_page(vm: &DashboardVm<'_>) -> Markup {
    let back = vm
        .data
        .as_ref()
        .map(|d| d.selection.to_query_string())
        .unwrap_or_default();

    let chrome = PageChrome {
        authenticated: true,
        auto_refresh_secs: Some(vm.auto_refresh_secs),
        back,
    };

    desktop_layout(
        PAGE_TITLE,
        &chrome,
        html! {
            main {
                @if let Some(at) = &vm.updated_at {
                    p class="muted" { "Atualizado em " (at) }
                }

                @for w in &vm.warnings {
                    (warning_banner(w))
                }

                @match &vm.data {
                    Some(data) => (dashboard_body(data)),
                    None => p { "Nenhum dado disponível ainda. Tente atualizar novamente em instantes." },
                }

                p class="muted" { "© 2025 — Dashboard DLI 2025 - Tecnologia CNDL" }
            }
        },
    )
}

fn dashboard_body(data: &DashboardData<'_>) -> Markup {
    let summary = data.summary;
    let export_query = data.selection.to_query_string();

    html! {
        div class="layout" {
            aside { (filter_form(data.options, data.selection)) }

            div {
                div class="metrics" {
                    (metric("Registros", thousands(summary.records)))
                    @match summary.states_shown {
                        Some(n) => (metric("Estado(s)", n)),
                        None => (metric("Estado(s)", ALL_STATES_LABEL)),
                    }
                    (metric("Categorias", summary.categories_selected))
                }

                (card("Registros por Categoria", bar_chart(&summary.by_category)))
                (card("Registros por Estado", bar_chart(&summary.by_state)))
                (card("Registros por Cidade", count_table("Cidade", &summary.by_city)))

                (card("Lojas cadastradas", html! {
                    p {
                        (thousands(data.stores.len())) " loja(s). "
                        a href=(format!("/export.xlsx?{export_query}")) { "Baixar planilha" }
                    }
                    div class="scroll" {
                        table {
                            thead { tr { th { "Loja" } th { "Cidade" } th { "Estado" } } }
                            tbody {
                                @for store in data.stores {
                                    tr {
                                        td { (store.title()) }
                                        td { (store.city()) }
                                        td { (store.state()) }
                                    }
                                }
                            }
                        }
                    }
                }))
            }
        }
    }
}

fn filter_form(options: &FilterOptions, selection: &FilterSelection) -> Markup {
    html! {
        form method="get" action="/" class="card" {
            h3 { "Filtros" }

            label for="state" { "Estado" }
            select name=(STATE_KEY) id="state" {
                option value="" selected[selection.state == StateChoice::All] { (ALL_STATES_LABEL) }
                @for s in &options.states {
                    option value=(s) selected[selection.state == StateChoice::Only(s.clone())] { (s) }
                }
            }

            label for="cat" { "Categorias" }
            input type="hidden" name=(CATEGORY_FORM_KEY) value="1";
            select name=(CATEGORY_KEY) id="cat" multiple {
                @for c in &options.categories {
                    option value=(c) selected[selection.categories.is_selected(c)] { (c) }
                }
            }

            label for="q" { "Buscar loja / cidade / estado" }
            input type="search" name=(QUERY_KEY) id="q" value=(selection.query);

            button type="submit" { "Aplicar" }
        }
    }
}
