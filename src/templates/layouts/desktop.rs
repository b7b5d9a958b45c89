use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; background: #f9fafb; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; background: #fff; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
header form { display: inline; margin-left: 0.5rem; }
main { padding: 1.5rem; max-width: 1200px; margin: 0 auto; }
.layout { display: grid; grid-template-columns: 260px 1fr; gap: 1.5rem; }
.card { background: #fff; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1rem; box-shadow: 0 1px 2px rgba(0,0,0,.06); }
.metrics { display: flex; gap: 1rem; }
.metric { flex: 1; background: #fff; border-radius: 8px; padding: 1rem; display: flex; flex-direction: column; }
.metric-label { font-size: .85rem; color: #6b7280; }
.metric-value { font-size: 1.8rem; font-weight: 600; }
.warning { background: #fef3c7; border: 1px solid #f59e0b; border-radius: 6px; padding: .6rem 1rem; margin-bottom: 1rem; }
.error { color: #dc2626; }
.muted { color: #6b7280; }
.bars { display: flex; flex-direction: column; gap: 4px; }
.bar-row { display: grid; grid-template-columns: 200px 1fr 50px; align-items: center; gap: .5rem; }
.bar-label { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.bar-track { background: #e5e7eb; border-radius: 4px; height: 14px; }
.bar-fill { display: block; background: #4f46e5; border-radius: 4px; height: 14px; }
.bar-value, .num { text-align: right; font-variant-numeric: tabular-nums; }
.scroll { max-height: 420px; overflow: auto; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: .35rem .5rem; border-bottom: 1px solid #e5e7eb; }
select[multiple] { width: 100%; min-height: 12rem; }
.access-wrapper { max-width: 360px; margin: 4rem auto; }
.access-form { display: flex; flex-direction: column; gap: .75rem; }
"#;

/// What the header needs to know about the current visitor and page.
#[derive(Debug, Clone, Default)]
pub struct PageChrome {
    pub authenticated: bool,
    /// Client-side reload interval in seconds.
    pub auto_refresh_secs: Option<u64>,
    /// Query string restored after a manual refresh.
    pub back: String,
}

pub fn desktop_layout(title: &str, chrome: &PageChrome, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if let Some(secs) = chrome.auto_refresh_secs {
                    meta http-equiv="refresh" content=(secs);
                }
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    h3 { (title) }
                    @if chrome.authenticated {
                        nav {
                            form method="post" action="/refresh" {
                                input type="hidden" name="back" value=(chrome.back);
                                button type="submit" { "🔄 Atualizar agora" }
                            }
                            form method="post" action="/auth/logout" {
                                button type="submit" { "Sair" }
                            }
                        }
                    }
                }
                (content)
            }
        }
    }
}
