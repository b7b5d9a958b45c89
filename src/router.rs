use crate::app::{App, Dashboard};
use crate::auth::sessions::{clear_session_cookie, session_cookie, token_from_cookie_header};
use crate::data::{Listing, ListingsTable};
use crate::domain::filters::{apply, FilterOptions, FilterSelection, StateChoice};
use crate::domain::search::search;
use crate::domain::Summary;
use crate::errors::{ResultResp, ServerError};
use crate::responses::{html_response, html_response_with_status, json_response, see_other};
use crate::spreadsheets::export_stores_xlsx;
use crate::templates::pages::{dashboard_page, login_page, DashboardData, DashboardVm};
use astra::Request;
use serde_json::json;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

const INVALID_CODE: &str = "Código inválido";

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let dash = match app {
        App::Ready(dash) => dash,
        App::Misconfigured(e) => return Err(ServerError::Config(e.clone())),
    };

    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    debug!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => dashboard(&req, dash),
        ("POST", "/auth/login") => login(&mut req, dash),
        ("POST", "/auth/logout") => logout(&req, dash),
        ("POST", "/refresh") => refresh(&mut req, dash),
        ("GET", "/export.xlsx") => export(&req, dash),
        ("GET", "/api/summary") => summary(&req, dash),
        _ => Err(ServerError::NotFound),
    }
}

fn session_token(req: &Request) -> Option<&str> {
    req.headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
}

fn query_pairs(req: &Request) -> Vec<(String, String)> {
    url::form_urlencoded::parse(req.uri().query().unwrap_or("").as_bytes())
        .into_owned()
        .collect()
}

fn parse_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable form body: {e}")))?;

    Ok(url::form_urlencoded::parse(&body).into_owned().collect())
}

/// Cached export after the freshness check, plus any warnings for the page.
struct CurrentData {
    table: Option<Arc<ListingsTable>>,
    mtime: Option<SystemTime>,
    warnings: Vec<String>,
}

fn current_data(dash: &Dashboard) -> Result<CurrentData, ServerError> {
    let mut warnings = Vec::new();
    if let Some(w) = dash.cache.ensure_fresh(SystemTime::now()).warning() {
        warnings.push(w);
    }

    let Some(mtime) = dash.cache.modified() else {
        return Ok(CurrentData {
            table: None,
            mtime: None,
            warnings,
        });
    };

    let loaded = dash.tables.load(dash.cache.path(), mtime)?;
    warnings.extend(loaded.warning);

    Ok(CurrentData {
        table: Some(loaded.table),
        mtime: Some(mtime),
        warnings,
    })
}

/// Filter options, the selection read from the query, and the rows passing it.
fn filtered<'a>(
    table: &'a ListingsTable,
    req: &Request,
) -> (FilterOptions, FilterSelection, Vec<Listing<'a>>) {
    let options = FilterOptions::from_table(table);
    let selection = FilterSelection::from_pairs(query_pairs(req), &options);
    let rows = apply(table, &selection);
    (options, selection, rows)
}

fn summarize(rows: &[Listing<'_>], options: &FilterOptions, selection: &FilterSelection) -> Summary {
    Summary::new(
        rows,
        matches!(selection.state, StateChoice::Only(_)),
        selection.categories.selected_count(&options.categories),
    )
}

fn format_mtime(mtime: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(mtime)
        .format("%d/%m %H:%M")
        .to_string()
}

fn dashboard(req: &Request, dash: &Dashboard) -> ResultResp {
    let token = session_token(req);
    if !dash.sessions.is_authenticated(token) {
        return html_response(login_page(None));
    }

    let current = current_data(dash)?;
    let mut warnings = Vec::new();
    warnings.extend(dash.sessions.take_flash(token));
    warnings.extend(current.warnings);

    let auto_refresh_secs = dash.config.auto_refresh.as_secs();
    let updated_at = current.mtime.map(format_mtime);

    let Some(table) = current.table.as_deref() else {
        return html_response(dashboard_page(&DashboardVm {
            updated_at,
            warnings,
            auto_refresh_secs,
            data: None,
        }));
    };

    let (options, selection, rows) = filtered(table, req);
    let summary = summarize(&rows, &options, &selection);
    let stores = search(&rows, &selection.query);

    html_response(dashboard_page(&DashboardVm {
        updated_at,
        warnings,
        auto_refresh_secs,
        data: Some(DashboardData {
            options: &options,
            selection: &selection,
            summary: &summary,
            stores: &stores,
        }),
    }))
}

fn login(req: &mut Request, dash: &Dashboard) -> ResultResp {
    let form = parse_form(req)?;
    let code = form.get("code").map(|c| c.trim()).unwrap_or("");
    if code.is_empty() {
        return html_response(login_page(None));
    }

    match dash
        .sessions
        .login(&dash.config.access_codes, session_token(req), code)
    {
        Ok(token) => see_other("/", Some(session_cookie(&token))),
        Err(_) => html_response_with_status(401, login_page(Some(INVALID_CODE))),
    }
}

fn logout(req: &Request, dash: &Dashboard) -> ResultResp {
    dash.sessions.logout(session_token(req));
    see_other("/", Some(clear_session_cookie()))
}

fn refresh(req: &mut Request, dash: &Dashboard) -> ResultResp {
    let form = parse_form(req)?;
    let token = session_token(req);
    if !dash.sessions.is_authenticated(token) {
        return see_other("/", None);
    }

    if let Some(w) = dash.cache.force_refresh().warning() {
        dash.sessions.set_flash(token, w);
    }

    // Only ever a query string appended to "/", never a foreign location.
    let back = form
        .get("back")
        .map(String::as_str)
        .filter(|b| !b.is_empty() && b.bytes().all(|c| c.is_ascii_graphic() && c != b'#'))
        .map(|b| format!("/?{b}"))
        .unwrap_or_else(|| "/".to_string());
    see_other(&back, None)
}

fn export(req: &Request, dash: &Dashboard) -> ResultResp {
    if !dash.sessions.is_authenticated(session_token(req)) {
        return Err(ServerError::Unauthorized("sessão necessária".into()));
    }

    let current = current_data(dash)?;
    match current.table.as_deref() {
        Some(table) => {
            let (_, selection, rows) = filtered(table, req);
            export_stores_xlsx(&search(&rows, &selection.query))
        }
        None => export_stores_xlsx(&[]),
    }
}

fn summary(req: &Request, dash: &Dashboard) -> ResultResp {
    if !dash.sessions.is_authenticated(session_token(req)) {
        return json_response(401, &json!({ "error": "unauthorized" }));
    }

    let current = current_data(dash)?;
    let Some(table) = current.table.as_deref() else {
        return json_response(
            503,
            &json!({ "error": "no data yet", "warnings": current.warnings }),
        );
    };

    let (options, selection, rows) = filtered(table, req);
    let summary = summarize(&rows, &options, &selection);
    let updated_at = current
        .mtime
        .map(|m| chrono::DateTime::<chrono::Utc>::from(m).to_rfc3339());

    json_response(
        200,
        &json!({
            "updated_at": updated_at,
            "warnings": current.warnings,
            "summary": summary,
        }),
    )
}
