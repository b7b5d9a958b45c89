use crate::tests::utils::{body_string, get, StubFetcher, TestApp, EXPORT_CSV};
use std::fs::File;
use std::time::{Duration, SystemTime};

fn age_export(t: &TestApp, by: Duration) {
    let file = File::options().write(true).open(&t.csv_path).unwrap();
    file.set_modified(SystemTime::now() - by).unwrap();
}

#[test]
fn dashboard_renders_counts_and_store_list() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);
    let token = t.login();

    let resp = t.handle(get("/", Some(&token))).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains("Atualizado em"));
    assert!(body.contains("Registros por Estado"));
    assert!(body.contains("Lojas cadastradas"));
    // Entities decoded on load, re-escaped once by the template
    assert!(body.contains("Mercado &amp; Cia"));
    assert!(!body.contains("&amp;amp;"));
    assert!(body.contains("Loja Paulista"));

    // Fresh export on disk, so nothing was downloaded
    assert_eq!(t.stub.calls(), 0);
}

#[test]
fn state_and_category_filters_narrow_the_store_list() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);
    let token = t.login();

    let body = body_string(
        t.handle(get("/?state=Pernambuco&cf=1&cat=Roupas", Some(&token)))
            .unwrap(),
    );

    assert!(body.contains("Loja A"));
    assert!(!body.contains("Mercado &amp; Cia"));
    assert!(!body.contains("Loja Paulista"));
    assert!(body.contains("1 loja(s)."));
}

#[test]
fn empty_category_selection_shows_nothing() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);
    let token = t.login();

    let body = body_string(t.handle(get("/?cf=1", Some(&token))).unwrap());
    assert!(body.contains("0 loja(s)."));
    assert!(!body.contains("Loja Paulista"));
}

#[test]
fn search_only_narrows_the_store_list() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);
    let token = t.login();

    let body = body_string(t.handle(get("/?q=CAMPINAS", Some(&token))).unwrap());
    assert!(body.contains("Loja Paulista"));
    assert!(!body.contains("Loja A"));
    // The city table still counts every filtered row
    assert!(body.contains("Recife"));

    // No accent folding
    let body = body_string(t.handle(get("/?q=sao+paulo", Some(&token))).unwrap());
    assert!(body.contains("0 loja(s)."));
}

#[test]
fn stale_export_is_downloaded_again() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), "Title\nVelha\n");
    age_export(&t, Duration::from_secs(2 * 3600));
    let token = t.login();

    let body = body_string(t.handle(get("/", Some(&token))).unwrap());
    assert_eq!(t.stub.calls(), 1);
    assert!(body.contains("Loja Paulista"));
    assert!(!body.contains("Velha"));
}

#[test]
fn failed_download_keeps_serving_previous_export() {
    let t = TestApp::with_cached_export(StubFetcher::failing("connection reset"), EXPORT_CSV);
    age_export(&t, Duration::from_secs(2 * 3600));
    let token = t.login();

    let body = body_string(t.handle(get("/", Some(&token))).unwrap());
    assert_eq!(t.stub.calls(), 1);
    assert!(body.contains("Não foi possível atualizar o CSV"));
    assert!(body.contains("connection reset"));
    assert!(body.contains("Loja Paulista"));
}

#[test]
fn no_export_and_failed_download_shows_placeholder() {
    let t = TestApp::new(StubFetcher::failing("HTTP 500"));
    let token = t.login();

    let resp = t.handle(get("/", Some(&token))).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains("Nenhum dado disponível"));
    assert!(body.contains("HTTP 500"));
    assert!(!t.csv_path.exists());
}

#[test]
fn first_visit_downloads_missing_export() {
    let t = TestApp::new(StubFetcher::ok(EXPORT_CSV));
    let token = t.login();

    let body = body_string(t.handle(get("/", Some(&token))).unwrap());
    assert_eq!(t.stub.calls(), 1);
    assert!(t.csv_path.exists());
    assert!(body.contains("Loja A"));
}
