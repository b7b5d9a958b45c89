use crate::app::App;
use crate::config::ConfigError;
use crate::errors::ServerError;
use crate::tests::utils::{
    body_string, get, header, post_form, session_token_from, StubFetcher, TestApp, EXPORT_CSV,
};

#[test]
fn unauthenticated_root_shows_access_form_without_fetching() {
    let t = TestApp::new(StubFetcher::ok(EXPORT_CSV));

    let resp = t.handle(get("/", None)).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Digite o código de acesso"));
    assert!(body.contains(r#"action="/auth/login""#));
    assert!(!body.contains("Registros por Categoria"));

    // Data is never touched before authentication
    assert_eq!(t.stub.calls(), 0);
    assert!(!t.csv_path.exists());
}

#[test]
fn valid_code_sets_session_cookie_and_redirects() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);

    let resp = t
        .handle(post_form("/auth/login", "code=cdl-jovem", None))
        .expect("Failed to handle request");
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location").as_deref(), Some("/"));

    let cookie = header(&resp, "Set-Cookie").expect("cookie set");
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    let token = session_token_from(&resp).unwrap();
    let body = body_string(t.handle(get("/", Some(&token))).unwrap());
    assert!(body.contains("Dashboard Coordenadores CDL Jovem - DLI 2025"));
    assert!(body.contains("Registros por Categoria"));
}

#[test]
fn code_is_trimmed_before_comparison() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);

    let resp = t
        .handle(post_form("/auth/login", "code=++outro++", None))
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert!(session_token_from(&resp).is_some());
}

#[test]
fn invalid_code_is_rejected_with_message() {
    let t = TestApp::new(StubFetcher::ok(EXPORT_CSV));

    let resp = t
        .handle(post_form("/auth/login", "code=wrong", None))
        .unwrap();
    assert_eq!(resp.status(), 401);
    assert!(header(&resp, "Set-Cookie").is_none());

    let body = body_string(resp);
    assert!(body.contains("Código inválido"));
    assert!(body.contains("Digite o código de acesso"));
}

#[test]
fn blank_code_shows_form_again_without_error() {
    let t = TestApp::new(StubFetcher::ok(EXPORT_CSV));

    let resp = t.handle(post_form("/auth/login", "code=+++", None)).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(!body.contains("Código inválido"));
    assert!(body.contains("Digite o código de acesso"));
}

#[test]
fn unknown_cookie_is_not_a_session() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);

    let body = body_string(t.handle(get("/", Some("forged-token"))).unwrap());
    assert!(body.contains("Digite o código de acesso"));
}

#[test]
fn logout_clears_cookie_and_forgets_session() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);
    let token = t.login();

    let resp = t
        .handle(post_form("/auth/logout", "", Some(&token)))
        .unwrap();
    assert_eq!(resp.status(), 303);
    let cookie = header(&resp, "Set-Cookie").unwrap();
    assert!(cookie.contains("Max-Age=0"));

    // The old token no longer unlocks the dashboard
    let body = body_string(t.handle(get("/", Some(&token))).unwrap());
    assert!(body.contains("Digite o código de acesso"));
}

#[test]
fn misconfigured_app_answers_every_route_with_config_error() {
    let app = App::Misconfigured(ConfigError::MissingAccessCodes);

    for req in [
        get("/", None),
        get("/api/summary", None),
        post_form("/auth/login", "code=x", None),
    ] {
        assert!(matches!(
            crate::router::handle(req, &app),
            Err(ServerError::Config(ConfigError::MissingAccessCodes))
        ));
    }
}
