use crate::tests::utils::{body_string, get, header, post_form, StubFetcher, TestApp, EXPORT_CSV};

#[test]
fn manual_refresh_downloads_even_when_fresh() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), "Title\nVelha\n");
    let token = t.login();

    let resp = t
        .handle(post_form("/refresh", "back=state%3DPernambuco", Some(&token)))
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location").as_deref(), Some("/?state=Pernambuco"));
    assert_eq!(t.stub.calls(), 1);

    let body = body_string(t.handle(get("/", Some(&token))).unwrap());
    assert!(body.contains("Loja Paulista"));
    assert!(!body.contains("Não foi possível atualizar"));
}

#[test]
fn failed_refresh_is_flashed_once() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);
    let token = t.login();
    t.stub.fail_with("timeout");

    let resp = t.handle(post_form("/refresh", "", Some(&token))).unwrap();
    assert_eq!(header(&resp, "Location").as_deref(), Some("/"));

    let body = body_string(t.handle(get("/", Some(&token))).unwrap());
    assert!(body.contains("Não foi possível atualizar o CSV: "));
    assert!(body.contains("timeout"));
    // Previous export still shown
    assert!(body.contains("Loja Paulista"));

    let again = body_string(t.handle(get("/", Some(&token))).unwrap());
    assert!(!again.contains("Não foi possível atualizar"));
}

#[test]
fn refresh_never_redirects_off_site() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);
    let token = t.login();

    let resp = t
        .handle(post_form("/refresh", "back=x%0d%0aSet-Cookie%3A+a", Some(&token)))
        .unwrap();
    assert_eq!(header(&resp, "Location").as_deref(), Some("/"));
}

#[test]
fn refresh_drops_back_with_control_or_space_bytes() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);
    let token = t.login();

    for back in ["back=a%09b", "back=a%00b", "back=a+b", "back=x%7Fy"] {
        let resp = t.handle(post_form("/refresh", back, Some(&token))).unwrap();
        assert_eq!(resp.status(), 303);
        assert_eq!(header(&resp, "Location").as_deref(), Some("/"));
    }

    // Encoded query strings pass through untouched
    let resp = t
        .handle(post_form("/refresh", "back=q%3Dsao%2Bpaulo%26cf%3D1", Some(&token)))
        .unwrap();
    assert_eq!(header(&resp, "Location").as_deref(), Some("/?q=sao+paulo&cf=1"));
}

#[test]
fn refresh_requires_a_session() {
    let t = TestApp::with_cached_export(StubFetcher::ok(EXPORT_CSV), EXPORT_CSV);

    let resp = t.handle(post_form("/refresh", "", None)).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(t.stub.calls(), 0);
}
