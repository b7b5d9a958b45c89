use crate::app::{App, Dashboard};
use crate::config::Config;
use crate::errors::ResultResp;
use crate::fetcher::{ExportFetcher, FetchError};
use crate::router::handle;
use astra::{Body, Request, Response};
use http::Method;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const CODE: &str = "cdl-jovem";

pub const EXPORT_CSV: &str = "Title,Categories,geolocation_city,geolocation_state_long\n\
    Loja A,\"Roupas, Calçados\",Recife,Pernambuco\n\
    Mercado &amp; Cia,Alimentos,Olinda,Pernambuco\n\
    Loja Paulista,Eletrônicos,Campinas,São Paulo\n";

/// Fetcher whose answer can be changed mid-test; counts every call.
#[derive(Clone)]
pub struct StubFetcher {
    answer: Arc<Mutex<Result<Vec<u8>, String>>>,
    calls: Arc<AtomicUsize>,
}

impl StubFetcher {
    pub fn ok(payload: &str) -> Self {
        Self {
            answer: Arc::new(Mutex::new(Ok(payload.as_bytes().to_vec()))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: &str) -> Self {
        let stub = Self::ok("");
        stub.fail_with(message);
        stub
    }

    pub fn fail_with(&self, message: &str) {
        *self.answer.lock().unwrap() = Err(message.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExportFetcher for StubFetcher {
    fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .lock()
            .unwrap()
            .clone()
            .map_err(FetchError::Network)
    }
}

pub fn test_config(csv_path: &Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("WP_USER", "editor".to_string()),
        ("WP_PASS", "secret".to_string()),
        ("ACCESS_CODE", format!("{CODE},outro")),
        ("DASHBOARD_CSV_PATH", csv_path.display().to_string()),
    ]);
    Config::from_lookup(|k| vars.get(k).cloned()).expect("test config is valid")
}

/// A ready app whose cache lives in a fresh temp dir.
pub struct TestApp {
    pub app: App,
    pub stub: StubFetcher,
    pub csv_path: PathBuf,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub fn new(stub: StubFetcher) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("docs").join("job_listings_export.csv");
        let app = App::Ready(Dashboard::new(test_config(&csv_path), stub.clone()));
        Self {
            app,
            stub,
            csv_path,
            _dir: dir,
        }
    }

    /// Same, with a freshly written export already on disk.
    pub fn with_cached_export(stub: StubFetcher, csv: &str) -> Self {
        let t = Self::new(stub);
        std::fs::create_dir_all(t.csv_path.parent().unwrap()).unwrap();
        std::fs::write(&t.csv_path, csv).unwrap();
        t
    }

    pub fn handle(&self, req: Request) -> ResultResp {
        handle(req, &self.app)
    }

    /// Log in with the valid code and return the session token.
    pub fn login(&self) -> String {
        let resp = self
            .handle(post_form("/auth/login", &format!("code={CODE}"), None))
            .unwrap();
        assert_eq!(resp.status(), 303);
        session_token_from(&resp).expect("login sets a session cookie")
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(t) = token {
        builder = builder.header("Cookie", format!("session={t}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, token: Option<&str>) -> Request {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(t) = token {
        builder = builder.header("Cookie", format!("session={t}"));
    }
    builder.body(Body::from(body.as_bytes().to_vec())).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn header(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn session_token_from(resp: &Response) -> Option<String> {
    let cookie = header(resp, "Set-Cookie")?;
    let value = cookie.split(';').next()?.strip_prefix("session=")?;
    (!value.is_empty()).then(|| value.to_string())
}
