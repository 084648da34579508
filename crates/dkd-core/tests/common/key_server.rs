//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves scripted GET responses per path and counts hits. A path can hold a
//! sequence of responses; the last one repeats once the sequence is used up.
//! Unknown paths get 404. Headers of the latest request per path are kept.

use dkd_core::ServerEndpoint;
use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
    /// Sleep before answering (simulates a stuck server).
    pub delay: Option<Duration>,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            headers: Vec::new(),
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            headers: Vec::new(),
            delay: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Default)]
struct State {
    routes: HashMap<String, VecDeque<Route>>,
    hits: HashMap<String, usize>,
    request_headers: HashMap<String, Vec<(String, String)>>,
}

/// Handle to a running server. The server runs until the process exits.
#[derive(Clone)]
pub struct KeyServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl KeyServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let server_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&server_state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    /// Absolute URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn route(&self, path: &str, route: Route) {
        self.sequence(path, vec![route]);
    }

    pub fn sequence(&self, path: &str, routes: Vec<Route>) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(path.to_string(), routes.into());
    }

    pub fn serve(&self, path: &str, body: impl Into<Vec<u8>>) {
        self.route(path, Route::ok(body));
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Value of header `name` (case-insensitive) on the latest request to `path`.
    pub fn request_header(&self, path: &str, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .request_headers
            .get(path)?
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    /// Publish a key server under `/<name>/`: an index listing `files` in
    /// order and each file's body under `/<name>/files/`.
    pub fn publish(&self, name: &str, files: &[(&str, &str)]) -> ServerEndpoint {
        let index: String = files.iter().map(|(f, _)| format!("{}\n", f)).collect();
        self.serve(&format!("/{}/index.txt", name), index);
        for (file, body) in files {
            self.serve(&format!("/{}/files/{}", name, file), body.as_bytes().to_vec());
        }
        self.endpoint(name)
    }

    /// Endpoint for `/<name>/index.txt` with files under `/<name>/files/`.
    pub fn endpoint(&self, name: &str) -> ServerEndpoint {
        ServerEndpoint::parse(
            &self.url(&format!("/{}/index.txt", name)),
            &self.url(&format!("/{}/files/", name)),
        )
        .unwrap()
    }

    pub fn file_url(&self, name: &str, file: &str) -> String {
        self.url(&format!("/{}/files/{}", name, file))
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/").to_string();
    let headers: Vec<(String, String)> = request
        .lines()
        .skip(1)
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();

    let route = {
        let mut st = state.lock().unwrap();
        *st.hits.entry(path.clone()).or_insert(0) += 1;
        st.request_headers.insert(path.clone(), headers);
        match st.routes.get_mut(&path) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    };

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    let route = route.unwrap_or_else(|| Route::status(404));
    if let Some(delay) = route.delay {
        thread::sleep(delay);
    }

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n",
        route.status,
        reason(route.status),
        route.body.len()
    );
    for (name, value) in &route.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
