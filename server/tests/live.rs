//! Full lifecycle against a live server over real HTTP.
//!
//! # Design
//! Starts the server on a random port backed by an in-memory SQLite store,
//! then drives it with ureq, so the listener, router and SQLite repository
//! are exercised together.

use std::sync::Arc;

use todo_core::{SqliteTodoRepository, TodoStore};
use todo_server::dto::{ErrorBody, TodoResponse};
use todo_server::AppState;

struct Response {
    status: u16,
    body: String,
}

fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Execute a request, returning 4xx/5xx responses as data rather than `Err`.
fn call(method: &str, url: &str, body: Option<&str>) -> Response {
    let agent = agent();
    let mut response = match (method, body) {
        ("GET", _) => agent.get(url).call(),
        ("DELETE", _) => agent.delete(url).call(),
        ("POST", Some(body)) => agent
            .post(url)
            .content_type("application/json")
            .send(body.as_bytes()),
        ("PUT", Some(body)) => agent
            .put(url)
            .content_type("application/json")
            .send(body.as_bytes()),
        ("PATCH", Some(body)) => agent
            .patch(url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (other, _) => panic!("unsupported request: {other}"),
    }
    .expect("HTTP transport error");

    Response {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let repo = SqliteTodoRepository::open_in_memory().unwrap();
            let state = AppState::new(Arc::new(TodoStore::new(Arc::new(repo))), "http");
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, state, std::future::pending()).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn crud_lifecycle() {
    let base = start_server();
    let todos_url = format!("{base}/todos");

    // Step 1: list is empty.
    let resp = call("GET", &todos_url, None);
    assert_eq!(resp.status, 200);
    let todos: Vec<TodoResponse> = serde_json::from_str(&resp.body).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 2: create two todos; orders follow insertion.
    let resp = call("POST", &todos_url, Some(r#"{"title":"Integration test"}"#));
    assert_eq!(resp.status, 201);
    let first: TodoResponse = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(first.order, 1);
    assert_eq!(first.url, format!("{todos_url}/{}", first.id));

    let resp = call("POST", &todos_url, Some(r#"{"title":"Second"}"#));
    let second: TodoResponse = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(second.order, 2);

    // Step 3: get the first todo back.
    let resp = call("GET", &first.url, None);
    assert_eq!(resp.status, 200);
    let fetched: TodoResponse = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(fetched, first);

    // Step 4: moving onto the second todo's order conflicts.
    let resp = call("PATCH", &first.url, Some(r#"{"order":2}"#));
    assert_eq!(resp.status, 409);
    let err: ErrorBody = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(err.message, "Order 2 is already taken");

    // Step 5: complete the first todo.
    let resp = call(
        "PUT",
        &first.url,
        Some(r#"{"title":"Integration test","completed":true,"order":1}"#),
    );
    assert_eq!(resp.status, 200);
    let updated: TodoResponse = serde_json::from_str(&resp.body).unwrap();
    assert!(updated.completed);

    // Step 6: clear completed, leaving the second.
    let resp = call("DELETE", &format!("{todos_url}?completed=true"), None);
    assert_eq!(resp.status, 204);
    let resp = call("GET", &todos_url, None);
    let todos: Vec<TodoResponse> = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(todos, vec![second.clone()]);

    // Step 7: delete the second, then again.
    assert_eq!(call("DELETE", &second.url, None).status, 204);
    let resp = call("DELETE", &second.url, None);
    assert_eq!(resp.status, 404);
    let err: ErrorBody = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(err.message, format!("Todo with id {} not found", second.id));

    // Step 8: clearing an empty collection still succeeds.
    assert_eq!(call("DELETE", &todos_url, None).status, 204);
    let resp = call("GET", &todos_url, None);
    let todos: Vec<TodoResponse> = serde_json::from_str(&resp.body).unwrap();
    assert!(todos.is_empty(), "expected empty list after delete");
}
