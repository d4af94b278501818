//! End-to-end tests of the REST routes.
//!
//! Each test builds its own store and drives the full route table through
//! `Router::route`, so no sockets are involved.

use std::sync::Arc;

use http::{Method, StatusCode, Uri};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use roster::{Request, Router, UserStore};

struct TestApp {
    store: Arc<UserStore>,
    router: Router<Arc<UserStore>>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(UserStore::new());
        let router = roster::app(Arc::clone(&store));
        Self { store, router }
    }

    async fn send(&self, req: Request) -> (StatusCode, Value) {
        let res = self.router.route(req).await;
        let body = serde_json::from_slice(res.body()).expect("envelope JSON");
        (res.status_code(), body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::new(Method::GET, uri.parse::<Uri>().unwrap())).await
    }

    async fn form(&self, method: Method, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, Value) {
        self.send(Request::new(method, uri.parse::<Uri>().unwrap()).with_form(fields)).await
    }

    async fn create(&self, name: &str, age: &str, team: &str) -> u64 {
        let (status, body) = self
            .form(Method::POST, "/users", &[("name", name), ("age", age), ("team", team)])
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["result"]["new user"]["id"].as_u64().unwrap()
    }
}

// ---------------------------------------------------------------------------
// misc routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hello_world() {
    let app = TestApp::new();
    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"code": 200, "success": true, "message": "", "result": {"content": "hello world!"}})
    );
}

#[tokio::test]
async fn mirror_echoes_name() {
    let app = TestApp::new();
    let (status, body) = app.get("/mirror/bob/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({"name": "bob"}));
}

#[tokio::test]
async fn mirror_decodes_percent_escapes() {
    let app = TestApp::new();
    let (status, body) = app.get("/mirror/bob%20smith").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({"name": "bob smith"}));
}

#[tokio::test]
async fn encoded_id_resolves_user() {
    let app = TestApp::new();
    let id = app.create("Alice", "30", "Red").await;
    assert_eq!(id, 1);

    let (status, body) = app.get("/users/%31").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["user"]["name"], "Alice");
}

#[tokio::test]
async fn probes_answer_with_envelopes() {
    let app = TestApp::new();
    app.create("Alice", "30", "Red").await;

    let (status, body) = app.get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({"status": "ok"}));

    let (_, body) = app.get("/readyz").await;
    assert_eq!(body["result"], json!({"status": "ready", "users": 1}));
}

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_fetch() {
    let app = TestApp::new();
    let (status, body) = app
        .form(Method::POST, "/users", &[("name", "Alice"), ("age", "30"), ("team", "Red")])
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["result"]["new user"]["id"].as_u64().unwrap();
    assert!(id > 0);
    assert_eq!(body["message"], format!("user with id {id} has successfully been created"));

    let (status, body) = app.get(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["result"]["user"],
        json!({"id": id, "name": "Alice", "age": 30, "team": "Red"})
    );
}

#[tokio::test]
async fn create_with_non_numeric_age_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .form(Method::POST, "/users", &[("name", "Alice"), ("age", "thirty"), ("team", "Red")])
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Cannot create new user because age is not a number");
    assert_eq!(body["result"], Value::Null);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn create_missing_team_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .form(Method::POST, "/users", &[("name", "Alice"), ("age", "30")])
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "Cannot create new user because user name, age and/or team are missing"
    );
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn create_blank_name_is_reported_as_missing() {
    let app = TestApp::new();
    let (status, body) = app
        .form(Method::POST, "/users", &[("name", "   "), ("age", "x"), ("team", "Red")])
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "Cannot create new user because user name, age and/or team are missing"
    );
}

#[tokio::test]
async fn ids_are_monotonic_even_after_delete() {
    let app = TestApp::new();
    let first = app.create("Alice", "30", "Red").await;
    let second = app.create("Bob", "25", "Blue").await;
    assert!(second > first);

    let delete = Request::new(Method::DELETE, format!("/users/{second}").parse().unwrap());
    let (status, _) = app.send(delete).await;
    assert_eq!(status, StatusCode::OK);

    let third = app.create("Cara", "41", "Red").await;
    assert!(third > second);
}

// ---------------------------------------------------------------------------
// read / list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_id_is_404() {
    let app = TestApp::new();
    app.create("Alice", "30", "Red").await;
    for uri in ["/users/999", "/users/abc"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "There is no user associated with this id!");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn list_all_and_filter_by_team() {
    let app = TestApp::new();
    app.create("Alice", "30", "Red").await;
    app.create("Bob", "25", "Blue").await;
    app.create("Cara", "41", "Red").await;

    let (status, body) = app.get("/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["users"].as_array().unwrap().len(), 3);
    assert_eq!(body["message"], "");

    let (status, body) = app.get("/users/?team=Red").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Users filtered by team Red");
    let names: Vec<_> = body["result"]["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["Alice", "Cara"]);
}

#[tokio::test]
async fn empty_team_filter_lists_everyone() {
    let app = TestApp::new();
    app.create("Alice", "30", "Red").await;
    let (_, body) = app.get("/users?team=").await;
    assert_eq!(body["result"]["users"].as_array().unwrap().len(), 1);
    assert_eq!(body["message"], "");
}

// ---------------------------------------------------------------------------
// update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_only_team() {
    let app = TestApp::new();
    let id = app.create("Alice", "30", "Red").await;

    let (status, body) = app
        .form(Method::PUT, &format!("/users/{id}"), &[("team", "Green")])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("user with id {id} has successfully been updated"));
    assert_eq!(
        body["result"]["user"],
        json!({"id": id, "name": "Alice", "age": 30, "team": "Green"})
    );
}

#[tokio::test]
async fn update_unknown_id_is_404() {
    let app = TestApp::new();
    let (status, body) = app.form(Method::PUT, "/users/5", &[("team", "Green")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "There is no user associated with this id!");
}

#[tokio::test]
async fn update_bad_age_keeps_earlier_fields_and_skips_later_ones() {
    let app = TestApp::new();
    let id = app.create("Alice", "30", "Red").await;

    let (status, body) = app
        .form(
            Method::PUT,
            &format!("/users/{id}"),
            &[("name", "Alicia"), ("age", "old"), ("team", "Green")],
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Cannot update user because age is not a number");

    let user = app.store.get(id).unwrap();
    assert_eq!(user.name, "Alicia");
    assert_eq!(user.age, 30);
    assert_eq!(user.team, "Red");
}

#[tokio::test]
async fn update_blank_fields_are_skipped() {
    let app = TestApp::new();
    let id = app.create("Alice", "30", "Red").await;

    let (status, body) = app
        .form(
            Method::PUT,
            &format!("/users/{id}"),
            &[("name", ""), ("age", " "), ("team", "")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["result"]["user"],
        json!({"id": id, "name": "Alice", "age": 30, "team": "Red"})
    );
}

#[tokio::test]
async fn update_age_parses_integer() {
    let app = TestApp::new();
    let id = app.create("Alice", "30", "Red").await;
    let (_, body) = app.form(Method::PUT, &format!("/users/{id}"), &[("age", "31")]).await;
    assert_eq!(body["result"]["user"]["age"], 31);
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_twice() {
    let app = TestApp::new();
    let id = app.create("Alice", "30", "Red").await;
    let uri = format!("/users/{id}");

    let (status, body) = app.send(Request::new(Method::DELETE, uri.parse().unwrap())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("user with id {id} has successfully been deleted"));
    assert_eq!(body["result"], Value::Null);

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Request::new(Method::DELETE, uri.parse().unwrap())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// routing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_and_method() {
    let app = TestApp::new();
    let (status, body) = app.get("/teams").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No route for /teams");

    let (status, body) = app.send(Request::new(Method::PATCH, Uri::from_static("/users/1"))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "Method PATCH not allowed on /users/1");
}
