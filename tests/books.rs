use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use book_inventory::{
    error::ErrorVerbosity,
    server::{Server, ServerConfig},
    store::Book,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Starts a server on an ephemeral port and returns its base url.
async fn start(config: ServerConfig) -> String {
    let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");

    tokio::spawn(Server::new(config).serve(listener));

    format!("http://{addr}")
}

fn config() -> ServerConfig {
    ServerConfig::new(
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
        ErrorVerbosity::Message,
    )
}

async fn list(client: &reqwest::Client, base: &str) -> Vec<Book> {
    let response = client.get(format!("{base}/books")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response.json().await.unwrap()
}

#[tokio::test]
async fn inventory_scenario() {
    let base = start(config()).await;
    let client = reqwest::Client::new();

    let ids = |books: &[Book]| books.iter().map(|book| book.id).collect::<Vec<_>>();
    assert_eq!(ids(&list(&client, &base).await), vec![1, 2]);

    let response = client
        .post(format!("{base}/books"))
        .json(&json!({ "title": "X", "author": "Y", "price": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Book = response.json().await.unwrap();
    assert!(![1, 2].contains(&created.id));

    let books = list(&client, &base).await;
    assert_eq!(books.len(), 3);
    assert_eq!(books.last(), Some(&created));

    let response = client
        .put(format!("{base}/books"))
        .json(&json!({ "id": created.id, "title": "X2", "author": "Y", "price": 6 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Book = response.json().await.unwrap();
    assert_eq!(updated.title, "X2");
    assert_eq!(updated.price, 6.0);

    let response = client
        .delete(format!("{base}/books"))
        .json(&json!({ "id": created.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "message": "Book deleted", "id": created.id })
    );

    assert_eq!(ids(&list(&client, &base).await), vec![1, 2]);
}

#[tokio::test]
async fn documented_errors_are_verbatim() {
    let base = start(config()).await;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("{base}/books"))
        .json(&json!({ "title": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Book ID is required" })
    );

    let response = client
        .put(format!("{base}/books"))
        .json(&json!({ "id": 404, "title": "X", "author": "Y", "price": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Book not found" })
    );
}

#[tokio::test]
async fn unseeded_inventory_starts_empty() {
    let base = start(config().with_seed_books(false)).await;
    let client = reqwest::Client::new();

    assert!(list(&client, &base).await.is_empty());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let base = start(config()).await;

    let response = reqwest::get(format!("{base}/authors")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "The requested resource was not found" })
    );
}

#[tokio::test]
async fn serves_the_ui_and_the_api_doc() {
    let ui_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/ui");
    let base = start(config().with_ui_dir(ui_dir)).await;

    let page = reqwest::get(format!("{base}/ui/")).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("Books Inventory"));

    let doc: Value = reqwest::get(format!("{base}/api-docs/openapi.json"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(doc["paths"]["/books"].is_object());
}
