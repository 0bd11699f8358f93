#[path = "../common/mod.rs"]
mod common;

use common::setup_test_server;
use serde_json::{json, Value};

fn image_body(id: &str, title: &str, tags: &[&str], camera: &str, date: i64) -> Value {
    json!({
        "id": id,
        "imagePath": format!("https://store.example/o/portfolio%2F{}.jpg?alt=media", id),
        "width": 1600,
        "height": 1067,
        "title": title,
        "tags": tags,
        "metadata": { "camera": camera },
        "dateCreated": date,
    })
}

#[tokio::test]
async fn test_health_check() {
    let (client, _state, _tmp) = setup_test_server().await;
    let response = client.get("/health").await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body.get("version").is_some());
}

#[tokio::test]
async fn test_category_and_image_lifecycle() {
    let (client, _state, _tmp) = setup_test_server().await;

    let response = client.post("/categories", &json!({"title": "Wedding Photography"})).await.unwrap();
    assert_eq!(response.status(), 201);
    let category: Value = response.json().await.unwrap();
    assert_eq!(category["slug"], "wedding-photography");
    assert_eq!(category["id"], "wedding-photography");
    assert_eq!(category["imageCount"], 0);

    let response = client
        .post("/categories/wedding-photography/images", &image_body("kiss", "The Kiss", &["bride"], "Canon R5", 10))
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let image: Value = response.json().await.unwrap();
    assert_eq!(image["categoryId"], "wedding-photography");

    let categories: Value = client.get("/categories").await.unwrap().json().await.unwrap();
    assert_eq!(categories[0]["imageCount"], 1);

    let images: Value = client.get("/categories/wedding-photography/images").await.unwrap().json().await.unwrap();
    assert_eq!(images.as_array().unwrap().len(), 1);
    assert_eq!(images[0]["metadata"]["camera"], "Canon R5");

    let response = client.delete("/categories/wedding-photography/images/kiss").await.unwrap();
    assert_eq!(response.status(), 200);
    let categories: Value = client.get("/categories").await.unwrap().json().await.unwrap();
    assert_eq!(categories[0]["imageCount"], 0);

    let response = client.delete("/categories/wedding-photography").await.unwrap();
    assert_eq!(response.status(), 200);
    let categories: Value = client.get("/categories").await.unwrap().json().await.unwrap();
    assert!(categories.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_filters_endpoint_reports_counts() {
    let (client, _state, _tmp) = setup_test_server().await;
    client.post("/categories", &json!({"title": "Weddings"})).await.unwrap();
    client.post("/categories/weddings/images", &image_body("a", "A", &["bride"], "Canon R5", 1)).await.unwrap();
    client.post("/categories/weddings/images", &image_body("b", "B", &["bride", "dance"], "Canon R5", 2)).await.unwrap();

    let response = client.get("/portfolio/filters").await.unwrap();
    assert_eq!(response.status(), 200);
    let facets: Value = response.json().await.unwrap();
    assert_eq!(facets["categories"][0]["label"], "Weddings");
    assert_eq!(facets["categories"][0]["count"], 2);
    assert_eq!(facets["cameras"][0], json!({"id": "Canon R5", "label": "Canon R5", "count": 2}));
    for key in ["tags", "lenses", "locations", "apertures", "shutterSpeeds", "isoValues"] {
        assert!(facets[key].is_array(), "{} missing", key);
    }
}

#[tokio::test]
async fn test_query_endpoint_filters_sorts_and_pages() {
    let (client, _state, _tmp) = setup_test_server().await;
    client.post("/categories", &json!({"title": "Weddings"})).await.unwrap();
    client.post("/categories", &json!({"title": "Portraits"})).await.unwrap();
    client.post("/categories/weddings/images", &image_body("w1", "W1", &["outdoor"], "Canon R5", 100)).await.unwrap();
    client.post("/categories/portraits/images", &image_body("p1", "P1", &["outdoor"], "Canon R5", 300)).await.unwrap();
    client.post("/categories/portraits/images", &image_body("p2", "P2", &["outdoor"], "Sony A7", 200)).await.unwrap();
    client.post("/categories/weddings/images", &image_body("w2", "W2", &["studio"], "Canon R5", 400)).await.unwrap();

    let query = json!({
        "tags": ["outdoor"],
        "cameras": ["Canon R5"],
        "sortBy": "dateCreated",
        "sortDirection": "desc",
    });
    let images: Value = client.post("/portfolio/images/query", &query).await.unwrap().json().await.unwrap();
    let got: Vec<&str> = images.as_array().unwrap().iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(got, vec!["p1", "w1"]);

    let page: Value = client
        .post("/portfolio/images/query", &json!({"sortBy": "dateCreated", "limit": 2}))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let got: Vec<&str> = page.as_array().unwrap().iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(got, vec!["w1", "p2"]);

    let next: Value = client
        .post("/portfolio/images/query", &json!({"sortBy": "dateCreated", "startAfter": "p2"}))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let got: Vec<&str> = next.as_array().unwrap().iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(got, vec!["p1", "w2"]);
}

#[tokio::test]
async fn test_related_and_before_after_endpoints() {
    let (client, _state, _tmp) = setup_test_server().await;
    client.post("/categories", &json!({"title": "Kitchens"})).await.unwrap();
    client.post("/categories/kitchens/images", &image_body("kb", "Kitchen Before", &["before"], "Canon R5", 1)).await.unwrap();
    client.post("/categories/kitchens/images", &image_body("ka", "Kitchen After", &["after"], "Canon R5", 2)).await.unwrap();
    client.post("/categories/kitchens/images", &image_body("kb2", "Pantry Before", &["before"], "Canon R5", 3)).await.unwrap();

    let related: Value = client
        .get("/portfolio/images/kitchens/kb/related?limit=5")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let got: Vec<&str> = related.as_array().unwrap().iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(got, vec!["kb2"]);

    let missing: Value = client.get("/portfolio/images/kitchens/nope/related").await.unwrap().json().await.unwrap();
    assert_eq!(missing, json!([]));

    let pairs: Value = client.get("/portfolio/before-after").await.unwrap().json().await.unwrap();
    assert_eq!(pairs.as_array().unwrap().len(), 1);
    assert_eq!(pairs[0]["before"]["id"], "kb");
    assert_eq!(pairs[0]["after"]["id"], "ka");
}

#[tokio::test]
async fn test_recount_endpoint() {
    let (client, state, _tmp) = setup_test_server().await;
    client.post("/categories", &json!({"title": "Events"})).await.unwrap();
    client.post("/categories/events/images", &image_body("e1", "E1", &[], "Canon R5", 1)).await.unwrap();

    state
        .pool
        .get()
        .unwrap()
        .execute("UPDATE categories SET image_count = 9 WHERE id = 'events'", [])
        .unwrap();

    let response = client.post("/categories/events/recount", &json!({})).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["imageCount"], 1);
}
