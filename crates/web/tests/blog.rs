mod common;

use reqwest::StatusCode;

use common::{TestServer, client, location, test_settings, unescape};
use crudapps_web::config::AppKind;

const TITLE: &str = "The Life of Cactus";
const SUBTITLE: &str = "Who knew that cacti lived such interesting lives.";
const AUTHOR: &str = "Angela Yu";
const IMG_URL: &str = "https://images.unsplash.com/photo-1530482054429-cc491f61333b?auto=format&fit=crop";
const BODY: &str = "<p>Nori grape silver beet broccoli kombu beet greens fava bean potato quandong celery.</p>";

fn post_form(title: &str) -> Vec<(&'static str, String)> {
    vec![
        ("title", title.to_string()),
        ("subtitle", SUBTITLE.to_string()),
        ("author", AUTHOR.to_string()),
        ("img_url", IMG_URL.to_string()),
        ("body", BODY.to_string()),
    ]
}

async fn create(client: &reqwest::Client, srv: &TestServer, title: &str) -> reqwest::Response {
    client.post(srv.url("/new_post")).form(&post_form(title)).send().await.unwrap()
}

async fn page(client: &reqwest::Client, srv: &TestServer, path: &str) -> (StatusCode, String) {
    let res = client.get(srv.url(path)).send().await.unwrap();
    (res.status(), res.text().await.unwrap())
}

#[tokio::test]
async fn submitted_post_round_trips_exactly() {
    let srv = TestServer::spawn(test_settings(AppKind::Blog)).await;
    let client = client();

    let res = create(&client, &srv, TITLE).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let (status, html) = page(&client, &srv, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches(TITLE).count(), 1);

    let (status, html) = page(&client, &srv, "/post/1").await;
    assert_eq!(status, StatusCode::OK);
    // The body is author HTML and is rendered as-is.
    assert!(html.contains(BODY));
    let html = unescape(&html);
    for expected in [TITLE, SUBTITLE, AUTHOR, IMG_URL] {
        assert!(html.contains(expected), "missing {expected}");
    }

    // The edit form is pre-filled with exactly what was stored.
    let (_, form) = page(&client, &srv, "/edit-post/1").await;
    let form = unescape(&form);
    for expected in [TITLE, SUBTITLE, AUTHOR, IMG_URL, BODY] {
        assert!(form.contains(expected), "edit form missing {expected}");
    }
}

#[tokio::test]
async fn editing_updates_content_and_keeps_the_date() {
    let srv = TestServer::spawn(test_settings(AppKind::Blog)).await;
    let client = client();
    create(&client, &srv, TITLE).await;
    let (_, before) = page(&client, &srv, "/post/1").await;

    let res = client
        .post(srv.url("/edit-post/1"))
        .form(&post_form("The Secret Life of Cactus"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/post/1");

    let (_, after) = page(&client, &srv, "/post/1").await;
    assert!(after.contains("The Secret Life of Cactus"));
    let date_line = |html: &str| html.lines().find(|l| l.contains("Posted by")).map(str::to_string);
    assert_eq!(date_line(&before), date_line(&after));
}

#[tokio::test]
async fn invalid_post_is_redisplayed_and_not_saved() {
    let srv = TestServer::spawn(test_settings(AppKind::Blog)).await;
    let client = client();

    let mut form = post_form("");
    form.retain(|(k, _)| *k != "img_url");
    form.push(("img_url", "cactus.jpg".to_string()));
    let res = client.post(srv.url("/new_post")).form(&form).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("This field is required."));
    assert!(html.contains("Invalid URL."));

    let (_, index) = page(&client, &srv, "/").await;
    assert!(index.contains("No posts yet."));
}

#[tokio::test]
async fn duplicate_title_is_reported_on_the_form() {
    let srv = TestServer::spawn(test_settings(AppKind::Blog)).await;
    let client = client();
    create(&client, &srv, TITLE).await;

    let res = create(&client, &srv, TITLE).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("A post with this title already exists."));
}

#[tokio::test]
async fn missing_and_malformed_ids_are_not_found() {
    let srv = TestServer::spawn(test_settings(AppKind::Blog)).await;
    let client = client();

    // Reading a missing post answers the message with 200.
    for path in ["/post/7", "/post/abc"] {
        let (status, body) = page(&client, &srv, path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body, "Sorry! A post with this id does not exist on the server");
    }

    for path in ["/edit-post/7", "/edit-post/abc", "/delete/7", "/delete/-1"] {
        let (status, body) = page(&client, &srv, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body, "Sorry! A post with this id does not exist on the server");
    }
}

#[tokio::test]
async fn delete_removes_the_post() {
    let srv = TestServer::spawn(test_settings(AppKind::Blog)).await;
    let client = client();
    create(&client, &srv, TITLE).await;

    let res = client.get(srv.url("/delete/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let (status, body) = page(&client, &srv, "/post/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Sorry! A post with this id does not exist on the server");
}

#[tokio::test]
async fn static_pages_render() {
    let srv = TestServer::spawn(test_settings(AppKind::Blog)).await;
    let client = client();
    for path in ["/about", "/contact", "/new_post"] {
        let (status, _) = page(&client, &srv, path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
    }
}
