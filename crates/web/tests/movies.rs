mod common;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use common::{TestServer, client, location, test_settings, unescape};
use crudapps_infra::external::{MetadataError, MovieMetadataSource};
use crudapps_movies::{MovieDetails, MovieSearchHit};
use crudapps_web::config::AppKind;

/// In-process stand-in for the TMDB API.
struct FakeCatalogue {
    movies: HashMap<i64, MovieDetails>,
    down: bool,
}

impl FakeCatalogue {
    fn new() -> Self {
        let mut movies = HashMap::new();
        for (id, title, date) in [
            (1, "Phone Booth", "2002-11-14"),
            (2, "Avatar", "2009-12-15"),
            (3, "Drive", "2011-09-15"),
        ] {
            movies.insert(
                id,
                MovieDetails {
                    original_title: title.to_string(),
                    poster_path: Some(format!("/{id}.jpg")),
                    release_date: Some(date.to_string()),
                    overview: Some(format!("{title} overview.")),
                },
            );
        }
        Self { movies, down: false }
    }

    fn unavailable() -> Self {
        Self { down: true, ..Self::new() }
    }

    fn check(&self) -> Result<(), MetadataError> {
        if self.down {
            return Err(MetadataError::Status { status: 503, body: "down".to_string() });
        }
        Ok(())
    }
}

#[async_trait]
impl MovieMetadataSource for FakeCatalogue {
    async fn search(&self, title: &str) -> Result<Vec<MovieSearchHit>, MetadataError> {
        self.check()?;
        let mut hits: Vec<_> = self
            .movies
            .iter()
            .filter(|(_, m)| m.original_title.to_lowercase().contains(&title.to_lowercase()))
            .map(|(id, m)| MovieSearchHit {
                id: *id,
                title: m.original_title.clone(),
                release_date: m.release_date.clone(),
            })
            .collect();
        hits.sort_by_key(|h| h.id);
        Ok(hits)
    }

    async fn details(&self, id: i64) -> Result<MovieDetails, MetadataError> {
        self.check()?;
        self.movies
            .get(&id)
            .cloned()
            .ok_or(MetadataError::Status { status: 404, body: "not found".to_string() })
    }

    fn image_base(&self) -> &str {
        "https://img.test/w500"
    }
}

async fn spawn(catalogue: FakeCatalogue) -> TestServer {
    TestServer::spawn_with_metadata(test_settings(AppKind::Movies), Some(Arc::new(catalogue))).await
}

async fn add_and_rate(client: &reqwest::Client, srv: &TestServer, external_id: i64, rating: &str) -> String {
    let res = client.get(srv.url(&format!("/select?id={external_id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let edit = location(&res).to_string();
    assert!(edit.starts_with("/edit?id="));

    let res = client
        .post(srv.url(&edit))
        .form(&[("rating", rating), ("review", "Worth it.")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    edit
}

async fn index(client: &reqwest::Client, srv: &TestServer) -> String {
    let res = client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    unescape(&res.text().await.unwrap())
}

#[tokio::test]
async fn search_lists_candidates() {
    let srv = spawn(FakeCatalogue::new()).await;
    let res = client()
        .post(srv.url("/add"))
        .form(&[("movie_title", "phone")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = unescape(&res.text().await.unwrap());
    assert!(html.contains("Phone Booth - 2002-11-14"));
    assert!(html.contains("/select?id=1"));
    assert!(!html.contains("Avatar"));
}

#[tokio::test]
async fn blank_search_is_redisplayed() {
    let srv = spawn(FakeCatalogue::new()).await;
    let res = client().post(srv.url("/add")).form(&[("movie_title", " ")]).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("This field is required."));
}

#[tokio::test]
async fn selected_movie_is_stored_from_details() {
    let srv = spawn(FakeCatalogue::new()).await;
    let client = client();
    add_and_rate(&client, &srv, 1, "7.3").await;

    let html = index(&client, &srv).await;
    assert!(html.contains("Phone Booth"));
    assert!(html.contains("(2002)"));
    assert!(html.contains("https://img.test/w500/1.jpg"));
    assert!(html.contains("7.3/10"));
    assert!(html.contains("Worth it."));
}

#[tokio::test]
async fn ranking_follows_rating_order() {
    let srv = spawn(FakeCatalogue::new()).await;
    let client = client();
    add_and_rate(&client, &srv, 1, "9.0").await;
    add_and_rate(&client, &srv, 2, "7.5").await;
    add_and_rate(&client, &srv, 3, "8.0").await;

    let html = index(&client, &srv).await;
    let pos = |title: &str| html.find(title).unwrap();
    assert!(pos("Phone Booth") < pos("Drive"));
    assert!(pos("Drive") < pos("Avatar"));
    assert!(html.contains(r#"<span class="ranking">1</span>"#));
    assert!(html.contains(r#"<span class="ranking">3</span>"#));
}

#[tokio::test]
async fn invalid_rating_is_redisplayed() {
    let srv = spawn(FakeCatalogue::new()).await;
    let client = client();
    let res = client.get(srv.url("/select?id=2")).send().await.unwrap();
    let edit = location(&res).to_string();

    let res = client
        .post(srv.url(&edit))
        .form(&[("rating", "great"), ("review", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("Not a valid float value."));
    assert!(html.contains("This field is required."));
}

#[tokio::test]
async fn adding_the_same_movie_twice_conflicts() {
    let srv = spawn(FakeCatalogue::new()).await;
    let client = client();
    client.get(srv.url("/select?id=3")).send().await.unwrap();
    let res = client.get(srv.url("/select?id=3")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unreachable_catalogue_is_a_bad_gateway() {
    let srv = spawn(FakeCatalogue::unavailable()).await;
    let client = client();

    let res = client.post(srv.url("/add")).form(&[("movie_title", "drive")]).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let res = client.get(srv.url("/select?id=3")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn delete_and_bad_ids() {
    let srv = spawn(FakeCatalogue::new()).await;
    let client = client();
    add_and_rate(&client, &srv, 2, "6").await;

    for path in ["/edit?id=99", "/edit?id=abc", "/edit", "/delete?id=99", "/select?id=x"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
    }

    let res = client.get(srv.url("/delete?id=1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(!index(&client, &srv).await.contains("Avatar"));
}
