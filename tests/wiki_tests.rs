use commerce_service::wiki::handlers::{EntryPage, IndexPage};
use commerce_service::wiki::{self, Entry, EntryStore, WikiState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// 임시 디렉터리에 문서를 만들고 위키 서버를 띄운다
async fn spawn_wiki(entries: &[(&str, &str)]) -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    for (title, content) in entries {
        std::fs::write(dir.path().join(format!("{title}.md")), content).unwrap();
    }
    let store = EntryStore::open(dir.path()).await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, wiki::routes(WikiState::new(store)).into_make_service())
            .await
            .unwrap();
    });
    (dir, format!("http://{addr}"))
}

fn client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

const ENTRIES: &[(&str, &str)] = &[
    ("CSS", "# CSS\n\nStyle sheets."),
    ("Python", "# Python\n\nA language."),
    ("CPython", "# CPython\n\nThe reference interpreter."),
];

/// 전체 목록 테스트
#[tokio::test]
async fn test_index_lists_all_pages() {
    let (_dir, base) = spawn_wiki(ENTRIES).await;
    let page: IndexPage = client().get(format!("{base}/")).send().await.unwrap().json().await.unwrap();
    assert_eq!(page.title, "All Pages");
    assert_eq!(page.entries, vec!["CPython", "CSS", "Python"]);
}

/// 문서 조회 테스트
#[tokio::test]
async fn test_entry_lookup_is_case_insensitive() {
    let (_dir, base) = spawn_wiki(ENTRIES).await;
    let client = client();

    let response = client.get(format!("{base}/wiki/python")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page: EntryPage = response.json().await.unwrap();
    assert_eq!(page.title, "Python");
    assert!(page.html.contains("<h1>Python</h1>"));

    let response = client.get(format!("{base}/wiki/Rust")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Page not found");
}

/// 검색 테스트
#[tokio::test]
async fn test_search() {
    let (_dir, base) = spawn_wiki(ENTRIES).await;
    let client = client();

    // 정확히 일치하면 문서 자체
    let page: EntryPage = client
        .get(format!("{base}/?q=css"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.title, "CSS");

    // 부분 일치는 검색 결과
    let page: IndexPage = client
        .get(format!("{base}/?q=PYTH"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.title, "Search Results");
    let mut entries = page.entries;
    entries.sort();
    assert_eq!(entries, vec!["CPython", "Python"]);
}

/// 임의 문서 테스트
#[tokio::test]
async fn test_random_redirects_to_existing_entry() {
    let (_dir, base) = spawn_wiki(ENTRIES).await;
    let response = client().get(format!("{base}/?random")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()["location"].to_str().unwrap().to_string();
    let title = location.strip_prefix("/wiki/").unwrap();
    assert!(ENTRIES.iter().any(|(t, _)| *t == title));

    let (_empty_dir, empty) = spawn_wiki(&[]).await;
    let response = client().get(format!("{empty}/?random")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// 새 문서 / 수정 테스트
#[tokio::test]
async fn test_new_and_edit() {
    let (dir, base) = spawn_wiki(ENTRIES).await;
    let client = client();

    let response = client
        .post(format!("{base}/new"))
        .json(&json!({"title": "python", "content": "dup"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Page already exists");

    let response = client
        .post(format!("{base}/new"))
        .json(&json!({"title": "Git", "content": "# Git\n\n**fast**"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let page: EntryPage = response.json().await.unwrap();
    assert!(page.html.contains("<strong>fast</strong>"));
    assert!(dir.path().join("Git.md").exists());

    let entry: Entry = client
        .get(format!("{base}/edit?title=git"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entry.title, "Git");
    assert_eq!(entry.content, "# Git\n\n**fast**");

    let page: EntryPage = client
        .post(format!("{base}/edit"))
        .json(&json!({"title": "Git", "content": "# Git\n\nUpdated."}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(page.html.contains("Updated."));

    let response = client
        .get(format!("{base}/edit?title=Nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .post(format!("{base}/new"))
        .json(&json!({"title": "../escape", "content": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// 잘못된 요청 형식 테스트
#[tokio::test]
async fn test_malformed_requests_return_json_errors() {
    let (_dir, base) = spawn_wiki(ENTRIES).await;
    let client = client();

    let response = client.get(format!("{base}/edit")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = client
        .post(format!("{base}/new"))
        .body("not json")
        .header("content-type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
