use rdfhash::{digest, Credentials, LoadError, RdfGraph, Source, SourceLoader};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUPERSIMPLE: &str = include_str!("fixtures/supersimple.ttl");
const SUPERSIMPLE_DIGEST: &str = "c3f2f988a2e339eb6622ba2fe0d6452fffb1b123fed947ba66900d89b6e3ab5c";

// The blocking client must not run on the async runtime's worker threads.
async fn load(loader: SourceLoader, url: String) -> Result<RdfGraph, LoadError> {
    tokio::task::spawn_blocking(move || -> Result<RdfGraph, LoadError> {
        let source = Source::parse(&url)?;
        loader.load(&source)
    })
    .await
    .unwrap()
}

fn turtle(content_type: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(SUPERSIMPLE.as_bytes().to_vec(), content_type)
}

#[tokio::test]
async fn test_load_turtle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/some/thing"))
        .respond_with(turtle("text/turtle"))
        .expect(1)
        .mount(&server)
        .await;

    let graph = load(SourceLoader::new(), format!("{}/some/thing", server.uri()))
        .await
        .unwrap();
    assert_eq!(digest(&graph), SUPERSIMPLE_DIGEST);
}

#[tokio::test]
async fn test_content_type_with_charset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/some/thing"))
        .respond_with(turtle("text/turtle;charset=UTF-8"))
        .mount(&server)
        .await;

    let graph = load(SourceLoader::new(), format!("{}/some/thing", server.uri()))
        .await
        .unwrap();
    assert_eq!(digest(&graph), SUPERSIMPLE_DIGEST);
}

#[tokio::test]
async fn test_basic_auth() {
    let server = MockServer::start().await;
    // "alice:secret"
    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("authorization", "Basic YWxpY2U6c2VjcmV0"))
        .respond_with(turtle("text/turtle"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let loader = SourceLoader::new().with_credentials(Credentials::new("alice", "secret"));
    let graph = load(loader, format!("{}/private", server.uri()))
        .await
        .unwrap();
    assert_eq!(graph.len(), 8);
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = load(SourceLoader::new(), format!("{}/private", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Unauthorized { status: 401, .. }));
}

#[tokio::test]
async fn test_not_found_status() {
    let server = MockServer::start().await;

    let err = load(SourceLoader::new(), format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Http { status: 404, .. }));
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(turtle("text/html"))
        .mount(&server)
        .await;

    let err = load(SourceLoader::new(), format!("{}/page", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedContentType(ref t) if t == "text/html"));
}

#[tokio::test]
async fn test_explicit_format_overrides_unknown_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(turtle("application/octet-stream"))
        .mount(&server)
        .await;

    let loader = SourceLoader::new().with_format(rdfhash::RdfFormat::Turtle);
    let graph = load(loader, format!("{}/page", server.uri()))
        .await
        .unwrap();
    assert_eq!(digest(&graph), SUPERSIMPLE_DIGEST);
}

#[tokio::test]
async fn test_remote_disabled() {
    let server = MockServer::start().await;

    let err = load(
        SourceLoader::new().allow_remote(false),
        format!("{}/some/thing", server.uri()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, LoadError::RemoteDisabled(_)));
}
