//! Integration tests for Research Graph
//!
//! These tests run the workflows, tools and servers end to end against mock
//! HTTP servers and a scripted chat model.

use mockito::{Matcher, ServerGuard};
use research_graph::config::{write_default_config, HttpSettings, McpSettings, SearchSettings, Settings};
use research_graph::graphs::{ArticleSearchGraph, ChatbotGraph, QueryExtractor, GREETING};
use research_graph::llm::{ChatMessage, MockChatModel};
use research_graph::mcp::{JsonPlaceholderClient, McpServer, ToolRegistry};
use research_graph::sources::{ArxivSource, Source};
use research_graph::tools::{SearchPapersInput, SearchPapersTool};
use research_graph::utils::HttpClient;
use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn client() -> HttpClient {
    HttpClient::new(&HttpSettings::default()).unwrap()
}

fn entry(id: &str, title: &str, published: &str) -> String {
    format!(
        r#"<entry>
    <id>http://arxiv.org/abs/{id}v1</id>
    <title>{title}</title>
    <summary>Abstract of {title}.</summary>
    <published>{published}</published>
    <updated>{published}</updated>
    <author><name>Jane Doe</name></author>
    <link rel="alternate" type="text/html" href="http://arxiv.org/abs/{id}v1"/>
  </entry>"#
    )
}

fn feed(entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>arXiv Query Results</title>
  {}
</feed>"#,
        entries.join("\n  ")
    )
}

/// Mock arXiv API serving a search listing
async fn mock_arxiv(papers: &[(&str, &str, &str)]) -> ServerGuard {
    let mut server = mockito::Server::new_async().await;
    let entries: Vec<String> = papers.iter().map(|(id, t, p)| entry(id, t, p)).collect();

    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Regex("search_query=".into()))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(feed(&entries))
        .create_async()
        .await;

    server
}

fn arxiv(server: &ServerGuard) -> Arc<dyn Source> {
    let settings = SearchSettings {
        arxiv_api_url: format!("{}/api/query", server.url()),
        arxiv_pdf_url: format!("{}/pdf", server.url()),
        load_full_text: false,
        ..SearchSettings::default()
    };
    Arc::new(ArxivSource::new(client(), &settings))
}

#[tokio::test]
async fn test_article_search_end_to_end() {
    let server = mock_arxiv(&[
        ("2402.00001", "Middle Diffusion Paper", "2024-02-10T00:00:00Z"),
        ("2404.00001", "Newest Diffusion Paper", "2024-04-01T00:00:00Z"),
        ("2401.00001", "Oldest Diffusion Paper", "2024-01-05T00:00:00Z"),
    ])
    .await;

    let model = Arc::new(MockChatModel::new().reply(
        "```json\n{\"keywords\": \"diffusion models\", \"latest\": true}\n```",
    ));
    let source = arxiv(&server);
    let graph = ArticleSearchGraph::new(
        QueryExtractor::new(model),
        SearchPapersTool::from_settings(source, &SearchSettings::default()),
    );

    let state = graph
        .invoke("Find recent papers on diffusion models")
        .await
        .unwrap();

    let query = state.search_query().unwrap();
    assert!(!query.keywords.is_empty());
    assert!(query.latest);

    let papers = state.papers();
    assert_eq!(papers.len(), 3);
    let dates: Vec<_> = papers.iter().map(|p| p.metadata.published.unwrap()).collect();
    assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(papers[0].metadata.entry_id, "2404.00001");
    assert_eq!(papers[0].page_content, "Abstract of Newest Diffusion Paper.");
}

#[tokio::test]
async fn test_search_papers_skips_failed_lookup() {
    let mut server = mockito::Server::new_async().await;
    // an entry without an abstract has to be looked up by id
    let bare = r#"<entry>
    <id>http://arxiv.org/abs/2402.00009v1</id>
    <title>Gone</title>
    <published>2024-02-01T00:00:00Z</published>
    <updated>2024-02-01T00:00:00Z</updated>
  </entry>"#
        .to_string();
    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Regex("search_query=".into()))
        .with_status(200)
        .with_body(feed(&[entry("2403.00001", "Found", "2024-03-01T00:00:00Z"), bare]))
        .create_async()
        .await;
    let listed_lookup = server
        .mock("GET", "/api/query")
        .match_query(Matcher::UrlEncoded("id_list".into(), "2403.00001".into()))
        .expect(0)
        .create_async()
        .await;
    server
        .mock("GET", "/api/query")
        .match_query(Matcher::UrlEncoded("id_list".into(), "2402.00009".into()))
        .with_status(500)
        .create_async()
        .await;

    let tool = SearchPapersTool::from_settings(arxiv(&server), &SearchSettings::default());
    let docs = tool
        .invoke(&SearchPapersInput::new("anything").is_latest(false))
        .await
        .unwrap();

    listed_lookup.assert_async().await;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].metadata.title, "Found");
}

#[tokio::test]
async fn test_mcp_search_papers_tool() {
    let server = mock_arxiv(&[("2405.00001", "Tool Paper", "2024-05-01T00:00:00Z")]).await;
    let registry = ToolRegistry::papers(SearchPapersTool::from_settings(
        arxiv(&server),
        &SearchSettings::default(),
    ));

    let result = registry
        .execute("search_papers", json!({"query": "tools", "max_results": 1}))
        .await
        .unwrap();

    assert_eq!(result.as_array().unwrap().len(), 1);
    assert_eq!(result[0]["metadata"]["title"], "Tool Paper");
}

#[tokio::test]
async fn test_get_all_users_returns_empty_list_on_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/users")
        .with_status(500)
        .create_async()
        .await;

    let registry = ToolRegistry::jsonplaceholder(JsonPlaceholderClient::new(client(), server.url()));
    let result = registry.execute("get_all_users", json!({})).await.unwrap();
    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn test_get_user_by_id_tool() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/users/1")
        .with_status(200)
        .with_body(json!({"id": 1, "username": "Bret"}).to_string())
        .create_async()
        .await;

    let registry = ToolRegistry::jsonplaceholder(JsonPlaceholderClient::new(client(), server.url()));
    let user = registry
        .execute("get_user_by_id", json!({"user_id": 1}))
        .await
        .unwrap();
    assert_eq!(user["id"], 1);
}

#[test]
fn test_mcp_server_builds_for_both_registries() {
    let users = ToolRegistry::jsonplaceholder(JsonPlaceholderClient::new(client(), "http://localhost"));
    assert!(McpServer::new(users, McpSettings::default()).is_ok());

    let source: Arc<dyn Source> = Arc::new(ArxivSource::new(client(), &SearchSettings::default()));
    let papers = ToolRegistry::papers(SearchPapersTool::from_settings(source, &SearchSettings::default()));
    assert!(McpServer::new(papers, McpSettings::default()).is_ok());
}

#[tokio::test]
async fn test_chatbot_workflows() {
    let messages = ChatbotGraph::fixed()
        .invoke(vec![ChatMessage::user("hello")])
        .await
        .unwrap();
    assert_eq!(messages.last().unwrap().content, GREETING);

    let model = Arc::new(MockChatModel::new().reply("Nice to meet you."));
    let messages = ChatbotGraph::with_model(model)
        .invoke(vec![ChatMessage::user("Can you introduce yourself?")])
        .await
        .unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, "Nice to meet you.");
}

#[test]
fn test_config_init_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("research-graph.toml");

    assert_ok!(write_default_config(&path, false));
    assert_err!(write_default_config(&path, false));
    assert_ok!(write_default_config(&path, true));

    let settings: Settings = research_graph::config::load_settings(Some(&path)).unwrap();
    assert_eq!(settings.search.max_results, 3);
    assert_eq!(settings.web.port, 8000);
}
