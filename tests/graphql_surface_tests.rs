//! End-to-end tests of the generated GraphQL surface: schema shape,
//! public/admin reads, list queries, and the write mutations.

mod common;

use async_graphql::{Request, Variables};
use serde_json::{json, Value};
use std::sync::Arc;

use typecms::storage::PersistenceAdapter;
use typecms::testing_utils::{MemoryStore, MockMediaStore};
use typecms::{build_schema, EngineContext, Visibility};

fn make_engine(store: &Arc<MemoryStore>, media: &Arc<MockMediaStore>) -> EngineContext {
    EngineContext {
        models: common::model_set(),
        languages: common::languages(),
        resolver: store.clone(),
        media: media.clone(),
        store: store.clone(),
    }
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.put(common::author_record("auth1", "Ada"));
    store.put(common::article_record("art1"));
    store
}

async fn execute(schema: &async_graphql::dynamic::Schema, request: impl Into<Request>) -> Value {
    let response = schema.execute(request).await;
    assert!(
        response.errors.is_empty(),
        "unexpected GraphQL errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

#[tokio::test]
async fn test_admin_sdl_contains_generated_types() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Admin).unwrap();
    let sdl = schema.sdl();

    for expected in [
        "type Article ",
        "type ArticleContent ",
        "type ArticleContentBlocksHeroCase ",
        "union ArticleContentBlocks ",
        "type I18nString ",
        "input ArticleContentInput ",
        "input ArticleFilterInput ",
        "enum ArticleSortField ",
        "type Media ",
        "scalar DateTime",
        "createArticle",
        "publishArticle",
    ] {
        assert!(sdl.contains(expected), "SDL is missing `{expected}`:\n{sdl}");
    }
}

#[tokio::test]
async fn test_public_read_resolves_one_language() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Public).unwrap();

    let data = execute(
        &schema,
        r#"{ article(id: "art1", language: "en") {
            title
            slug
            content { title stats { views } }
        } }"#,
    )
    .await;

    assert_eq!(data["article"]["title"], "Hello");
    assert_eq!(data["article"]["slug"], "hello");
    assert_eq!(data["article"]["content"]["title"], "Hello");
    assert_eq!(data["article"]["content"]["stats"]["views"], 42);
}

#[tokio::test]
async fn test_public_read_falls_back_to_default_language() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Public).unwrap();

    let data = execute(
        &schema,
        r#"{ article(id: "art1", language: "fr") { content { title } } }"#,
    )
    .await;
    assert_eq!(
        data["article"]["content"]["title"], "Hallo",
        "unknown languages resolve to the default language"
    );
}

#[tokio::test]
async fn test_admin_read_exposes_language_maps() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Admin).unwrap();

    let data = execute(
        &schema,
        r#"{ article(id: "art1") {
            searchIndex
            content { title { de en } }
        } }"#,
    )
    .await;

    assert_eq!(data["article"]["content"]["title"]["de"], "Hallo");
    assert_eq!(data["article"]["content"]["title"]["en"], "Hello");
    assert_eq!(data["article"]["searchIndex"], "World ");
}

#[tokio::test]
async fn test_union_blocks_discriminate_by_case() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Public).unwrap();

    let data = execute(
        &schema,
        r#"{ article(id: "art1") { content { blocks {
            ... on ArticleContentBlocksHeroCase { hero { headline } }
            ... on ArticleContentBlocksQuoteCase { quote { text } }
        } } } }"#,
    )
    .await;
    assert_eq!(
        data["article"]["content"]["blocks"][0]["hero"]["headline"],
        "Big"
    );
}

#[tokio::test]
async fn test_reference_field_expands_to_target_record() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Public).unwrap();

    let data = execute(
        &schema,
        r#"{ article(id: "art1") { content { author { title content { name } } } } }"#,
    )
    .await;
    assert_eq!(data["article"]["content"]["author"]["title"], "Ada");
    assert_eq!(data["article"]["content"]["author"]["content"]["name"], "Ada");
}

#[tokio::test]
async fn test_list_query_filters_by_search_index() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Public).unwrap();

    let data = execute(
        &schema,
        r#"{ articles(filter: { search: "World" }, limit: 10) {
            totalCount
            nodes { id }
            pageInfo { hasNextPage }
        } }"#,
    )
    .await;
    assert_eq!(data["articles"]["totalCount"], 1);
    assert_eq!(data["articles"]["nodes"][0]["id"], "art1");
    assert_eq!(data["articles"]["pageInfo"]["hasNextPage"], false);

    let empty = execute(
        &schema,
        r#"{ articles(filter: { search: "absent" }) { totalCount nodes { id } } }"#,
    )
    .await;
    assert_eq!(empty["articles"]["totalCount"], 0);
}

#[tokio::test]
async fn test_create_mutation_validates_and_persists() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Admin).unwrap();

    let request = Request::new(
        r#"mutation Create($data: ArticleDataInput!) {
            createArticle(data: $data) {
                id
                title
                content { title { en } author { title } }
            }
        }"#,
    )
    .variables(Variables::from_json(json!({
        "data": {
            "content": {
                "title": { "de": "Neu", "en": "New" },
                "body": common::rich_text_doc("Fresh"),
                "stats": { "views": 0 },
                "author": { "recordId": "auth1", "contentType": "author" }
            },
            "meta": {
                "title": "New",
                "slug": { "de": "neu", "en": "new" }
            }
        }
    })));
    let data = execute(&schema, request).await;

    let created = &data["createArticle"];
    assert_eq!(created["title"], "New");
    assert_eq!(created["content"]["title"]["en"], "New");
    assert_eq!(created["content"]["author"]["title"], "Ada");

    let id = created["id"].as_str().unwrap();
    let stored = store.load_record(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "New");
    // The localized title feeds the per-language index; the non-localized
    // body feeds the single one.
    assert_eq!(stored.search_index_i18n.unwrap()["en"], "New ");
    assert_eq!(stored.search_index.as_deref(), Some("Fresh "));
}

#[tokio::test]
async fn test_broken_reference_rejects_the_mutation() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Admin).unwrap();

    let request = Request::new(
        r#"mutation Create($data: ArticleDataInput!) {
            createArticle(data: $data) { id }
        }"#,
    )
    .variables(Variables::from_json(json!({
        "data": {
            "content": {
                "title": { "de": "Neu", "en": "New" },
                "body": common::rich_text_doc(""),
                "stats": { "views": 0 },
                "author": { "recordId": "ghost", "contentType": "author" }
            }
        }
    })));
    let response = schema.execute(request).await;
    assert!(!response.errors.is_empty());
    assert!(
        response.errors[0].message.contains("ghost"),
        "error should identify the offending record id: {}",
        response.errors[0].message
    );
}

#[tokio::test]
async fn test_publish_cycle_through_mutations() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Admin).unwrap();

    let data = execute(
        &schema,
        r#"mutation { publishArticle(id: "art1") { publicationDate } }"#,
    )
    .await;
    assert!(data["publishArticle"]["publicationDate"].is_string());

    let data = execute(
        &schema,
        r#"mutation { unpublishArticle(id: "art1") { dePublicationDate } }"#,
    )
    .await;
    assert!(data["unpublishArticle"]["dePublicationDate"].is_string());

    let stored = store.load_record("art1").await.unwrap().unwrap();
    assert!(!stored.is_published());
}

#[tokio::test]
async fn test_delete_mutation_reports_existence() {
    let store = seeded_store();
    let media = Arc::new(MockMediaStore::new());
    let schema = build_schema(make_engine(&store, &media), Visibility::Admin).unwrap();

    let data = execute(&schema, r#"mutation { deleteArticle(id: "art1") }"#).await;
    assert_eq!(data["deleteArticle"], true);

    let data = execute(&schema, r#"mutation { deleteArticle(id: "art1") }"#).await;
    assert_eq!(data["deleteArticle"], false);
}
