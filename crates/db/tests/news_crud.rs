//! Integration tests for the news repository.
//!
//! Exercises the full repository layer against a real database:
//! - Create and fetch by id / proposition id
//! - Unique constraint on proposition_id
//! - Filtered listing with pagination and ordering
//! - Atomic vote updates and the engagement invariant
//! - Social publication marking
//! - Delete

use chrono::NaiveDate;
use sqlx::PgPool;

use plenario_db::models::news::{CreateNews, NewsListFilter};
use plenario_db::repositories::NewsRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_news(proposition_id: i64, title: &str) -> CreateNews {
    CreateNews {
        title: title.to_string(),
        summary: "Resumo da proposta em linguagem acessível.".to_string(),
        full_content: "Matéria completa sobre a proposta.".to_string(),
        proposition_number: format!("PL {proposition_id}/2025"),
        proposition_id,
        presentation_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        uf_author: Some("SP".to_string()),
        author_name: Some("Fulano de Tal".to_string()),
        party: Some("XYZ".to_string()),
        author_type: Some("Deputado".to_string()),
        news_type: "PL".to_string(),
        original_ementa: "Dispõe sobre energia solar residencial.".to_string(),
        pdf_storage_url: "https://storage.example.org/propositions/2025/1/PL_1_2025.pdf"
            .to_string(),
        original_pdf_url: "https://camara.example.org/prop/1.pdf".to_string(),
        extra_metadata: Some(serde_json::json!({
            "tags": ["energia", "impostos"],
            "impact_level": "medium",
            "target_audience": ["consumidores"],
            "pdf_pages": 12,
            "word_count": 4200
        })),
    }
}

// ---------------------------------------------------------------------------
// Create / fetch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_and_find_by_id(pool: PgPool) {
    let created = NewsRepo::create(&pool, &new_news(100, "Nova lei de energia solar"))
        .await
        .unwrap();

    assert_eq!(created.proposition_id, 100);
    assert_eq!(created.upvotes, 0);
    assert_eq!(created.downvotes, 0);
    assert_eq!(created.engagement_score, 0);
    assert!(!created.published_to_social);
    assert!(created.twitter_post_url.is_none());

    let fetched = NewsRepo::find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(fetched.unwrap().title, "Nova lei de energia solar");
}

#[sqlx::test(migrations = "./migrations")]
async fn find_by_proposition_id(pool: PgPool) {
    let created = NewsRepo::create(&pool, &new_news(200, "Título")).await.unwrap();

    let found = NewsRepo::find_by_proposition_id(&pool, 200).await.unwrap();
    assert_eq!(found.unwrap().id, created.id);

    let missing = NewsRepo::find_by_proposition_id(&pool, 999).await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_proposition_id_rejected(pool: PgPool) {
    NewsRepo::create(&pool, &new_news(300, "Primeira")).await.unwrap();

    let err = NewsRepo::create(&pool, &new_news(300, "Segunda"))
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_news_proposition_id"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_uf_and_type(pool: PgPool) {
    let mut sp = new_news(400, "Proposta paulista");
    sp.uf_author = Some("SP".to_string());
    NewsRepo::create(&pool, &sp).await.unwrap();

    let mut rj = new_news(401, "Proposta fluminense");
    rj.uf_author = Some("RJ".to_string());
    NewsRepo::create(&pool, &rj).await.unwrap();

    let mut pec = new_news(402, "Emenda constitucional");
    pec.news_type = "PEC".to_string();
    NewsRepo::create(&pool, &pec).await.unwrap();

    let filter = NewsListFilter {
        uf: Some("RJ".to_string()),
        ..Default::default()
    };
    let (items, total) = NewsRepo::list_filtered(&pool, &filter, "created_at", "DESC", 20, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].proposition_id, 401);

    let filter = NewsListFilter {
        news_type: Some("PEC".to_string()),
        ..Default::default()
    };
    let (items, total) = NewsRepo::list_filtered(&pool, &filter, "created_at", "DESC", 20, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].news_type, "PEC");
}

#[sqlx::test(migrations = "./migrations")]
async fn list_matches_keywords_in_title_and_summary(pool: PgPool) {
    let mut a = new_news(500, "Reforma tributária avança");
    a.summary = "Mudanças nos impostos federais.".to_string();
    NewsRepo::create(&pool, &a).await.unwrap();

    let mut b = new_news(501, "Educação básica");
    b.summary = "Novo piso salarial para professores.".to_string();
    NewsRepo::create(&pool, &b).await.unwrap();

    // Case-insensitive, matches the summary of row A only.
    let filter = NewsListFilter {
        keywords: Some("IMPOSTOS".to_string()),
        ..Default::default()
    };
    let (items, total) = NewsRepo::list_filtered(&pool, &filter, "created_at", "DESC", 20, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].proposition_id, 500);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_paginates_and_reports_total(pool: PgPool) {
    for i in 0..5 {
        NewsRepo::create(&pool, &new_news(600 + i, &format!("Notícia {i}")))
            .await
            .unwrap();
    }

    let filter = NewsListFilter::default();
    let (page1, total) = NewsRepo::list_filtered(&pool, &filter, "proposition_id", "ASC", 2, 0)
        .await
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(page1.len(), 2);
    assert_eq!(page1[0].proposition_id, 600);

    let (page3, _) = NewsRepo::list_filtered(&pool, &filter, "proposition_id", "ASC", 2, 4)
        .await
        .unwrap();
    assert_eq!(page3.len(), 1);
    assert_eq!(page3[0].proposition_id, 604);
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn votes_update_counters_and_engagement(pool: PgPool) {
    let created = NewsRepo::create(&pool, &new_news(700, "Votação")).await.unwrap();

    let after_up = NewsRepo::record_vote(&pool, created.id, "upvote")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after_up.upvotes, 1);
    assert_eq!(after_up.engagement_score, 1);

    let after_down = NewsRepo::record_vote(&pool, created.id, "downvote")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after_down.downvotes, 1);
    assert_eq!(after_down.engagement_score, 0);

    // Invariant: engagement always equals upvotes - downvotes.
    assert_eq!(
        after_down.engagement_score,
        after_down.upvotes - after_down.downvotes
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn vote_on_missing_row_returns_none(pool: PgPool) {
    let missing = NewsRepo::record_vote(&pool, uuid::Uuid::new_v4(), "upvote")
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Social publication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn mark_published_records_url_and_date(pool: PgPool) {
    let created = NewsRepo::create(&pool, &new_news(800, "Publicável")).await.unwrap();

    let published = NewsRepo::mark_published(
        &pool,
        created.id,
        Some("https://x.com/plenario/status/123"),
    )
    .await
    .unwrap()
    .unwrap();

    assert!(published.published_to_social);
    assert!(published.social_publish_date.is_some());
    assert_eq!(
        published.twitter_post_url.as_deref(),
        Some("https://x.com/plenario/status/123")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_published_without_url_keeps_existing(pool: PgPool) {
    let created = NewsRepo::create(&pool, &new_news(801, "Sem URL")).await.unwrap();

    let published = NewsRepo::mark_published(&pool, created.id, None)
        .await
        .unwrap()
        .unwrap();
    assert!(published.published_to_social);
    assert!(published.twitter_post_url.is_none());
}

// ---------------------------------------------------------------------------
// Top engagement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn top_by_engagement_orders_descending(pool: PgPool) {
    let low = NewsRepo::create(&pool, &new_news(900, "Baixo")).await.unwrap();
    let high = NewsRepo::create(&pool, &new_news(901, "Alto")).await.unwrap();

    NewsRepo::record_vote(&pool, low.id, "upvote").await.unwrap();
    for _ in 0..3 {
        NewsRepo::record_vote(&pool, high.id, "upvote").await.unwrap();
    }

    let top = NewsRepo::top_by_engagement(&pool, 2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].proposition_id, 901);
    assert_eq!(top[0].engagement_score, 3);
    assert_eq!(top[1].proposition_id, 900);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_removes_row(pool: PgPool) {
    let created = NewsRepo::create(&pool, &new_news(1000, "Apagável")).await.unwrap();

    assert!(NewsRepo::delete(&pool, created.id).await.unwrap());
    assert!(NewsRepo::find_by_id(&pool, created.id).await.unwrap().is_none());

    // Second delete is a no-op.
    assert!(!NewsRepo::delete(&pool, created.id).await.unwrap());
}
