//! Integration tests for the `entries` repository.

use babycontest_core::entry::EntryFields;
use babycontest_db::models::entry::CreateEntry;
use babycontest_db::repositories::EntryRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fields(name: &str) -> EntryFields {
    EntryFields {
        baby_name: name.to_string(),
        baby_age: "1".to_string(),
        parent_name: "Lee".to_string(),
        contact: "lee@example.com".to_string(),
    }
}

fn url(key: &str) -> String {
    format!("https://contest.s3.eu-west-1.amazonaws.com/{key}")
}

// ---------------------------------------------------------------------------
// Test: create returns the stored row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_entry(pool: PgPool) {
    let input = CreateEntry::new(&fields("Mia"), &url("mia.png"));
    let entry = EntryRepo::create(&pool, &input).await.unwrap();

    assert!(entry.id > 0);
    assert_eq!(entry.baby_name, "Mia");
    assert_eq!(entry.baby_age, "1");
    assert_eq!(entry.parent_name, "Lee");
    assert_eq!(entry.contact, "lee@example.com");
    assert_eq!(entry.s3_image_url, url("mia.png"));
}

// ---------------------------------------------------------------------------
// Test: find_by_id round trip and miss
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_find_by_id(pool: PgPool) {
    let created = EntryRepo::create(&pool, &CreateEntry::new(&fields("Mia"), &url("a.png")))
        .await
        .unwrap();

    let found = EntryRepo::find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(found.unwrap().baby_name, "Mia");

    let missing = EntryRepo::find_by_id(&pool, created.id + 1000).await.unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Test: list preserves insertion order and count matches
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_and_count(pool: PgPool) {
    for name in ["Mia", "Noah", "Ava"] {
        EntryRepo::create(&pool, &CreateEntry::new(&fields(name), &url("x.png")))
            .await
            .unwrap();
    }

    let names: Vec<String> = EntryRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.baby_name)
        .collect();
    assert_eq!(names, vec!["Mia", "Noah", "Ava"]);
    assert_eq!(EntryRepo::count(&pool).await.unwrap(), 3);
}

// ---------------------------------------------------------------------------
// Test: free-text age is stored verbatim
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_age_is_not_interpreted(pool: PgPool) {
    let mut f = fields("Mia");
    f.baby_age = "18 months".to_string();
    let entry = EntryRepo::create(&pool, &CreateEntry::new(&f, &url("m.png")))
        .await
        .unwrap();
    assert_eq!(entry.baby_age, "18 months");
}
