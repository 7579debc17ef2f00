use rust_decimal::Decimal;
use shopkeep_core::{ItemId, ItemPatch, NewItem};
use shopkeep_db::repositories::{InMemoryItemRepository, ItemRepository, SqlItemRepository};
use shopkeep_db::{connect_with_settings, migrations};

/// Both stores must agree on ordering, partial updates, and absent-record results.
async fn exercise_store(store: &dyn ItemRepository) {
    let pen = store.create(NewItem::new("Pen", Decimal::from(10))).await.expect("create pen");
    let ink = store.create(NewItem::new("Ink", Decimal::new(45, 1))).await.expect("create ink");
    assert_ne!(pen.id, ink.id, "ids must be unique");

    let listed = store.list().await.expect("list");
    assert_eq!(listed, vec![pen.clone(), ink.clone()], "list follows insertion order");

    let renamed = store
        .update(&ink.id, ItemPatch { name: Some("Blue Ink".to_string()), price: None })
        .await
        .expect("update ink")
        .expect("ink exists");
    assert_eq!(renamed.name, "Blue Ink");
    assert_eq!(renamed.price, Decimal::new(45, 1));
    assert_eq!(store.find_by_id(&ink.id).await.expect("find ink"), Some(renamed.clone()));

    let missing = ItemId::generate();
    assert_eq!(store.update(&missing, ItemPatch::default()).await.expect("update missing"), None);

    assert_eq!(store.delete(&pen.id).await.expect("delete pen"), Some(pen.clone()));
    assert_eq!(store.delete(&pen.id).await.expect("delete pen again"), None);
    assert_eq!(store.list().await.expect("list after delete"), vec![renamed]);
}

#[tokio::test]
async fn sql_store_honours_the_item_contract() {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");

    exercise_store(&SqlItemRepository::new(pool.clone())).await;

    pool.close().await;
}

#[tokio::test]
async fn in_memory_store_honours_the_item_contract() {
    exercise_store(&InMemoryItemRepository::default()).await;
}

#[tokio::test]
async fn sql_store_persists_across_repository_handles() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("items.db").display());

    let pool = connect_with_settings(&url, 2, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");
    let created = SqlItemRepository::new(pool.clone())
        .create(NewItem::new("Stapler", Decimal::from(120)))
        .await
        .expect("create");
    pool.close().await;

    let reopened = connect_with_settings(&url, 2, 30).await.expect("reconnect");
    let listed = SqlItemRepository::new(reopened.clone()).list().await.expect("list");
    assert_eq!(listed, vec![created]);
    reopened.close().await;
}
