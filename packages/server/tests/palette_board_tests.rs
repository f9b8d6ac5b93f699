//! Integration tests for the palette and saved boards.

mod common;

use server_core::common::SessionToken;
use server_core::domains::boards::{BoardItemPlacement, SavedBoard, SavedBoardInput};
use server_core::domains::palette::LikedItem;
use test_context::test_context;
use uuid::Uuid;

use crate::common::{create_test_item, create_test_supplier, TestHarness};

fn session() -> SessionToken {
    SessionToken::parse(&format!("sess-{}", Uuid::now_v7())).unwrap()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn liking_is_idempotent_per_session(ctx: &TestHarness) {
    let supplier = create_test_supplier(&ctx.db_pool, "Polytec").await.unwrap();
    let item = create_test_item(&ctx.db_pool, &supplier, "Natural Oak").await.unwrap();
    let alice = session();
    let bob = session();

    let first = LikedItem::like(&alice, item.id, &ctx.db_pool).await.unwrap();
    let again = LikedItem::like(&alice, item.id, &ctx.db_pool).await.unwrap();
    LikedItem::like(&bob, item.id, &ctx.db_pool).await.unwrap();

    assert_eq!(first.id, again.id);

    let items = LikedItem::list_items(&alice, &ctx.db_pool).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Natural Oak");

    assert!(LikedItem::unlike(&alice, item.id, &ctx.db_pool).await.unwrap());
    assert!(!LikedItem::unlike(&alice, item.id, &ctx.db_pool).await.unwrap());
    assert!(LikedItem::list_items(&alice, &ctx.db_pool).await.unwrap().is_empty());
    assert_eq!(LikedItem::list_items(&bob, &ctx.db_pool).await.unwrap().len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn board_update_overwrites_everything(ctx: &TestHarness) {
    let supplier = create_test_supplier(&ctx.db_pool, "Laminex").await.unwrap();
    let item = create_test_item(&ctx.db_pool, &supplier, "Black Wenge").await.unwrap();

    let created = SavedBoard::create(
        &SavedBoardInput {
            name: "Kitchen v1".to_string(),
            description: Some("first pass".to_string()),
            items: vec![BoardItemPlacement {
                catalog_item_id: item.id,
                x: 10.0,
                y: 20.0,
                width: 120.0,
                height: 90.0,
                rotation: 405,
                z_index: 1,
            }],
            is_public: true,
            ..Default::default()
        },
        &ctx.db_pool,
    )
    .await
    .unwrap();
    assert_eq!(created.items[0].rotation, 45);

    let updated = SavedBoard::update(
        created.id,
        &SavedBoardInput {
            name: "Kitchen v2".to_string(),
            ..Default::default()
        },
        &ctx.db_pool,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Kitchen v2");
    assert!(updated.description.is_none());
    assert!(updated.items.is_empty());
    assert!(!updated.is_public);

    assert!(SavedBoard::delete(created.id, &ctx.db_pool).await.unwrap());
    assert!(SavedBoard::find_by_id(created.id, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
}
