mod helpers;

use std::sync::atomic::Ordering;

use helpers::{TestContext, BASE_URL};
use shelf_core::Owner;
use uuid::Uuid;

#[tokio::test]
async fn test_consistent_state_reports_nothing() {
    let ctx = TestContext::new();
    let id = Uuid::new_v4();
    ctx.storage.insert(&format!("{}.png", id), vec![1, 2, 3]);
    ctx.images.seed(
        id,
        &format!("{}/{}.png", BASE_URL, id),
        Owner::Anime(Uuid::new_v4()),
    );

    let report = ctx.reconcile_service().run(true).await.unwrap();

    assert_eq!(report.stored_objects, 1);
    assert_eq!(report.records, 1);
    assert!(report.orphaned_objects.is_empty());
    assert!(report.dangling_records.is_empty());
    assert_eq!(report.removed_orphans, 0);
}

#[tokio::test]
async fn test_reports_orphans_and_dangling_records() {
    let ctx = TestContext::new();
    ctx.storage.insert("orphan.jpg", vec![1]);

    let dangling_id = Uuid::new_v4();
    let dangling_url = format!("{}/{}.webp", BASE_URL, dangling_id);
    ctx.images
        .seed(dangling_id, &dangling_url, Owner::Manga(Uuid::new_v4()));

    let report = ctx.reconcile_service().run(false).await.unwrap();

    assert_eq!(report.orphaned_objects, vec!["orphan.jpg".to_string()]);
    assert_eq!(report.dangling_records, vec![dangling_url]);
    assert_eq!(report.removed_orphans, 0);
    assert!(ctx.storage.contains("orphan.jpg"));
    assert_eq!(ctx.images.count(), 1);
}

#[tokio::test]
async fn test_remove_orphans_deletes_only_unreferenced_objects() {
    let ctx = TestContext::new();
    let kept = Uuid::new_v4();
    ctx.storage.insert(&format!("{}.png", kept), vec![1]);
    ctx.storage.insert("orphan-a.png", vec![2]);
    ctx.storage.insert("orphan-b.png", vec![3]);
    ctx.images.seed(
        kept,
        &format!("{}/{}.png", BASE_URL, kept),
        Owner::LightNovel(Uuid::new_v4()),
    );

    let report = ctx.reconcile_service().run(true).await.unwrap();

    assert_eq!(report.removed_orphans, 2);
    assert_eq!(report.failed_removals, 0);
    assert_eq!(ctx.storage.object_count(), 1);
    assert!(ctx.storage.contains(&format!("{}.png", kept)));
}

#[tokio::test]
async fn test_failed_orphan_removal_is_counted() {
    let ctx = TestContext::new();
    ctx.storage.insert("orphan.png", vec![1]);
    ctx.storage.fail_delete.store(true, Ordering::SeqCst);

    let report = ctx.reconcile_service().run(true).await.unwrap();

    assert_eq!(report.removed_orphans, 0);
    assert_eq!(report.failed_removals, 1);
    assert!(ctx.storage.contains("orphan.png"));
}

#[tokio::test]
async fn test_orphan_gone_before_removal_is_not_counted() {
    let ctx = TestContext::new();
    ctx.storage.insert("orphan.png", vec![1]);
    ctx.storage.vanish_on_delete.store(true, Ordering::SeqCst);

    let report = ctx.reconcile_service().run(true).await.unwrap();

    assert_eq!(report.orphaned_objects, vec!["orphan.png".to_string()]);
    assert_eq!(report.removed_orphans, 0);
    assert_eq!(report.failed_removals, 0);
}
