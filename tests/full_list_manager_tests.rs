use listsync::{FullListManager, InMemoryRecordService, ManagerOptions, RecordService};
use serde_json::{Value, json};
use std::sync::Arc;

async fn seeded() -> Arc<InMemoryRecordService> {
    let service = Arc::new(InMemoryRecordService::new("code"));
    service
        .seed(vec![
            json!({"code": "EUR", "region": "eu"}),
            json!({"code": "USD", "region": "na"}),
            json!({"code": "SEK", "region": "eu"}),
        ])
        .await;
    service
}

#[tokio::test]
async fn test_load_data_replaces_the_whole_list() {
    let service = seeded().await;
    let mut manager: FullListManager<Value, _> =
        FullListManager::new(service.clone(), "code", ManagerOptions::new());

    manager.load_data().await.unwrap();
    assert_eq!(manager.len(), 3);

    service.remove(&json!({"code": "USD"})).await.unwrap();
    manager.load_data().await.unwrap();
    assert_eq!(manager.len(), 2);
    assert_eq!(service.get_list_calls(), 2);
}

#[tokio::test]
async fn test_load_data_scoped_by_tag_data() {
    let service = seeded().await;
    let mut manager: FullListManager<Value, _> = FullListManager::new(
        service,
        "code",
        ManagerOptions::new().tag_data(json!({"region": "eu"})),
    );

    manager.load_data().await.unwrap();
    let codes: Vec<Value> = manager.list().into_iter().map(|v| v["code"].clone()).collect();
    assert_eq!(codes, vec![json!("EUR"), json!("SEK")]);

    manager.load_data_with(None).await.unwrap();
    assert_eq!(manager.len(), 3);
}

#[tokio::test]
async fn test_failed_load_keeps_previous_list() {
    let service = seeded().await;
    let mut manager: FullListManager<Value, _> =
        FullListManager::new(service.clone(), "code", ManagerOptions::new());
    manager.load_data().await.unwrap();

    service.fail_next(1);
    assert!(manager.load_data().await.unwrap_err().is_remote());
    assert_eq!(manager.len(), 3);
}

#[tokio::test]
async fn test_save_and_remove_on_full_list() {
    let service = seeded().await;
    let mut manager: FullListManager<Value, _> =
        FullListManager::new(service.clone(), "code", ManagerOptions::new());
    manager.load_data().await.unwrap();

    manager
        .save(json!({"code": "NOK", "region": "eu"}), true)
        .await
        .unwrap();
    assert_eq!(manager.list()[0]["code"], json!("NOK"));

    manager.remove(&json!({"code": "EUR"})).await.unwrap();
    assert_eq!(manager.len(), 3);
    assert_eq!(service.len().await, 3);
}
