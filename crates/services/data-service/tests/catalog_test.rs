//! Image and transaction storage against an in-memory SQLite database.

mod support;

use common::ErrorKind;
use data_service_lib::ServiceContainer;
use sea_orm::ConnectionTrait;
use domain::{
    CreateImage, CreateTransaction, TransformationConfig, TransformationType,
    DEFAULT_CREDIT_BALANCE,
};
use uuid::Uuid;

use support::{new_user, setup_services};

fn recolor_image(title: &str, author_id: Option<Uuid>) -> CreateImage {
    CreateImage {
        title: title.to_string(),
        transformation_type: TransformationType::Recolor,
        public_id: format!("imaginify/{}", title),
        secure_url: format!("https://cdn.example.com/{}.png", title),
        width: Some(800),
        height: Some(600),
        config: Some(TransformationConfig::Recolor {
            prompt: "car".to_string(),
            to: "red".to_string(),
            multiple: false,
        }),
        transformation_url: None,
        aspect_ratio: Some("4:3".to_string()),
        color: Some("red".to_string()),
        prompt: Some("car".to_string()),
        author_id,
    }
}

fn purchase(stripe_id: &str, buyer_id: Option<Uuid>, credits: i64) -> CreateTransaction {
    CreateTransaction {
        stripe_id: stripe_id.to_string(),
        amount: 4000,
        plan: Some("Pro Package".to_string()),
        credits: Some(credits),
        buyer_id,
    }
}

#[tokio::test]
async fn test_image_round_trips_with_config() {
    let services = setup_services();
    let images = services.images();

    let created = images
        .add_image(recolor_image("beach", Some(Uuid::new_v4())))
        .await
        .unwrap();
    let fetched = images.get_image(created.id).await.unwrap();

    assert_eq!(fetched.transformation_type, TransformationType::Recolor);
    assert_eq!(fetched.config, created.config);
    assert_eq!(fetched.width, Some(800));
    assert_eq!(fetched.author_id, created.author_id);
}

#[tokio::test]
async fn test_image_author_is_not_checked() {
    let services = setup_services();

    // No user exists with this id
    let result = services
        .images()
        .add_image(recolor_image("orphan", Some(Uuid::new_v4())))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_list_images_by_author_filters_and_orders() {
    let services = setup_services();
    let images = services.images();
    let author = Uuid::new_v4();

    let first = images
        .add_image(recolor_image("one", Some(author)))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = images
        .add_image(recolor_image("two", Some(author)))
        .await
        .unwrap();
    images
        .add_image(recolor_image("other", Some(Uuid::new_v4())))
        .await
        .unwrap();

    let listed = images.list_images_by_author(author).await.unwrap();

    let ids: Vec<Uuid> = listed.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_get_unknown_image_is_not_found() {
    let services = setup_services();

    let err = services.images().get_image(Uuid::new_v4()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_record_purchase_grants_credits_to_buyer() {
    let services = setup_services();
    let buyer = services.users().create_user(new_user("buyer")).await.unwrap();

    let transaction = services
        .transactions()
        .record_purchase(purchase("cs_test_1", Some(buyer.id), 120))
        .await
        .unwrap();

    assert_eq!(transaction.buyer_id, Some(buyer.id));
    let buyer = services.users().get_user_by_id(buyer.id).await.unwrap();
    assert_eq!(buyer.credit_balance, DEFAULT_CREDIT_BALANCE + 120);

    let fetched = services
        .transactions()
        .get_transaction_by_stripe_id("cs_test_1")
        .await
        .unwrap();
    assert_eq!(fetched.id, transaction.id);
    assert_eq!(fetched.amount, 4000);
}

#[tokio::test]
async fn test_duplicate_stripe_id_is_rejected_without_second_grant() {
    let services = setup_services();
    let buyer = services.users().create_user(new_user("buyer")).await.unwrap();
    let transactions = services.transactions();

    transactions
        .record_purchase(purchase("cs_dup", Some(buyer.id), 50))
        .await
        .unwrap();
    let err = transactions
        .record_purchase(purchase("cs_dup", Some(buyer.id), 50))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    let buyer = services.users().get_user_by_id(buyer.id).await.unwrap();
    assert_eq!(buyer.credit_balance, DEFAULT_CREDIT_BALANCE + 50);
}

#[tokio::test]
async fn test_failed_grant_leaves_no_transaction_behind() {
    let services = setup_services();
    let buyer = services.users().create_user(new_user("buyer")).await.unwrap();
    let db = services.connection();
    let conn = db.ensure_connection().await.unwrap();

    conn.execute_unprepared(
        "CREATE TRIGGER block_user_updates BEFORE UPDATE ON users \
         BEGIN SELECT RAISE(ABORT, 'users are read-only'); END;",
    )
    .await
    .unwrap();

    let err = services
        .transactions()
        .record_purchase(purchase("cs_retry", Some(buyer.id), 50))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    let err = services
        .transactions()
        .get_transaction_by_stripe_id("cs_retry")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Redelivery after the store recovers grants the credits once
    conn.execute_unprepared("DROP TRIGGER block_user_updates")
        .await
        .unwrap();
    services
        .transactions()
        .record_purchase(purchase("cs_retry", Some(buyer.id), 50))
        .await
        .unwrap();

    let buyer = services.users().get_user_by_id(buyer.id).await.unwrap();
    assert_eq!(buyer.credit_balance, DEFAULT_CREDIT_BALANCE + 50);
}

#[tokio::test]
async fn test_purchase_for_unknown_buyer_is_still_recorded() {
    let services = setup_services();

    let result = services
        .transactions()
        .record_purchase(purchase("cs_lost", Some(Uuid::new_v4()), 10))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_list_transactions_by_buyer() {
    let services = setup_services();
    let buyer = Uuid::new_v4();
    let transactions = services.transactions();

    transactions
        .record_purchase(purchase("cs_a", Some(buyer), 0))
        .await
        .unwrap();
    transactions
        .record_purchase(purchase("cs_b", Some(buyer), 0))
        .await
        .unwrap();
    transactions
        .record_purchase(purchase("cs_c", None, 0))
        .await
        .unwrap();

    let listed = transactions.list_transactions_by_buyer(buyer).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|t| t.buyer_id == Some(buyer)));
}
