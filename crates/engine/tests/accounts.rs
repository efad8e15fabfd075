use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database};

use engine::{
    CategoryCmd, CreateTransactionCmd, Engine, EngineError, Money, NewUserCmd, TransactionKind,
    TransactionListFilter,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn cmd(username: &str, email: &str) -> NewUserCmd {
    NewUserCmd {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
    }
}

#[tokio::test]
async fn new_user_gets_default_wallet_and_categories() {
    let engine = engine().await;
    let user = engine
        .new_user(cmd("  alice ", "Alice@Example.com"))
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");

    let wallets = engine.wallets(user.id).await.unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].name, "My Wallet");
    assert_eq!(wallets[0].currency.code(), "USD");
    assert_eq!(wallets[0].balance, Money::ZERO);

    let income = engine
        .categories(user.id, Some(TransactionKind::Income))
        .await
        .unwrap();
    let expense = engine
        .categories(user.id, Some(TransactionKind::Expense))
        .await
        .unwrap();
    assert_eq!(income.len(), 3);
    assert_eq!(expense.len(), 7);
    assert!(expense.iter().any(|c| c.name == "Food"));
    assert_eq!(engine.categories(user.id, None).await.unwrap().len(), 10);

    assert_eq!(engine.user(user.id).await.unwrap().map(|u| u.id), Some(user.id));
    assert!(engine.user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_or_email_is_rejected() {
    let engine = engine().await;
    engine
        .new_user(cmd("alice", "alice@example.com"))
        .await
        .unwrap();

    let err = engine
        .new_user(cmd("ALICE", "other@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine
        .new_user(cmd("alice2", "ALICE@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn schema_refuses_duplicate_usernames() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine
        .new_user(cmd("alice", "alice@example.com"))
        .await
        .unwrap();

    // bypasses the engine checks, as a racing registration would
    let res = db
        .execute_unprepared(
            "INSERT INTO users (id, username, email, password_hash, created_at) \
             VALUES (x'00000000000000000000000000000001', 'alice', 'other@example.com', \
             'hash', '2024-01-01T00:00:00+00:00')",
        )
        .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn invalid_registration_reports_every_problem() {
    let engine = engine().await;
    let err = engine
        .new_user(NewUserCmd {
            username: "al".to_string(),
            email: "not-an-email".to_string(),
            password_hash: String::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.messages().len(), 3);
}

#[tokio::test]
async fn wallet_crud() {
    let engine = engine().await;
    let user = engine
        .new_user(cmd("alice", "alice@example.com"))
        .await
        .unwrap();

    let wallet = engine
        .new_wallet(user.id, " Savings ", Some("eur"))
        .await
        .unwrap();
    assert_eq!(wallet.name, "Savings");
    assert_eq!(wallet.currency.code(), "EUR");

    let err = engine
        .new_wallet(user.id, "savings", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine
        .new_wallet(user.id, "", Some("euro"))
        .await
        .unwrap_err();
    assert_eq!(err.messages().len(), 2);

    engine
        .create_transaction(CreateTransactionCmd::new(
            user.id,
            wallet.id,
            Money::new(1_000),
            TransactionKind::Income,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ))
        .await
        .unwrap();

    let renamed = engine
        .update_wallet(user.id, wallet.id, "Rainy day", None)
        .await
        .unwrap();
    assert_eq!(renamed.name, "Rainy day");
    assert_eq!(renamed.currency.code(), "EUR");
    assert_eq!(renamed.balance, Money::new(1_000));

    // keeping its own name is not a clash
    engine
        .update_wallet(user.id, wallet.id, "rainy DAY", Some("gbp"))
        .await
        .unwrap();

    engine.delete_wallet(user.id, wallet.id).await.unwrap();
    assert!(matches!(
        engine.wallet(user.id, wallet.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(
        engine
            .list_transactions(user.id, &TransactionListFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn category_crud() {
    let engine = engine().await;
    let user = engine
        .new_user(cmd("alice", "alice@example.com"))
        .await
        .unwrap();

    let err = engine
        .new_category(CategoryCmd::new(user.id, "Pets", TransactionKind::Expense).color("red"))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let pets = engine
        .new_category(
            CategoryCmd::new(user.id, "Pets", TransactionKind::Expense)
                .color("#00ff00")
                .icon("  "),
        )
        .await
        .unwrap();
    assert_eq!(pets.color.as_deref(), Some("#00FF00"));
    assert_eq!(pets.icon, None);

    let updated = engine
        .update_category(
            pets.id,
            CategoryCmd::new(user.id, "Pet care", TransactionKind::Expense).icon("paw"),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Pet care");
    assert_eq!(updated.color, None);
    assert_eq!(engine.category(user.id, pets.id).await.unwrap(), updated);

    let stranger = engine
        .new_user(cmd("bob", "bob@example.com"))
        .await
        .unwrap();
    assert!(matches!(
        engine.delete_category(stranger.id, pets.id).await,
        Err(EngineError::KeyNotFound(_))
    ));

    engine.delete_category(user.id, pets.id).await.unwrap();
    assert!(matches!(
        engine.category(user.id, pets.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
