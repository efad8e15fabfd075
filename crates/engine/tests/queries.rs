use chrono::NaiveDate;
use sea_orm::Database;

use engine::{
    CategoryCmd, CreateTransactionCmd, Engine, EngineError, Money, NewUserCmd, Summary,
    TransactionKind, TransactionListFilter, User, Wallet,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn user_with_wallet(engine: &Engine, username: &str) -> (User, Wallet) {
    let user = engine
        .new_user(NewUserCmd {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();
    let wallet = engine.new_wallet(user.id, "Cash", None).await.unwrap();
    (user, wallet)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

async fn record(
    engine: &Engine,
    user_id: Uuid,
    wallet_id: Uuid,
    category_id: Option<Uuid>,
    kind: TransactionKind,
    minor: i64,
    date: NaiveDate,
) -> engine::Transaction {
    let mut cmd = CreateTransactionCmd::new(user_id, wallet_id, Money::new(minor), kind, date);
    if let Some(category_id) = category_id {
        cmd = cmd.category_id(category_id);
    }
    engine.create_transaction(cmd).await.unwrap()
}

#[tokio::test]
async fn breakdown_groups_by_category_largest_first() {
    let engine = engine().await;
    let (alice, wallet) = user_with_wallet(&engine, "alice").await;
    let food = engine
        .new_category(CategoryCmd::new(alice.id, "Groceries", TransactionKind::Expense))
        .await
        .unwrap();
    let transport = engine
        .new_category(CategoryCmd::new(alice.id, "Commute", TransactionKind::Expense))
        .await
        .unwrap();
    let salary = engine
        .new_category(CategoryCmd::new(alice.id, "Paycheck", TransactionKind::Income))
        .await
        .unwrap();

    let expense = TransactionKind::Expense;
    record(&engine, alice.id, wallet.id, Some(food.id), expense, 2_000, day(3)).await;
    record(&engine, alice.id, wallet.id, Some(food.id), expense, 3_000, day(10)).await;
    record(&engine, alice.id, wallet.id, Some(transport.id), expense, 1_000, day(12)).await;
    // outside the window, of the other kind, or uncategorized: all ignored
    record(&engine, alice.id, wallet.id, Some(food.id), expense, 9_900, day(30)).await;
    record(&engine, alice.id, wallet.id, Some(salary.id), TransactionKind::Income, 50_000, day(5)).await;
    record(&engine, alice.id, wallet.id, None, expense, 700, day(6)).await;

    let breakdown = engine
        .category_breakdown(alice.id, day(1), day(20), expense)
        .await
        .unwrap();

    let rows: Vec<(&str, Money, u64)> = breakdown
        .iter()
        .map(|c| (c.name.as_str(), c.total, c.count))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Groceries", Money::new(5_000), 2),
            ("Commute", Money::new(1_000), 1),
        ]
    );
    assert_eq!(breakdown[0].category_id, food.id);
}

#[tokio::test]
async fn breakdown_ties_are_ordered_by_name() {
    let engine = engine().await;
    let (alice, wallet) = user_with_wallet(&engine, "alice").await;
    let zoo = engine
        .new_category(CategoryCmd::new(alice.id, "Zoo", TransactionKind::Expense))
        .await
        .unwrap();
    let books = engine
        .new_category(CategoryCmd::new(alice.id, "Books", TransactionKind::Expense))
        .await
        .unwrap();
    let expense = TransactionKind::Expense;
    record(&engine, alice.id, wallet.id, Some(zoo.id), expense, 500, day(2)).await;
    record(&engine, alice.id, wallet.id, Some(books.id), expense, 500, day(2)).await;

    let names: Vec<String> = engine
        .category_breakdown(alice.id, day(1), day(2), expense)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Books", "Zoo"]);
}

#[tokio::test]
async fn summary_counts_inclusive_window_per_user() {
    let engine = engine().await;
    let (alice, wallet) = user_with_wallet(&engine, "alice").await;
    let (bob, bob_wallet) = user_with_wallet(&engine, "bob").await;

    record(&engine, alice.id, wallet.id, None, TransactionKind::Income, 10_000, day(1)).await;
    record(&engine, alice.id, wallet.id, None, TransactionKind::Expense, 2_550, day(15)).await;
    record(&engine, alice.id, wallet.id, None, TransactionKind::Expense, 450, day(30)).await;
    record(&engine, alice.id, wallet.id, None, TransactionKind::Expense, 1, day(1)).await;
    record(&engine, bob.id, bob_wallet.id, None, TransactionKind::Income, 77_700, day(15)).await;

    let summary = engine.summary(alice.id, day(1), day(30)).await.unwrap();
    assert_eq!(
        summary,
        Summary {
            total_income: Money::new(10_000),
            total_expense: Money::new(3_001),
            transaction_count: 4,
        }
    );
    assert_eq!(summary.net(), Money::new(6_999));

    let again = engine.summary(alice.id, day(1), day(30)).await.unwrap();
    assert_eq!(summary, again);
}

#[tokio::test]
async fn summary_of_empty_window_is_zero() {
    let engine = engine().await;
    let (alice, _wallet) = user_with_wallet(&engine, "alice").await;

    let summary = engine.summary(alice.id, day(1), day(30)).await.unwrap();
    assert_eq!(summary, Summary::default());

    let err = engine.summary(alice.id, day(30), day(1)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidRange(_)));
}

#[tokio::test]
async fn list_applies_filters_and_orders_newest_first() {
    let engine = engine().await;
    let (alice, cash) = user_with_wallet(&engine, "alice").await;
    let bank = engine.new_wallet(alice.id, "Bank", None).await.unwrap();
    let food = engine
        .new_category(CategoryCmd::new(alice.id, "Groceries", TransactionKind::Expense))
        .await
        .unwrap();

    let expense = TransactionKind::Expense;
    let oldest = record(&engine, alice.id, cash.id, Some(food.id), expense, 100, day(1)).await;
    let middle = record(&engine, alice.id, bank.id, None, TransactionKind::Income, 200, day(5)).await;
    let newest = record(&engine, alice.id, cash.id, Some(food.id), expense, 300, day(9)).await;

    let ids = |list: Vec<engine::TransactionDetail>| -> Vec<Uuid> {
        list.into_iter().map(|d| d.transaction.id).collect()
    };

    let all = engine
        .list_transactions(alice.id, &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(ids(all), vec![newest.id, middle.id, oldest.id]);

    let by_wallet = TransactionListFilter {
        wallet_id: Some(cash.id),
        ..Default::default()
    };
    assert_eq!(
        ids(engine.list_transactions(alice.id, &by_wallet).await.unwrap()),
        vec![newest.id, oldest.id]
    );

    let by_kind = TransactionListFilter {
        kind: Some(TransactionKind::Income),
        ..Default::default()
    };
    assert_eq!(
        ids(engine.list_transactions(alice.id, &by_kind).await.unwrap()),
        vec![middle.id]
    );

    let by_category_and_dates = TransactionListFilter {
        category_id: Some(food.id),
        start_date: Some(day(1)),
        end_date: Some(day(5)),
        ..Default::default()
    };
    assert_eq!(
        ids(engine
            .list_transactions(alice.id, &by_category_and_dates)
            .await
            .unwrap()),
        vec![oldest.id]
    );

    let limited = TransactionListFilter {
        limit: Some(2),
        ..Default::default()
    };
    assert_eq!(
        ids(engine.list_transactions(alice.id, &limited).await.unwrap()),
        vec![newest.id, middle.id]
    );
}

#[tokio::test]
async fn list_rejects_limits_sqlite_cannot_bind() {
    let engine = engine().await;
    let (alice, wallet) = user_with_wallet(&engine, "alice").await;
    let tx = record(&engine, alice.id, wallet.id, None, TransactionKind::Income, 100, day(1)).await;

    let huge = TransactionListFilter {
        limit: Some(u64::MAX),
        ..Default::default()
    };
    let err = engine.list_transactions(alice.id, &huge).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let largest = TransactionListFilter {
        limit: Some(i64::MAX as u64),
        ..Default::default()
    };
    let listed = engine.list_transactions(alice.id, &largest).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].transaction.id, tx.id);
}

#[tokio::test]
async fn list_never_shows_other_users_rows() {
    let engine = engine().await;
    let (alice, wallet) = user_with_wallet(&engine, "alice").await;
    let (bob, _) = user_with_wallet(&engine, "bob").await;
    record(&engine, alice.id, wallet.id, None, TransactionKind::Income, 100, day(1)).await;

    let listed = engine
        .list_transactions(bob.id, &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn deleting_category_keeps_transactions_uncategorized() {
    let engine = engine().await;
    let (alice, wallet) = user_with_wallet(&engine, "alice").await;
    let food = engine
        .new_category(CategoryCmd::new(alice.id, "Groceries", TransactionKind::Expense))
        .await
        .unwrap();
    let tx = record(&engine, alice.id, wallet.id, Some(food.id), TransactionKind::Expense, 800, day(2)).await;

    engine.delete_category(alice.id, food.id).await.unwrap();

    let detail = engine.transaction(alice.id, tx.id).await.unwrap();
    assert_eq!(detail.transaction.category_id, None);
    assert_eq!(detail.category_name, None);
    assert_eq!(
        engine.wallet(alice.id, wallet.id).await.unwrap().balance,
        Money::new(-800)
    );
    assert!(
        engine
            .category_breakdown(alice.id, day(1), day(30), TransactionKind::Expense)
            .await
            .unwrap()
            .is_empty()
    );
}
