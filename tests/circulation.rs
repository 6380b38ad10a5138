//! Catalog and circulation tests against a live Postgres database.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::postgres::PgPoolOptions;

use library_server::{
    error::AppError,
    models::{
        book::{CreateBook, UpdateBook},
        loan::{BorrowRequest, LoanStatus, ReturnRequest},
    },
    repository::Repository,
    services::Services,
    AppConfig,
};

static COUNTER: AtomicU64 = AtomicU64::new(0);

async fn services() -> Services {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Services::new(Repository::new(pool), &AppConfig::default())
}

/// ISBN not used by any other test run
fn fresh_isbn() -> String {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_micros() as u64;
    let n = (micros % 100_000_000) * 100 + COUNTER.fetch_add(1, Ordering::SeqCst) % 100;
    format!("999{:010}", n)
}

fn new_book(isbn: &str, title: &str, copies: i32) -> CreateBook {
    CreateBook {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author: "Test Author".to_string(),
        category: Some("Testing".to_string()),
        publication_year: Some(2024),
        description: None,
        copies: Some(copies),
    }
}

fn borrower(name: &str) -> BorrowRequest {
    BorrowRequest {
        borrower_name: Some(name.to_string()),
        borrower_email: None,
    }
}

fn returner(name: &str) -> ReturnRequest {
    ReturnRequest {
        borrower_name: Some(name.to_string()),
    }
}

#[tokio::test]
#[ignore]
async fn test_add_then_get_has_all_copies_available() {
    let services = services().await;
    let isbn = fresh_isbn();

    let created = services.catalog.add_book(new_book(&isbn, "Fresh Book", 4)).await.unwrap();
    let fetched = services.catalog.get_book(&isbn).await.unwrap();

    assert_eq!(created, fetched);
    assert_eq!(fetched.copies, 4);
    assert_eq!(fetched.available, 4);
}

#[tokio::test]
#[ignore]
async fn test_add_accepts_separated_isbn() {
    let services = services().await;
    let isbn = fresh_isbn();
    let separated = format!("{}-{}-{}", &isbn[..3], &isbn[3..8], &isbn[8..]);

    let created = services.catalog.add_book(new_book(&separated, "Separated", 1)).await.unwrap();

    assert_eq!(created.isbn, isbn);
    assert!(services.catalog.get_book(&separated).await.is_ok());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_leaves_existing_book_unchanged() {
    let services = services().await;
    let isbn = fresh_isbn();

    let original = services.catalog.add_book(new_book(&isbn, "Original", 2)).await.unwrap();
    let err = services
        .catalog
        .add_book(new_book(&isbn, "Impostor", 9))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Duplicate(_)));
    assert_eq!(services.catalog.get_book(&isbn).await.unwrap(), original);
}

#[tokio::test]
#[ignore]
async fn test_missing_book_is_not_found() {
    let services = services().await;
    let isbn = fresh_isbn();

    assert!(matches!(services.catalog.get_book(&isbn).await, Err(AppError::NotFound(_))));
    assert!(matches!(services.catalog.delete_book(&isbn).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        services.catalog.update_book(&isbn, &UpdateBook::default(), false).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        services.circulation.borrow(&isbn, &borrower("Ada")).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        services.circulation.return_book(&isbn, &returner("Ada")).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore]
async fn test_borrow_then_return_restores_available() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Round Trip", 2)).await.unwrap();

    let loan = services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();
    assert_eq!(loan.status, LoanStatus::Borrowed);
    assert!(loan.return_date.is_none());
    assert_eq!(services.catalog.get_book(&isbn).await.unwrap().available, 1);

    let returned = services.circulation.return_book(&isbn, &returner("Ada")).await.unwrap();
    assert_eq!(returned.id, loan.id);
    assert_eq!(returned.status, LoanStatus::Returned);
    assert!(returned.return_date.is_some());
    assert_eq!(services.catalog.get_book(&isbn).await.unwrap().available, 2);

    let history = services.circulation.history().await.unwrap();
    let ours: Vec<_> = history.iter().filter(|l| l.isbn == isbn).collect();
    assert_eq!(ours.len(), 1);
    assert_eq!(ours[0].status, LoanStatus::Returned);
    assert_eq!(ours[0].title.as_deref(), Some("Round Trip"));
}

#[tokio::test]
#[ignore]
async fn test_borrow_without_available_copy_fails() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Single Copy", 1)).await.unwrap();

    services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();
    let err = services.circulation.borrow(&isbn, &borrower("Grace")).await.unwrap_err();

    assert!(matches!(err, AppError::Unavailable(_)));
    assert_eq!(services.catalog.get_book(&isbn).await.unwrap().available, 0);
}

#[tokio::test]
#[ignore]
async fn test_borrower_cannot_hold_two_copies_of_same_title() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Popular", 3)).await.unwrap();

    services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();
    let err = services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyBorrowed(_)));

    // a different borrower still gets a copy
    services.circulation.borrow(&isbn, &borrower("Grace")).await.unwrap();
    assert_eq!(services.catalog.get_book(&isbn).await.unwrap().available, 1);
}

#[tokio::test]
#[ignore]
async fn test_borrower_can_borrow_again_after_return() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Reread", 1)).await.unwrap();

    let first = services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();
    services.circulation.return_book(&isbn, &returner("Ada")).await.unwrap();
    let second = services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(second.status, LoanStatus::Borrowed);
}

#[tokio::test]
#[ignore]
async fn test_return_without_open_loan_fails() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Never Lent", 1)).await.unwrap();

    let err = services.circulation.return_book(&isbn, &returner("Ada")).await.unwrap_err();
    assert!(matches!(err, AppError::NoActiveLoan(_)));

    services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();
    services.circulation.return_book(&isbn, &returner("Ada")).await.unwrap();
    let err = services.circulation.return_book(&isbn, &returner("Ada")).await.unwrap_err();
    assert!(matches!(err, AppError::NoActiveLoan(_)));
    assert_eq!(services.catalog.get_book(&isbn).await.unwrap().available, 1);
}

#[tokio::test]
#[ignore]
async fn test_return_never_exceeds_copies() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Overfull", 2)).await.unwrap();

    services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();
    // administrative overwrite puts the shelf back to full while the loan is open
    let update = UpdateBook {
        available: Some(2),
        ..Default::default()
    };
    services.catalog.update_book(&isbn, &update, false).await.unwrap();

    let loan = services.circulation.return_book(&isbn, &returner("Ada")).await.unwrap();
    assert_eq!(loan.status, LoanStatus::Returned);
    assert_eq!(services.catalog.get_book(&isbn).await.unwrap().available, 2);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_of_last_copy() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Last Copy", 1)).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..8 {
        let services = services.clone();
        let isbn = isbn.clone();
        tasks.spawn(async move {
            services
                .circulation
                .borrow(&isbn, &borrower(&format!("Borrower {}", i)))
                .await
        });
    }

    let mut successes = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::Unavailable(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(services.catalog.get_book(&isbn).await.unwrap().available, 0);
}

#[tokio::test]
#[ignore]
async fn test_update_is_permissive_unless_strict() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Editable", 2)).await.unwrap();

    let update = UpdateBook {
        available: Some(5),
        ..Default::default()
    };

    let err = services.catalog.update_book(&isbn, &update, true).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(services.catalog.get_book(&isbn).await.unwrap().available, 2);

    let book = services.catalog.update_book(&isbn, &update, false).await.unwrap();
    assert_eq!(book.available, 5);
    assert_eq!(book.copies, 2);
    assert_eq!(book.title, "Editable");
}

#[tokio::test]
#[ignore]
async fn test_delete_with_open_loan_keeps_loan() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Doomed", 1)).await.unwrap();
    services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();

    services.catalog.delete_book(&isbn).await.unwrap();

    assert!(matches!(services.catalog.get_book(&isbn).await, Err(AppError::NotFound(_))));
    let history = services.circulation.history().await.unwrap();
    let orphan = history.iter().find(|l| l.isbn == isbn).expect("loan kept");
    assert_eq!(orphan.status, LoanStatus::Borrowed);
    assert!(orphan.title.is_none());
}

#[tokio::test]
#[ignore]
async fn test_search_matches_substring_ordered_by_title() {
    let services = services().await;
    let code = fresh_isbn();
    let architecture = fresh_isbn();
    services.catalog.add_book(new_book(&code, "Clean Code", 1)).await.unwrap();
    services
        .catalog
        .add_book(new_book(&architecture, "Clean Architecture", 1))
        .await
        .unwrap();

    let results = services.catalog.search("clean").await.unwrap();
    let ours: Vec<_> = results
        .iter()
        .filter(|b| b.isbn == code || b.isbn == architecture)
        .map(|b| b.title.as_str())
        .collect();
    assert_eq!(ours, vec!["Clean Architecture", "Clean Code"]);

    let by_isbn = services.catalog.search(&code[3..]).await.unwrap();
    assert!(by_isbn.iter().any(|b| b.isbn == code));

    assert!(matches!(services.catalog.search("  ").await, Err(AppError::Validation(_))));
}

#[tokio::test]
#[ignore]
async fn test_list_orders_by_title_bytes_then_insertion() {
    let services = services().await;
    let lower = fresh_isbn();
    let first = fresh_isbn();
    let second = fresh_isbn();

    services.catalog.add_book(new_book(&lower, "apple", 1)).await.unwrap();
    services.catalog.add_book(new_book(&first, "Banana", 1)).await.unwrap();
    services.catalog.add_book(new_book(&second, "Banana", 1)).await.unwrap();

    let books = services.catalog.list_books().await.unwrap();
    let ours: Vec<&str> = books
        .iter()
        .filter(|b| b.isbn == lower || b.isbn == first || b.isbn == second)
        .map(|b| b.isbn.as_str())
        .collect();

    // "B" (0x42) sorts before "a" (0x61); equal titles keep insertion order
    assert_eq!(ours, vec![first.as_str(), second.as_str(), lower.as_str()]);
}

#[tokio::test]
#[ignore]
async fn test_history_lists_newest_loan_first() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Popular", 2)).await.unwrap();

    let older = services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let newer = services.circulation.borrow(&isbn, &borrower("Grace")).await.unwrap();

    let history = services.circulation.history().await.unwrap();
    let ours: Vec<i32> = history.iter().filter(|l| l.isbn == isbn).map(|l| l.id).collect();
    assert_eq!(ours, vec![newer.id, older.id]);
    assert!(history.windows(2).all(|w| w[0].borrow_date >= w[1].borrow_date));
}

#[tokio::test]
#[ignore]
async fn test_update_null_clears_category() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Uncategorized", 1)).await.unwrap();

    let update: UpdateBook = serde_json::from_str(r#"{"category": null}"#).unwrap();
    let book = services.catalog.update_book(&isbn, &update, false).await.unwrap();

    assert_eq!(book.category, None);
    assert_eq!(book.publication_year, Some(2024));
}

#[tokio::test]
#[ignore]
async fn test_search_treats_wildcards_literally() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Plain Title", 1)).await.unwrap();

    let results = services.catalog.search("%").await.unwrap();
    assert!(results.iter().all(|b| b.isbn != isbn));
}

#[tokio::test]
#[ignore]
async fn test_stats_reflect_loans() {
    let services = services().await;
    let isbn = fresh_isbn();
    services.catalog.add_book(new_book(&isbn, "Counted", 5)).await.unwrap();

    services.circulation.borrow(&isbn, &borrower("Ada")).await.unwrap();
    services.circulation.borrow(&isbn, &borrower("Grace")).await.unwrap();
    let stats = services.stats.get_stats().await.unwrap();

    assert!(stats.total_books >= 1);
    assert!(stats.total_copies >= 5);
    assert_eq!(stats.borrowed_books, stats.total_copies - stats.available_copies);
    assert!(stats.categories.iter().any(|c| c.category == "Testing"));
    assert!(stats.categories.windows(2).all(|w| w[0].count >= w[1].count));
    assert!(!stats.recent_activity.is_empty());
    assert!(stats.recent_activity.len() <= 10);
}
