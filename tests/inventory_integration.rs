//! Integration tests for the inventory facade against a file-backed store
//!
//! Every test opens its own database in a temporary directory.

use book_inventory::storage::{
    credentials, Book, BookStats, NewBook, NewUser, Permissions, SearchField,
};
use book_inventory::{AuthFlow, AuthState, Inventory, InventoryConfig, InventoryError, Session};
use tempfile::TempDir;

async fn open_inventory(dir: &TempDir) -> Inventory {
    let config = InventoryConfig {
        database_path: dir.path().join("data").join("inventory.db"),
        ..InventoryConfig::default()
    };
    Inventory::open(&config).await.expect("open inventory")
}

async fn register_and_login(inventory: &Inventory, username: &str, password: &str) -> Session {
    inventory
        .register(&NewUser::new(username.into(), password.into()))
        .await
        .expect("register");
    inventory.authenticate(username, password).await.expect("login")
}

fn book(isbn: &str, title: &str, authors: &[&str], pages: i64, price: i64) -> NewBook {
    let mut book = NewBook::new(
        isbn.into(),
        title.into(),
        authors.iter().map(|a| a.to_string()).collect(),
    );
    book.page_count = pages;
    book.price = price;
    book.available = 1;
    book
}

async fn seed(inventory: &Inventory, session: &Session) {
    for new_book in [
        book("978-0-1", "Good Omens", &["Terry Pratchett", "Neil Gaiman"], 412, 30),
        book("978-0-2", "Mort", &["Terry Pratchett"], 272, 15),
        book("978-0-3", "Coraline", &["Neil Gaiman"], 162, 12),
    ] {
        inventory.add_book(session, new_book).await.expect("seed book");
    }
}

async fn all_books(inventory: &Inventory) -> Vec<Book> {
    let mut books = inventory
        .search_books("", SearchField::PageCount)
        .await
        .into_result()
        .expect("list books");
    books.sort_by(|a, b| a.isbn.cmp(&b.isbn));
    books
}

#[tokio::test]
async fn test_alice_delete_scenario() {
    let dir = TempDir::new().unwrap();
    let inventory = open_inventory(&dir).await;
    let session = register_and_login(&inventory, "alice", "pw1").await;
    seed(&inventory, &session).await;

    let perms = credentials::get_permissions(inventory.database().pool(), "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(perms, Permissions::registration_default());

    let before = all_books(&inventory).await;
    let err = inventory.delete_book(&session, "978-0-1").await.unwrap_err();
    assert!(matches!(err, InventoryError::PermissionDenied { .. }));
    assert_eq!(all_books(&inventory).await, before);

    // Granting takes effect for the existing session
    credentials::set_permissions(
        inventory.database().pool(),
        "alice",
        Permissions {
            delete: true,
            ..Permissions::registration_default()
        },
    )
    .await
    .unwrap();

    assert_eq!(inventory.delete_book(&session, "978-0-1").await.unwrap(), 1);
    assert_eq!(all_books(&inventory).await.len(), 2);
    assert_eq!(inventory.delete_book(&session, "978-0-1").await.unwrap(), 0);
    assert_eq!(all_books(&inventory).await.len(), 2);
}

#[tokio::test]
async fn test_authenticate_only_exact_pairs() {
    let dir = TempDir::new().unwrap();
    let inventory = open_inventory(&dir).await;
    register_and_login(&inventory, "alice", "pw1").await;
    register_and_login(&inventory, "bob", "pw2").await;

    let wrong = [("alice", "pw2"), ("bob", "pw1"), ("carol", "pw1"), ("ALICE", "pw1")];
    for (user, password) in wrong {
        let err = inventory.authenticate(user, password).await.unwrap_err();
        assert!(matches!(err, InventoryError::AuthenticationFailed(_)));
    }

    let err = inventory
        .register(&NewUser::new("alice".into(), "other".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::UserAlreadyExists(_)));
}

#[tokio::test]
async fn test_search_semantics() {
    let dir = TempDir::new().unwrap();
    let inventory = open_inventory(&dir).await;
    let session = register_and_login(&inventory, "alice", "pw1").await;
    seed(&inventory, &session).await;

    let by_author = inventory.search_books("GAIMAN", SearchField::Authors).await.into_value();
    let mut isbns: Vec<_> = by_author.iter().map(|b| b.isbn.as_str()).collect();
    isbns.sort();
    assert_eq!(isbns, vec!["978-0-1", "978-0-3"]);

    let by_title = inventory.search_books("mor", SearchField::Title).await.into_value();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].title, "Mort");

    // Numeric fields match exactly, not by prefix
    let by_price = inventory.search_books("1", SearchField::Price).await.into_value();
    assert!(by_price.is_empty());
    let by_price = inventory.search_books("15", SearchField::Price).await.into_value();
    assert_eq!(by_price.len(), 1);

    inventory
        .add_book(&session, book("963-0-1", "Égető Eszter", &["Németh László"], 600, 20))
        .await
        .unwrap();
    let accented = inventory.search_books("égető", SearchField::Title).await.into_value();
    assert_eq!(accented.len(), 1);
    let accented = inventory.search_books("NÉMETH", SearchField::Authors).await.into_value();
    assert_eq!(accented[0].isbn, "963-0-1");

    assert_eq!(all_books(&inventory).await.len(), 4);

    let outcome = inventory.search_books("cheap", SearchField::Price).await;
    assert!(outcome.value().is_empty());
    assert!(matches!(outcome.cause(), Some(InventoryError::InvalidSearchTerm { .. })));
}

#[tokio::test]
async fn test_insert_preserves_author_order() {
    let dir = TempDir::new().unwrap();
    let inventory = open_inventory(&dir).await;
    let session = register_and_login(&inventory, "alice", "pw1").await;

    let new_book = book("978-1-0", "The Talisman", &["Stephen King", "Peter Straub"], 656, 25);
    inventory.add_book(&session, new_book.clone()).await.unwrap();

    let found = inventory
        .search_books("978-1-0", SearchField::Isbn)
        .await
        .into_value();
    assert_eq!(found, vec![Book::from(new_book)]);
    assert_eq!(found[0].authors, vec!["Stephen King", "Peter Straub"]);
}

#[tokio::test]
async fn test_update_touches_only_target() {
    let dir = TempDir::new().unwrap();
    let inventory = open_inventory(&dir).await;
    let session = register_and_login(&inventory, "alice", "pw1").await;
    seed(&inventory, &session).await;

    let before = all_books(&inventory).await;

    let mut edited = before[1].clone();
    edited.title = "Mort (Discworld)".into();
    edited.price = 18;
    assert_eq!(inventory.update_book(&session, &edited).await.unwrap(), 1);

    let after = all_books(&inventory).await;
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], edited);
    assert_eq!(after[2], before[2]);

    let mut missing = edited.clone();
    missing.isbn = "000".into();
    assert_eq!(inventory.update_book(&session, &missing).await.unwrap(), 0);
    assert_eq!(all_books(&inventory).await, after);
}

#[tokio::test]
async fn test_stats() {
    let dir = TempDir::new().unwrap();
    let inventory = open_inventory(&dir).await;
    let session = register_and_login(&inventory, "alice", "pw1").await;

    assert_eq!(inventory.get_stats().await.into_value(), BookStats::default());

    seed(&inventory, &session).await;
    let stats = inventory.get_stats().await;
    assert!(!stats.is_degraded());
    assert_eq!(stats.value().book_count, 3);
    assert_eq!(stats.value().total_pages, 412 + 272 + 162);

    let chart = inventory.price_chart().await.into_value();
    assert_eq!(chart.max_price, 30);
    assert_eq!(chart.bars[0].title, "Good Omens");
    assert!((chart.average_price - 19.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let inventory = open_inventory(&dir).await;
        let session = register_and_login(&inventory, "alice", "pw1").await;
        seed(&inventory, &session).await;
        inventory.close().await.unwrap();
    }

    let inventory = open_inventory(&dir).await;
    assert!(inventory.authenticate("alice", "pw1").await.is_ok());
    assert_eq!(all_books(&inventory).await.len(), 3);
}

#[tokio::test]
async fn test_auth_flow_against_file_store() {
    let dir = TempDir::new().unwrap();
    let inventory = open_inventory(&dir).await;
    let pool = inventory.database().pool();

    let mut flow = AuthFlow::new();
    flow.register(pool, &NewUser::new("alice".into(), "pw1".into()))
        .await
        .unwrap();
    assert_eq!(flow.state(), &AuthState::Unauthenticated);

    assert!(flow.login(pool, "alice", "bad").await.is_err());
    let session = flow.login(pool, "alice", "pw1").await.unwrap();
    assert_eq!(session.username(), "alice");

    let err = inventory.delete_book(&session, "missing").await.unwrap_err();
    assert!(err.is_user_facing());
}
