use rusqlite::Connection;
use storefront_core::db::open_db_in_memory;
use storefront_core::{
    Category, CategoryInput, CategoryRepository, ErrorKind, ProductInput, ProductRepository,
    RepoError, SqliteCategoryRepository, SqliteProductRepository, SqliteUserRepository, User,
    UserInput, UserRepository,
};

fn seed_user(conn: &mut Connection) -> User {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .create_user(&UserInput::new("maker", 28))
        .unwrap()
}

fn seed_categories(conn: &mut Connection, names: &[&str]) -> Vec<Category> {
    let mut repo = SqliteCategoryRepository::try_new(conn).unwrap();
    names
        .iter()
        .map(|name| repo.create_category(&CategoryInput::new(*name)).unwrap())
        .collect()
}

fn input(owner_id: i64, category_ids: Vec<i64>) -> ProductInput {
    ProductInput {
        name: "Desk lamp".to_string(),
        description: "Adjustable arm".to_string(),
        price: 40,
        color: "green".to_string(),
        quantity: 7,
        owner_id,
        category_ids,
    }
}

fn link_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM product_categories;", [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn create_and_get_roundtrip_with_owner_and_categories() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn);
    let categories = seed_categories(&mut conn, &["Home", "Lighting"]);
    let mut repo = SqliteProductRepository::try_new(&mut conn).unwrap();

    let created = repo
        .create_product(&input(owner.id, vec![categories[1].id, categories[0].id]))
        .unwrap();
    assert_eq!(created.owner, owner.summary());
    assert_eq!(created.categories, categories);
    assert_eq!(created.price, 40);
    assert_eq!(repo.get_product(created.id).unwrap(), created);
}

#[test]
fn unknown_category_ids_are_dropped_silently() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn);
    let categories = seed_categories(&mut conn, &["One", "Two"]);
    let (first, second) = (categories[0].id, categories[1].id);
    let mut repo = SqliteProductRepository::try_new(&mut conn).unwrap();

    let created = repo
        .create_product(&input(owner.id, vec![first, second, 999, second]))
        .unwrap();
    assert_eq!(created.category_ids(), vec![first, second]);
}

#[test]
fn update_with_empty_list_clears_categories() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn);
    let categories = seed_categories(&mut conn, &["One", "Two"]);
    let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
    {
        let mut repo = SqliteProductRepository::try_new(&mut conn).unwrap();
        let created = repo.create_product(&input(owner.id, ids.clone())).unwrap();
        assert_eq!(created.category_ids(), ids);

        let cleared = repo
            .update_product(created.id, &input(owner.id, Vec::new()))
            .unwrap();
        assert!(cleared.categories.is_empty());
        assert!(repo.get_product(created.id).unwrap().categories.is_empty());
    }
    assert_eq!(link_count(&conn), 0);
}

#[test]
fn update_replaces_fields_and_category_set() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn);
    let categories = seed_categories(&mut conn, &["A", "B", "C"]);
    let mut repo = SqliteProductRepository::try_new(&mut conn).unwrap();
    let created = repo
        .create_product(&input(owner.id, vec![categories[0].id, categories[1].id]))
        .unwrap();

    let mut replacement = input(owner.id, vec![categories[2].id]);
    replacement.name = "Floor lamp".to_string();
    replacement.quantity = 1;
    let updated = repo.update_product(created.id, &replacement).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Floor lamp");
    assert_eq!(updated.quantity, 1);
    assert_eq!(updated.categories, vec![categories[2].clone()]);
}

#[test]
fn missing_owner_is_a_foreign_key_violation() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteProductRepository::try_new(&mut conn).unwrap();

    let err = repo.create_product(&input(12345, Vec::new())).unwrap_err();
    assert!(matches!(err, RepoError::ForeignKeyViolation(_)));
    assert_ne!(err.user_message(), "User not found");
    assert!(repo.list_products().unwrap().is_empty());
}

#[test]
fn failed_update_rolls_back_links() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn);
    let categories = seed_categories(&mut conn, &["Keep"]);
    let mut repo = SqliteProductRepository::try_new(&mut conn).unwrap();
    let created = repo
        .create_product(&input(owner.id, vec![categories[0].id]))
        .unwrap();

    let mut bad = input(owner.id, Vec::new());
    bad.price = -1;
    let err = repo.update_product(created.id, &bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IntegrityError);
    assert_eq!(repo.get_product(created.id).unwrap(), created);

    let err = repo.update_product(777, &input(owner.id, Vec::new())).unwrap_err();
    assert_eq!(err.user_message(), "Product not found");
}

#[test]
fn deleting_either_side_removes_join_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn);
    let categories = seed_categories(&mut conn, &["Gone", "Stays"]);
    let (gone, stays) = (categories[0].id, categories[1].id);
    let (kept_product, dropped_product) = {
        let mut repo = SqliteProductRepository::try_new(&mut conn).unwrap();
        (
            repo.create_product(&input(owner.id, vec![gone, stays])).unwrap(),
            repo.create_product(&input(owner.id, vec![gone, stays])).unwrap(),
        )
    };
    assert_eq!(link_count(&conn), 4);

    let removed = SqliteCategoryRepository::try_new(&mut conn)
        .unwrap()
        .delete_category(gone)
        .unwrap();
    assert_eq!(removed.name, "Gone");
    assert_eq!(link_count(&conn), 2);

    let mut repo = SqliteProductRepository::try_new(&mut conn).unwrap();
    assert_eq!(repo.get_product(kept_product.id).unwrap().category_ids(), vec![stays]);

    let snapshot = repo.delete_product(dropped_product.id).unwrap();
    assert_eq!(snapshot.category_ids(), vec![stays]);
    assert_eq!(
        repo.get_product(dropped_product.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    drop(repo);
    assert_eq!(link_count(&conn), 1);
}

#[test]
fn list_tracks_creates_and_deletes() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn);
    let categories = seed_categories(&mut conn, &["Only"]);
    let mut repo = SqliteProductRepository::try_new(&mut conn).unwrap();
    let created: Vec<_> = (0..3)
        .map(|_| {
            repo.create_product(&input(owner.id, vec![categories[0].id]))
                .unwrap()
        })
        .collect();
    repo.delete_product(created[0].id).unwrap();

    let listed = repo.list_products().unwrap();
    assert_eq!(listed, created[1..].to_vec());
    for product in &listed {
        assert_eq!(&repo.get_product(product.id).unwrap(), product);
    }
}
