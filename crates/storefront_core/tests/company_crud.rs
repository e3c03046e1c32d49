use rusqlite::Connection;
use storefront_core::db::open_db_in_memory;
use storefront_core::{
    CompanyInput, CompanyRepository, CompanyUpdate, ErrorKind, RepoError,
    SqliteCompanyRepository, SqliteUserRepository, User, UserInput, UserRepository,
};

fn seed_user(conn: &mut Connection, name: &str) -> User {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .create_user(&UserInput::new(name, 33))
        .unwrap()
}

fn company_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM companies;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_and_get_roundtrip_includes_owner() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn, "Ada");
    let mut repo = SqliteCompanyRepository::try_new(&mut conn).unwrap();

    let created = repo
        .create_company(&CompanyInput::new("Analytical Engines", owner.id))
        .unwrap();
    assert_eq!(created.name, "Analytical Engines");
    assert_eq!(created.owner, owner.summary());
    assert_eq!(repo.get_company(created.id).unwrap(), created);
}

#[test]
fn second_company_for_same_user_is_rejected_before_insert() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn, "Ada");
    {
        let mut repo = SqliteCompanyRepository::try_new(&mut conn).unwrap();
        repo.create_company(&CompanyInput::new("First", owner.id))
            .unwrap();
        let err = repo
            .create_company(&CompanyInput::new("Second", owner.id))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
        assert_eq!(err.user_message(), "This user already has a company.");
    }
    assert_eq!(company_count(&conn), 1);
}

#[test]
fn duplicate_company_name_is_rejected_regardless_of_owner() {
    let mut conn = open_db_in_memory().unwrap();
    let first = seed_user(&mut conn, "first");
    let second = seed_user(&mut conn, "second");
    {
        let mut repo = SqliteCompanyRepository::try_new(&mut conn).unwrap();
        repo.create_company(&CompanyInput::new("Acme", first.id))
            .unwrap();
        let err = repo
            .create_company(&CompanyInput::new("Acme", second.id))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
        assert_eq!(err.user_message(), "This company name is already used.");
    }
    assert_eq!(company_count(&conn), 1);
}

#[test]
fn missing_owner_is_reported_as_user_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCompanyRepository::try_new(&mut conn).unwrap();

    let err = repo
        .create_company(&CompanyInput::new("Nobody Ltd", 404))
        .unwrap_err();
    assert!(matches!(err, RepoError::ForeignKeyViolation(_)));
    assert_eq!(err.user_message(), "User not found");
    drop(repo);
    assert_eq!(company_count(&conn), 0);
}

#[test]
fn update_renames_and_checks_other_names() {
    let mut conn = open_db_in_memory().unwrap();
    let first = seed_user(&mut conn, "first");
    let second = seed_user(&mut conn, "second");
    let mut repo = SqliteCompanyRepository::try_new(&mut conn).unwrap();
    let acme = repo
        .create_company(&CompanyInput::new("Acme", first.id))
        .unwrap();
    repo.create_company(&CompanyInput::new("Globex", second.id))
        .unwrap();

    let same_name = repo
        .update_company(acme.id, &CompanyUpdate { name: "Acme".to_string() })
        .unwrap();
    assert_eq!(same_name, acme);

    let renamed = repo
        .update_company(acme.id, &CompanyUpdate { name: "Acme 2".to_string() })
        .unwrap();
    assert_eq!(renamed.name, "Acme 2");
    assert_eq!(renamed.owner, first.summary());

    let err = repo
        .update_company(acme.id, &CompanyUpdate { name: "Globex".to_string() })
        .unwrap_err();
    assert_eq!(err.user_message(), "This company name is already used.");

    let err = repo
        .update_company(999, &CompanyUpdate { name: "Void".to_string() })
        .unwrap_err();
    assert_eq!(err.user_message(), "Company not found");
}

#[test]
fn delete_frees_the_owner_for_a_new_company() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_user(&mut conn, "serial founder");
    let mut repo = SqliteCompanyRepository::try_new(&mut conn).unwrap();
    let created = repo
        .create_company(&CompanyInput::new("Take One", owner.id))
        .unwrap();

    assert_eq!(repo.delete_company(created.id).unwrap(), created);
    assert_eq!(
        repo.get_company(created.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    repo.create_company(&CompanyInput::new("Take Two", owner.id))
        .unwrap();
    assert_eq!(repo.list_companies().unwrap().len(), 1);
}

#[test]
fn list_matches_individual_gets() {
    let mut conn = open_db_in_memory().unwrap();
    let owners: Vec<User> = (0..3)
        .map(|idx| seed_user(&mut conn, &format!("owner {idx}")))
        .collect();
    let mut repo = SqliteCompanyRepository::try_new(&mut conn).unwrap();
    for owner in &owners {
        repo.create_company(&CompanyInput::new(format!("{} co", owner.name), owner.id))
            .unwrap();
    }

    let listed = repo.list_companies().unwrap();
    assert_eq!(listed.len(), owners.len());
    for company in &listed {
        assert_eq!(&repo.get_company(company.id).unwrap(), company);
    }
}
