use serde_json::json;
use storefront_core::db::open_db_in_memory;
use storefront_core::{
    CompanyInput, CompanyRepository, Envelope, SqliteCompanyRepository, SqliteUserRepository,
    UserInput, UserRepository,
};

#[test]
fn user_projection_nests_company_and_products() {
    let mut conn = open_db_in_memory().unwrap();
    let user = SqliteUserRepository::try_new(&mut conn)
        .unwrap()
        .create_user(&UserInput::new("Ada", 36))
        .unwrap();
    SqliteCompanyRepository::try_new(&mut conn)
        .unwrap()
        .create_company(&CompanyInput::new("Engines", user.id))
        .unwrap();

    let repo = SqliteUserRepository::try_new(&mut conn).unwrap();
    let envelope = Envelope::from(repo.get_user(user.id));
    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(
        value,
        json!({
            "status": true,
            "data": {
                "id": user.id,
                "name": "Ada",
                "age": 36,
                "company": {"id": 1, "name": "Engines"},
                "products": []
            }
        })
    );
}

#[test]
fn list_and_failure_envelopes_have_fixed_shape() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCompanyRepository::try_new(&mut conn).unwrap();

    let listed = serde_json::to_value(Envelope::from(repo.list_companies())).unwrap();
    assert_eq!(listed, json!({"status": true, "data": []}));

    let failed = Envelope::from(repo.create_company(&CompanyInput::new("Orphan", 9)));
    assert_eq!(failed.http_status(), 400);
    let value = serde_json::to_value(&failed).unwrap();
    assert_eq!(value, json!({"status": false, "message": "User not found"}));
}
