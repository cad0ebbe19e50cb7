use userdb::{User, UserDbError, UserPatch};

use super::fixture::TestFixture;

#[test]
fn test_create_get_roundtrip_on_disk() {
    let fixture = TestFixture::new("test_create_get_roundtrip_on_disk");
    let store = &fixture.store;

    let id = store.create(&User::new("Ada", "Lovelace")).unwrap();
    let user = store.get_by_id(&id).unwrap();

    assert!(!user.id.is_empty());
    assert_eq!(user.id, id);
    assert_eq!(user.first_name, "Ada");
    assert_eq!(user.last_name, "Lovelace");
    assert_eq!(fixture.row_count(), 1);
}

#[test]
fn test_ids_are_unique() {
    let fixture = TestFixture::new("test_ids_are_unique");
    let mut ids = std::collections::HashSet::new();
    for n in 0..50 {
        let id = fixture
            .store
            .create(&User::new(format!("first{n}"), "last"))
            .unwrap();
        assert!(ids.insert(id));
    }
    assert_eq!(fixture.row_count(), 50);
}

#[test]
fn test_data_survives_reopen() {
    let fixture = TestFixture::new("test_data_survives_reopen");
    let id = fixture.store.create(&User::new("Ada", "Lovelace")).unwrap();

    let reopened = userdb::ConnectionPool::open(&userdb::config::DatabaseConfig::at(
        &fixture.db_path,
    ))
    .unwrap();
    let store = userdb::UserStore::new(std::sync::Arc::new(reopened));
    assert_eq!(store.get_by_id(&id).unwrap().first_name, "Ada");
}

#[test]
fn test_deleted_user_is_not_found() {
    let fixture = TestFixture::new("test_deleted_user_is_not_found");
    let store = &fixture.store;

    let id = store.create(&User::new("Ada", "Lovelace")).unwrap();
    store.delete(&id).unwrap();

    assert!(matches!(store.get_by_id(&id), Err(UserDbError::NotFound(_))));
    assert!(store.get_list().unwrap().is_empty());
}

#[test]
fn test_update_leaves_other_rows_alone() {
    let fixture = TestFixture::new("test_update_leaves_other_rows_alone");
    let store = &fixture.store;

    let a = store.create(&User::new("Ada", "Lovelace")).unwrap();
    let b = store.create(&User::new("Grace", "Hopper")).unwrap();

    assert_eq!(store.update(&User::new("Alan", "Turing").with_id(&a)).unwrap(), 1);

    assert_eq!(store.get_by_id(&a).unwrap(), User::new("Alan", "Turing").with_id(&a));
    assert_eq!(store.get_by_id(&b).unwrap(), User::new("Grace", "Hopper").with_id(&b));
}

#[test]
fn test_injection_attempt_is_stored_verbatim() {
    let fixture = TestFixture::new("test_injection_attempt_is_stored_verbatim");
    let store = &fixture.store;

    let victim = store.create(&User::new("Ada", "Lovelace")).unwrap();
    let other = store.create(&User::new("Grace", "Hopper")).unwrap();

    let payloads = [
        "a'); DROP TABLE users;--",
        "x' WHERE 1=1; --",
        "\"; UPDATE users SET last_name = 'pwned'; --",
        "Robert'); DELETE FROM users; --",
    ];
    for payload in payloads {
        let affected = store
            .patch(&UserPatch::new(&victim).set("last_name", payload))
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(store.get_by_id(&victim).unwrap().last_name, payload);
    }

    assert!(fixture.table_exists("users"));
    assert_eq!(fixture.row_count(), 2);
    assert_eq!(store.get_by_id(&other).unwrap().last_name, "Hopper");
}

#[test]
fn test_hostile_id_matches_nothing() {
    let fixture = TestFixture::new("test_hostile_id_matches_nothing");
    let store = &fixture.store;
    store.create(&User::new("Ada", "Lovelace")).unwrap();

    let affected = store
        .patch(&UserPatch::new("' OR '1'='1").set("first_name", "pwned"))
        .unwrap();
    assert_eq!(affected, 0);

    let affected = store
        .update(&User::new("pwned", "pwned").with_id("x' OR 1=1 --"))
        .unwrap();
    assert_eq!(affected, 0);

    store.delete("' OR '1'='1").unwrap();
    assert_eq!(fixture.row_count(), 1);
    assert_eq!(store.get_list().unwrap()[0].first_name, "Ada");
}

#[test]
fn test_unknown_patch_key_issues_no_write() {
    let fixture = TestFixture::new("test_unknown_patch_key_issues_no_write");
    let store = &fixture.store;
    let id = store.create(&User::new("Ada", "Lovelace")).unwrap();

    let err = store
        .patch(&UserPatch::new(&id).set("not_a_column", 1_i64))
        .unwrap_err();
    assert!(matches!(err, UserDbError::InvalidArgument(_)));
    assert_eq!(store.get_by_id(&id).unwrap(), User::new("Ada", "Lovelace").with_id(&id));
}
