use std::sync::Arc;

use proptest::prelude::*;

use userdb::storage::PatchStatement;
use userdb::{ConnectionPool, User, UserDbError, UserField, UserPatch, UserStore};

fn store() -> UserStore {
    UserStore::new(Arc::new(ConnectionPool::open_in_memory().unwrap()))
}

fn arb_field() -> impl Strategy<Value = UserField> {
    prop_oneof![Just(UserField::FirstName), Just(UserField::LastName)]
}

fn arb_unknown_key() -> impl Strategy<Value = String> {
    ".{0,24}".prop_filter("must not be a writable column", |key| {
        key.parse::<UserField>().is_err()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_text_values_round_trip_literally(field in arb_field(), value in ".{0,64}") {
        let store = store();
        let id = store.create(&User::new("Ada", "Lovelace")).unwrap();

        let affected = store
            .patch(&UserPatch::new(&id).set(field.column(), value.as_str()))
            .unwrap();
        prop_assert_eq!(affected, 1);

        let user = store.get_by_id(&id).unwrap();
        let (changed, untouched) = match field {
            UserField::FirstName => (&user.first_name, (&user.last_name, "Lovelace")),
            UserField::LastName => (&user.last_name, (&user.first_name, "Ada")),
        };
        prop_assert_eq!(changed, &value);
        prop_assert_eq!(untouched.0, untouched.1);
        prop_assert_eq!(store.get_list().unwrap().len(), 1);
    }

    #[test]
    fn prop_unknown_keys_are_rejected(key in arb_unknown_key(), value in ".{0,16}") {
        let store = store();
        let id = store.create(&User::new("Ada", "Lovelace")).unwrap();

        let patch = UserPatch::new(&id).set(key, value.as_str());
        let err = store.patch(&patch).unwrap_err();
        prop_assert!(matches!(err, UserDbError::InvalidArgument(_)));
        prop_assert_eq!(store.get_by_id(&id).unwrap(), User::new("Ada", "Lovelace").with_id(&id));
    }

    #[test]
    fn prop_statement_text_never_contains_values(value in ".{1,64}") {
        let patch = UserPatch::new("some-id").set("first_name", value.as_str());
        let stmt = PatchStatement::build(&patch).unwrap();
        prop_assert_eq!(stmt.sql(), "UPDATE users SET first_name = ?1 WHERE id = ?2");
    }
}
