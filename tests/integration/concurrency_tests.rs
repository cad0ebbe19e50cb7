use std::sync::Arc;
use std::thread;

use userdb::{User, UserPatch};

use super::fixture::TestFixture;

const THREADS: usize = 8;
const ROUNDS: usize = 25;

#[test]
fn test_concurrent_patches_on_different_ids_do_not_interfere() {
    let fixture = TestFixture::with_pool_size("test_concurrent_patches_different_ids", 4);
    let store = Arc::new(fixture.store.clone());

    let ids: Vec<String> = (0..THREADS)
        .map(|n| store.create(&User::new(format!("first{n}"), format!("last{n}"))).unwrap())
        .collect();

    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .enumerate()
        .map(|(n, id)| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let patch = UserPatch::new(&id).set("first_name", format!("t{n}-r{round}"));
                    assert_eq!(store.patch(&patch).unwrap(), 1);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for (n, id) in ids.iter().enumerate() {
        let user = store.get_by_id(id).unwrap();
        assert_eq!(user.first_name, format!("t{n}-r{}", ROUNDS - 1));
        assert_eq!(user.last_name, format!("last{n}"));
    }
}

#[test]
fn test_concurrent_writes_to_same_id_leave_a_consistent_row() {
    let fixture = TestFixture::with_pool_size("test_concurrent_writes_same_id", 4);
    let store = Arc::new(fixture.store.clone());
    let id = store.create(&User::new("start", "start")).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|n| {
            let store = Arc::clone(&store);
            let id = id.clone();
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let tag = format!("t{n}-r{round}");
                    if n % 2 == 0 {
                        store.update(&User::new(&tag, &tag).with_id(&id)).unwrap();
                    } else {
                        let patch = UserPatch::new(&id)
                            .set("first_name", tag.as_str())
                            .set("last_name", tag.as_str());
                        store.patch(&patch).unwrap();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Every writer sets both columns to the same tag, so a torn write would
    // show up as mismatched names.
    let user = store.get_by_id(&id).unwrap();
    assert_eq!(user.first_name, user.last_name);
    assert_eq!(fixture.row_count(), 1);
}

#[test]
fn test_concurrent_creates_all_land() {
    let fixture = TestFixture::with_pool_size("test_concurrent_creates_all_land", 2);
    let store = Arc::new(fixture.store.clone());

    let handles: Vec<_> = (0..THREADS)
        .map(|n| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..ROUNDS)
                    .map(|round| store.create(&User::new(format!("{n}"), format!("{round}"))).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        ids.extend(handle.join().unwrap());
    }

    assert_eq!(ids.len(), THREADS * ROUNDS);
    assert_eq!(store.get_list().unwrap().len(), THREADS * ROUNDS);
}
