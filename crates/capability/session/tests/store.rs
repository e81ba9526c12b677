use domain::{Role, User};
use idf_session::{
    ACCESS_TOKEN_KEY, FileTokenStore, InMemoryTokenStore, REFRESH_TOKEN_KEY, Session, TokenStore,
    USER_KEY,
};
use std::collections::HashMap;
use std::fs;

fn session() -> Session {
    let user = User::new("user-1", Some("a@b.com".to_string()), "Alice", Role::Admin);
    Session::authenticated(user, "access-1".to_string(), "refresh-1".to_string())
}

#[test]
fn file_store_persists_three_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session.json");
    let store = FileTokenStore::new(&path);

    assert_eq!(store.load(), Session::anonymous());
    store.save(&session()).expect("save");

    let raw: HashMap<String, String> =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(raw.len(), 3);
    assert_eq!(raw[ACCESS_TOKEN_KEY], "access-1");
    assert_eq!(raw[REFRESH_TOKEN_KEY], "refresh-1");
    let user: User = serde_json::from_str(&raw[USER_KEY]).expect("user json");
    assert_eq!(user.role, Role::Admin);

    let reopened = FileTokenStore::new(&path);
    assert_eq!(reopened.load(), session());
}

#[test]
fn file_store_clear_removes_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    let store = FileTokenStore::new(&path);
    store.save(&session()).expect("save");
    store.clear().expect("clear");
    assert!(!path.exists());
    store.clear().expect("clear twice");

    store.save(&session()).expect("save");
    store.save(&Session::anonymous()).expect("save anonymous");
    assert!(!path.exists());
}

#[test]
fn corrupt_file_loads_as_anonymous() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    fs::write(&path, "{not json").expect("write");
    assert_eq!(FileTokenStore::new(&path).load(), Session::anonymous());

    let bad_user = serde_json::json!({
        USER_KEY: "{broken",
        ACCESS_TOKEN_KEY: "a",
        REFRESH_TOKEN_KEY: "r",
    });
    fs::write(&path, bad_user.to_string()).expect("write");
    assert_eq!(FileTokenStore::new(&path).load(), Session::anonymous());
}

#[test]
fn any_missing_entry_means_anonymous() {
    let user_json = serde_json::to_string(&session().user).expect("user");
    for missing in [USER_KEY, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
        let mut entries = HashMap::from([
            (USER_KEY.to_string(), user_json.clone()),
            (ACCESS_TOKEN_KEY.to_string(), "a".to_string()),
            (REFRESH_TOKEN_KEY.to_string(), "r".to_string()),
        ]);
        entries.remove(missing);
        let store = InMemoryTokenStore::with_entries(entries);
        assert_eq!(store.load(), Session::anonymous(), "missing {missing}");
    }
}

#[test]
fn user_name_alias_is_accepted() {
    let entries = HashMap::from([
        (
            USER_KEY.to_string(),
            r#"{"id":"u1","email":null,"name":"Legacy","role":"user"}"#.to_string(),
        ),
        (ACCESS_TOKEN_KEY.to_string(), "a".to_string()),
        (REFRESH_TOKEN_KEY.to_string(), "r".to_string()),
    ]);
    let loaded = InMemoryTokenStore::with_entries(entries).load();
    assert_eq!(loaded.user.expect("user").display_name, "Legacy");
}
