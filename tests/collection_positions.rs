use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;
use tempfile::TempDir;

use shelfstore::{
    core::collection::{JsonCollection, StoreError},
    persist::{
        file::FileDocument,
        DocumentSink, PersistResult,
    },
    record::{MessageRecord, Price, ProductRecord},
};

fn product(name: &str) -> ProductRecord {
    ProductRecord {
        name: name.to_string(),
        price: Price::from("10"),
        scripture: "Jn 3:16".to_string(),
        category: "prints".to_string(),
        images: vec![format!("images/1-{name}.png")],
        ..Default::default()
    }
}

fn seeded(tmp: &TempDir, names: &[&str]) -> JsonCollection<ProductRecord> {
    let coll = JsonCollection::new(FileDocument::new(tmp.path().join("products.json")));
    coll.initialize().expect("init");
    for name in names {
        coll.append(product(name)).expect("append");
    }
    coll
}

fn names(coll: &JsonCollection<ProductRecord>) -> Vec<String> {
    coll.list()
        .expect("list")
        .into_iter()
        .map(|p| p.name)
        .collect()
}

#[test]
fn fresh_collection_lists_empty() {
    let tmp = TempDir::new().expect("tmp");
    let coll = seeded(&tmp, &[]);
    assert!(coll.list().expect("list").is_empty());
    let raw = std::fs::read_to_string(tmp.path().join("products.json")).expect("read");
    assert_eq!(raw, "[]");
}

#[test]
fn append_preserves_insertion_order() {
    let tmp = TempDir::new().expect("tmp");
    let coll = seeded(&tmp, &["a", "b"]);
    let (index, rec) = coll.append(product("c")).expect("append");
    assert_eq!(index, 2);
    assert_eq!(rec, product("c"));
    assert_eq!(names(&coll), ["a", "b", "c"]);
}

#[test]
fn replace_at_changes_only_the_target() {
    let tmp = TempDir::new().expect("tmp");
    let coll = seeded(&tmp, &["a", "b", "c"]);
    let before = coll.list().expect("list");

    let replacement = ProductRecord {
        price: Price::from("99"),
        images: vec![],
        ..product("z")
    };
    coll.replace_at(1, replacement.clone()).expect("replace");

    let after = coll.list().expect("list");
    assert_eq!(after.len(), before.len());
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], replacement);
    assert_eq!(after[2], before[2]);
}

#[test]
fn delete_at_shifts_later_records_down() {
    let tmp = TempDir::new().expect("tmp");
    let coll = seeded(&tmp, &["a", "b", "c", "d"]);
    let removed = coll.delete_at(1).expect("delete");
    assert_eq!(removed.name, "b");
    assert_eq!(names(&coll), ["a", "c", "d"]);

    coll.delete_at(2).expect("delete last");
    assert_eq!(names(&coll), ["a", "c"]);
}

#[test]
fn patch_field_touches_only_that_field() {
    let tmp = TempDir::new().expect("tmp");
    let coll: JsonCollection<MessageRecord> =
        JsonCollection::new(FileDocument::new(tmp.path().join("messages.json")));
    coll.initialize().expect("init");
    let original = MessageRecord {
        name: "A".to_string(),
        email: "a@x.com".to_string(),
        message: "hi".to_string(),
        timestamp: "2024-05-01T10:00:00.000Z".to_string(),
        read: false,
        ..Default::default()
    };
    coll.append(original.clone()).expect("append");

    let patched = coll.patch_field_at(0, "read", json!(true)).expect("patch");
    assert_eq!(patched, MessageRecord { read: true, ..original });
    assert_eq!(coll.list().expect("list")[0], patched);
}

#[test]
fn out_of_range_leaves_file_byte_identical() {
    let tmp = TempDir::new().expect("tmp");
    let coll = seeded(&tmp, &["a", "b"]);
    let path = tmp.path().join("products.json");
    let before = std::fs::read(&path).expect("read");

    assert!(matches!(
        coll.replace_at(2, product("x")),
        Err(StoreError::IndexOutOfRange { index: 2, len: 2 })
    ));
    assert!(matches!(
        coll.delete_at(7),
        Err(StoreError::IndexOutOfRange { index: 7, len: 2 })
    ));
    assert!(matches!(
        coll.patch_field_at(2, "name", json!("x")),
        Err(StoreError::IndexOutOfRange { .. })
    ));

    assert_eq!(std::fs::read(&path).expect("read"), before);
}

#[test]
fn stale_index_is_revalidated_against_current_length() {
    let tmp = TempDir::new().expect("tmp");
    let coll = seeded(&tmp, &["a", "b", "c"]);
    let listed = coll.list().expect("list");
    assert_eq!(listed.len(), 3);

    coll.delete_at(0).expect("delete");
    assert!(matches!(
        coll.delete_at(2),
        Err(StoreError::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn corrupt_document_fails_without_rewrite() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("products.json");
    std::fs::write(&path, b"{\"not\": \"an array\"}").expect("write");
    let coll: JsonCollection<ProductRecord> = JsonCollection::new(FileDocument::new(&path));

    assert!(!coll.initialize().expect("init"));
    assert!(matches!(coll.list(), Err(StoreError::CorruptDocument { .. })));
    assert!(matches!(
        coll.append(product("a")),
        Err(StoreError::CorruptDocument { .. })
    ));
    assert_eq!(
        std::fs::read(&path).expect("read"),
        b"{\"not\": \"an array\"}"
    );

    std::fs::write(&path, b"[1, 2").expect("write");
    assert!(matches!(coll.list(), Err(StoreError::CorruptDocument { .. })));
}

#[test]
fn documents_are_pretty_printed_arrays() {
    let tmp = TempDir::new().expect("tmp");
    seeded(&tmp, &["a"]);
    let raw = std::fs::read_to_string(tmp.path().join("products.json")).expect("read");
    assert!(raw.starts_with("[\n  {\n    \"name\": \"a\""));
}

struct ReadOnlySink {
    inner: FileDocument,
    fail_writes: AtomicBool,
}

impl DocumentSink for ReadOnlySink {
    fn read_document(&self) -> PersistResult<Vec<u8>> {
        self.inner.read_document()
    }

    fn write_document(&self, bytes: &[u8]) -> PersistResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into());
        }
        self.inner.write_document(bytes)
    }

    fn ensure_document(&self, empty: &[u8]) -> PersistResult<bool> {
        self.inner.ensure_document(empty)
    }
}

#[test]
fn write_failure_surfaces_as_persistence() {
    let tmp = TempDir::new().expect("tmp");
    let sink = ReadOnlySink {
        inner: FileDocument::new(tmp.path().join("products.json")),
        fail_writes: AtomicBool::new(false),
    };
    let coll: JsonCollection<ProductRecord, _> = JsonCollection::new(sink);
    coll.initialize().expect("init");
    coll.append(product("a")).expect("append");

    coll.sink().fail_writes.store(true, Ordering::SeqCst);
    assert!(matches!(
        coll.append(product("b")),
        Err(StoreError::Persistence(_))
    ));
    assert!(matches!(coll.delete_at(0), Err(StoreError::Persistence(_))));
    assert_eq!(coll.list().expect("list").len(), 1);
}

#[test]
fn partially_filled_records_load_and_survive_rewrites() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("messages.json");
    std::fs::write(
        &path,
        r#"[
  {"name":"A","message":"hi","timestamp":"2024-05-01T10:00:00.000Z","read":false},
  {"name":"B","email":"b@x.com","message":"yo","timestamp":"2024-05-02T10:00:00.000Z","read":null}
]"#,
    )
    .expect("seed");
    let coll: JsonCollection<MessageRecord> = JsonCollection::new(FileDocument::new(&path));

    let listed = coll.list().expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].email, "");
    assert!(!listed[1].read);

    coll.patch_field_at(1, "read", json!(true)).expect("patch");
    let listed = coll.list().expect("list");
    assert!(listed[1].read);
    assert_eq!(listed[0].name, "A");
}

#[test]
fn unmodelled_keys_of_neighbours_are_kept() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("messages.json");
    std::fs::write(
        &path,
        r#"[
  {"name":"A","email":"a@x.com","message":"hi","timestamp":"2024-05-01T10:00:00.000Z","read":false,"phone":"555"},
  {"name":"B","email":"b@x.com","message":"yo","timestamp":"2024-05-02T10:00:00.000Z","read":false}
]"#,
    )
    .expect("seed");
    let coll: JsonCollection<MessageRecord> = JsonCollection::new(FileDocument::new(&path));
    let raw_before: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).expect("read")).expect("decode");

    coll.patch_field_at(1, "read", json!(true)).expect("patch");

    let raw_after: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).expect("read")).expect("decode");
    assert_eq!(raw_after[0], raw_before[0]);
    assert_eq!(raw_after[0]["phone"], "555");
    assert_eq!(raw_after[1]["read"], true);
}

#[test]
fn patch_rejects_values_the_field_would_coerce() {
    let tmp = TempDir::new().expect("tmp");
    let coll = seeded(&tmp, &["a"]);
    let path = tmp.path().join("products.json");
    let before = std::fs::read(&path).expect("read");

    assert!(matches!(
        coll.patch_field_at(0, "name", json!(5)),
        Err(StoreError::InvalidFieldValue { .. })
    ));
    assert!(matches!(
        coll.patch_field_at(0, "images", json!(null)),
        Err(StoreError::InvalidFieldValue { .. })
    ));
    assert_eq!(std::fs::read(&path).expect("read"), before);
}
