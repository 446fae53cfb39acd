use tempfile::TempDir;

use shelfstore::{
    collections::Collections,
    config::StoreConfig,
    core::collection::StoreError,
    record::{Price, ProductFields},
    types::UploadedFile,
};

fn fields(name: &str) -> ProductFields {
    ProductFields {
        name: name.to_string(),
        price: Price::from("15.00"),
        scripture: "Phil 4:13".to_string(),
        category: "apparel".to_string(),
    }
}

fn open(tmp: &TempDir) -> Collections {
    Collections::open(&StoreConfig::in_dir(tmp.path())).expect("open")
}

#[test]
fn open_creates_documents_and_image_dir() {
    let tmp = TempDir::new().expect("tmp");
    let store = open(&tmp);
    assert!(tmp.path().join("messages.json").is_file());
    assert!(tmp.path().join("products.json").is_file());
    assert!(tmp.path().join("images").is_dir());
    assert!(store.products.list().expect("list").is_empty());
    assert!(store.messages.list().expect("list").is_empty());
}

#[test]
fn open_keeps_existing_documents() {
    let tmp = TempDir::new().expect("tmp");
    open(&tmp).products.create(fields("Shirt"), &[]).expect("create");
    let reopened = open(&tmp);
    assert_eq!(reopened.products.list().expect("list").len(), 1);
}

#[test]
fn create_attaches_uploads_in_order() {
    let tmp = TempDir::new().expect("tmp");
    let store = open(&tmp);
    let files = [
        UploadedFile::new("front.jpg", b"front".to_vec()),
        UploadedFile::new("back.jpg", b"back".to_vec()),
    ];

    let (index, product) = store.products.create(fields("Shirt"), &files).expect("create");
    assert_eq!(index, 0);
    assert_eq!(product.images.len(), 2);
    assert!(product.images[0].ends_with("-front.jpg"));
    assert!(product.images[1].ends_with("-back.jpg"));

    let assets = store.products.assets();
    let front = assets.resolve(&product.images[0]).expect("resolve front");
    let back = assets.resolve(&product.images[1]).expect("resolve back");
    assert_eq!(std::fs::read(front).expect("read"), b"front");
    assert_eq!(std::fs::read(back).expect("read"), b"back");

    assert_eq!(store.products.list().expect("list"), vec![product]);
}

#[test]
fn create_without_uploads_has_empty_images() {
    let tmp = TempDir::new().expect("tmp");
    let store = open(&tmp);
    let (_, product) = store.products.create(fields("Mug"), &[]).expect("create");
    assert!(product.images.is_empty());
    let raw = std::fs::read_to_string(tmp.path().join("products.json")).expect("read");
    assert!(raw.contains("\"images\": []"));
}

#[test]
fn update_without_uploads_keeps_images() {
    let tmp = TempDir::new().expect("tmp");
    let store = open(&tmp);
    let (_, created) = store
        .products
        .create(fields("Shirt"), &[UploadedFile::new("a.png", b"a".to_vec())])
        .expect("create");

    let updated = store
        .products
        .update(0, fields("Shirt v2"), &[])
        .expect("update");
    assert_eq!(updated.name, "Shirt v2");
    assert_eq!(updated.images, created.images);
    assert_eq!(store.products.list().expect("list")[0], updated);
}

#[test]
fn update_with_uploads_replaces_whole_image_set() {
    let tmp = TempDir::new().expect("tmp");
    let store = open(&tmp);
    let (_, created) = store
        .products
        .create(
            fields("Shirt"),
            &[
                UploadedFile::new("a.png", b"a".to_vec()),
                UploadedFile::new("b.png", b"b".to_vec()),
            ],
        )
        .expect("create");

    let updated = store
        .products
        .update(0, fields("Shirt"), &[UploadedFile::new("c.png", b"c".to_vec())])
        .expect("update");
    assert_eq!(updated.images.len(), 1);
    assert!(updated.images[0].ends_with("-c.png"));

    // Replaced images stay on disk.
    for old in &created.images {
        assert!(store.products.assets().resolve(old).expect("resolve").is_file());
    }
}

#[test]
fn update_with_bad_index_writes_no_assets() {
    let tmp = TempDir::new().expect("tmp");
    let store = open(&tmp);
    let res = store
        .products
        .update(0, fields("Ghost"), &[UploadedFile::new("ghost.png", b"g".to_vec())]);
    assert!(matches!(res, Err(StoreError::IndexOutOfRange { index: 0, len: 0 })));
    let saved = std::fs::read_dir(tmp.path().join("images")).expect("dir").count();
    assert_eq!(saved, 0);
}

#[test]
fn delete_removes_record_but_not_assets() {
    let tmp = TempDir::new().expect("tmp");
    let store = open(&tmp);
    store.products.create(fields("First"), &[]).expect("create");
    let (_, second) = store
        .products
        .create(fields("Second"), &[UploadedFile::new("s.png", b"s".to_vec())])
        .expect("create");
    store.products.create(fields("Third"), &[]).expect("create");

    let removed = store.products.delete(1).expect("delete");
    assert_eq!(removed, second);

    let left: Vec<String> = store
        .products
        .list()
        .expect("list")
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(left, ["First", "Third"]);
    assert!(store.products.assets().resolve(&second.images[0]).expect("resolve").is_file());
}

#[test]
fn numeric_prices_survive_unrelated_writes() {
    let tmp = TempDir::new().expect("tmp");
    std::fs::write(
        tmp.path().join("products.json"),
        r#"[{"name":"Legacy","price":20,"scripture":"Gen 1:1","category":"books","images":[]}]"#,
    )
    .expect("seed");
    let store = open(&tmp);

    store.products.create(fields("New"), &[]).expect("create");
    let listed = store.products.list().expect("list");
    assert_eq!(listed[0].price, Price::Number(serde_json::Number::from(20u64)));
    assert_eq!(listed[1].price, Price::from("15.00"));
}
