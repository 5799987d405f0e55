use postbook_core::service::building_service;
use postbook_core::{
    AddressService, BuildingService, BuildingServiceError, BulkSource, MailboxParseError,
    MemoryRecordStore, RecordStore,
};

fn setup(store: &MemoryRecordStore, building: &str) -> String {
    let addresses = AddressService::new(store);
    let buildings = BuildingService::new(store);
    let key = addresses.create("4 Harbor View").unwrap();
    buildings.add_building(&key, building).unwrap();
    key
}

fn numbers(store: &MemoryRecordStore, key: &str, building: &str) -> Vec<Option<i64>> {
    store
        .load(key)
        .unwrap()
        .building(building)
        .unwrap()
        .mailboxes
        .iter()
        .map(|m| m.number)
        .collect()
}

#[test]
fn add_building_is_idempotent_and_skips_the_save_on_noop() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);

    service.add_building(&key, "North").unwrap();

    let record = store.load(&key).unwrap();
    assert_eq!(record.buildings.len(), 1);
    // only the first add persisted anything
    assert_eq!(store.snapshot_count(&key), 1);
}

#[test]
fn add_building_with_empty_name_is_a_silent_noop() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);

    service.add_building(&key, "").unwrap();

    assert_eq!(store.load(&key).unwrap().buildings.len(), 1);
    assert_eq!(store.snapshot_count(&key), 1);
}

#[test]
fn rename_building_replaces_name_and_full_mailbox_list() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);

    service
        .bulk_add(&key, "North", &BulkSource::Text("9: Old Tenant".to_string()))
        .unwrap();
    service
        .rename_building(&key, "North", "South", "2: Carol\n1: Alice, Bob\n: Dave")
        .unwrap();

    let record = store.load(&key).unwrap();
    assert!(record.building("North").is_none());
    let south = record.building("South").unwrap();
    let listed: Vec<Option<i64>> = south.mailboxes.iter().map(|m| m.number).collect();
    assert_eq!(listed, vec![Some(1), Some(2), None]);
    assert_eq!(south.mailboxes[0].residents, vec!["Alice", "Bob"]);
    assert_eq!(south.mailboxes[2].residents, vec!["Dave"]);
}

#[test]
fn rename_building_validation_failures_leave_the_record_untouched() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);
    service.add_building(&key, "South").unwrap();
    let before = store.load(&key).unwrap();

    assert!(matches!(
        service.rename_building(&key, "North", "", ""),
        Err(BuildingServiceError::EmptyBuildingName)
    ));
    assert!(matches!(
        service.rename_building(&key, "North", "South", ""),
        Err(BuildingServiceError::DuplicateBuildingName(name)) if name == "South"
    ));
    assert!(matches!(
        service.rename_building(&key, "North", "West", "abc: Alice"),
        Err(BuildingServiceError::Parse(MailboxParseError::InvalidNumber { line: 1, .. }))
    ));
    assert!(matches!(
        service.rename_building(&key, "Missing", "West", ""),
        Err(BuildingServiceError::BuildingNotFound(_))
    ));

    assert_eq!(store.load(&key).unwrap(), before);
}

#[test]
fn add_mailbox_keeps_the_list_sorted() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);

    service.add_mailbox(&key, "North", "5", "Alice\nBob").unwrap();
    service.add_mailbox(&key, "North", "", "Carol").unwrap();
    service.add_mailbox(&key, "North", "3", "Dave").unwrap();

    assert_eq!(
        numbers(&store, &key, "North"),
        vec![Some(3), Some(5), None]
    );

    let record = store.load(&key).unwrap();
    let north = record.building("North").unwrap();
    assert_eq!(north.mailboxes[1].residents, vec!["Alice", "Bob"]);
}

#[test]
fn add_mailbox_rejects_bad_numbers_and_collisions() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);
    service.add_mailbox(&key, "North", "5", "Alice").unwrap();

    assert!(matches!(
        service.add_mailbox(&key, "North", "5", "Bob"),
        Err(BuildingServiceError::DuplicateMailboxNumber(5))
    ));
    assert!(matches!(
        service.add_mailbox(&key, "North", "x", "Bob"),
        Err(BuildingServiceError::InvalidMailboxNumber(value)) if value == "x"
    ));
    assert_eq!(numbers(&store, &key, "North"), vec![Some(5)]);
}

#[test]
fn several_unnumbered_mailboxes_may_coexist() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);

    service.add_mailbox(&key, "North", "", "Alice").unwrap();
    service.add_mailbox(&key, "North", " ", "Bob").unwrap();

    assert_eq!(numbers(&store, &key, "North"), vec![None, None]);
}

#[test]
fn edit_mailbox_replaces_fields_and_resorts() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);
    service.add_mailbox(&key, "North", "1", "Alice").unwrap();
    service.add_mailbox(&key, "North", "2", "Bob").unwrap();

    // mailbox at index 0 holds number 1; bumping it past 2 re-sorts
    service.edit_mailbox(&key, "North", 0, "9", "Ann").unwrap();

    assert_eq!(numbers(&store, &key, "North"), vec![Some(2), Some(9)]);
    let record = store.load(&key).unwrap();
    assert_eq!(
        record.building("North").unwrap().mailboxes[1].residents,
        vec!["Ann"]
    );
}

#[test]
fn edit_mailbox_collision_check_excludes_the_edited_entry() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);
    service.add_mailbox(&key, "North", "1", "Alice").unwrap();
    service.add_mailbox(&key, "North", "2", "Bob").unwrap();

    // keeping its own number is fine
    service.edit_mailbox(&key, "North", 0, "1", "Alice Jr").unwrap();

    assert!(matches!(
        service.edit_mailbox(&key, "North", 0, "2", "Alice"),
        Err(BuildingServiceError::DuplicateMailboxNumber(2))
    ));
}

#[test]
fn mailbox_index_out_of_range_is_rejected() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);
    service.add_mailbox(&key, "North", "1", "Alice").unwrap();

    assert!(matches!(
        service.edit_mailbox(&key, "North", 5, "2", "Bob"),
        Err(BuildingServiceError::MailboxIndexOutOfRange { index: 5, .. })
    ));
    assert!(matches!(
        service.delete_mailbox(&key, "North", 1),
        Err(BuildingServiceError::MailboxIndexOutOfRange { index: 1, .. })
    ));
}

#[test]
fn delete_mailbox_removes_the_entry_at_that_position() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);
    service.add_mailbox(&key, "North", "1", "Alice").unwrap();
    service.add_mailbox(&key, "North", "2", "Bob").unwrap();

    service.delete_mailbox(&key, "North", 0).unwrap();

    assert_eq!(numbers(&store, &key, "North"), vec![Some(2)]);
}

#[test]
fn delete_building_is_a_noop_when_absent() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);

    service.delete_building(&key, "Ghost").unwrap();
    assert_eq!(store.load(&key).unwrap().buildings.len(), 1);
    assert_eq!(store.snapshot_count(&key), 1);

    service.delete_building(&key, "North").unwrap();
    assert!(store.load(&key).unwrap().buildings.is_empty());
}

#[test]
fn bulk_add_text_appends_and_drops_lines_without_a_colon() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);
    service.add_mailbox(&key, "North", "2", "Old").unwrap();

    let text = "1: Alice\nthis line has no separator\n3: Bob, Carol\n: Dana";
    service
        .bulk_add(&key, "North", &BulkSource::Text(text.to_string()))
        .unwrap();

    assert_eq!(
        numbers(&store, &key, "North"),
        vec![Some(1), Some(2), Some(3), None]
    );
}

#[test]
fn bulk_add_is_all_or_nothing_on_collision_with_existing() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);
    service.add_mailbox(&key, "North", "2", "Old").unwrap();
    let snapshots_before = store.snapshot_count(&key);

    let err = service
        .bulk_add(
            &key,
            "North",
            &BulkSource::Text("4: New\n2: Clash".to_string()),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        BuildingServiceError::Parse(MailboxParseError::DuplicateNumber { line: 2, number: 2 })
    ));

    assert_eq!(numbers(&store, &key, "North"), vec![Some(2)]);
    assert_eq!(store.snapshot_count(&key), snapshots_before);
}

#[test]
fn bulk_add_rows_validates_against_existing_and_batch() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);

    let rows = BulkSource::Rows(vec![
        ("10".to_string(), "Ann, Ben".to_string()),
        (String::new(), "Cee".to_string()),
    ]);
    service.bulk_add(&key, "North", &rows).unwrap();
    assert_eq!(numbers(&store, &key, "North"), vec![Some(10), None]);

    let clashing = BulkSource::Rows(vec![
        ("11".to_string(), "Dee".to_string()),
        ("11".to_string(), "Eve".to_string()),
    ]);
    assert!(matches!(
        service.bulk_add(&key, "North", &clashing),
        Err(BuildingServiceError::Parse(MailboxParseError::DuplicateNumber {
            line: 2,
            number: 11
        }))
    ));
}

#[test]
fn empty_bulk_source_persists_nothing() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);
    let snapshots_before = store.snapshot_count(&key);

    service
        .bulk_add(&key, "North", &BulkSource::Text("no separator here".to_string()))
        .unwrap();

    assert_eq!(store.snapshot_count(&key), snapshots_before);
}

#[test]
fn missing_building_or_address_reports_not_found() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let service = BuildingService::new(&store);

    assert!(matches!(
        service.add_mailbox(&key, "Ghost", "1", "Alice"),
        Err(BuildingServiceError::BuildingNotFound(name)) if name == "Ghost"
    ));
    assert!(matches!(
        service.add_mailbox("nowhere", "North", "1", "Alice"),
        Err(BuildingServiceError::AddressNotFound(_))
    ));
}

#[test]
fn pure_transforms_return_fresh_records() {
    let store = MemoryRecordStore::new();
    let key = setup(&store, "North");
    let record = store.load(&key).unwrap();

    let updated = building_service::add_mailbox(&record, "North", "7", "Zoe").unwrap();
    assert!(record.building("North").unwrap().mailboxes.is_empty());
    assert_eq!(updated.building("North").unwrap().mailboxes.len(), 1);

    assert!(building_service::add_building(&updated, "North").is_none());
    assert!(building_service::delete_building(&updated, "Ghost").is_none());
}
