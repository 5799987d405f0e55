use postbook_core::{
    AddressService, AddressServiceError, BuildingService, MemoryRecordStore, RecordStore,
};

#[test]
fn create_returns_slug_key_and_persists_empty_record() {
    let store = MemoryRecordStore::new();
    let service = AddressService::new(&store);

    let key = service.create("1 Rue de la Paix, 75002 Paris").unwrap();
    assert_eq!(key, "1_rue_de_la_paix_75002_paris");

    let record = service.get(&key).unwrap();
    assert_eq!(record.full_address, "1 Rue de la Paix, 75002 Paris");
    assert!(record.buildings.is_empty());
    assert!(store.list_snapshots(&key).unwrap().is_empty());
}

#[test]
fn create_twice_is_a_noop_and_keeps_content_and_history() {
    let store = MemoryRecordStore::new();
    let addresses = AddressService::new(&store);
    let buildings = BuildingService::new(&store);

    let key = addresses.create("12 Main Street").unwrap();
    buildings.add_building(&key, "East Wing").unwrap();
    assert_eq!(store.snapshot_count(&key), 1);

    let again = addresses.create("12 Main Street").unwrap();
    assert_eq!(again, key);

    let record = addresses.get(&key).unwrap();
    assert_eq!(record.buildings.len(), 1);
    assert_eq!(store.snapshot_count(&key), 1);
}

#[test]
fn create_rejects_blank_and_unusable_input() {
    let store = MemoryRecordStore::new();
    let service = AddressService::new(&store);

    assert!(matches!(
        service.create("   "),
        Err(AddressServiceError::EmptyAddress)
    ));
    assert!(matches!(
        service.create("!!!"),
        Err(AddressServiceError::UnusableAddress(_))
    ));
    assert!(store.list_keys().unwrap().is_empty());
}

#[test]
fn rename_with_same_slug_updates_display_text_in_place() {
    let store = MemoryRecordStore::new();
    let service = AddressService::new(&store);

    let key = service.create("10 Oak Lane").unwrap();
    let new_key = service.rename(&key, "10  Oak   Lane").unwrap();

    assert_eq!(new_key, key);
    assert_eq!(service.get(&key).unwrap().full_address, "10  Oak   Lane");
    assert_eq!(store.snapshot_count(&key), 1);
}

#[test]
fn rename_with_unchanged_text_is_a_noop() {
    let store = MemoryRecordStore::new();
    let service = AddressService::new(&store);

    let key = service.create("10 Oak Lane").unwrap();
    let new_key = service.rename(&key, "10 Oak Lane").unwrap();

    assert_eq!(new_key, key);
    assert_eq!(store.snapshot_count(&key), 0);
}

#[test]
fn rename_to_new_slug_moves_record_and_history() {
    let store = MemoryRecordStore::new();
    let addresses = AddressService::new(&store);
    let buildings = BuildingService::new(&store);

    let key = addresses.create("5 Elm Street").unwrap();
    buildings.add_building(&key, "Annex").unwrap();

    let new_key = addresses.rename(&key, "6 Elm Street").unwrap();
    assert_eq!(new_key, "6_elm_street");
    assert!(!store.exists(&key));

    let record = addresses.get(&new_key).unwrap();
    assert_eq!(record.full_address, "6 Elm Street");
    assert_eq!(record.buildings.len(), 1);

    // one snapshot from the building add, one from the rename save
    assert_eq!(store.list_snapshots(&new_key).unwrap().len(), 2);
    assert!(store.list_snapshots(&key).unwrap().is_empty());
}

#[test]
fn rename_onto_occupied_slug_fails_and_touches_nothing() {
    let store = MemoryRecordStore::new();
    let service = AddressService::new(&store);

    let first = service.create("7 Birch Road").unwrap();
    let second = service.create("8 Birch Road").unwrap();

    let err = service.rename(&first, "8 Birch Road").unwrap_err();
    assert!(matches!(err, AddressServiceError::SlugOccupied(slug) if slug == second));

    assert_eq!(service.get(&first).unwrap().full_address, "7 Birch Road");
    assert_eq!(service.get(&second).unwrap().full_address, "8 Birch Road");
    assert_eq!(store.snapshot_count(&first), 0);
    assert_eq!(store.snapshot_count(&second), 0);
}

#[test]
fn rename_rejects_blank_input() {
    let store = MemoryRecordStore::new();
    let service = AddressService::new(&store);

    let key = service.create("9 Pine Court").unwrap();
    assert!(matches!(
        service.rename(&key, "  "),
        Err(AddressServiceError::EmptyAddress)
    ));
}

#[test]
fn rename_of_missing_address_reports_not_found() {
    let store = MemoryRecordStore::new();
    let service = AddressService::new(&store);

    assert!(matches!(
        service.rename("nowhere", "1 Somewhere"),
        Err(AddressServiceError::NotFound(_))
    ));
}

#[test]
fn delete_removes_record_and_all_snapshots() {
    let store = MemoryRecordStore::new();
    let addresses = AddressService::new(&store);
    let buildings = BuildingService::new(&store);

    let key = addresses.create("3 Cedar Way").unwrap();
    buildings.add_building(&key, "Front").unwrap();
    assert_eq!(store.snapshot_count(&key), 1);

    addresses.delete(&key).unwrap();

    assert!(matches!(
        addresses.get(&key),
        Err(AddressServiceError::NotFound(_))
    ));
    assert!(store.list_snapshots(&key).unwrap().is_empty());
    assert!(matches!(
        addresses.delete(&key),
        Err(AddressServiceError::NotFound(_))
    ));
}

#[test]
fn list_returns_summaries_sorted_by_key() {
    let store = MemoryRecordStore::new();
    let service = AddressService::new(&store);

    service.create("2 Zinnia Street").unwrap();
    service.create("1 Aster Street").unwrap();

    let listed = service.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].key, "1_aster_street");
    assert_eq!(listed[0].full_address, "1 Aster Street");
    assert_eq!(listed[1].key, "2_zinnia_street");
}
