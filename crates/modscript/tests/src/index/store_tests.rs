use super::*;

fn definition(
    mod_name: &str,
    file: &str,
    type_key: &str,
    id: &str,
) -> Definition {
    let mut definition = Definition::new(id, type_key, format!("{id} = {{\n}}"), ValueType::Object);
    definition.mod_name = mod_name.to_string();
    definition.file = file.to_string();
    definition.tags = vec![id.to_string()];
    definition
}

fn sample() -> Vec<Definition> {
    vec![
        definition("mod_a", "events\\a.txt", "events\\txt", "a.1"),
        definition("mod_a", "events\\a.txt", "events\\txt", "a.2"),
        definition("mod_b", "events\\b.txt", "events\\txt", "a.1"),
        definition("mod_b", "common\\buildings\\b.txt", "common\\buildings\\txt", "building_hub"),
    ]
}

fn ids(definitions: &[Arc<Definition>]) -> Vec<&str> {
    definitions.iter().map(|d| d.id.as_str()).collect()
}

/// Every definition is reachable through every flat index it belongs to.
fn assert_consistent(store: &IndexedDefinitions) {
    let all = store.all_definitions();
    assert_eq!(all.len(), store.len());
    for definition in &all {
        for found in [
            store.get_by_file(&definition.file),
            store.get_by_type(&definition.type_key),
            store.get_by_type_and_id(&definition.type_key, &definition.id),
            store.get_by_parent_directory(definition.parent_directory()),
            store.get_by_id(&definition.id),
            store.get_by_value_type(definition.value_type),
        ] {
            assert!(found.iter().any(|d| d.key() == definition.key()), "{} missing from an index", definition.id);
        }
    }
    let total: usize = store.get_all_file_keys().iter().map(|file| store.get_by_file(file).len()).sum();
    assert_eq!(total, store.len());
}

#[test]
fn mutations_before_init_fail() {
    let mut store = IndexedDefinitions::new();
    assert!(!store.is_loaded());
    assert!(store.all_definitions().is_empty());
    assert!(matches!(store.add(sample().remove(0)), Err(StoreError::NotInitialized)));
    assert!(matches!(store.remove(&sample()[0]), Err(StoreError::NotInitialized)));
    assert!(matches!(store.update(&sample()), Err(StoreError::NotInitialized)));
    assert!(matches!(store.has_reset_definitions(), Err(StoreError::NotInitialized)));
    assert!(!store.change_hierarchical_reset_state(&sample()[0], ResetType::Resolved));
}

#[test]
fn update_with_empty_batch_is_a_no_op() {
    let mut store = IndexedDefinitions::new();
    assert!(!store.update(&[]).expect("empty update"));
    store.init(sample(), true).expect("init");
    assert!(!store.update(&[]).expect("empty update"));
    assert_eq!(store.len(), 4);
}

#[test]
fn queries_follow_insertion_order() {
    let mut store = IndexedDefinitions::new();
    store.init(sample(), true).expect("init");

    assert_eq!(ids(&store.get_by_type("events\\txt")), vec!["a.1", "a.2", "a.1"]);
    assert_eq!(ids(&store.get_by_type_and_id("events\\txt", "a.1")).len(), 2);
    assert_eq!(store.get_by_type_and_id_key("events\\txt-a.1").len(), 2);
    assert_eq!(ids(&store.get_by_file("events\\a.txt")), vec!["a.1", "a.2"]);
    assert_eq!(ids(&store.get_by_parent_directory("common\\buildings")), vec!["building_hub"]);
    assert_eq!(store.get_all_type_keys(), vec!["events\\txt", "common\\buildings\\txt"]);
    assert_eq!(store.get_all_directory_keys(), vec!["events", "common\\buildings"]);
    assert_eq!(store.get_all_file_keys().len(), 3);
    assert_eq!(store.get_all_type_and_id_keys().len(), 3);
    assert!(store.get_by_disk_file("/nowhere").is_empty());
    assert!(!store.has_game_definitions());
    assert_consistent(&store);
}

#[test]
fn identity_is_unique_and_replacement_keeps_position() {
    let mut store = IndexedDefinitions::new();
    let mut batch = sample();
    let mut duplicate = batch[0].clone();
    duplicate.code = "a.1 = { first = yes }".to_string();
    batch.push(duplicate);
    store.init(batch, true).expect("init");
    assert_eq!(store.len(), 4);
    assert_eq!(store.all_definitions()[0].code, "a.1 = { first = yes }");

    let mut replacement = sample()[0].clone();
    replacement.code = "a.1 = { second = yes }".to_string();
    store.add(replacement).expect("add");
    assert_eq!(store.len(), 4);
    let all = store.all_definitions();
    assert_eq!(all[0].code, "a.1 = { second = yes }");
    assert_consistent(&store);
}

#[test]
fn remove_detaches_from_every_index() {
    let mut store = IndexedDefinitions::new();
    store.init(sample(), true).expect("init");
    let target = sample().remove(3);

    assert!(store.remove(&target).expect("remove"));
    assert!(!store.remove(&target).expect("second remove"));
    assert_eq!(store.len(), 3);
    assert!(store.get_by_id("building_hub").is_empty());
    assert!(!store.get_all_directory_keys().contains(&"common\\buildings".to_string()));
    assert!(!store.get_all_type_keys().contains(&"common\\buildings\\txt".to_string()));
    assert_consistent(&store);
}

#[test]
fn update_replaces_known_and_adds_unknown() {
    let mut store = IndexedDefinitions::new();
    store.init(sample(), true).expect("init");

    let mut changed = sample()[1].clone();
    changed.code = "a.2 = { changed = yes }".to_string();
    let fresh = definition("mod_c", "events\\c.txt", "events\\txt", "c.1");
    assert!(store.update(&[changed, fresh]).expect("update"));

    assert_eq!(store.len(), 5);
    assert_eq!(store.get_by_id("a.2")[0].code, "a.2 = { changed = yes }");
    assert_eq!(ids(&store.get_by_type("events\\txt")), vec!["a.1", "a.2", "a.1", "c.1"]);
    assert_consistent(&store);
}

#[test]
fn init_replaces_previous_content() {
    let mut store = IndexedDefinitions::new();
    store.init(sample(), true).expect("init");
    store.init(vec![definition("mod_z", "events\\z.txt", "events\\txt", "z.1")], true).expect("reinit");
    assert_eq!(ids(&store.all_definitions()), vec!["z.1"]);
    assert_consistent(&store);
}

#[test]
fn hierarchy_aggregates_mods_and_reset_state() {
    let mut store = IndexedDefinitions::new();
    store.init(sample(), true).expect("init");
    assert!(!store.has_reset_definitions().expect("hierarchy"));

    let nodes = store.get_hierarchical_definitions().expect("hierarchy");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].name, "events\\txt");
    let shared = &nodes[0].children[0];
    assert_eq!(shared.id, "a.1");
    assert_eq!(shared.mods, vec!["mod_a", "mod_b"]);
    assert_eq!(shared.file_names, vec!["events\\a.txt", "events\\b.txt"]);
    assert_eq!(shared.reset_type, ResetType::None);

    let target = sample().remove(2);
    assert!(store.change_hierarchical_reset_state(&target, ResetType::Resolved));
    assert!(store.has_reset_definitions().expect("hierarchy"));
    let nodes = store.get_hierarchical_definitions().expect("hierarchy");
    assert_eq!(nodes[0].children[0].reset_type, ResetType::Resolved);
    assert_eq!(store.get_by_file("events\\b.txt")[0].reset_type, ResetType::Resolved);

    assert!(store.change_hierarchical_reset_state(&target, ResetType::None));
    assert!(!store.has_reset_definitions().expect("hierarchy"));

    let unknown = definition("mod_q", "events\\q.txt", "events\\txt", "q.1");
    assert!(!store.change_hierarchical_reset_state(&unknown, ResetType::Ignored));
}

#[test]
fn removing_the_reset_member_clears_has_reset() {
    let mut store = IndexedDefinitions::new();
    let mut batch = sample();
    batch[2].reset_type = ResetType::Ignored;
    store.init(batch, true).expect("init");
    assert!(store.has_reset_definitions().expect("hierarchy"));

    store.remove(&sample()[2]).expect("remove");
    assert!(!store.has_reset_definitions().expect("hierarchy"));
}

#[test]
fn hierarchy_can_be_disabled() {
    let mut store = IndexedDefinitions::new();
    store.init(sample(), false).expect("init");
    assert!(matches!(store.has_reset_definitions(), Err(StoreError::HierarchyDisabled)));
    assert!(matches!(store.get_hierarchical_definitions(), Err(StoreError::HierarchyDisabled)));
    assert!(!store.change_hierarchical_reset_state(&sample()[0], ResetType::Resolved));
}

#[test]
fn search_requires_opt_in() {
    let mut store = IndexedDefinitions::new();
    store.init(sample(), true).expect("init");
    assert!(matches!(store.search("a.1"), Err(StoreError::SearchDisabled)));
}

#[test]
fn search_is_ranked_and_capped() {
    let mut store = IndexedDefinitions::builder().enable_search(true).search_limit(2).build().expect("store");
    assert!(matches!(store.search("a"), Err(StoreError::NotInitialized)));
    store.init(sample(), true).expect("init");

    let results = store.search("A.1").expect("search");
    assert_eq!(results, vec!["a.1 - events\\a.txt", "a.1 - events\\b.txt"]);

    let results = store.search("hub").expect("search");
    assert_eq!(results, vec!["building_hub - common\\buildings\\b.txt"]);
    assert!(store.search("   ").expect("search").is_empty());
}

#[test]
fn builder_clamps_limit_and_reads_settings() {
    let settings = StoreSettings {
        enable_search: true,
        search_limit: 3,
        ..StoreSettings::default()
    };
    let store = IndexedDefinitionsBuilder::from_settings(&settings).build().expect("store");
    assert_eq!(store.storage_kind(), StorageKind::Memory);
    assert_eq!(store.search_limit, 3);
    assert!(store.enable_search);

    let store = IndexedDefinitions::builder().search_limit(0).build().expect("store");
    assert_eq!(store.search_limit, 1);
}

#[test]
fn disk_storage_matches_memory_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut disk = IndexedDefinitions::builder().disk_storage(dir.path()).build().expect("disk store");
    let mut memory = IndexedDefinitions::new();
    assert_eq!(disk.storage_kind(), StorageKind::Disk);

    disk.init(sample(), true).expect("disk init");
    memory.init(sample(), true).expect("memory init");
    assert!(dir.path().join("indices.json").is_file());

    let mut changed = sample()[0].clone();
    changed.code = "a.1 = { disk = yes }".to_string();
    for store in [&mut disk, &mut memory] {
        store.update(std::slice::from_ref(&changed)).expect("update");
        store.remove(&sample()[3]).expect("remove");
        assert!(store.change_hierarchical_reset_state(&sample()[1], ResetType::Resolved));
    }

    let on_disk: Vec<Definition> = disk.all_definitions().iter().map(|d| (**d).clone()).collect();
    let in_memory: Vec<Definition> = memory.all_definitions().iter().map(|d| (**d).clone()).collect();
    assert_eq!(on_disk, in_memory);
    assert_eq!(
        disk.get_hierarchical_definitions().expect("disk"),
        memory.get_hierarchical_definitions().expect("memory")
    );
    assert_consistent(&disk);
}

#[test]
fn single_mutations_persist_indices_on_flush() {
    let dir = tempfile::tempdir().expect("tempdir");
    let indices = dir.path().join("indices.json");
    let persisted = |path: &std::path::Path| -> u64 {
        let json: serde_json::Value = serde_json::from_slice(&std::fs::read(path).expect("indices")).expect("json");
        json["definitions"].as_u64().expect("definition count")
    };

    let mut store = IndexedDefinitions::builder().disk_storage(dir.path()).build().expect("disk store");
    store.init(sample(), true).expect("init");
    assert_eq!(persisted(&indices), 4);

    for n in 0..3 {
        store.add(definition("mod_c", "events\\c.txt", "events\\txt", &format!("c.{n}"))).expect("add");
    }
    store.remove(&sample()[3]).expect("remove");
    assert_eq!(persisted(&indices), 4);
    assert_eq!(store.len(), 6);

    store.flush().expect("flush");
    assert_eq!(persisted(&indices), 6);

    store.add(definition("mod_c", "events\\c.txt", "events\\txt", "c.9")).expect("add");
    drop(store);
    assert_eq!(persisted(&indices), 7);
}

#[test]
fn storage_cannot_switch_after_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = IndexedDefinitions::new();
    store.use_disk_storage(dir.path()).expect("switch before load");
    assert_eq!(store.storage_kind(), StorageKind::Disk);
    store.init(sample(), true).expect("init");
    assert!(matches!(store.use_disk_storage(dir.path()), Err(StoreError::AlreadyLoaded)));
}
