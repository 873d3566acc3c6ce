use pretty_assertions::assert_eq;
use roomie_recommend::{RecommendationSelector, Tier};
use roomie_store::{
    advance_state, recommend, DistributionState, Gender, MemoryStore, PreferenceStore, StoreError,
    UserId,
};
use std::collections::BTreeSet;
use tempfile::TempDir;

fn befriend(store: &mut MemoryStore, ids: &[UserId]) {
    for &a in ids {
        for &b in ids {
            if a != b {
                store.subscribe(a, b).unwrap();
            }
        }
    }
}

#[test]
fn test_full_lifecycle_survives_snapshot_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state").join("roomie.json");

    let mut store = MemoryStore::new();
    let distribution = store.create_distribution("Autumn intake").id;
    advance_state(&mut store, distribution, DistributionState::Answering).unwrap();

    let men: Vec<UserId> = (0..5).map(|_| store.create_user(Gender::Male).id).collect();
    let women: Vec<UserId> = (0..3).map(|_| store.create_user(Gender::Female).id).collect();
    for &user in men.iter().chain(&women) {
        store.join(distribution, user).unwrap();
    }
    befriend(&mut store, &men[..4]);
    store.add_preformed_group(distribution, &women[..2]).unwrap();
    store.save(&path).unwrap();

    let mut store = MemoryStore::load(&path).unwrap();
    advance_state(&mut store, distribution, DistributionState::Gathering).unwrap();

    // The loner has nobody interested in him, so the feed falls back to unseen people
    let mut selector = RecommendationSelector::seeded(11);
    let feed = recommend(&mut store, &mut selector, distribution, men[4], 3, true).unwrap();
    assert_eq!(feed.tier, Tier::Unviewed);
    assert_eq!(feed.ids, men[..3].to_vec());
    store.save(&path).unwrap();

    let mut store = MemoryStore::load(&path).unwrap();
    assert_eq!(
        store.user(men[4]).unwrap().viewed_ids,
        men[..3].iter().copied().collect::<BTreeSet<_>>()
    );

    let closed = advance_state(&mut store, distribution, DistributionState::Closed)
        .unwrap()
        .unwrap();
    store.save(&path).unwrap();

    let store = MemoryStore::load(&path).unwrap();
    assert_eq!(store.distribution(distribution).unwrap().state, DistributionState::Closed);

    let male = closed.groups.iter().find(|g| g.gender == Gender::Male).unwrap();
    let male_rooms: Vec<Vec<UserId>> = male.rooms.iter().map(|r| r.members().to_vec()).collect();
    assert_eq!(male_rooms, vec![men[..4].to_vec(), vec![men[4]]]);

    let female = closed.groups.iter().find(|g| g.gender == Gender::Female).unwrap();
    assert!(female
        .rooms
        .iter()
        .any(|r| r.contains(women[0]) && r.contains(women[1])));

    for group_id in &male.group_ids {
        let record = store.group(*group_id).unwrap();
        assert_eq!(record.distribution_id, distribution);
        for member in &record.member_ids {
            assert!(store.user(*member).unwrap().group_ids.contains(group_id));
        }
    }
}

#[test]
fn test_load_rejects_unknown_schema() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("roomie.json");
    std::fs::write(&path, r#"{ "schema_version": 2 }"#).unwrap();

    assert!(matches!(
        MemoryStore::load(&path),
        Err(StoreError::UnsupportedSchema(2, 1))
    ));
}

#[test]
fn test_load_reports_missing_file() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        MemoryStore::load(&temp.path().join("absent.json")),
        Err(StoreError::IoError(_))
    ));
}
