//! Integration tests for the claim/edit state machine

mod common;

use ::common::cipher::{decode, encode};
use ::common::claim::ClaimStore;
use ::common::codebook::Codebook;
use ::common::registry::{Notice, PathState, RegistryError};

#[tokio::test]
async fn test_never_written_paths_resolve_to_default() {
    let (registry, store) = common::setup_registry();

    for path in ["testpath", "doesnotexistyet", "a-b_c.123"] {
        let view = registry.resolve(path).await;
        assert_eq!(view.path, path);
        assert_eq!(view.codebook, Codebook::default());
        assert!(!view.is_claimed);
        assert_eq!(view.notice, None);
    }

    // reads never create records
    assert!(store.is_empty());
    assert_eq!(
        registry.state("testpath").await.unwrap(),
        PathState::Absent
    );
}

#[tokio::test]
async fn test_first_secret_claims_path() {
    let (registry, store) = common::setup_registry();

    let grant = registry.submit_secret("testpath", "pw1").await.unwrap();
    assert_eq!(grant.path(), "testpath");
    assert_eq!(
        registry.state("testpath").await.unwrap(),
        PathState::Claimed
    );

    // a fresh claim starts from the default codebook
    let view = registry.resolve("testpath").await;
    assert!(view.is_claimed);
    assert_eq!(view.codebook, Codebook::default());
    assert_eq!(store.get("testpath").await.unwrap(), Some(Codebook::default()));
}

#[tokio::test]
async fn test_wrong_secret_is_rejected_without_mutation() {
    let (registry, store) = common::setup_claimed("testpath", "pw1").await;
    let before = store.secret_hash("testpath").await.unwrap();

    let result = registry.submit_secret("testpath", "wrong").await;
    assert!(matches!(result, Err(RegistryError::InvalidSecret)));

    let view = registry
        .save("testpath", "wrong", &common::edits(&[("a", "q")]))
        .await;
    assert_eq!(view.notice, Some(Notice::InvalidSecret));
    assert_eq!(view.codebook, Codebook::default());
    assert!(view.is_claimed);

    assert_eq!(store.get("testpath").await.unwrap(), Some(Codebook::default()));
    assert_eq!(store.secret_hash("testpath").await.unwrap(), before);
}

#[tokio::test]
async fn test_right_secret_applies_edits() {
    let (registry, _store) = common::setup_claimed("testpath", "pw1").await;

    let grant = registry.submit_secret("testpath", "pw1").await.unwrap();
    let codebook = registry
        .apply_edits(grant, &common::edits(&[("a", "a"), ("z", "z")]))
        .await
        .unwrap();
    assert_eq!(codebook.get('a'), Some("a"));

    let view = registry.resolve("testpath").await;
    assert_eq!(view.codebook.get('a'), Some("a"));
    assert_eq!(view.codebook.get('z'), Some("z"));
    assert_eq!(view.codebook, codebook);
}

#[tokio::test]
async fn test_omitted_letters_are_blanked() {
    // saving a partial form wipes every letter it leaves out
    let (registry, _store) = common::setup_claimed("testpath", "pw1").await;

    let view = registry
        .save("testpath", "pw1", &common::edits(&[("a", "a"), ("z", "z")]))
        .await;
    assert_eq!(view.notice, None);
    for (key, value) in view.codebook.iter() {
        match key {
            'a' => assert_eq!(value, "a"),
            'z' => assert_eq!(value, "z"),
            _ => assert_eq!(value, "", "letter {} should be blank", key),
        }
    }

    // with that codebook only a and z encode to anything
    assert_eq!(encode(&view.codebook, "abz"), "az");
}

#[tokio::test]
async fn test_save_claims_and_stores_in_one_call() {
    let (registry, _store) = common::setup_registry();

    let mut custom = common::full_edits(&Codebook::default());
    custom.insert("a".into(), "!".into());

    let view = registry.save("fresh", "newpass", &custom).await;
    assert!(view.is_claimed);
    assert_eq!(view.notice, None);
    assert_eq!(view.codebook.get('a'), Some("!"));

    let resolved = registry.resolve("fresh").await;
    assert_eq!(resolved.codebook, view.codebook);
    assert_eq!(encode(&resolved.codebook, "ab"), "!y");
    assert_eq!(decode(&resolved.codebook, "!y"), "ab");
}

#[tokio::test]
async fn test_claim_is_permanent() {
    let (registry, store) = common::setup_claimed("testpath", "pw1").await;
    let original = store.secret_hash("testpath").await.unwrap().unwrap();

    // repeated saves, right and wrong, never replace the secret
    registry
        .save("testpath", "pw1", &common::full_edits(&Codebook::default()))
        .await;
    registry.save("testpath", "pw2", &common::edits(&[])).await;
    registry.save("testpath", "", &common::edits(&[])).await;

    let current = store.secret_hash("testpath").await.unwrap().unwrap();
    assert_eq!(current, original);
    assert!(current.verify("pw1").unwrap());
    assert!(registry.submit_secret("testpath", "pw2").await.is_err());
}

#[tokio::test]
async fn test_unclaimed_record_is_claimable() {
    let (registry, store) = common::setup_registry();
    store
        .insert_unclaimed("legacy", Codebook::from_fields(&common::edits(&[])))
        .unwrap();
    assert_eq!(
        registry.state("legacy").await.unwrap(),
        PathState::Unclaimed
    );

    registry.submit_secret("legacy", "pw").await.unwrap();
    assert_eq!(registry.state("legacy").await.unwrap(), PathState::Claimed);
    assert_eq!(registry.resolve("legacy").await.codebook, Codebook::default());
}

#[tokio::test]
async fn test_non_bijective_codebook_round_trip_is_a_preimage() {
    let (registry, _store) = common::setup_claimed("collide", "pw").await;
    let mut fields = common::full_edits(&Codebook::default());
    fields.insert("a".into(), "x".into());
    fields.insert("b".into(), "x".into());
    let view = registry.save("collide", "pw", &fields).await;

    let encoded = encode(&view.codebook, "ab");
    let decoded = decode(&view.codebook, &encoded);
    assert_eq!(decoded.chars().count(), 2);
    // 'a', 'b' and 'c' all encode to "x"
    assert!(decoded.chars().all(|c| matches!(c, 'a' | 'b' | 'c')));
    assert_eq!(encode(&view.codebook, &decoded), encoded);
}
