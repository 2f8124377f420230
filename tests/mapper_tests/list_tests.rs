//! ListMapper Tests
//!
//! Tests verify:
//! - Lazy length initialization (and its write side effect)
//! - Push / get / set semantics
//! - Negative index rejection
//! - Unchecked set beyond the length
//! - Ordered iteration
//! - Corrupt length detection
//! - Encode failures and length overflow write nothing

use kvseq::encoding::{BincodeCodec, Codec, KeyEncoder};
use kvseq::store::PrefixStore;
use kvseq::{Context, KvStore, ListMapper, MemStore, SeqError, StoreKey};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct S {
    i: i64,
    b: bool,
}

/// Record whose serialization always fails
#[derive(Debug, Deserialize)]
struct Unencodable {
    #[allow(dead_code)]
    i: i64,
}

impl Serialize for Unencodable {
    fn serialize<Z: Serializer>(&self, _serializer: Z) -> Result<Z::Ok, Z::Error> {
        Err(serde::ser::Error::custom("refusing to encode"))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn list(name: &str) -> ListMapper<S> {
    ListMapper::with_bincode(StoreKey::new(name)).unwrap()
}

fn sentinel_key(name: &str) -> Vec<u8> {
    let key = StoreKey::new(name);
    let mut full = key.prefix().to_vec();
    full.extend_from_slice(KeyEncoder::new(BincodeCodec).unwrap().sentinel());
    full
}

// =============================================================================
// Length Tests
// =============================================================================

#[test]
fn test_fresh_list_is_empty() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    assert_eq!(lm.len(&mut ctx).unwrap(), 0);
    assert!(lm.is_empty(&mut ctx).unwrap());
}

#[test]
fn test_len_writes_zero_on_first_read() {
    let mut store = MemStore::new();
    assert!(store.is_empty());

    {
        let mut ctx = Context::new(&mut store);
        list("list").len(&mut ctx).unwrap();
    }

    let raw = store.get(&sentinel_key("list")).unwrap().unwrap();
    assert_eq!(BincodeCodec.decode::<i64>(&raw).unwrap(), 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_ensure_initialized_is_idempotent() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    lm.ensure_initialized(&mut ctx).unwrap();
    lm.push(&mut ctx, &S { i: 5, b: false }).unwrap();
    lm.ensure_initialized(&mut ctx).unwrap();

    assert_eq!(lm.len(&mut ctx).unwrap(), 1);
}

// =============================================================================
// Push / Get / Set Tests
// =============================================================================

#[test]
fn test_push_get_set_scenario() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    let val = S { i: 1, b: true };
    lm.push(&mut ctx, &val).unwrap();
    assert_eq!(lm.len(&mut ctx).unwrap(), 1);
    assert_eq!(lm.get(&mut ctx, 0).unwrap(), val);

    let val = S { i: 2, b: false };
    lm.set(&mut ctx, 0, &val).unwrap();
    assert_eq!(lm.get(&mut ctx, 0).unwrap(), val);
}

#[test]
fn test_push_increments_len_by_one() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    for n in 0..10 {
        let old_len = lm.len(&mut ctx).unwrap();
        assert_eq!(old_len, n);

        let val = S { i: n * 10, b: n % 2 == 0 };
        lm.push(&mut ctx, &val).unwrap();

        assert_eq!(lm.len(&mut ctx).unwrap(), old_len + 1);
        assert_eq!(lm.get(&mut ctx, old_len).unwrap(), val);
    }
}

#[test]
fn test_set_leaves_other_indices_unchanged() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    for i in 0..5 {
        lm.push(&mut ctx, &S { i, b: true }).unwrap();
    }

    lm.set(&mut ctx, 2, &S { i: 99, b: false }).unwrap();

    assert_eq!(lm.get(&mut ctx, 2).unwrap(), S { i: 99, b: false });
    for i in [0, 1, 3, 4] {
        assert_eq!(lm.get(&mut ctx, i).unwrap(), S { i, b: true });
    }
    assert_eq!(lm.len(&mut ctx).unwrap(), 5);
}

#[test]
fn test_negative_index_is_rejected() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");
    lm.push(&mut ctx, &S { i: 1, b: true }).unwrap();

    assert!(matches!(lm.get(&mut ctx, -1), Err(SeqError::InvalidIndex(-1))));
    assert!(matches!(
        lm.set(&mut ctx, -1, &S { i: 0, b: false }),
        Err(SeqError::InvalidIndex(-1))
    ));
    assert!(matches!(
        lm.set_checked(&mut ctx, -5, &S { i: 0, b: false }),
        Err(SeqError::InvalidIndex(-5))
    ));

    // The rejected set must not have clobbered the length record
    assert_eq!(lm.len(&mut ctx).unwrap(), 1);
}

#[test]
fn test_get_unwritten_index_is_decode_error() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    assert!(matches!(lm.get(&mut ctx, 0), Err(SeqError::Decode(_))));
    assert!(matches!(lm.get(&mut ctx, 1000), Err(SeqError::Decode(_))));
}

#[test]
fn test_set_beyond_len_does_not_extend() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    lm.set(&mut ctx, 3, &S { i: 3, b: true }).unwrap();

    assert_eq!(lm.len(&mut ctx).unwrap(), 0);
    // The entry exists even though it is outside the logical list
    assert_eq!(lm.get(&mut ctx, 3).unwrap(), S { i: 3, b: true });

    let mut visited = 0;
    lm.iterate(&mut ctx, |_, _| visited += 1).unwrap();
    assert_eq!(visited, 0);
}

#[test]
fn test_push_overwrites_entry_set_beyond_len() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    lm.set(&mut ctx, 0, &S { i: -1, b: false }).unwrap();
    lm.push(&mut ctx, &S { i: 1, b: true }).unwrap();

    assert_eq!(lm.len(&mut ctx).unwrap(), 1);
    assert_eq!(lm.get(&mut ctx, 0).unwrap(), S { i: 1, b: true });
}

#[test]
fn test_set_checked_enforces_len() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    assert!(matches!(
        lm.set_checked(&mut ctx, 0, &S { i: 0, b: true }),
        Err(SeqError::InvalidIndex(0))
    ));

    lm.push(&mut ctx, &S { i: 0, b: true }).unwrap();
    lm.set_checked(&mut ctx, 0, &S { i: 7, b: false }).unwrap();
    assert_eq!(lm.get(&mut ctx, 0).unwrap(), S { i: 7, b: false });

    assert!(matches!(
        lm.set_checked(&mut ctx, 1, &S { i: 1, b: true }),
        Err(SeqError::InvalidIndex(1))
    ));
}

// =============================================================================
// Iteration Tests
// =============================================================================

#[test]
fn test_iterate_visits_in_push_order() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    let values: Vec<S> = (0..20).map(|i| S { i: i * 3, b: i % 3 == 0 }).collect();
    for v in &values {
        lm.push(&mut ctx, v).unwrap();
    }

    let mut seen = Vec::new();
    lm.iterate(&mut ctx, |index, value| seen.push((index, value)))
        .unwrap();

    let expected: Vec<(i64, S)> = values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i as i64, v))
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_iterate_empty_list() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);

    let mut called = false;
    list("list").iterate(&mut ctx, |_, _| called = true).unwrap();
    assert!(!called);
}

#[test]
fn test_iterate_fails_on_missing_entry() {
    let mut store = MemStore::new();
    let key = StoreKey::new("list");
    let encoder = KeyEncoder::new(BincodeCodec).unwrap();

    // Length claims two entries but only one was written
    {
        let mut region = PrefixStore::new(&mut store, key.prefix());
        region
            .set(encoder.sentinel(), &BincodeCodec.encode(&2i64).unwrap())
            .unwrap();
        region
            .set(
                &encoder.index(0).unwrap(),
                &BincodeCodec.encode(&S { i: 0, b: true }).unwrap(),
            )
            .unwrap();
    }

    let mut ctx = Context::new(&mut store);
    let mut seen = Vec::new();
    let result = list("list").iterate(&mut ctx, |i, _| seen.push(i));

    assert!(matches!(result, Err(SeqError::Decode(_))));
    assert_eq!(seen, vec![0]);
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_negative_stored_len_is_corrupt_state() {
    let mut store = MemStore::new();
    store
        .set(&sentinel_key("list"), &BincodeCodec.encode(&-3i64).unwrap())
        .unwrap();

    let mut ctx = Context::new(&mut store);
    let lm = list("list");

    assert!(matches!(lm.len(&mut ctx), Err(SeqError::CorruptState(_))));
    assert!(matches!(
        lm.push(&mut ctx, &S { i: 0, b: false }),
        Err(SeqError::CorruptState(_))
    ));
}

#[test]
fn test_garbage_len_is_decode_error() {
    let mut store = MemStore::new();
    store.set(&sentinel_key("list"), b"xyz").unwrap();

    let mut ctx = Context::new(&mut store);
    assert!(matches!(list("list").len(&mut ctx), Err(SeqError::Decode(_))));
}

#[test]
fn test_entry_of_wrong_type_is_decode_error() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);

    let strings = ListMapper::<String>::with_bincode(StoreKey::new("list")).unwrap();
    strings.push(&mut ctx, &"hello".to_string()).unwrap();

    assert!(matches!(list("list").get(&mut ctx, 0), Err(SeqError::Decode(_))));
}

// =============================================================================
// Write Failure Tests
// =============================================================================

#[test]
fn test_unencodable_value_is_encode_error() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store);
    let lm = ListMapper::<Unencodable>::with_bincode(StoreKey::new("list")).unwrap();

    assert!(matches!(
        lm.push(&mut ctx, &Unencodable { i: 1 }),
        Err(SeqError::Encode(_))
    ));
    assert!(matches!(
        lm.set(&mut ctx, 0, &Unencodable { i: 2 }),
        Err(SeqError::Encode(_))
    ));
    assert_eq!(lm.len(&mut ctx).unwrap(), 0);
    drop(ctx);

    // Only the lazily written length is stored
    assert_eq!(store.len(), 1);
}

#[test]
fn test_push_at_max_len_is_corrupt_state() {
    let mut store = MemStore::new();
    let max_len = BincodeCodec.encode(&i64::MAX).unwrap();
    store.set(&sentinel_key("list"), &max_len).unwrap();

    {
        let mut ctx = Context::new(&mut store);
        let result = list("list").push(&mut ctx, &S { i: 1, b: true });
        assert!(matches!(result, Err(SeqError::CorruptState(_))));
    }

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&sentinel_key("list")).unwrap(), Some(max_len));
}
