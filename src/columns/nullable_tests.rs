use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::columns::{IntegerColumn, NullableIntegerColumn, CHUNK_LEN};
use crate::config::{ColumnConfig, SentinelConfig};
use crate::error::IntColumnError;
use crate::packed_array::{PackedArray, RawArrayView};
use crate::traits::IntegerLeaf;

// Test Helpers
/// Physical cells of the column, sentinel first.
fn physical(col: &NullableIntegerColumn) -> Vec<i64> {
    PackedArray::from_bytes(&col.to_bytes())
        .unwrap()
        .iter()
        .collect()
}

fn logical(col: &NullableIntegerColumn) -> Vec<Option<i64>> {
    col.iter().collect()
}

fn column_with_candidates(candidates: Vec<i64>) -> NullableIntegerColumn {
    let config = ColumnConfig {
        sentinel: SentinelConfig {
            initial: 0,
            candidates,
        },
        ..ColumnConfig::default()
    };
    NullableIntegerColumn::with_config(Arc::new(config)).unwrap()
}

/// Checks the sentinel invariant and that every logical read agrees with `model`.
fn assert_matches_model(col: &NullableIntegerColumn, model: &[Option<i64>]) {
    assert_eq!(col.size(), model.len());
    let cells = physical(col);
    let sentinel = cells[0];
    assert_eq!(sentinel, col.null_value());
    for (i, expected) in model.iter().enumerate() {
        assert_eq!(col.get(i).unwrap(), *expected, "logical index {}", i);
        assert_eq!(col.is_null(i).unwrap(), expected.is_none());
        match expected {
            Some(v) => assert_ne!(*v, sentinel, "value at {} collides with sentinel", i),
            None => assert_eq!(cells[i + 1], sentinel),
        }
    }
}

#[test]
fn test_new_column_is_sentinel_only() {
    let col = NullableIntegerColumn::new();
    assert!(col.is_empty());
    assert_eq!(col.null_value(), 0);
    assert_eq!(physical(&col), vec![0]);
}

#[test]
fn test_collision_scenario_add_value_null_zero() {
    let mut col = NullableIntegerColumn::new();

    col.add(Some(5)).unwrap();
    assert_eq!(physical(&col), vec![0, 5]);

    col.add(None).unwrap();
    assert_eq!(physical(&col), vec![0, 5, 0]);

    // 0 collides with the sentinel 0: the sentinel moves and the null is rewritten.
    col.add(Some(0)).unwrap();
    assert_ne!(col.null_value(), 0);
    assert_ne!(col.null_value(), 5);
    assert_eq!(physical(&col), vec![col.null_value(), 5, col.null_value(), 0]);

    assert_eq!(col.get(0).unwrap(), Some(5));
    assert_eq!(col.get(1).unwrap(), None);
    assert_eq!(col.get(2).unwrap(), Some(0));
}

#[test]
fn test_default_policy_prefers_minus_one_after_zero() {
    let mut col = NullableIntegerColumn::new();
    col.add(Some(5)).unwrap();
    col.add(None).unwrap();
    col.add(Some(0)).unwrap();
    assert_eq!(physical(&col), vec![-1, 5, -1, 0]);
}

#[test]
fn test_set_and_insert_trigger_collision_avoidance() {
    let mut col = NullableIntegerColumn::new();
    col.add(None).unwrap();
    col.add(Some(-1)).unwrap();
    col.add(None).unwrap();

    col.set(0, Some(0)).unwrap();
    assert_matches_model(&col, &[Some(0), Some(-1), None]);

    let sentinel = col.null_value();
    col.insert(1, Some(sentinel)).unwrap();
    assert_matches_model(&col, &[Some(0), Some(sentinel), Some(-1), None]);
}

#[test]
fn test_collision_avoidance_falls_back_when_candidates_taken() {
    let mut col = column_with_candidates(vec![0, -1]);
    col.add(Some(-1)).unwrap();
    col.add(None).unwrap();
    col.add(Some(0)).unwrap();

    assert_matches_model(&col, &[Some(-1), None, Some(0)]);
    assert!(col.null_value() != 0 && col.null_value() != -1);
}

#[test]
fn test_collision_avoidance_with_full_range_in_use() {
    let mut col = column_with_candidates(vec![0]);
    col.add(Some(i64::MIN)).unwrap();
    col.add(Some(i64::MAX)).unwrap();
    col.add(None).unwrap();
    col.add(Some(0)).unwrap();

    assert_matches_model(&col, &[Some(i64::MIN), Some(i64::MAX), None, Some(0)]);
}

#[test]
fn test_collision_avoidance_without_candidates() {
    let mut col = column_with_candidates(vec![]);
    col.add(None).unwrap();
    col.add(Some(0)).unwrap();
    col.add(Some(1)).unwrap();
    assert_matches_model(&col, &[None, Some(0), Some(1)]);
}

#[test]
fn test_repeated_collisions_keep_every_null() {
    let mut col = NullableIntegerColumn::new();
    let mut model = Vec::new();
    for v in [0, -1, i64::MIN, i64::MAX, 1, 2] {
        col.add(None).unwrap();
        model.push(None);
        let sentinel = col.null_value();
        col.add(Some(sentinel)).unwrap();
        model.push(Some(sentinel));
        col.add(Some(v)).unwrap();
        model.push(Some(v));
        assert_matches_model(&col, &model);
    }
}

#[test]
fn test_avoid_null_collision_is_noop_for_other_values() {
    let mut col = NullableIntegerColumn::new();
    col.add(None).unwrap();
    col.avoid_null_collision(42).unwrap();
    assert_eq!(physical(&col), vec![0, 0]);
}

#[test]
fn test_set_null_and_is_null() {
    let mut col = NullableIntegerColumn::new();
    col.add(Some(3)).unwrap();
    col.add(Some(4)).unwrap();
    col.set_null(0).unwrap();
    assert!(col.is_null(0).unwrap());
    assert!(!col.is_null(1).unwrap());
    assert_eq!(logical(&col), vec![None, Some(4)]);
}

#[test]
fn test_erase_and_move_do_not_touch_sentinel() {
    let mut col = NullableIntegerColumn::new();
    for v in [Some(1), None, Some(3), Some(4), None] {
        col.add(v).unwrap();
    }
    col.erase(0).unwrap();
    assert_eq!(logical(&col), vec![None, Some(3), Some(4), None]);

    col.move_range(1, 3, 0).unwrap();
    assert_eq!(logical(&col), vec![Some(3), Some(4), Some(4), None]);

    col.erase_range(1, 3).unwrap();
    assert_eq!(logical(&col), vec![Some(3), None]);
    assert_eq!(col.null_value(), 0);
}

#[test]
fn test_move_range_rejects_bad_destination() {
    let mut col = NullableIntegerColumn::new();
    col.add(Some(1)).unwrap();
    assert_eq!(
        col.move_range(0, 1, usize::MAX),
        Err(IntColumnError::InvalidRange {
            start: usize::MAX,
            end: usize::MAX,
            size: 1
        })
    );
    assert_eq!(
        col.move_range(0, 1, 1),
        Err(IntColumnError::InvalidRange {
            start: 1,
            end: 2,
            size: 1
        })
    );
    assert_eq!(logical(&col), vec![Some(1)]);
}

#[test]
fn test_bounds_are_logical() {
    let mut col = NullableIntegerColumn::new();
    col.add(Some(1)).unwrap();
    assert_eq!(
        col.get(1),
        Err(IntColumnError::IndexOutOfBounds { index: 1, size: 1 })
    );
    assert!(col.set(1, None).is_err());
    assert!(col.erase(1).is_err());
    assert!(col.insert(2, None).is_err());
    assert!(col.erase_range(0, 2).is_err());
    col.insert(1, Some(2)).unwrap();
    assert_eq!(logical(&col), vec![Some(1), Some(2)]);
}

#[test]
fn test_clear_behaves_like_fresh_column() {
    let mut col = NullableIntegerColumn::new();
    for v in [Some(0), None, Some(-1), Some(i64::MAX), None] {
        col.add(v).unwrap();
    }
    assert_ne!(col.null_value(), 0);

    col.clear();
    let fresh = NullableIntegerColumn::new();
    assert_eq!(col, fresh);
    assert_eq!(physical(&col), vec![0]);

    let mut replay = fresh.clone();
    for v in [Some(5), None, Some(0)] {
        col.add(v).unwrap();
        replay.add(v).unwrap();
    }
    assert_eq!(physical(&col), physical(&replay));
}

#[test]
fn test_with_config_initial_sentinel_and_width() {
    crate::observability::init_logging(log::LevelFilter::Trace);
    let config = ColumnConfig {
        sentinel: SentinelConfig {
            initial: 7,
            candidates: vec![8],
        },
        initial_width: 16,
        enable_metrics: true,
    };
    let mut col = NullableIntegerColumn::with_config(Arc::new(config)).unwrap();
    assert_eq!(col.null_value(), 7);
    assert_eq!(col.width(), 16);

    col.add(None).unwrap();
    col.add(Some(7)).unwrap();
    assert_eq!(col.null_value(), 8);
    assert_eq!(logical(&col), vec![None, Some(7)]);

    col.clear();
    assert_eq!(col.null_value(), 7);
    assert_eq!(col.width(), 16);
}

#[test]
fn test_with_config_rejects_bad_width() {
    let config = ColumnConfig {
        initial_width: 7,
        ..ColumnConfig::default()
    };
    assert_eq!(
        NullableIntegerColumn::with_config(Arc::new(config)).unwrap_err(),
        IntColumnError::InvalidWidth(7)
    );
}

#[test]
fn test_with_nulls() {
    let col = NullableIntegerColumn::with_nulls(4, ColumnConfig::default().shared()).unwrap();
    assert_eq!(col.size(), 4);
    assert!(logical(&col).iter().all(Option::is_none));
}

#[test]
fn test_default_values() {
    assert_eq!(NullableIntegerColumn::default_value(true), None);
    assert_eq!(NullableIntegerColumn::default_value(false), Some(0));
}

#[test]
fn test_get_chunk() {
    let mut col = NullableIntegerColumn::new();
    for v in [Some(1), None, Some(3), Some(4), Some(5)] {
        col.add(v).unwrap();
    }
    let chunk = col.get_chunk(1).unwrap();
    assert_eq!(chunk.len(), CHUNK_LEN);
    assert_eq!(
        chunk,
        [None, Some(3), Some(4), Some(5), None, None, None, None]
    );
    assert!(col.get_chunk(5).is_err());
}

#[test]
fn test_move_tail_to_reencodes_against_destination() {
    let mut src = NullableIntegerColumn::new();
    for v in [Some(1), Some(0), None, Some(2)] {
        src.add(v).unwrap();
    }
    let mut dst = NullableIntegerColumn::new();
    dst.add(None).unwrap();

    src.move_tail_to(&mut dst, 1).unwrap();

    assert_eq!(logical(&src), vec![Some(1)]);
    assert_eq!(logical(&dst), vec![None, Some(0), None, Some(2)]);
    assert!(src.move_tail_to(&mut dst, 2).is_err());
}

#[test]
fn test_get_raw_uses_serialized_sentinel() {
    let mut col = NullableIntegerColumn::new();
    for v in [Some(0), None, Some(9)] {
        col.add(v).unwrap();
    }
    let bytes = col.to_bytes();
    let view = RawArrayView::new(&bytes).unwrap();
    assert_eq!(NullableIntegerColumn::get_raw(&view, 0).unwrap(), Some(0));
    assert_eq!(NullableIntegerColumn::get_raw(&view, 1).unwrap(), None);
    assert_eq!(NullableIntegerColumn::get_raw(&view, 2).unwrap(), Some(9));
    assert!(NullableIntegerColumn::get_raw(&view, 3).is_err());

    let restored = NullableIntegerColumn::from_bytes(&bytes, col.config().clone()).unwrap();
    assert_eq!(logical(&restored), logical(&col));
}

#[test]
fn test_from_bytes_requires_sentinel_cell() {
    let bytes = PackedArray::new().to_bytes();
    assert!(matches!(
        NullableIntegerColumn::from_bytes(&bytes, ColumnConfig::default().shared()),
        Err(IntColumnError::RawFormatError(_))
    ));
}

/// Drives any leaf through the same edit script via the shared trait.
fn apply_script<L: IntegerLeaf>(leaf: &mut L, values: &[L::Value]) -> Vec<L::Value> {
    for &v in values {
        leaf.add(v).unwrap();
    }
    leaf.insert(0, values[values.len() - 1]).unwrap();
    leaf.erase(1).unwrap();
    (0..leaf.size()).map(|i| leaf.get(i).unwrap()).collect()
}

#[test]
fn test_integer_leaf_trait_on_both_representations() {
    let mut plain = IntegerColumn::new();
    assert_eq!(apply_script(&mut plain, &[1, 2, 3]), vec![3, 2, 3]);
    assert!(!IntegerLeaf::is_null(&plain, 0).unwrap());

    let mut nullable = NullableIntegerColumn::new();
    assert_eq!(
        apply_script(&mut nullable, &[Some(0), None, Some(3)]),
        vec![Some(3), None, Some(3)]
    );
    assert!(IntegerLeaf::is_null(&nullable, 1).unwrap());

    IntegerLeaf::clear(&mut nullable);
    assert!(IntegerLeaf::is_empty(&nullable));
}

#[test]
fn test_randomized_edits_match_model() {
    let mut rng = StdRng::seed_from_u64(0x1eaf);
    let palette = [0, -1, 1, 2, i64::MIN, i64::MAX, i64::MIN + 1, i64::MAX - 1];

    let mut col = NullableIntegerColumn::new();
    let mut model: Vec<Option<i64>> = Vec::new();

    for step in 0..2_000 {
        let value = if rng.random_bool(0.3) {
            None
        } else if rng.random_bool(0.5) {
            // Aim straight at the current sentinel to force collisions.
            Some(col.null_value())
        } else {
            Some(palette[rng.random_range(0..palette.len())])
        };

        match rng.random_range(0..10) {
            0..=2 => {
                col.add(value).unwrap();
                model.push(value);
            }
            3..=4 => {
                let i = rng.random_range(0..=model.len());
                col.insert(i, value).unwrap();
                model.insert(i, value);
            }
            5..=6 if !model.is_empty() => {
                let i = rng.random_range(0..model.len());
                col.set(i, value).unwrap();
                model[i] = value;
            }
            7 if !model.is_empty() => {
                let i = rng.random_range(0..model.len());
                col.erase(i).unwrap();
                model.remove(i);
            }
            8 if !model.is_empty() => {
                let i = rng.random_range(0..model.len());
                col.set_null(i).unwrap();
                model[i] = None;
            }
            9 if step % 500 == 0 => {
                col.clear();
                model.clear();
            }
            _ => {}
        }
        assert_matches_model(&col, &model);
    }
}
