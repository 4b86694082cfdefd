//! Property-based tests for blueprints and the inventory store.
//!
//! Run with: cargo test --test proptest_blueprints

use glam::{EulerRot, Quat, Vec3};
use proptest::prelude::*;

use weldcraft::blueprints::{relative_offset, Catalog, CatalogEntry, ShapeBlueprint, WeldPart};
use weldcraft::core::{EntryId, Transform, WeldConfig};
use weldcraft::inventory::{InventoryStore, MemoryStore, SaveFile};

// =============================================================================
// Strategies
// =============================================================================

fn arb_vec3(range: std::ops::Range<f32>) -> impl Strategy<Value = Vec3> {
    prop::array::uniform3(range).prop_map(Vec3::from_array)
}

fn arb_rotation() -> impl Strategy<Value = Quat> {
    prop::array::uniform3(-3.1f32..3.1f32)
        .prop_map(|[yaw, pitch, roll]| Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll))
}

fn arb_transform() -> impl Strategy<Value = Transform> {
    (arb_vec3(-50.0..50.0), arb_rotation(), arb_vec3(0.1..5.0))
        .prop_map(|(position, rotation, scale)| Transform::new(position, rotation, scale))
}

fn arb_simple() -> impl Strategy<Value = ShapeBlueprint> {
    prop::sample::select(vec!["cube", "rod", "plate"])
        .prop_map(|id| ShapeBlueprint::simple(id, id.to_uppercase()))
}

/// Welded trees up to four levels deep
fn arb_blueprint() -> impl Strategy<Value = ShapeBlueprint> {
    arb_simple().prop_recursive(4, 24, 3, |inner| {
        (
            "[a-f0-9]{8}",
            prop::collection::vec((inner, arb_transform()), 1..=3),
        )
            .prop_map(|(id, parts)| {
                let children = parts
                    .into_iter()
                    .map(|(blueprint, local)| WeldPart::new(blueprint, local))
                    .collect();
                ShapeBlueprint::composite(id.clone(), format!("Welded {}", id), children)
            })
    })
}

#[derive(Debug, Clone)]
enum StoreOp {
    Weld,
    Claim(usize),
    ClaimMissing,
    Clear,
}

fn arb_ops() -> impl Strategy<Value = Vec<StoreOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(StoreOp::Weld),
            3 => (0usize..8).prop_map(StoreOp::Claim),
            1 => Just(StoreOp::ClaimMissing),
            1 => Just(StoreOp::Clear),
        ],
        0..40,
    )
}

fn store() -> InventoryStore<MemoryStore> {
    let catalog = Catalog::load(vec![
        CatalogEntry::new("cube", "Cube", None),
        CatalogEntry::new("rod", "Rod", None),
        CatalogEntry::new("plate", "Plate", None),
    ]);
    InventoryStore::new(catalog, MemoryStore::new(), WeldConfig::default())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_save_file_round_trip(
        inventory in prop::collection::vec(arb_blueprint(), 0..4),
        pile in prop::collection::vec(arb_blueprint(), 0..4),
    ) {
        let save = SaveFile { inventory, pile };
        let restored = SaveFile::from_slice(&serde_json::to_vec_pretty(&save).unwrap()).unwrap();

        prop_assert_eq!(restored.inventory.len(), save.inventory.len());
        prop_assert_eq!(restored.pile.len(), save.pile.len());
        for (a, b) in save.inventory.iter().chain(&save.pile).zip(restored.inventory.iter().chain(&restored.pile)) {
            prop_assert!(a.approx_eq(b, 1e-6));
            prop_assert_eq!(a.depth(), b.depth());
        }
    }

    #[test]
    fn proptest_relative_offset_reproduces_second_placement(
        a_position in arb_vec3(-50.0..50.0),
        a_rotation in arb_rotation(),
        b_world in arb_transform(),
    ) {
        let a_world = Transform::from_position_rotation(a_position, a_rotation);
        let offset = relative_offset(&a_world, &b_world);
        let rebuilt = a_world.mul_transform(&offset);

        prop_assert!(
            rebuilt.abs_diff_eq(&b_world, 1e-3),
            "rebuilt {:?} != {:?}",
            rebuilt,
            b_world
        );
        prop_assert_eq!(offset.scale, b_world.scale);
    }

    #[test]
    fn proptest_relative_offset_position_under_uniform_scale(
        a_position in arb_vec3(-50.0..50.0),
        a_rotation in arb_rotation(),
        a_scale in 0.2f32..4.0,
        b_position in arb_vec3(-50.0..50.0),
    ) {
        let a_world = Transform::new(a_position, a_rotation, Vec3::splat(a_scale));
        let offset = relative_offset(&a_world, &Transform::from_position(b_position));

        prop_assert!(a_world.transform_point(offset.position).abs_diff_eq(b_position, 1e-2));
    }

    #[test]
    fn proptest_entries_live_in_exactly_one_list(ops in arb_ops()) {
        let mut store = store();
        store.load().unwrap();
        let starting = store.inventory().len();
        let mut writes = store.backend().write_count();
        let mut welded = 0usize;
        let mut cleared = 0usize;

        for op in ops {
            match op {
                StoreOp::Weld => {
                    store.add_to_pile(ShapeBlueprint::composite(
                        "w",
                        "Welded Cube-Rod",
                        vec![
                            WeldPart::anchored(ShapeBlueprint::simple("cube", "Cube")),
                            WeldPart::anchored(ShapeBlueprint::simple("rod", "Rod")),
                        ],
                    )).unwrap();
                    welded += 1;
                    writes += 1;
                }
                StoreOp::Claim(n) => {
                    if let Some(id) = store.pile().get(n).map(|e| e.id) {
                        prop_assert!(store.move_to_inventory(id).unwrap());
                        writes += 1;
                    }
                }
                StoreOp::ClaimMissing => {
                    prop_assert!(!store.move_to_inventory(EntryId::next()).unwrap());
                }
                StoreOp::Clear => {
                    cleared += store.clear_pile().unwrap();
                    writes += 1;
                }
            }

            prop_assert_eq!(store.backend().write_count(), writes);
        }

        let mut ids: Vec<EntryId> = store
            .inventory()
            .iter()
            .chain(store.pile())
            .map(|e| e.id)
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
        prop_assert_eq!(total, starting + welded - cleared);
    }
}
