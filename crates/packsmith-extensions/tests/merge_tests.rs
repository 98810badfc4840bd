//! Integration tests for descriptor merging

mod common;

use common::*;
use packsmith_core::types::Loader;
use packsmith_extensions::descriptor::load_descriptors;
use packsmith_extensions::merge::{merge_mods, merge_names};
use tempfile::TempDir;

const SODIUM_A: &str = "https://modrinth.com/mod/sodium/version/a";
const SODIUM_B: &str = "https://modrinth.com/mod/sodium/version/b";

#[test]
fn test_later_descriptor_wins_per_triple() {
    let first = DescriptorBuilder::new("Base")
        .with_mod("Sodium", &[("fabric", "1.20.1", SODIUM_A)])
        .build();
    let second = DescriptorBuilder::new("Override")
        .with_mod("Sodium", &[("fabric", "1.20.1", SODIUM_B)])
        .build();

    let merged = merge_mods(&[first, second]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.get("Sodium", Loader::Fabric, "1.20.1"), Some(SODIUM_B));
}

#[test]
fn test_untouched_triples_keep_earliest_value() {
    let first = DescriptorBuilder::new("Base")
        .with_mod(
            "Sodium",
            &[("fabric", "1.20.1", SODIUM_A), ("fabric", "1.20.4", SODIUM_A)],
        )
        .build();
    let second = DescriptorBuilder::new("Override")
        .with_mod("Sodium", &[("fabric", "1.20.1", SODIUM_B)])
        .build();

    let merged = merge_mods(&[first, second]);
    assert_eq!(merged.get("Sodium", Loader::Fabric, "1.20.1"), Some(SODIUM_B));
    assert_eq!(merged.get("Sodium", Loader::Fabric, "1.20.4"), Some(SODIUM_A));
}

#[test]
fn test_different_loaders_both_kept() {
    let fabric = DescriptorBuilder::new("A")
        .with_mod("Iris", &[("fabric", "1.20.1", "https://modrinth.com/mod/iris")])
        .build();
    let forge = DescriptorBuilder::new("B")
        .with_mod("Iris", &[("forge", "1.20.1", "https://modrinth.com/mod/oculus")])
        .build();

    let merged = merge_mods(&[fabric, forge]);
    assert_eq!(merged.len(), 2);
    assert!(merged.get("Iris", Loader::Fabric, "1.20.1").is_some());
    assert!(merged.get("Iris", Loader::Forge, "1.20.1").is_some());
}

#[test]
fn test_mod_identity_is_exact_name() {
    let a = DescriptorBuilder::new("A")
        .with_mod("sodium", &[("fabric", "1.20.1", SODIUM_A)])
        .with_mod("Sodium", &[("fabric", "1.20.1", SODIUM_B)])
        .build();

    assert_eq!(merge_mods(&[a]).len(), 2);
}

#[test]
fn test_merge_is_deterministic_and_idempotent() {
    let descriptors = vec![
        DescriptorBuilder::new("A")
            .with_mod("Sodium", &[("fabric", "1.20.1", SODIUM_A)])
            .with_mod("JEI", &[("forge", "1.20.1", "https://www.curseforge.com/jei")])
            .build(),
        DescriptorBuilder::new("B")
            .with_mod("Sodium", &[("fabric", "1.20.1", SODIUM_B)])
            .build(),
    ];

    let once = merge_mods(&descriptors);
    let twice = merge_mods(&descriptors);
    assert_eq!(once, twice);

    let keys: Vec<_> = once.iter().map(|(k, _)| k.name.clone()).collect();
    assert_eq!(keys, vec!["JEI", "Sodium"]);
}

#[test]
fn test_entries_without_known_loaders_contribute_nothing() {
    let d = DescriptorBuilder::new("A")
        .with_mod("Fabric API", &[("quilt", "1.20.1", "https://modrinth.com/mod/qsl")])
        .build();

    assert!(merge_mods(&[d]).is_empty());
}

#[test]
fn test_files_loaded_in_input_order() {
    let temp = TempDir::new().unwrap();
    let first = DescriptorBuilder::new("Opti Utils")
        .with_mod("Sodium", &[("fabric", "1.20.1", SODIUM_A)])
        .write_to(&temp.path().join("opti"));
    let second = DescriptorBuilder::unnamed()
        .with_mod("Sodium", &[("fabric", "1.20.1", SODIUM_B)])
        .write_to(&temp.path().join("extra"));

    let descriptors = load_descriptors(&[first, second]);
    assert_eq!(merge_names(&descriptors), "opti-utils-unnamed");
    assert_eq!(
        merge_mods(&descriptors).get("Sodium", Loader::Fabric, "1.20.1"),
        Some(SODIUM_B)
    );
}
