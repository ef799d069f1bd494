//! Integration tests for the public cave-generation surface.

use hexcavern::generation::utils;
use hexcavern::{
    flood_fill, generate, group_count, inner_positions, positions, CaveGenerator,
    GenerationConfig, Generator, HexcavernResult, Pos, TileKind,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn start() -> Pos {
    Pos::new(24, 12)
}

#[test]
fn test_generate_produces_valid_level() -> HexcavernResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let level = generate(12345, start())?;
    utils::validate_level(&level)?;
    Ok(())
}

#[test]
fn test_tile_mapping_is_total() {
    let level = generate(7, start()).unwrap();
    let keys: HashSet<Pos> = level.tiles.keys().copied().collect();
    let expected: HashSet<Pos> = positions().collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_player_stands_on_floor() {
    for seed in [1u64, 7, 12345] {
        let level = generate(seed, start()).unwrap();
        assert_eq!(level.tiles[&level.player_pos], TileKind::Floor, "seed {seed}");
    }
}

#[test]
fn test_passable_region_is_connected() {
    let level = generate(7, start()).unwrap();
    let reachable = flood_fill(level.player_pos, |p| level.is_passable(p));
    let passable: HashSet<Pos> = positions().filter(|&p| level.is_passable(p)).collect();
    assert_eq!(reachable, passable, "no disconnected floor islands may remain");
}

#[test]
fn test_no_small_attached_caves() {
    // A cave tile is a passable tile whose passable neighborhood forms one
    // contiguous run; chambers of 2 or 3 such tiles must have been filled.
    for seed in [1u64, 7, 12345] {
        let level = generate(seed, start()).unwrap();
        let is_cave = |p: Pos| {
            level.is_passable(p) && group_count(p, |n| level.is_passable(n)) == 1
        };
        for pos in inner_positions() {
            if !is_cave(pos) {
                continue;
            }
            let region = flood_fill(pos, is_cave);
            assert!(
                region.len() != 2 && region.len() != 3,
                "seed {seed} left a {}-tile chamber at {pos:?}",
                region.len()
            );
        }
    }
}

#[test]
fn test_seed_sweep_validates() {
    // A fixed hundred-seed sweep so connectivity regressions cannot hide
    // behind seed luck. Chamber filling once disconnected the level on
    // several of these seeds, 25 and 100 among them.
    for seed in 0..=100u64 {
        let level = generate(seed, start()).unwrap();
        if let Err(e) = utils::validate_level(&level) {
            panic!("seed {seed}: {e}");
        }
    }
}

#[test]
fn test_generation_is_deterministic() {
    let first = generate(987_654, start()).unwrap();
    let second = generate(987_654, start()).unwrap();
    assert_eq!(first, second, "same seed and start must reproduce the level exactly");
}

#[test]
fn test_different_seeds_generate_different_levels() {
    let first = generate(1, start()).unwrap();
    let second = generate(2, start()).unwrap();
    assert_ne!(first.tiles, second.tiles);
}

#[test]
fn test_vegetation_stays_inside_and_off_the_player() {
    let level = generate(31337, start()).unwrap();
    for pos in positions() {
        match level.tiles[&pos] {
            TileKind::TallGrass | TileKind::ShortGrass => {
                assert!(pos.in_inner_bounds(), "grass on the border at {pos:?}");
                assert_ne!(pos, level.player_pos);
            }
            TileKind::ShallowWater => panic!("cave generation must not place water"),
            TileKind::Wall | TileKind::Floor => {}
        }
    }
}

#[test]
fn test_generator_trait_roundtrip() -> HexcavernResult<()> {
    let config = GenerationConfig::new(555);
    let mut rng = utils::create_rng(&config);
    let generator = CaveGenerator::new(start());

    let level = generator.generate(&config, &mut rng)?;
    generator.validate(&level, &config)?;
    assert_eq!(generator.generator_type(), "CaveGenerator");
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_generated_levels_uphold_invariants(seed in any::<u64>()) {
        let level = generate(seed, start());
        prop_assert!(level.is_ok());
        prop_assert!(utils::validate_level(&level.unwrap()).is_ok());
    }

    #[test]
    fn prop_generation_is_deterministic(seed in any::<u64>()) {
        let first = generate(seed, start());
        let second = generate(seed, start());
        prop_assert!(first.is_ok() && second.is_ok());
        prop_assert_eq!(first.unwrap(), second.unwrap());
    }
}
