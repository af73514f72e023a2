use crate::shared::*;

/// Populate the FishRegistry with the night-water species.
///
/// `strength` drives every reeling rate: weak fish forgive sloppy
/// balancing, strong ones punish it.
pub fn populate_fish(registry: &mut FishRegistry) {
    let fish = [
        ("sardine", "Sardine", 0.1, 18.0, 0.15),
        ("mackerel", "Mackerel", 0.8, 35.0, 0.3),
        ("squid", "Squid", 1.2, 40.0, 0.35),
        ("snapper", "Red Snapper", 4.5, 60.0, 0.5),
        ("grouper", "Grouper", 12.0, 90.0, 0.65),
        ("barracuda", "Barracuda", 9.0, 120.0, 0.75),
        ("tuna", "Bluefin Tuna", 60.0, 180.0, 0.9),
    ];

    registry.species = fish
        .iter()
        .map(|&(id, name, weight, size, strength)| FishSpecies {
            id: id.to_string(),
            name: name.to_string(),
            weight,
            size,
            strength,
            reward_item: id.to_string(),
        })
        .collect();
}
