use crate::shared::*;

fn item(id: &str, name: &str, description: &str, category: ItemCategory, sell_price: u32) -> ItemDef {
    ItemDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category,
        sell_price,
        stack_size: 20,
    }
}

/// Every fish species has an item of the same id; salvage comes from wrecks.
pub fn populate_items(registry: &mut ItemRegistry) {
    let items = vec![
        item("sardine", "Sardine", "Small and silver. Sells by the bucket.", ItemCategory::Fish, 8),
        item("mackerel", "Mackerel", "Striped and restless.", ItemCategory::Fish, 20),
        item("squid", "Squid", "Drawn up by the lantern light.", ItemCategory::Fish, 28),
        item("snapper", "Red Snapper", "A market favourite.", ItemCategory::Fish, 55),
        item("grouper", "Grouper", "Heavy, and it knows it.", ItemCategory::Fish, 90),
        item("barracuda", "Barracuda", "All teeth.", ItemCategory::Fish, 120),
        item("tuna", "Bluefin Tuna", "The catch of the season.", ItemCategory::Fish, 300),
        item("driftwood", "Driftwood", "Washed off some other boat.", ItemCategory::Salvage, 3),
    ];

    for def in items {
        registry.items.insert(def.id.clone(), def);
    }
}
