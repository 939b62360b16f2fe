//! Conceptual, non-physical items. An item lives in an inventory stack and
//! only exists in the world wrapped in a dropped-item thing.

use crate::effect::{Effect, ItemSpec, BlockSpec, Stat};
use crate::GameError;


/// Types of tools that can be crafted from a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Axe,
    Shovel,
    Hoe,
    Pickaxe,
    Sword,
}

impl ToolKind {

    /// Parse a tool kind from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "axe" => Self::Axe,
            "shovel" => Self::Shovel,
            "hoe" => Self::Hoe,
            "pickaxe" => Self::Pickaxe,
            "sword" => Self::Sword,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Axe => "axe",
            Self::Shovel => "shovel",
            Self::Hoe => "hoe",
            Self::Pickaxe => "pickaxe",
            Self::Sword => "sword",
        }
    }

}

/// Materials a tool can be crafted from, each with its own durability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Wood,
    Stone,
    Iron,
    Gold,
    Diamond,
}

impl Material {

    /// Parse a material from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "wood" => Self::Wood,
            "stone" => Self::Stone,
            "iron" => Self::Iron,
            "gold" => Self::Gold,
            "diamond" => Self::Diamond,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Iron => "iron",
            Self::Gold => "gold",
            Self::Diamond => "diamond",
        }
    }

    /// The starting durability of a tool crafted from this material.
    pub fn durability(self) -> f32 {
        match self {
            Self::Wood => 60.0,
            Self::Stone => 132.0,
            Self::Iron => 251.0,
            Self::Gold => 33.0,
            Self::Diamond => 1562.0,
        }
    }

}

/// The unique item id of a tool of the given kind and material, in
/// `<material>_<kind>` form.
pub fn tool_id(kind: ToolKind, material: Material) -> &'static str {
    use ToolKind::*;
    use Material::*;
    match (material, kind) {
        (Wood, Axe) => "wood_axe",
        (Wood, Shovel) => "wood_shovel",
        (Wood, Hoe) => "wood_hoe",
        (Wood, Pickaxe) => "wood_pickaxe",
        (Wood, Sword) => "wood_sword",
        (Stone, Axe) => "stone_axe",
        (Stone, Shovel) => "stone_shovel",
        (Stone, Hoe) => "stone_hoe",
        (Stone, Pickaxe) => "stone_pickaxe",
        (Stone, Sword) => "stone_sword",
        (Iron, Axe) => "iron_axe",
        (Iron, Shovel) => "iron_shovel",
        (Iron, Hoe) => "iron_hoe",
        (Iron, Pickaxe) => "iron_pickaxe",
        (Iron, Sword) => "iron_sword",
        (Gold, Axe) => "gold_axe",
        (Gold, Shovel) => "gold_shovel",
        (Gold, Hoe) => "gold_hoe",
        (Gold, Pickaxe) => "gold_pickaxe",
        (Gold, Sword) => "gold_sword",
        (Diamond, Axe) => "diamond_axe",
        (Diamond, Shovel) => "diamond_shovel",
        (Diamond, Hoe) => "diamond_hoe",
        (Diamond, Pickaxe) => "diamond_pickaxe",
        (Diamond, Sword) => "diamond_sword",
    }
}


/// The behavioural kind of an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemKind {
    /// The player's hands, infinitely durable and the default attack item.
    Hand,
    /// An item that places a block form of itself.
    Block,
    /// An item that feeds the player's food (or health) when consumed.
    Food {
        strength: f32,
    },
    /// A tool that wears down when swung at the wrong block.
    Tool {
        kind: ToolKind,
        durability: f32,
        max_durability: f32,
    },
}

/// A conceptual item in the game. Items of the same id are interchangeable
/// apart from their wear state.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// The unique id of this item.
    pub id: &'static str,
    /// The maximum stack size of this item, unstackable items have 1.
    pub max_stack_size: u32,
    /// The range at which this item's attack can reach, in cell spans.
    pub attack_range: f32,
    /// The behavioural kind of this item.
    pub kind: ItemKind,
}

impl Item {

    /// Construct an item from its typed factory key. Simple ids without an
    /// item definition are a fatal error.
    pub fn from_spec(spec: ItemSpec) -> Result<Self, GameError> {
        Ok(match spec {
            ItemSpec::Simple("hands") => Self {
                id: "hands",
                max_stack_size: 1,
                attack_range: 10.0,
                kind: ItemKind::Hand,
            },
            ItemSpec::Simple("apple") => Self {
                id: "apple",
                max_stack_size: 64,
                attack_range: 10.0,
                kind: ItemKind::Food { strength: 2.0 },
            },
            ItemSpec::Simple(id @ ("dirt" | "wood" | "stone" | "leave" | "stick" | "crafting_table")) => Self {
                id,
                max_stack_size: 64,
                attack_range: 10.0,
                kind: ItemKind::Block,
            },
            ItemSpec::Simple(id) => return Err(GameError::UnknownItem(id.to_string())),
            ItemSpec::Tool(kind, material) => Self {
                id: tool_id(kind, material),
                max_stack_size: 1,
                attack_range: 10.0,
                kind: ItemKind::Tool {
                    kind,
                    durability: material.durability(),
                    max_durability: material.durability(),
                },
            },
        })
    }

    /// Construct an item from its legacy string parts.
    pub fn from_parts(parts: &[&str]) -> Result<Self, GameError> {
        Self::from_spec(ItemSpec::from_parts(parts)?)
    }

    /// The player's hands.
    pub fn hand() -> Self {
        Self {
            id: "hands",
            max_stack_size: 1,
            attack_range: 10.0,
            kind: ItemKind::Hand,
        }
    }

    /// Return true iff this item can currently be used to attack.
    pub fn can_attack(&self) -> bool {
        match self.kind {
            ItemKind::Hand => true,
            ItemKind::Tool { durability, .. } => durability > 0.0,
            _ => false,
        }
    }

    /// Record an attack against a thing in the world. A tool wears down by
    /// one point when the swing was not successful.
    pub fn attack(&mut self, successful: bool) {
        if let ItemKind::Tool { durability, .. } = &mut self.kind {
            if !successful {
                *durability = (*durability - 1.0).max(0.0);
            }
        }
    }

    /// The effects of placing this item into the world.
    pub fn place(&self) -> Vec<Effect> {
        match self.kind {
            ItemKind::Block => vec![Effect::Block(BlockSpec::Simple(self.id))],
            ItemKind::Food { strength } => vec![Effect::Stat { stat: Stat::Food, strength }],
            _ => Vec::new(),
        }
    }

    /// The item's remaining durability, none for items that do not wear.
    pub fn durability(&self) -> Option<f32> {
        match self.kind {
            ItemKind::Hand => Some(f32::INFINITY),
            ItemKind::Tool { durability, .. } => Some(durability),
            _ => None,
        }
    }

    /// The item's maximum durability, none for items that do not wear.
    pub fn max_durability(&self) -> Option<f32> {
        match self.kind {
            ItemKind::Hand => Some(f32::INFINITY),
            ItemKind::Tool { max_durability, .. } => Some(max_durability),
            _ => None,
        }
    }

    /// Return true iff this item is stackable in an inventory.
    pub fn is_stackable(&self) -> bool {
        self.max_stack_size != 1
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn tool_wear() {

        let mut pickaxe = Item::from_parts(&["pickaxe", "wood"]).unwrap();
        assert_eq!(pickaxe.id, "wood_pickaxe");
        assert_eq!(pickaxe.durability(), Some(60.0));

        // Successful swings do not wear the tool.
        pickaxe.attack(true);
        assert_eq!(pickaxe.durability(), Some(60.0));

        pickaxe.attack(false);
        assert_eq!(pickaxe.durability(), Some(59.0));

        for _ in 0..100 {
            pickaxe.attack(false);
        }
        assert_eq!(pickaxe.durability(), Some(0.0));
        assert!(!pickaxe.can_attack());

    }

    #[test]
    fn hand_is_infinitely_durable() {
        let mut hand = Item::hand();
        hand.attack(false);
        assert!(hand.can_attack());
        assert_eq!(hand.durability(), Some(f32::INFINITY));
    }

    #[test]
    fn place_effects() {

        let dirt = Item::from_parts(&["dirt"]).unwrap();
        assert_eq!(dirt.place(), vec![Effect::Block(BlockSpec::Simple("dirt"))]);

        let apple = Item::from_parts(&["apple"]).unwrap();
        assert_eq!(apple.place(), vec![Effect::Stat { stat: Stat::Food, strength: 2.0 }]);

        assert!(Item::hand().place().is_empty());

    }

    #[test]
    fn stackability() {
        assert!(Item::from_parts(&["dirt"]).unwrap().is_stackable());
        assert!(!Item::from_parts(&["sword", "iron"]).unwrap().is_stackable());
    }

}
