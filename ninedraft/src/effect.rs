//! Effects are deferred world mutation requests. Items and blocks never touch
//! the world themselves, they return effects that the controller applies.

use crate::item::{ToolKind, Material};
use crate::GameError;


/// A player statistic that an effect can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Food,
    Health,
}

/// The kind of crafting surface an effect requests to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftKind {
    /// The player's own 2x2 crafting grid.
    Basic,
    /// The 3x3 grid opened by using a crafting table.
    CraftingTable,
}

/// A typed factory key for items, this replaces the free-form tuple of
/// strings of the legacy save format while still being parseable from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSpec {
    /// A single-id item, such as `dirt` or `apple`.
    Simple(&'static str),
    /// A tool of the given kind crafted from the given material.
    Tool(ToolKind, Material),
}

impl ItemSpec {

    /// Parse an item spec from its legacy string parts, such as
    /// `["dirt"]` or `["pickaxe", "stone"]`. Unknown keys are fatal.
    pub fn from_parts(parts: &[&str]) -> Result<Self, GameError> {
        match *parts {
            [id] => Ok(ItemSpec::Simple(match id {
                "hands" => "hands",
                "dirt" => "dirt",
                "wood" => "wood",
                "stone" => "stone",
                "leave" => "leave",
                "stick" => "stick",
                "crafting_table" => "crafting_table",
                "apple" => "apple",
                _ => return Err(GameError::UnknownItem(format!("{parts:?}"))),
            })),
            [kind, material] => {
                match (ToolKind::from_name(kind), Material::from_name(material)) {
                    (Some(kind), Some(material)) => Ok(ItemSpec::Tool(kind, material)),
                    _ => Err(GameError::UnknownItem(format!("{parts:?}"))),
                }
            }
            _ => Err(GameError::UnknownItem(format!("{parts:?}"))),
        }
    }

}

/// A typed factory key for blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSpec {
    /// A single-id block, such as `dirt` or `crafting_table`.
    Simple(&'static str),
    /// The trick candle block, at the given stage.
    Mayhem(u8),
}

impl BlockSpec {

    /// Parse a block spec from its legacy string parts, such as `["leaf"]`
    /// or `["mayhem", "1"]`. Unknown keys are fatal.
    pub fn from_parts(parts: &[&str]) -> Result<Self, GameError> {
        match *parts {
            [id] => Ok(BlockSpec::Simple(match id {
                "leaf" => "leaf",
                "dirt" => "dirt",
                "wood" => "wood",
                "stone" => "stone",
                "crafting_table" => "crafting_table",
                _ => return Err(GameError::UnknownBlock(format!("{parts:?}"))),
            })),
            ["mayhem", stage] => {
                match stage.parse::<u8>() {
                    Ok(stage) if stage < 3 => Ok(BlockSpec::Mayhem(stage)),
                    _ => Err(GameError::UnknownBlock(format!("{parts:?}"))),
                }
            }
            _ => Err(GameError::UnknownBlock(format!("{parts:?}"))),
        }
    }

}

/// A deferred world mutation, produced by items being placed or blocks being
/// mined and consumed by the game controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Spawn a dropped item in the world.
    Item(ItemSpec),
    /// Place a block in the world.
    Block(BlockSpec),
    /// Feed a player statistic by the given strength.
    Stat {
        stat: Stat,
        strength: f32,
    },
    /// Open a crafting surface of the given kind.
    Crafting(CraftKind),
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn parse_item_specs() {
        assert_eq!(ItemSpec::from_parts(&["dirt"]).unwrap(), ItemSpec::Simple("dirt"));
        assert_eq!(ItemSpec::from_parts(&["pickaxe", "diamond"]).unwrap(),
            ItemSpec::Tool(ToolKind::Pickaxe, Material::Diamond));
        assert!(ItemSpec::from_parts(&["furnace"]).is_err());
        assert!(ItemSpec::from_parts(&["pickaxe", "cheese"]).is_err());
    }

    #[test]
    fn parse_block_specs() {
        assert_eq!(BlockSpec::from_parts(&["leaf"]).unwrap(), BlockSpec::Simple("leaf"));
        assert_eq!(BlockSpec::from_parts(&["mayhem", "2"]).unwrap(), BlockSpec::Mayhem(2));
        assert!(BlockSpec::from_parts(&["mayhem", "3"]).is_err());
        // Ids without a block definition must not silently fall back to
        // another block kind.
        assert!(BlockSpec::from_parts(&["stick"]).is_err());
    }

}
