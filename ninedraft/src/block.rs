//! Blocks in the game world and their break tables.

use tracing::trace;

use crate::effect::{Effect, ItemSpec, BlockSpec, CraftKind};
use crate::item::Item;
use crate::GameError;


/// A break table entry maps an item id to a `(time, correct)` pair, where a
/// higher time makes the block harder to mine with that item and `correct`
/// is true iff the item is the proper one for breaking the block. Every
/// table carries a `"hand"` fallback entry.
pub type BreakTable = &'static [(&'static str, (f32, bool))];

pub const DIRT_BREAK_TABLE: BreakTable = &[
    ("hand", (0.75, true)),
    ("wood_shovel", (0.4, true)),
    ("stone_shovel", (0.2, true)),
    ("iron_shovel", (0.15, true)),
    ("diamond_shovel", (0.1, true)),
    ("golden_shovel", (0.1, true)),
];

pub const WOOD_BREAK_TABLE: BreakTable = &[
    ("hand", (3.0, true)),
    ("wood_axe", (1.5, true)),
    ("stone_axe", (0.75, true)),
    ("iron_axe", (0.5, true)),
    ("diamond_axe", (0.4, true)),
    ("golden_axe", (0.25, true)),
];

pub const STONE_BREAK_TABLE: BreakTable = &[
    ("hand", (7.5, false)),
    ("wood_pickaxe", (1.15, true)),
    ("stone_pickaxe", (0.6, true)),
    ("iron_pickaxe", (0.4, true)),
    ("diamond_pickaxe", (0.3, true)),
    ("golden_pickaxe", (0.2, true)),
];

pub const CRAFTING_TABLE_BREAK_TABLE: BreakTable = &[
    ("hand", (7.5, false)),
    ("wood_pickaxe", (1.15, true)),
    ("stone_pickaxe", (0.6, true)),
    ("iron_pickaxe", (0.4, true)),
    ("diamond_pickaxe", (0.3, true)),
    ("golden_pickaxe", (0.2, true)),
];

pub const LEAF_BREAK_TABLE: BreakTable = &[
    ("hand", (0.35, false)),
    ("shears", (0.4, true)),
    ("sword", (0.2, false)),
];

pub const MAYHEM_BREAK_TABLE: BreakTable = &[
    ("hand", (5.0, true)),
];

/// Display colours of the trick candle block, one per stage.
pub const MAYHEM_COLOURS: [&str; 3] = ["#F47C7C", "#F7F48B", "#70A1D7"];


/// The behavioural kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A plain block that drops item forms of itself when properly mined.
    Resource {
        drop_count: u32,
    },
    /// Swaying in the breeze, perhaps it hides a tasty surprise.
    Leaf,
    /// A resource block that also opens a 3x3 crafting surface when used.
    CraftingTable,
    /// Just when you thought you've blown it out, it comes back again.
    Mayhem {
        stage: u8,
    },
}

/// One of the building blocks in the sandbox game.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The unique id of this block.
    pub id: &'static str,
    /// The block's remaining hitpoints.
    pub hitpoints: f32,
    /// The block's starting hitpoints.
    pub max_hitpoints: f32,
    /// The behavioural kind of this block.
    pub kind: BlockKind,
    break_table: BreakTable,
}

impl Block {

    /// Construct a block from its typed factory key. Simple ids without a
    /// block definition are a fatal error, they never fall back to another
    /// block kind.
    pub fn from_spec(spec: BlockSpec) -> Result<Self, GameError> {
        Ok(match spec {
            BlockSpec::Simple("leaf") => Self::new("leaves", BlockKind::Leaf, LEAF_BREAK_TABLE),
            BlockSpec::Simple("dirt") => Self::new("dirt", BlockKind::Resource { drop_count: 5 }, DIRT_BREAK_TABLE),
            BlockSpec::Simple("wood") => Self::new("wood", BlockKind::Resource { drop_count: 5 }, WOOD_BREAK_TABLE),
            BlockSpec::Simple("stone") => Self::new("stone", BlockKind::Resource { drop_count: 5 }, STONE_BREAK_TABLE),
            BlockSpec::Simple("crafting_table") => Self::new("crafting_table", BlockKind::CraftingTable, CRAFTING_TABLE_BREAK_TABLE),
            BlockSpec::Simple(id) => return Err(GameError::UnknownBlock(id.to_string())),
            BlockSpec::Mayhem(stage) => Self::new("mayhem", BlockKind::Mayhem { stage: stage % 3 }, MAYHEM_BREAK_TABLE),
        })
    }

    /// Construct a block from its legacy string parts.
    pub fn from_parts(parts: &[&str]) -> Result<Self, GameError> {
        Self::from_spec(BlockSpec::from_parts(parts)?)
    }

    fn new(id: &'static str, kind: BlockKind, break_table: BreakTable) -> Self {
        Self {
            id,
            hitpoints: 20.0,
            max_hitpoints: 20.0,
            kind,
            break_table,
        }
    }

    /// The `(time, correct)` pair of the break table for the given item,
    /// falling back to the hand entry for items the table does not know.
    pub fn damage_by_tool(&self, item: &Item) -> (f32, bool) {
        let entry = self.break_table.iter()
            .find(|&&(id, _)| id == item.id)
            .or_else(|| self.break_table.iter().find(|&&(id, _)| id == "hand"));
        // Every break table constant carries a hand entry.
        entry.map(|&(_, pair)| pair).unwrap_or((f32::INFINITY, false))
    }

    /// Attempt to mine the block with the given item, dealing `10 / time`
    /// damage. Returns whether the effective item was the correct one and
    /// whether the block is now completely mined.
    pub fn mine(&mut self, effective_item: &Item, _actual_item: &Item, _luck: f32) -> (bool, bool) {

        let (time, correct_item) = self.damage_by_tool(effective_item);
        let damage = 10.0 / time;
        self.hitpoints -= damage;

        trace!("did {damage} damage to {:?} with {:?} (correct: {correct_item})", self.id, effective_item.id);

        (correct_item, self.is_mined())

    }

    /// Return true iff this block is completely mined.
    pub fn is_mined(&self) -> bool {
        self.hitpoints <= 0.0
    }

    /// The effects this block drops once mined, given the player's luck
    /// factor in `[0, 1)` and whether the correct item was used.
    pub fn get_drops(&self, luck: f32, correct_item_used: bool) -> Option<Vec<Effect>> {
        match self.kind {
            BlockKind::Resource { drop_count } => {
                correct_item_used.then(|| {
                    vec![Effect::Item(ItemSpec::Simple(self.id)); drop_count as usize]
                })
            }
            BlockKind::CraftingTable => {
                correct_item_used.then(|| vec![Effect::Item(ItemSpec::Simple(self.id))])
            }
            BlockKind::Leaf => {
                (!correct_item_used && luck < 0.3)
                    .then(|| vec![Effect::Item(ItemSpec::Simple("apple"))])
            }
            BlockKind::Mayhem { stage } => {
                Some(vec![Effect::Block(BlockSpec::Mayhem((stage + 1) % 3))])
            }
        }
    }

    /// Blocks are always mineable.
    pub fn is_mineable(&self) -> bool {
        true
    }

    /// Return true iff this block does something when used.
    pub fn can_use(&self) -> bool {
        matches!(self.kind, BlockKind::CraftingTable)
    }

    /// Use this block, returning the resulting effect if any.
    pub fn use_block(&self) -> Option<Effect> {
        match self.kind {
            BlockKind::CraftingTable => Some(Effect::Crafting(CraftKind::CraftingTable)),
            _ => None,
        }
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn mining_is_monotonic() {

        let mut stone = Block::from_parts(&["stone"]).unwrap();
        let pickaxe = Item::from_parts(&["pickaxe", "wood"]).unwrap();
        let hand = Item::hand();

        // 10 / 1.15 damage per correct swing.
        let (correct, mined) = stone.mine(&pickaxe, &pickaxe, 0.0);
        assert!(correct);
        assert!(!mined);
        assert!((stone.hitpoints - (20.0 - 10.0 / 1.15)).abs() < 1e-4);

        let before = stone.hitpoints;
        stone.mine(&hand, &hand, 0.0);
        assert!(stone.hitpoints < before);

        // Two more correct swings finish the block off.
        stone.mine(&pickaxe, &pickaxe, 0.0);
        let (_, mined) = stone.mine(&pickaxe, &pickaxe, 0.0);
        assert!(mined);
        assert!(stone.is_mined());

    }

    #[test]
    fn hand_is_wrong_for_stone() {
        let mut stone = Block::from_parts(&["stone"]).unwrap();
        let (correct, _) = stone.mine(&Item::hand(), &Item::hand(), 0.0);
        assert!(!correct);
    }

    #[test]
    fn resource_drops() {

        let dirt = Block::from_parts(&["dirt"]).unwrap();
        let drops = dirt.get_drops(0.0, true).unwrap();
        assert_eq!(drops.len(), 5);
        assert_eq!(drops[0], Effect::Item(ItemSpec::Simple("dirt")));
        assert_eq!(dirt.get_drops(0.0, false), None);

        let table = Block::from_parts(&["crafting_table"]).unwrap();
        assert_eq!(table.get_drops(0.0, true).unwrap().len(), 1);

    }

    #[test]
    fn leaf_drops() {
        let leaf = Block::from_parts(&["leaf"]).unwrap();
        assert_eq!(leaf.id, "leaves");
        assert_eq!(leaf.get_drops(0.2, false).unwrap(), vec![Effect::Item(ItemSpec::Simple("apple"))]);
        assert_eq!(leaf.get_drops(0.5, false), None);
        // Shears are the correct tool and yield nothing extra.
        assert_eq!(leaf.get_drops(0.0, true), None);
    }

    #[test]
    fn mayhem_cycles_stages() {
        let mayhem = Block::from_parts(&["mayhem", "2"]).unwrap();
        // The next stage always drops, whatever item was used.
        assert_eq!(mayhem.get_drops(0.9, false).unwrap(), vec![Effect::Block(BlockSpec::Mayhem(0))]);
    }

    #[test]
    fn only_crafting_table_is_useable() {
        assert!(Block::from_parts(&["crafting_table"]).unwrap().can_use());
        assert!(!Block::from_parts(&["dirt"]).unwrap().can_use());
        assert_eq!(
            Block::from_parts(&["crafting_table"]).unwrap().use_block(),
            Some(Effect::Crafting(CraftKind::CraftingTable)),
        );
    }

}
