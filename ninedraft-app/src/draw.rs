//! Routing of physical things to primitive draw commands. The router does
//! not talk to any toolkit, it only produces shape, colour and tag, which a
//! frontend (or the demo driver's log) can consume.

use thiserror::Error;

use ninedraft::block::{BlockKind, MAYHEM_COLOURS};
use ninedraft::geom::BoundingBox;
use ninedraft::thing::{MobKind, Thing};


/// Block ids mapped to their display colours.
pub static BLOCK_COLOURS: &[(&str, &str)] = &[
    ("diamond", "blue"),
    ("dirt", "#552015"),
    ("stone", "grey"),
    ("wood", "#723f1c"),
    ("leaves", "green"),
    ("crafting_table", "pink"),
    ("furnace", "black"),
];

/// Item ids mapped to their display colours.
pub static ITEM_COLOURS: &[(&str, &str)] = &[
    ("diamond", "blue"),
    ("dirt", "#552015"),
    ("stone", "grey"),
    ("wood", "#723f1c"),
    ("apple", "#ff0000"),
    ("leaves", "green"),
    ("crafting_table", "pink"),
    ("furnace", "black"),
    ("cooked_apple", "red4"),
];

const BIRD_COLOUR: &str = "#87CEEB";
const WALL_COLOUR: &str = "black";


/// Error type for the draw routing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// A thing refers to an id with no colour in the relevant table. This
    /// is a programming error in the tables, so rendering aborts.
    #[error("no colour defined for id {0:?}")]
    UnknownColour(&'static str),
}

/// The primitive shape of a draw command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rectangle,
    Oval,
    Diamond,
}

/// A single primitive to put on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Where to draw, in pixel coordinates.
    pub bb: BoundingBox,
    pub shape: Shape,
    pub colour: &'static str,
    /// A tag grouping commands by the kind of thing they come from.
    pub tag: &'static str,
}

/// Routes each kind of physical thing to the draw commands representing it.
pub struct WorldViewRouter {
    block_colours: &'static [(&'static str, &'static str)],
    item_colours: &'static [(&'static str, &'static str)],
    player_colour: &'static str,
}

impl Default for WorldViewRouter {
    fn default() -> Self {
        Self::new(BLOCK_COLOURS, ITEM_COLOURS)
    }
}

impl WorldViewRouter {

    pub fn new(
        block_colours: &'static [(&'static str, &'static str)],
        item_colours: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            block_colours,
            item_colours,
            player_colour: "red",
        }
    }

    /// Produce the draw command for a single thing occupying the given
    /// bounding box.
    pub fn draw(&self, thing: &Thing, bb: BoundingBox) -> Result<DrawCommand, DrawError> {
        Ok(match thing {
            Thing::Block(block) => {
                // Trick candle stages carry their own colours, so they take
                // priority over the block colour table.
                let colour = match block.kind {
                    BlockKind::Mayhem { stage } => MAYHEM_COLOURS[stage as usize % MAYHEM_COLOURS.len()],
                    _ => lookup(self.block_colours, block.id)?,
                };
                DrawCommand { bb, shape: Shape::Rectangle, colour, tag: "block" }
            }
            Thing::Item(dropped) => {
                let colour = lookup(self.item_colours, dropped.item.id)?;
                DrawCommand { bb, shape: Shape::Rectangle, colour, tag: "physical_item" }
            }
            Thing::Player(_) => {
                DrawCommand { bb, shape: Shape::Oval, colour: self.player_colour, tag: "player" }
            }
            Thing::Mob(mob) => {
                match mob.kind {
                    MobKind::Bird => DrawCommand { bb, shape: Shape::Diamond, colour: BIRD_COLOUR, tag: "bird" },
                }
            }
            Thing::Wall(_) => {
                DrawCommand { bb, shape: Shape::Rectangle, colour: WALL_COLOUR, tag: "undefined" }
            }
        })
    }

}

fn lookup(table: &'static [(&'static str, &'static str)], id: &'static str) -> Result<&'static str, DrawError> {
    table.iter()
        .find(|&&(entry, _)| entry == id)
        .map(|&(_, colour)| colour)
        .ok_or(DrawError::UnknownColour(id))
}


#[cfg(test)]
mod tests {

    use glam::Vec2;

    use ninedraft::block::Block;
    use ninedraft::item::Item;
    use ninedraft::thing::{DroppedItem, Mob, Player, Wall};

    use super::*;

    fn bb() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 32.0, 32.0)
    }

    #[test]
    fn blocks_use_the_colour_table() {
        let router = WorldViewRouter::default();
        let dirt = Thing::Block(Block::from_parts(&["dirt"]).unwrap());
        let command = router.draw(&dirt, bb()).unwrap();
        assert_eq!(command.shape, Shape::Rectangle);
        assert_eq!(command.colour, "#552015");
        assert_eq!(command.tag, "block");
    }

    #[test]
    fn mayhem_stage_overrides_the_table() {
        // "mayhem" has no entry in BLOCK_COLOURS, so this only renders
        // because the stage colours take priority.
        let router = WorldViewRouter::default();
        let mayhem = Thing::Block(Block::from_parts(&["mayhem", "1"]).unwrap());
        let command = router.draw(&mayhem, bb()).unwrap();
        assert_eq!(command.colour, MAYHEM_COLOURS[1]);
    }

    #[test]
    fn players_are_red_ovals() {
        let router = WorldViewRouter::default();
        let player = Thing::Player(Player::default());
        let command = router.draw(&player, bb()).unwrap();
        assert_eq!(command.shape, Shape::Oval);
        assert_eq!(command.colour, "red");
    }

    #[test]
    fn birds_are_diamonds_and_walls_are_black() {
        let router = WorldViewRouter::default();

        let bird = Thing::Mob(Mob::bird("friendly_bird", Vec2::new(12.0, 12.0)));
        let command = router.draw(&bird, bb()).unwrap();
        assert_eq!(command.shape, Shape::Diamond);
        assert_eq!(command.colour, "#87CEEB");

        let wall = Thing::Wall(Wall { id: "left" });
        let command = router.draw(&wall, bb()).unwrap();
        assert_eq!(command.colour, "black");
        assert_eq!(command.tag, "undefined");
    }

    #[test]
    fn missing_colours_are_fatal() {
        // An empty table cannot colour anything.
        let router = WorldViewRouter::new(&[], &[]);
        let dirt = Thing::Block(Block::from_parts(&["dirt"]).unwrap());
        assert_eq!(router.draw(&dirt, bb()), Err(DrawError::UnknownColour("dirt")));

        let apple = Thing::Item(DroppedItem::new(Item::from_parts(&["apple"]).unwrap()));
        assert!(router.draw(&apple, bb()).is_err());
    }

}
