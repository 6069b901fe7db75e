//! Text preview of a finished dungeon, top row first.

use dungeon_core::{GeneratedDungeon, Pos, TileId};

const VOID: char = ' ';
const CORRIDOR: char = ':';
const WALL: char = '#';
const FLOOR: char = '.';
const DOOR: char = '+';

pub fn render_ascii(dungeon: &GeneratedDungeon, door: TileId) -> String {
    let bounds = dungeon.bounds;
    let mut out = String::with_capacity(bounds.cell_count() + bounds.height() as usize);
    for y in (bounds.min_y()..bounds.max_y()).rev() {
        for x in bounds.min_x()..bounds.max_x() {
            out.push(glyph_at(dungeon, Pos { y, x }, door));
        }
        out.push('\n');
    }
    out
}

fn glyph_at(dungeon: &GeneratedDungeon, pos: Pos, door: TileId) -> char {
    for room in &dungeon.rooms {
        match room.tile_at(pos) {
            Some(tile) if tile == door => return DOOR,
            Some(tile) if tile == room.wall_tile => return WALL,
            Some(_) => return FLOOR,
            None => {}
        }
    }
    if dungeon.corridor_layer.contains(pos) { CORRIDOR } else { VOID }
}
