//! Convert a Tiled JSON export to the text map or tileset format.
//!
//! ```text
//! cargo run --example tiled_convert -- map assets/town.json > town.map
//! cargo run --example tiled_convert -- tileset assets/world.json > world.tileset
//! ```

use anyhow::{bail, Context};
use macroquad_rpg_map::loader::tiled;
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(kind), Some(path)) = (args.next(), args.next()) else {
        bail!("usage: tiled_convert map|tileset <file.json>");
    };

    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let text = match kind.as_str() {
        "map" => tiled::map_from_json(&json),
        "tileset" => tiled::tileset_from_json(&json),
        other => bail!("unknown kind {}, expected map or tileset", other),
    }
    .with_context(|| format!("converting {}", path))?;

    std::io::stdout().write_all(text.as_bytes())?;

    Ok(())
}
