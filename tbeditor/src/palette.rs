use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tbgraph_dot::Palette;

/// Key of the fallback color in palette files.
const DEFAULT_KEY: &str = "_default";

/// Read a palette from a JSON file.
///
/// The file contains an object that maps part-of-speech tags to
/// Graphviz colors, for example `{"NOUN": "red", "_default": "black"}`.
/// Tags that are not in the file keep their default colors.
pub fn read_palette(path: &Path) -> Result<Palette> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("cannot read palette {}", path.display()))?;
    parse_palette(&json).with_context(|| format!("invalid palette {}", path.display()))
}

fn parse_palette(json: &str) -> Result<Palette> {
    let mut colors: BTreeMap<String, String> = serde_json::from_str(json)?;

    let mut palette = Palette::default();
    if let Some(color) = colors.remove(DEFAULT_KEY) {
        palette = palette.with_default_color(color);
    }
    palette.extend(colors);

    Ok(palette)
}
