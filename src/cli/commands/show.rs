//! show command - Print an assembly as an indented tree

use std::path::Path;

use crate::engine::Context;
use crate::ui::render::render_tree;
use anyhow::Result;

/// Print the tree for `file`.
pub fn show(ctx: &Context, file: &Path) -> Result<()> {
    let config = super::load_config_for(ctx, file)?;
    let tree = super::load_tree(file, &config)?;
    print!("{}", render_tree(&tree, None));
    Ok(())
}
