use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;

/// The viewer resolves its OBJ/MTL sources relative to the executable, so
/// `assets/` has to travel along with every build.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/*");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.exists() {
        // Nothing to ship (e.g. docs.rs builds).
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let mut options = CopyOptions::new();
    options.overwrite = true;
    copy_items(&[assets], &out_dir, &options)
        .with_context(|| format!("copying assets/ into {}", out_dir))?;

    Ok(())
}
