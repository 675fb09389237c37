mod canvas;
mod export;
mod models;
mod render;
mod text;
mod utils;

use crate::models::{OutputLayout, MASTER_SIZE};
use crate::utils::progress;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let layout = OutputLayout::assets();

    progress(&format!("Generating {MASTER_SIZE}x{MASTER_SIZE} master icon..."));
    let master = render::render(MASTER_SIZE);

    export::export(&master, &layout)?;

    progress(&format!("Done! Icons generated in {}", layout.root.display()));
    Ok(())
}
