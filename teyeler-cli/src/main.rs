//! Teyeler CLI - cut an image into a tile pyramid
//!
//! ```text
//! teyeler -i map.png -o tiles --shape 256 256 --threads 8
//! ```

mod args;
mod error;
mod progress;
mod run;

use clap::Parser;

use crate::args::Args;

fn main() {
    let args = Args::parse();
    if let Err(e) = run::run(&args) {
        e.exit();
    }
}
