use clap::Parser;
use toyc_drv::{run, Config};

fn main() {
    let config = Config::parse();
    std::process::exit(run(config));
}
