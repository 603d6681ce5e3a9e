use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = text_encode_changer::cli::parse();
    app::run(args)
}
