use clap::Parser;
use color_eyre::eyre::Result;

use ticktui::{
    app::App,
    cli::Cli,
    config::Config,
    store::SqliteStore,
    utils::{get_data_dir, initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = <Cli as Parser>::parse();

    let config = Config::new()?;

    let db_path = match args.db {
        Some(path) => path,
        None => {
            let data_dir = get_data_dir();
            std::fs::create_dir_all(&data_dir)?;
            data_dir.join("tickets.db")
        }
    };
    let store = SqliteStore::open(&db_path)?;
    log::info!("using database at {}", db_path.display());

    let mut app = App::new(config, args.tick_rate, args.frame_rate, Box::new(store))?;
    app.run().await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
