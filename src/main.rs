// Entrypoint for the record client.
// - Loads configuration, starts logging, builds the API client once and
//   hands it to the menu loop.

use record_cli::{api::ApiClient, config, logging, ui::main_menu};

fn main() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    let _guard = logging::init_logging(&cfg.logging)?;

    tracing::info!(
        version = %env!("CARGO_PKG_VERSION"),
        api = %cfg.api.base_url,
        "starting"
    );

    let api = ApiClient::new(&cfg.api)?;

    println!("=== Record API client ===");
    println!("Connected to {}", api.base_url());
    println!();

    // Blocks until the user exits.
    main_menu(&api, &cfg.bulk)?;
    tracing::info!("exiting");
    Ok(())
}
