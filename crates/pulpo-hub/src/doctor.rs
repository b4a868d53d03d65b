use crate::config::Configuration;
use crate::store::Store;

fn set_or_not(value: bool) -> &'static str {
    if value { "set" } else { "not set" }
}

fn or_not_set(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("not set")
}

/// Print the resolved configuration. Secrets are only reported as set or
/// not set.
pub fn run() -> anyhow::Result<()> {
    let config = Configuration::create()?;
    let store = Store::new(&config.airtable);
    let airtable = &config.airtable;

    println!("Pulpo Doctor\n");
    println!("  Version: {}", env!("CARGO_PKG_VERSION"));
    println!("  Data Dir: {}", config.data_dir.display());
    println!("  Settings File: {}", config.settings_file.display());
    println!("  Listen: {}:{}", config.listen_host, config.listen_port);
    println!("  Public URL: {}", config.public_url);
    println!("  CORS Origins: {}", config.cors_origins.join(", "));
    println!(
        "  Secure Cookies: {}",
        if config.secure_cookies { "yes" } else { "no" }
    );
    println!("  App Password: {}", set_or_not(config.app_password.is_some()));

    println!("\n  Airtable:");
    println!("    API URL: {}", airtable.api_url);
    println!("    API Key: {}", set_or_not(airtable.api_key.is_some()));
    println!("    Inventory Base: {}", or_not_set(&airtable.inventory_base));
    println!("    Items Table: {}", or_not_set(&airtable.items_table));
    println!("    Tasks Base: {}", or_not_set(&airtable.tasks_base));
    println!("    Tasks Table: {}", or_not_set(&airtable.tasks_table));

    println!("\n  Tables:");
    for (table, ready) in store.status() {
        println!(
            "    {table}: {}",
            if ready { "ready" } else { "not configured" }
        );
    }

    Ok(())
}
