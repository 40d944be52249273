use anyhow::Context;
use huamodem::{build_modem, ModemConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Reads HUAMODEM_PASSWORD, HUAMODEM_ADDRESS, HUAMODEM_USERNAME from the
    // environment or a .env file
    let config = load_config().context("Failed to load modem configuration")?;
    tracing::info!(address = %config.address, username = %config.username, "Connecting to modem");

    let mut modem = build_modem(&config)?;
    modem.connect()?;
    modem.obtain_session_token().await?;
    modem.login(&config.username, config.password()).await?;

    let signal = modem.call_signal_parameters().await?;
    println!("Signal parameters:");
    println!("{}", serde_json::to_string_pretty(signal)?);

    match modem.call_device_info().await {
        Ok(info) => {
            println!("Device information:");
            println!("{}", serde_json::to_string_pretty(info)?);
        }
        Err(e) => {
            println!("Error fetching device information: {}", e);
        }
    }

    if let Err(e) = modem.logout().await {
        println!("Logout reported an error: {}", e);
    }
    modem.disconnect()?;

    Ok(())
}

#[cfg(feature = "env-file")]
fn load_config() -> Result<ModemConfig, huamodem::core::config::ConfigError> {
    ModemConfig::from_env_file("HUAMODEM")
}

#[cfg(not(feature = "env-file"))]
fn load_config() -> Result<ModemConfig, huamodem::core::config::ConfigError> {
    ModemConfig::from_env("HUAMODEM")
}
