/// settings - injected configuration with an explicit load/save boundary
use loan_repayment_rs::{EngineConfig, Money};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join("loan-repayment-settings.json");

    let config = EngineConfig::for_currency("KES", "KSh").with_utc_offset_minutes(180);
    config.save(&path)?;
    println!("saved settings to {}", path.display());

    let loaded = EngineConfig::load(&path)?;
    println!("{}", loaded.to_json()?);
    println!("sample: {}", Money::from_major(1_250_000).format(&loaded.currency));

    match EngineConfig::from_json(r#"{"currency": {"code": "", "symbol": "", "decimal_places": 2, "thousands_separator": null}}"#) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(e) => println!("rejected: {}", e),
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
