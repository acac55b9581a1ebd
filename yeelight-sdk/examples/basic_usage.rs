//! Basic usage of the Yeelight SDK
//!
//! Refreshes one bulb, changes a few properties and prints the pushes it
//! sends back.
//!
//! Run with: cargo run -p yeelight-sdk --example basic_usage -- 192.168.1.40

use std::time::Duration;

use yeelight_sdk::logging::{init_logging, LoggingMode};
use yeelight_sdk::{BridgeConfig, LightRegistry, SdkError, Transition};

#[tokio::main]
async fn main() -> Result<(), SdkError> {
    init_logging(LoggingMode::Development).map_err(|e| SdkError::Configuration(e.to_string()))?;

    let Some(host) = std::env::args().nth(1) else {
        println!("Usage: basic_usage <light-ip>");
        return Ok(());
    };

    let registry = LightRegistry::new(BridgeConfig::default())?;
    let light = registry.add_light("demo", &host)?;

    let observer = light.on_push(|push| println!("push: {}", push.raw()));

    println!("Refreshing {}...", light.endpoint());
    light.refresh().await?;
    if let Some(snapshot) = light.snapshot() {
        let props = &snapshot.properties;
        println!(
            "power={} bright={} ct={} mode={:?} name={:?}",
            props.power, props.bright, props.ct, props.color_mode, props.name
        );
    }

    light.set_power(true).await?;
    light.fade_brightness(20, Transition::smooth(1000)).await?;
    light.set_color_temperature(2700).await?;

    // Out of range values are rejected without contacting the light
    if let Err(e) = light.set_brightness(150).await {
        println!("rejected locally: {e}");
    }

    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("stats: {:?}", light.stats());

    observer.stop();
    registry.shutdown().await;
    Ok(())
}
