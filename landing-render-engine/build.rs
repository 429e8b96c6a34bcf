// build.rs
use std::{env, fs, path::PathBuf};

const ENV_KEYS: [&str; 4] = [
    "LANDING_STORE_URL",
    "LANDING_STORE_ANON_KEY",
    "LANDING_ROTATION_SPEED",
    "LANDING_READY_TIMEOUT_MS",
];

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    for key in ENV_KEYS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    let mut config = serde_json::Map::new();
    if let Some(url) = non_empty("LANDING_STORE_URL") {
        config.insert("store_url".into(), url.into());
    }
    if let Some(key) = non_empty("LANDING_STORE_ANON_KEY") {
        config.insert("store_anon_key".into(), key.into());
    }
    if let Some(speed) = non_empty("LANDING_ROTATION_SPEED") {
        match speed.parse::<f64>() {
            Ok(speed) => {
                config.insert("rotation_speed".into(), speed.into());
            }
            Err(_) => println!("cargo:warning=Ignoring LANDING_ROTATION_SPEED={speed}"),
        }
    }
    if let Some(timeout) = non_empty("LANDING_READY_TIMEOUT_MS") {
        match timeout.parse::<u64>() {
            Ok(timeout) => {
                config.insert("ready_timeout_ms".into(), timeout.into());
            }
            Err(_) => println!("cargo:warning=Ignoring LANDING_READY_TIMEOUT_MS={timeout}"),
        }
    }

    let json_content = serde_json::to_string_pretty(&serde_json::Value::Object(config))?;

    // Written to OUT_DIR for include_str! in the engine.
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    fs::write(out_dir.join("landing_config.json"), &json_content)?;

    Ok(())
}
