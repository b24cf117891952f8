/// Compile-time settings forwarded to `option_env!` in `config.rs`.
const FORWARDED_VARS: [&str; 6] = [
    "WIFI_SSID",
    "WIFI_PASS",
    "WS_HOST",
    "WS_PORT",
    "WS_PATH",
    "PURIFIER_CONFIG",
];

fn main() {
    println!("cargo:rerun-if-changed=.env");

    // A missing .env is fine: defaults in config.rs apply.
    dotenvy::dotenv().ok();

    for var in FORWARDED_VARS {
        println!("cargo:rerun-if-env-changed={var}");
        if let Ok(value) = std::env::var(var) {
            println!("cargo:rustc-env={var}={value}");
        }
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
