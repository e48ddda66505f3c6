fn main() {
    // Only the firmware build links against ESP-IDF; host builds (unit and
    // integration tests of the library) skip the sysenv propagation.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    for var in [
        "EMGWATCH_WIFI_SSID",
        "EMGWATCH_WIFI_PASS",
        "EMGWATCH_SERVER_URL",
        "EMGWATCH_DEVICE_ID",
    ] {
        println!("cargo:rerun-if-env-changed={var}");
    }
}
