fn main() {
    println!("cargo:rerun-if-env-changed=FIREALARM_CONFIG_JSON");

    // Only the ESP-IDF firmware build needs the IDF environment exported.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
