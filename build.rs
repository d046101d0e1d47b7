fn main() {
    // Propagates the ESP-IDF sysroot into the build when esp-idf-sys is
    // in the graph; a no-op for host builds.
    embuild::espidf::sysenv::output();
}
