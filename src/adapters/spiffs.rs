//! SPIFFS mount (ESP-IDF only).
//!
//! The dashboard's static assets live in a SPIFFS partition mounted at
//! `/spiffs`, where the HTTP handler reads them with plain `std::fs`.

use esp_idf_svc::sys::{esp, esp_spiffs_info, esp_vfs_spiffs_conf_t, esp_vfs_spiffs_register};
use log::{info, warn};

use crate::Error;

const BASE_PATH: &core::ffi::CStr = c"/spiffs";

/// Mount the SPIFFS partition at `/spiffs`. The partition ships
/// pre-built with the dashboard, so a failed mount is not repaired by
/// formatting; the device keeps running without the dashboard.
pub fn mount() -> Result<(), Error> {
    let conf = esp_vfs_spiffs_conf_t {
        base_path: BASE_PATH.as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: false,
    };

    // SAFETY: conf and its base_path outlive the call; the VFS copies
    // what it keeps.
    esp!(unsafe { esp_vfs_spiffs_register(&conf) }).map_err(|e| {
        warn!("spiffs: mount failed ({e})");
        Error::Init("spiffs mount failed")
    })?;

    let mut total: usize = 0;
    let mut used: usize = 0;
    // SAFETY: null label selects the sole spiffs partition; out-pointers
    // are valid for the call.
    if esp!(unsafe { esp_spiffs_info(core::ptr::null(), &mut total, &mut used) }).is_ok() {
        info!("spiffs: mounted, {used}/{total} bytes used");
    }
    Ok(())
}
