/// Seconds since the UNIX epoch, used to timestamp note updates.
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Seconds since the UNIX epoch, used to timestamp note updates.
#[cfg(target_arch = "wasm32")]
pub fn timestamp_secs() -> u64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| (perf.time_origin() + perf.now()) / 1000.0)
        .unwrap_or(0.0) as u64
}
