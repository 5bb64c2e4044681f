/// Returns the peak resident set size of this process in bytes, if the platform reports it.
///
/// On Linux this is the `VmHWM` line of `/proc/self/status`. The value is a process-wide
/// high-water mark; call [`reset_peak_resident_set`] first to measure a single run.
pub fn peak_resident_set_bytes() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        let status = std::fs::read_to_string("/proc/self/status").ok()?;
        parse_vm_hwm(&status)
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Lowers the high-water mark reported by [`peak_resident_set_bytes`] to the current resident
/// set size. Returns false if the platform does not allow it; the mark then keeps growing.
pub fn reset_peak_resident_set() -> bool {
    #[cfg(target_os = "linux")]
    {
        match std::fs::write("/proc/self/clear_refs", "5") {
            Ok(()) => true,
            Err(err) => {
                log::debug!("cannot reset peak memory: {err}");
                false
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_hwm(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmHWM:"))?;
    let mut parts = line["VmHWM:".len()..].split_whitespace();
    let value: u64 = parts.next()?.parse().ok()?;
    match parts.next() {
        Some("kB") | None => Some(value * 1024),
        Some(_) => None,
    }
}

pub fn bytes_to_mib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
