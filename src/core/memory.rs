use log::info;

/// Resident set size of the current process in bytes, if the platform exposes it.
#[cfg(target_os = "linux")]
pub fn resident_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    // SAFETY: sysconf has no preconditions.
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size <= 0 {
        return None;
    }
    Some(pages * page_size as u64)
}

#[cfg(not(target_os = "linux"))]
pub fn resident_bytes() -> Option<u64> {
    None
}

pub fn log_memory_usage() {
    match resident_bytes() {
        Some(bytes) => info!("Memory usage: {:.2} MB", bytes as f64 / 1024.0 / 1024.0),
        None => info!("Memory usage: unavailable on this platform"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_resident_bytes_nonzero() {
        let bytes = resident_bytes().unwrap();
        assert!(bytes > 0);
    }
}
