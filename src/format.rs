//! Human readable numbers for labels and tooltips.

/// Format bytes with binary units, e.g. `1.50 GB` or `512 B`.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Compact size for dense object labels: `3.0MB`, `12.5KB`, `700B`.
///
/// A unit is only used once the value reaches twice that unit, so 1500
/// bytes stay `1500B` rather than `1.5KB`.
pub fn compact_size(bytes: u64) -> String {
    const RANKS: [(u64, &str); 3] = [(1024 * 1024 * 1024, "GB"), (1024 * 1024, "MB"), (1024, "KB")];

    for (unit, suffix) in RANKS {
        if bytes >= unit * 2 {
            return format!("{:.1}{}", bytes as f64 / unit as f64, suffix);
        }
    }
    format!("{}B", bytes)
}

/// Seconds with millisecond precision, e.g. `0.125s`.
pub fn seconds(value: f64) -> String {
    format!("{:.3}s", value)
}

/// A fraction in `0..=1` shown as a percentage, e.g. `12.34%`.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
