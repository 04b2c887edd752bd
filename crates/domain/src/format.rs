//! Human-readable formatting helpers.

const UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const STEP: f64 = 1024.0;

/// Render a byte count with base-1024 units and two decimals, dropping
/// trailing zeros (`1536` → `"1.5 KB"`).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    format_with(bytes, 2)
}

#[allow(clippy::cast_precision_loss)]
fn format_with(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }

    let fixed = format!("{value:.decimals$}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    format!("{trimmed} {}", UNITS[unit])
}
