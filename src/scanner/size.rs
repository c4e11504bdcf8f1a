/// Format size in human-readable format.
///
/// Base-1024 units from B to TB, value rounded to two decimals with trailing
/// zeros dropped: `1536` renders as `"1.5 KB"`, `1024` as `"1 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    // floor(log1024(bytes)) without floating point drift at exact powers
    let mut unit_idx = 0;
    while unit_idx < UNITS.len() - 1 && bytes >= 1024u64.pow(unit_idx as u32 + 1) {
        unit_idx += 1;
    }

    let scaled = bytes as f64 / 1024f64.powi(unit_idx as i32);
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[unit_idx])
}
