const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Binary units, two decimals above bytes: `1536` -> `1.50 KB`.
    pub fn format_size(bytes: u64) -> String {
        let mut value = bytes as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit + 1 < UNITS.len() {
            value /= 1024.0;
            unit += 1;
        }

        match unit {
            0 => format!("{} {}", bytes, UNITS[0]),
            _ => format!("{:.2} {}", value, UNITS[unit]),
        }
    }

    /// Overlay listings may omit the size.
    pub fn format_optional(bytes: Option<u64>) -> String {
        bytes
            .map(Self::format_size)
            .unwrap_or_else(|| "size unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes() {
        assert_eq!(FileSizeUtils::format_size(512), "512 B");
        assert_eq!(FileSizeUtils::format_size(1536), "1.50 KB");
        assert_eq!(FileSizeUtils::format_size(250 * 1024 * 1024), "250.00 MB");
        assert_eq!(FileSizeUtils::format_optional(None), "size unknown");
    }
}
