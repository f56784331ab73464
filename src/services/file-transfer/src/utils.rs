//! Utility functions for the file transfer service

/// Size formatting utilities
pub mod size {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];
    const STEP: u64 = 1024;

    /// Format bytes into a human-readable string.
    ///
    /// Uses binary steps, two decimals with trailing zeros dropped, and
    /// reports anything from 1024 GB upwards in GB.
    pub fn format_file_size(bytes: u64) -> String {
        if bytes == 0 {
            return "0 Bytes".to_string();
        }

        let mut unit_index = 0;
        let mut divisor = 1u64;
        while unit_index < UNITS.len() - 1 && bytes / divisor >= STEP {
            divisor *= STEP;
            unit_index += 1;
        }

        // Ties round up, so 1.125 KB reads 1.13 KB
        let rounded = (bytes as f64 / divisor as f64 * 100.0).round() / 100.0;
        let value = format!("{:.2}", rounded);
        let value = value.trim_end_matches('0').trim_end_matches('.');

        format!("{} {}", value, UNITS[unit_index])
    }
}

/// Time utilities
pub mod time {
    use chrono::{DateTime, Local};

    /// Label shown next to an upload, in server local time
    pub fn upload_time_label(at: DateTime<Local>) -> String {
        at.format("%Y/%-m/%-d %H:%M:%S").to_string()
    }

    pub fn current_upload_time_label() -> String {
        upload_time_label(Local::now())
    }
}

/// Identifier utilities
pub mod id {
    use rand::{distributions::Uniform, Rng};

    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    const SUFFIX_LEN: usize = 9;

    /// Generate a record id: unix milliseconds, a dash, 9 random base36 chars.
    ///
    /// Uniqueness is probabilistic.
    pub fn generate_file_id() -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: String = rand::thread_rng()
            .sample_iter(Uniform::from(0..BASE36.len()))
            .take(SUFFIX_LEN)
            .map(|i| char::from(BASE36[i]))
            .collect();

        format!("{}-{}", millis, suffix)
    }
}

/// Download path utilities
pub mod path {
    /// URL prefix under which the storage directory is served
    pub const DOWNLOAD_PREFIX: &str = "/downloads";

    /// Marks a URI component may carry unescaped besides `-_.~`
    const COMPONENT_MARKS: &[char] = &['!', '\'', '(', ')', '*'];

    /// Percent-encode a stored name as a URI component.
    ///
    /// Unreserved marks such as the parentheses of a collision suffix stay
    /// literal, so `a(1).txt` maps to `/downloads/a(1).txt`.
    pub fn download_path(stored_name: &str) -> String {
        let mut encoded = String::with_capacity(stored_name.len());
        let mut buf = [0u8; 4];
        for ch in stored_name.chars() {
            if COMPONENT_MARKS.contains(&ch) {
                encoded.push(ch);
            } else {
                encoded.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
            }
        }

        format!("{}/{}", DOWNLOAD_PREFIX, encoded)
    }
}
