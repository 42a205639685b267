use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::sanitize::slugify;

fn base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Issues ids of the form `{parts...}-{millis_base36}{seq_base36}`.
///
/// The millisecond timestamp orders ids by creation. The sequence counter is
/// shared across all ids from one generator, so two ids issued in the same
/// millisecond still differ.
#[derive(Debug, Default)]
pub struct TemplateIdGenerator {
    sequence: AtomicU64,
}

impl TemplateIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, category: &str, subcategory: &str, style: &str) -> String {
        self.next_with_parts(&[category, subcategory, style])
    }

    pub fn next_with_parts(&self, parts: &[&str]) -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let prefix: Vec<String> = parts
            .iter()
            .map(|p| slugify(p))
            .filter(|p| !p.is_empty())
            .collect();
        format!("{}-{}{}", prefix.join("-"), base36(millis), base36(seq))
    }
}
