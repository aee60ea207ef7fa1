use chrono::Utc;

/// Prefix used when the caller supplies none.
pub const DEFAULT_SKU_PREFIX: &str = "ITEM";

/// Suggest a SKU of the form `<PREFIX>-<base36 millis>`.
///
/// Two calls in the same millisecond produce the same value, so the result is
/// only a convenience default. Uniqueness is enforced by the item store.
pub fn generate_sku(prefix: &str) -> String {
    format_sku(prefix, Utc::now().timestamp_millis())
}

/// Deterministic core of [`generate_sku`].
pub fn format_sku(prefix: &str, millis: i64) -> String {
    format!(
        "{}-{}",
        normalize_prefix(prefix),
        to_base36(millis.unsigned_abs())
    )
}

fn normalize_prefix(prefix: &str) -> String {
    let clean: String = prefix
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if clean.is_empty() {
        DEFAULT_SKU_PREFIX.to_string()
    } else {
        clean
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
