use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Booking slot dates travel as `d_m_yyyy` strings; times are opaque
/// time-of-day strings ("10:00 am"). Only shape is checked here.
pub fn is_valid_slot_date(slot_date: &str) -> bool {
    let parts: Vec<&str> = slot_date.split('_').collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        assert!(is_valid_email("patient@example.com"));
        assert!(is_valid_email("dr.jones+clinic@hospital.co.uk"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn slot_date_shape() {
        assert!(is_valid_slot_date("20_1_2026"));
        assert!(is_valid_slot_date("5_12_2025"));
        assert!(!is_valid_slot_date("2026-01-20"));
        assert!(!is_valid_slot_date("20_1"));
        assert!(!is_valid_slot_date("a_b_c"));
    }
}
