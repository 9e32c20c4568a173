/// Utility modules
pub mod duration;
pub mod email_validator;
pub mod validation;

pub use duration::*;
pub use email_validator::*;
pub use validation::*;

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Current UTC time as an RFC 3339 string, the format every timestamp
/// column uses.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_rfc3339_parses_back() {
        let now = now_rfc3339();
        assert!(OffsetDateTime::parse(&now, &Rfc3339).is_ok());
    }
}
