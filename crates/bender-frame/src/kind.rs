//! Message keywords.
//!
//! The first token of a body selects the message shape.

/// Ground-fault status report from one unit.
pub const STATUS: &str = "BGF";

/// Analog input report.
pub const ANALOG: &str = "AIN";

/// Free-text fault message.
pub const FAULT: &str = "GFS";

/// Returns a human-readable name for a message keyword.
pub fn kind_name(keyword: &str) -> &'static str {
    match keyword {
        STATUS => "status",
        ANALOG => "analog",
        FAULT => "fault",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(kind_name("BGF"), "status");
        assert_eq!(kind_name("AIN"), "analog");
        assert_eq!(kind_name("GFS"), "fault");
        assert_eq!(kind_name("bgf"), "unknown");
    }
}
