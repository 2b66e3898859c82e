use std::fmt;

/// The class of an acquisition request.
///
/// Waiting `High` requests are always served before waiting `Low` ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    /// Interactive work which should jump the queue.
    High,
    /// Background work.
    #[default]
    Low,
}

impl Priority {
    /// Is this the `High` class?
    pub fn is_high(self) -> bool {
        self == Priority::High
    }
}

impl From<bool> for Priority {
    /// `true` means high priority.
    fn from(high_priority: bool) -> Priority {
        if high_priority {
            Priority::High
        } else {
            Priority::Low
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Priority::High => f.write_str("H"),
            Priority::Low => f.write_str("L"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(Priority::from(true), Priority::High);
        assert_eq!(Priority::from(false), Priority::Low);
        assert!(Priority::from(true).is_high());
        assert!(!Priority::default().is_high());
    }

    #[test]
    fn test_display() {
        let s: Vec<String> = [Priority::Low, Priority::High].iter().map(|p| p.to_string()).collect();
        assert_eq!(s.join(" "), "L H");
    }
}
