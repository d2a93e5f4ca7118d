use serde::Serialize;
use std::net::IpAddr;

/// Outcome of a single probe invocation against one address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub present: bool,
    pub detail: String,
}

impl ProbeResult {
    pub fn present(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            present: true,
            detail: detail.into(),
        }
    }

    pub fn absent(name: &str) -> Self {
        Self {
            name: name.to_string(),
            present: false,
            detail: String::new(),
        }
    }
}

/// Final per-target record, produced exactly once by a scan task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    Scanned {
        target: String,
        address: IpAddr,
        results: Vec<ProbeResult>,
    },
    Unresolved {
        target: String,
    },
}

impl ScanOutcome {
    pub fn target(&self) -> &str {
        match self {
            ScanOutcome::Scanned { target, .. } => target,
            ScanOutcome::Unresolved { target } => target,
        }
    }

    pub fn has_any(&self) -> bool {
        match self {
            ScanOutcome::Scanned { results, .. } => !results.is_empty(),
            ScanOutcome::Unresolved { .. } => false,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, ScanOutcome::Unresolved { .. })
    }

    /// Whether the reporter should print a result line for this outcome
    pub fn is_reportable(&self) -> bool {
        self.has_any() || self.is_unresolved()
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub completed: usize,
    pub with_findings: usize,
    pub unresolved: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_has_any() {
        let empty = ScanOutcome::Scanned {
            target: "10.0.0.1".to_string(),
            address: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            results: vec![],
        };
        assert!(!empty.has_any());
        assert!(!empty.is_reportable());

        let found = ScanOutcome::Scanned {
            target: "10.0.0.1".to_string(),
            address: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            results: vec![ProbeResult::present("PING", "")],
        };
        assert!(found.has_any());
        assert!(found.is_reportable());
    }

    #[test]
    fn test_unresolved_is_reportable() {
        let outcome = ScanOutcome::Unresolved {
            target: "nope.invalid".to_string(),
        };
        assert!(!outcome.has_any());
        assert!(outcome.is_unresolved());
        assert!(outcome.is_reportable());
        assert_eq!(outcome.target(), "nope.invalid");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ScanOutcome::Scanned {
            target: "example".to_string(),
            address: IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7)),
            results: vec![ProbeResult::present("HTTP", "200 nginx")],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "scanned");
        assert_eq!(json["address"], "192.0.2.7");
        assert_eq!(json["results"][0]["name"], "HTTP");
        assert_eq!(json["results"][0]["detail"], "200 nginx");
    }
}
