//! Index validation report.

use std::fmt;

use dp_abi::{BridgeId, EgressTarget, IndexError, VifIndex, VrfIndex};

/// Parses a decimal or `0x`-prefixed hexadecimal value.
pub fn parse_u32(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid value '{s}': {e}"))
}

struct Line {
    field: &'static str,
    value: u32,
    outcome: Result<String, IndexError>,
}

/// Outcome of validating each supplied value.
pub struct Report {
    lines: Vec<Line>,
}

impl Report {
    pub fn new(vifs: &[u32], vrfs: &[u32], bridges: &[u32], out_ports: &[u32]) -> Self {
        let mut lines = Vec::new();

        for &value in vifs {
            let outcome = VifIndex::try_from(value).map(|v| v.to_string());
            lines.push(Line { field: "vif", value, outcome });
        }
        for &value in vrfs {
            let outcome = VrfIndex::try_from(value).map(|v| v.to_string());
            lines.push(Line { field: "vrf", value, outcome });
        }
        for &value in bridges {
            let outcome = BridgeId::try_from(value).map(|v| v.to_string());
            lines.push(Line { field: "bridge", value, outcome });
        }
        for &value in out_ports {
            let outcome = EgressTarget::from_wide(value).map(|t| t.to_string());
            lines.push(Line { field: "out_port", value, outcome });
        }

        for line in &lines {
            if let Err(e) = &line.outcome {
                log::debug!("{} {:#x}: {}", line.field, line.value, e);
            }
        }

        Self { lines }
    }

    pub fn failures(&self) -> usize {
        self.lines.iter().filter(|l| l.outcome.is_err()).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match &line.outcome {
                Ok(name) => writeln!(f, "ok    {:<8} {:<10} {}", line.field, line.value, name)?,
                Err(e) => writeln!(f, "FAIL  {:<8} {:<10} {}", line.field, line.value, e)?,
            }
        }
        Ok(())
    }
}
