//! Layout report.

use std::fmt::{self, Write};

use dp_packet::{
    ActiveProfile, METADATA_LAYOUT_VERSION, PACKET_DESC_SIZE, PACKET_METADATA_SIZE, PlatformProfile, UDATA_SIZE,
    VIF_METADATA_SIZE, fixed_layout,
};

/// Renders the record layout of the active build profile.
pub fn render() -> Result<String, fmt::Error> {
    log::debug!("rendering layout for profile {}", ActiveProfile::NAME);

    let mut out = String::new();
    writeln!(out, "profile          {}", ActiveProfile::NAME)?;
    writeln!(out, "layout version   {}", METADATA_LAYOUT_VERSION)?;
    writeln!(out, "record offset    {} (after descriptor)", PACKET_DESC_SIZE)?;
    writeln!(out, "record size      {}", PACKET_METADATA_SIZE)?;
    writeln!(out, "fixed prefix     {}", VIF_METADATA_SIZE)?;
    writeln!(out, "opaque region    {} @ {}", UDATA_SIZE, VIF_METADATA_SIZE)?;
    writeln!(out)?;
    writeln!(out, "{:<10} {:>6} {:>4}", "field", "offset", "size")?;
    for field in fixed_layout() {
        writeln!(out, "{:<10} {:>6} {:>4}", field.name, field.offset, field.size)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_prefix_field() {
        let report = render().unwrap();
        for field in fixed_layout() {
            assert!(report.contains(field.name), "missing {}", field.name);
        }
        assert!(report.contains(ActiveProfile::NAME));
        assert!(report.contains(&format!("record size      {PACKET_METADATA_SIZE}")));
    }
}
