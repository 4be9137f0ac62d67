//! Verification report written next to a reconciled ledger.

use std::fmt::Write;
use std::path::Path;

use crate::ledger::MissingEntry;

/// Reconciliation result for one previously missing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRecord {
    pub label: String,
    pub verified: bool,
}

pub(super) fn render_report(
    module_name: &str,
    module_dir: &Path,
    missing: &[MissingEntry],
    records: &[VerificationRecord],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Módulo: {}", module_name);
    let _ = writeln!(out, "Diretório de Download: {}", module_dir.display());
    out.push('\n');

    out.push_str("Aulas não baixadas anteriormente:\n");
    for entry in missing {
        let _ = writeln!(out, "  - {}", entry.label);
    }

    out.push_str("\nVerificação:\n");
    for record in records {
        let status = if record.verified { "OK" } else { "OFF" };
        let _ = writeln!(out, "  - {}: {}", record.label, status);
    }

    let verified = records.iter().filter(|r| r.verified).count();
    let _ = writeln!(
        out,
        "\nAulas verificadas com sucesso: {} de {}",
        verified,
        missing.len()
    );
    out
}
