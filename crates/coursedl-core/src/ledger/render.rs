//! Ledger text layout.

use std::fmt::Write;

use super::ModuleLedger;

pub(super) const MODULE_PREFIX: &str = "Módulo: ";
pub(super) const DIRECTORY_PREFIX: &str = "Diretório de Download: ";
pub(super) const SUCCEEDED_HEADER: &str = "Downloads concluídos:";
pub(super) const MISSING_HEADER_PREFIX: &str = "Aulas não baixadas: ";
pub(super) const POSITION_SEPARATOR: &str = ": Posição - ";
pub(super) const SOURCE_PREFIX: &str = "Caminho da Planilha: ";
pub(super) const ENTRY_PREFIX: &str = "  - ";
/// Written in place of a position that could not be recovered.
pub(super) const UNKNOWN_POSITION: &str = "desconhecida";
pub(super) const SECTION_RULE: &str =
    "-------------------------------------------------------------------------------------------------";

pub(super) fn render_ledger(ledger: &ModuleLedger) -> String {
    let mut out = String::new();
    let missing = ledger.missing_entries();
    let succeeded = ledger.succeeded_count();
    let total = ledger.total_jobs;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}{}", MODULE_PREFIX, ledger.module_name);
    let _ = writeln!(out, "{}{}", DIRECTORY_PREFIX, ledger.download_dir.display());
    out.push('\n');

    let _ = writeln!(out, "{}", SUCCEEDED_HEADER);
    for outcome in ledger.outcomes() {
        if let Some(attempt) = outcome.succeeded_attempt() {
            let _ = writeln!(out, "{}{} : Tentativa {}", ENTRY_PREFIX, outcome.label, attempt);
        }
    }
    let _ = writeln!(out, "\n{}", SECTION_RULE);

    let _ = writeln!(out, "{}{} de {}", MISSING_HEADER_PREFIX, missing.len(), total);
    for entry in &missing {
        let position = entry
            .source_position
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or(UNKNOWN_POSITION);
        let _ = writeln!(out, "{}{}{}{}", ENTRY_PREFIX, entry.label, POSITION_SEPARATOR, position);
    }
    let _ = writeln!(out, "\n{}", SECTION_RULE);

    let _ = writeln!(
        out,
        "Total de vídeos baixados com sucesso: {} de {}",
        succeeded, total
    );
    if succeeded == total {
        out.push_str("Download concluído com sucesso.\n");
    } else {
        out.push_str(
            "Houve erros durante o download. Verifique as mensagens acima para mais detalhes.\n",
        );
    }

    let _ = writeln!(out, "\n{}{}", SOURCE_PREFIX, ledger.source_path.display());
    out
}
