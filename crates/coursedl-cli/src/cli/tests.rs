use super::*;
use std::path::PathBuf;

fn parse(args: &[&str]) -> Option<CliCommand> {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_no_subcommand() {
    assert!(parse(&["coursedl"]).is_none());
}

#[test]
fn cli_parse_download_defaults() {
    match parse(&["coursedl", "download"]) {
        Some(CliCommand::Download {
            lists,
            output,
            select,
        }) => {
            assert!(lists.is_none());
            assert!(output.is_none());
            assert!(select.is_none());
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_all_args() {
    match parse(&[
        "coursedl",
        "download",
        "--lists",
        "/data/planilhas",
        "--output",
        "/data/cursos",
        "--select",
        "1 3",
    ]) {
        Some(CliCommand::Download {
            lists,
            output,
            select,
        }) => {
            assert_eq!(lists, Some(PathBuf::from("/data/planilhas")));
            assert_eq!(output, Some(PathBuf::from("/data/cursos")));
            assert_eq!(select.as_deref(), Some("1 3"));
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_verify() {
    match parse(&["coursedl", "verify", "--root", "/data/cursos"]) {
        Some(CliCommand::Verify { root }) => {
            assert_eq!(root, Some(PathBuf::from("/data/cursos")))
        }
        _ => panic!("expected Verify"),
    }
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["coursedl", "status"]).is_err());
}
