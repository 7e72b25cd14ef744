//! Library integration tests.

use assetgate::GateError;

#[test]
fn error_types_are_public() {
    let err = GateError::UnknownCommand {
        name: "upload".into(),
    };
    assert!(err.to_string().contains("upload"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> assetgate::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use assetgate::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["assetgate", "check", "--json"]);

    if let Commands::Check(args) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Check command");
    }
}
