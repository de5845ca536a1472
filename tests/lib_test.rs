//! Library integration tests.

use pitfall::PitfallError;

#[test]
fn error_types_are_public() {
    let err = PitfallError::SupplementaryAnalysis {
        message: "timed out".into(),
    };
    assert!(err.to_string().contains("timed out"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> pitfall::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use pitfall::cli::{Cli, Commands};
    use pitfall::report::OutputFormat;

    let cli = Cli::parse_from(["pitfall", "analyze", "--format", "json", "--no-scan"]);

    if let Some(Commands::Analyze(args)) = cli.command {
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(args.input.no_scan);
    } else {
        panic!("Expected Analyze command");
    }
}

#[test]
fn analysis_result_schema_is_public() {
    let schema = pitfall::cli::commands::schema::analysis_schema().unwrap();
    let json: serde_json::Value = serde_json::from_str(&schema).unwrap();
    assert!(json["properties"]["conflicts"].is_object());
}
