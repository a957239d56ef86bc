use brandrank_core::Engine;

use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["brandrank-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Ping
        }
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["brandrank-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Migrate
        }
    ));
}

#[test]
fn missing_command_is_rejected() {
    assert!(Cli::try_parse_from(["brandrank-cli"]).is_err());
}

#[test]
fn track_bing_defaults() {
    let cli = Cli::try_parse_from(["brandrank-cli", "track", "bing"]).unwrap();
    let Commands::Track { command } = cli.command else {
        panic!("expected track command");
    };

    assert_eq!(command.engine(), Engine::Bing);
    let args = command.args();
    assert!(args.brand_id.is_none());
    assert!(!args.dry_run);
    assert!(!args.no_cache);
}

#[test]
fn track_google_with_flags() {
    let cli = Cli::try_parse_from([
        "brandrank-cli",
        "track",
        "google",
        "--brand-id",
        "42",
        "--dry-run",
        "--no-cache",
    ])
    .unwrap();
    let Commands::Track { command } = cli.command else {
        panic!("expected track command");
    };

    assert_eq!(command.engine(), Engine::Google);
    let args = command.args();
    assert_eq!(args.brand_id, Some(42));
    assert!(args.dry_run);
    assert!(args.no_cache);
}

#[test]
fn track_llm_maps_to_llm_engine() {
    let cli = Cli::try_parse_from(["brandrank-cli", "track", "llm"]).unwrap();
    let Commands::Track { command } = cli.command else {
        panic!("expected track command");
    };
    assert_eq!(command.engine(), Engine::Llm);
}

#[test]
fn track_rejects_unknown_engine() {
    assert!(Cli::try_parse_from(["brandrank-cli", "track", "yahoo"]).is_err());
}

#[test]
fn track_rejects_non_numeric_brand_id() {
    assert!(
        Cli::try_parse_from(["brandrank-cli", "track", "bing", "--brand-id", "acme"]).is_err()
    );
}

#[test]
fn runs_limit_defaults_to_twenty() {
    let cli = Cli::try_parse_from(["brandrank-cli", "runs"]).unwrap();
    assert!(matches!(cli.command, Commands::Runs { limit: 20 }));
}

#[test]
fn runs_accepts_custom_limit() {
    let cli = Cli::try_parse_from(["brandrank-cli", "runs", "--limit", "5"]).unwrap();
    assert!(matches!(cli.command, Commands::Runs { limit: 5 }));
}
