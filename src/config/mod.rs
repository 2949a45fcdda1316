// Command-line configuration

pub mod fixtures;

use clap::{Arg, ArgAction, ArgMatches};
use std::path::PathBuf;

const DEFAULT_DATABASE: &str = "sqlite:storefront.db";

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Seed {
        fixtures: Option<PathBuf>,
        migrate: bool,
    },
    Migrate,
    Verify {
        fixtures: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub action: Action,
}

fn fixtures_arg() -> Arg {
    Arg::new("fixtures")
        .short('f')
        .long("fixtures")
        .value_name("FIXTURES")
        .help("Path to a YAML fixture file (defaults to the built-in storefront fixtures)")
}

pub fn cli() -> clap::Command {
    clap::Command::new("storefront-seed")
        .about("Reset a storefront database to a known fixture state")
        .arg(
            Arg::new("database")
                .short('d')
                .long("database")
                .value_name("DATABASE")
                .env("DATABASE_URL")
                .global(true)
                .help("SQLite database URL or file path"),
        )
        .subcommand(
            clap::Command::new("seed")
                .about("Delete existing data and load the fixture set (default)")
                .arg(fixtures_arg())
                .arg(
                    Arg::new("migrate")
                        .long("migrate")
                        .action(ArgAction::SetTrue)
                        .help("Apply the bundled schema before seeding"),
                ),
        )
        .subcommand(clap::Command::new("migrate").about("Apply the bundled schema"))
        .subcommand(
            clap::Command::new("verify")
                .about("Compare table row counts against the fixture set")
                .arg(fixtures_arg()),
        )
}

// Accept both `sqlite:` URLs and bare file paths
pub fn normalize_database_url(raw: &str) -> String {
    if raw.starts_with("sqlite:") {
        raw.to_string()
    } else {
        format!("sqlite:{}", raw)
    }
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let database_url = matches
            .get_one::<String>("database")
            .map(|s| normalize_database_url(s))
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let fixtures_of = |m: &ArgMatches| m.get_one::<String>("fixtures").map(PathBuf::from);

        let action = match matches.subcommand() {
            Some(("migrate", _)) => Action::Migrate,
            Some(("verify", sub)) => Action::Verify {
                fixtures: fixtures_of(sub),
            },
            Some(("seed", sub)) => Action::Seed {
                fixtures: fixtures_of(sub),
                migrate: sub.get_flag("migrate"),
            },
            _ => Action::Seed {
                fixtures: None,
                migrate: false,
            },
        };

        Settings {
            database_url,
            action,
        }
    }

    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = cli().try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_no_subcommand_seeds() {
        let settings = Settings::from_args(["storefront-seed", "-d", "dev.db"]).unwrap();
        assert_eq!(settings.database_url, "sqlite:dev.db");
        assert_eq!(
            settings.action,
            Action::Seed {
                fixtures: None,
                migrate: false
            }
        );
    }

    #[test]
    fn test_seed_with_options() {
        let settings = Settings::from_args([
            "storefront-seed",
            "seed",
            "--migrate",
            "--fixtures",
            "demo.yml",
            "--database",
            "sqlite::memory:",
        ])
        .unwrap();

        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(
            settings.action,
            Action::Seed {
                fixtures: Some(PathBuf::from("demo.yml")),
                migrate: true
            }
        );
    }

    #[test]
    fn test_verify_and_migrate() {
        let verify = Settings::from_args(["storefront-seed", "-d", "x.db", "verify"]).unwrap();
        assert_eq!(verify.action, Action::Verify { fixtures: None });

        let migrate = Settings::from_args(["storefront-seed", "-d", "x.db", "migrate"]).unwrap();
        assert_eq!(migrate.action, Action::Migrate);
    }

    #[test]
    fn test_normalize_database_url() {
        assert_eq!(normalize_database_url("storefront.db"), "sqlite:storefront.db");
        assert_eq!(normalize_database_url("sqlite://data/app.db"), "sqlite://data/app.db");
    }
}
