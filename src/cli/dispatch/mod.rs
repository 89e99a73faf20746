use crate::cli::actions::Action;
use anyhow::{Context, Result};
use secrecy::SecretString;
use url::Url;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    Url::parse(&dsn).context("invalid database DSN")?;

    Ok(Action::Server {
        port,
        dsn: SecretString::from(dsn),
        api_enabled: matches.get_flag("auth-api"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::actions::Action;
    use secrecy::ExposeSecret;

    #[test]
    fn maps_matches_to_server_action() {
        temp_env::with_vars([("TESSERA_AUTH_API", None::<&str>)], || {
            let command = crate::cli::commands::new();
            let matches = command.get_matches_from(vec![
                "tessera",
                "--dsn",
                "postgres://user@localhost:5432/tessera",
                "--auth-api",
            ]);
            let action = handler(&matches).unwrap();
            let Action::Server {
                port,
                dsn,
                api_enabled,
            } = action;
            assert_eq!(port, 8080);
            assert_eq!(dsn.expose_secret(), "postgres://user@localhost:5432/tessera");
            assert!(api_enabled);
        });
    }

    #[test]
    fn rejects_a_dsn_that_is_not_a_url() {
        temp_env::with_vars([("TESSERA_AUTH_API", None::<&str>)], || {
            let command = crate::cli::commands::new();
            let matches = command.get_matches_from(vec!["tessera", "--dsn", "not a url"]);
            let result = handler(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err.to_string().contains("invalid database DSN"));
            }
        });
    }
}
