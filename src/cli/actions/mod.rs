pub mod server;

use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: SecretString,
        api_enabled: bool,
    },
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the server fails to start.
    pub async fn execute(self) -> Result<()> {
        match self {
            Action::Server {
                port,
                dsn,
                api_enabled,
            } => server::execute(port, &dsn, api_enabled).await,
        }
    }
}
