//! Central command dispatcher to avoid duplicating the match-on-`Commands`
//! logic between the CLI entry point and any library API callers.

use crate::{cli::Commands, config::ConfigService, Result};
use std::sync::Arc;

/// Dispatches `command` against an owned, shared configuration service.
pub async fn dispatch_command(command: Commands, config_service: Arc<dyn ConfigService>) -> Result<()> {
    dispatch_command_with_ref(command, config_service.as_ref()).await
}

/// Dispatches `command` against a borrowed configuration service.
pub async fn dispatch_command_with_ref(command: Commands, config_service: &dyn ConfigService) -> Result<()> {
    match command {
        Commands::Dub(args) => crate::commands::dub_command::execute(args, config_service).await,
        Commands::Config(args) => crate::commands::config_command::execute(args, config_service).await,
        Commands::GenerateCompletion(args) => {
            let mut cmd = <crate::cli::Cli as clap::CommandFactory>::command();
            let cmd_name = cmd.get_name().to_string();
            let mut stdout = std::io::stdout();
            clap_complete::generate(args.shell, &mut cmd, cmd_name, &mut stdout);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ConfigAction, ConfigArgs};
    use crate::config::TestConfigService;

    #[tokio::test]
    async fn dispatch_config_list_does_not_error() {
        let config_service = TestConfigService::with_defaults();
        let args = ConfigArgs { action: ConfigAction::List };
        let result = dispatch_command_with_ref(Commands::Config(args), &config_service).await;
        assert!(result.is_ok());
    }
}
