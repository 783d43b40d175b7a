use cashout::application::workflow::{SubmitOutcome, WithdrawalWorkflow};
use cashout::infrastructure::console::{ConsoleNotificationSink, EchoGateway};
use cashout::infrastructure::in_memory::{
    InMemoryBalanceCatalog, InMemoryChannelCatalog, InMemoryFieldSchemaProvider,
};
use cashout::interfaces::json::session::{GatewayResponse, SessionEvent, SessionScript};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session script (JSON) to replay through the payout workflow
    script: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let file = File::open(&cli.script).into_diagnostic()?;
    let script = SessionScript::from_reader(file).into_diagnostic()?;

    let gateway = match &script.gateway {
        GatewayResponse::Accept { message } => EchoGateway::accepting(message.clone()),
        GatewayResponse::Reject { message } => EchoGateway::rejecting(message),
    };

    let mut workflow = WithdrawalWorkflow::new(
        Box::new(InMemoryBalanceCatalog::new(script.balances.clone())),
        Box::new(InMemoryChannelCatalog::new(script.channels.clone())),
        Box::new(InMemoryFieldSchemaProvider::new(script.field_schemas.clone())),
        Box::new(gateway),
        Box::new(ConsoleNotificationSink),
    );

    workflow.open(&script.source, script.amount).await.into_diagnostic()?;

    for event in &script.events {
        match event {
            SessionEvent::SelectChannel { channel } => {
                workflow.select_channel(channel).await.into_diagnostic()?;
                if let Some(channel) = workflow.selected_channel()
                    && let Some(fee) = channel.fee
                {
                    println!(
                        "A fee of ${fee} will be charged for this {} transaction.",
                        channel.name
                    );
                }
            }
            SessionEvent::Continue => {
                workflow.continue_to_fields().await.into_diagnostic()?;
            }
            SessionEvent::SetField { token, value } => workflow.edit_field(token, value.clone()),
            SessionEvent::ClearField { token } => workflow.clear_field(token),
            SessionEvent::Submit => {
                let outcome = workflow.submit().await.into_diagnostic()?;
                if outcome == SubmitOutcome::Invalid {
                    for (token, error) in workflow.field_errors() {
                        println!("{token}: {error}");
                    }
                }
            }
            SessionEvent::Close => workflow.close(),
        }
    }

    Ok(())
}
