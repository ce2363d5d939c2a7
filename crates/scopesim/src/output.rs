use std::io::IsTerminal;

use clap::ValueEnum;
use scopesim_proto::Response;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

pub fn print_response(response: &Response, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(response).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => match response {
            Response::StatusOk { code } => println!("status-ok code={code}"),
            Response::StatusErr { code } => println!("status-err code={code}"),
            Response::DevStatus(status) => println!("dev-status {status:?}"),
            Response::Profile(profile) => println!("profile {profile:?}"),
        },
    }
}
