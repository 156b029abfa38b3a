use clap::Parser;
use n8n_workflow::{cli, logging};

#[tokio::main]
async fn main() {
    // A missing .env is fine; explicit environment variables still apply.
    let _ = dotenvy::dotenv();

    let args = cli::Args::parse();
    let _logging = match logging::init(&args) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {:#}", err);
            None
        }
    };

    if let Err(err) = cli::run(args).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
