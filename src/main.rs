use citrate::cli::{parse_args, run_command, USAGE};
use citrate::error::CitrateError;

use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e @ CitrateError::Usage(_)) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = run_command(command).await {
        eprintln!("Hint: {}", e.recovery_hint());
        return Err(e.into());
    }

    Ok(())
}
