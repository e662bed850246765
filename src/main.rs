use clap::Parser;
use class_scanner::{handle_pipe_command, scan, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Handle commands
    match cli.command {
        Commands::Scan(args) => {
            // Run the scan
            match scan(args).await {
                Ok(result) => {
                    println!("Scan successful!");
                    println!("  - Processed {} files", result.total_files_processed);
                    println!("  - Extracted {} unique candidates", result.total_tokens);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Pipe(args) => {
            // Handle pipe mode
            handle_pipe_command(args).await?;
            Ok(())
        }
    }
}
