#[tokio::main]
async fn main() {
    if let Err(e) = issuelens::cli::run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
