#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib_interaction_host::init().await?;
    // The stdin reader thread would otherwise keep the runtime alive.
    std::process::exit(0);
}
