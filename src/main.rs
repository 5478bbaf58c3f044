use tocc_membership::startup::{self, StartupError};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    startup::run().await
}
