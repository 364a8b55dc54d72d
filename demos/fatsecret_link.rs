//! Links a FatSecret profile from the terminal and prints this month's weights.
//!
//! ```sh
//! FATSECRET_API_CONSUMER_KEY=... FATSECRET_API_CONSUMER_SECRET=... \
//!     RUST_LOG=fatsecret_oauth1=debug cargo run --example fatsecret_link
//! ```

use std::io;

use fatsecret_oauth1::fatsecret::FatSecret;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api = FatSecret::from_env()?;

    // step 1: out-of-band callback, the provider shows the verifier to the user
    let request_token = api.oauth().request_token("oob").await?;

    // step 2: acquire user pin
    println!("please access to: {}", api.oauth().authorize_url(&request_token));
    println!("input pin: ");
    let mut user_input = String::new();
    io::stdin().read_line(&mut user_input)?;

    // step 3: acquire access token
    let access_token = api.oauth().access_token(&request_token, &user_input).await?;
    println!("linked, access token: {}", access_token.token);

    println!("{}", api.weights_get_month(&access_token).await?);
    Ok(())
}
