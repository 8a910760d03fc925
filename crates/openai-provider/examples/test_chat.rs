//! Simple test for OpenAiProvider completion.
//!
//! Run with: cargo run -p openai-provider --example test_chat
//! Or with a custom model and message:
//!   cargo run -p openai-provider --example test_chat -- gpt-4o "Your message here"
//!
//! Make sure to set environment variables in .env:
//!   OPENAI_API_KEY - OpenAI API key for authentication

use openai_provider::{
    ChatMessage, CompletionProvider, CompletionRequest, ModelProfile, OpenAiProvider,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let model = args.get(1).cloned().unwrap_or_else(|| "gpt-4".to_string());
    let message_text = if args.len() > 2 {
        args[2..].join(" ")
    } else {
        "Hello! Please respond with a short greeting.".to_string()
    };

    println!("Initializing OpenAiProvider...");
    let provider = OpenAiProvider::from_env()?;
    let profile = ModelProfile::for_model(&model);

    println!("Provider initialized: {}", provider.name());
    println!("API URL: {}", provider.config().api_url);
    println!("Model: {} (family: {}, api: {:?})", model, profile.family, profile.api);
    println!();

    let request = CompletionRequest {
        model,
        messages: vec![ChatMessage::user(message_text)],
        max_output_tokens: 256,
        temperature: None,
    };

    println!("Waiting for response...\n");
    let completion = provider.complete(&request).await?;

    println!("=== Response ===");
    println!("{}", completion.text);
    println!("================");
    println!("finish_reason: {:?}", completion.finish_reason);

    Ok(())
}
