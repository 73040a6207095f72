use colored::Colorize;
use skygen::{
    client::{GenerateApi, HttpGenerateApi, PromptForm},
    logger, ClientConfig, Config, GenerationProxy, SkytellsClient, UiState, EXAMPLE_PROMPTS,
};
use std::{env, error::Error, process, sync::Arc};

const CMD_SERVE: &str = "serve";
const CMD_GENERATE: &str = "generate";
const CMD_EXAMPLES: &str = "examples";
const CMD_MODELS: &str = "models";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init()?;
    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        CMD_SERVE => serve().await,
        CMD_GENERATE => generate(&args[1..]).await,
        CMD_EXAMPLES => {
            for (index, example) in EXAMPLE_PROMPTS.iter().enumerate() {
                println!(
                    "  {} {:<10} {}",
                    index.to_string().bold(),
                    example.category.cyan(),
                    example.text
                );
            }
            Ok(())
        }
        CMD_MODELS => {
            let config = Config::from_env();
            println!(
                "{} ({})",
                config.skytells.model.bold().green(),
                config.skytells.base_url
            );
            Ok(())
        }
        "-h" | "--help" | "help" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("{} unknown command '{}'", "error:".red().bold(), other);
            print_help();
            process::exit(2);
        }
    }
}

#[cfg(feature = "server")]
async fn serve() -> Result<(), Box<dyn Error>> {
    skygen::server::run(Config::from_env()).await?;
    Ok(())
}

#[cfg(not(feature = "server"))]
async fn serve() -> Result<(), Box<dyn Error>> {
    Err("skygen was built without the `server` feature".into())
}

struct GenerateArgs {
    endpoint: Option<String>,
    example: Option<usize>,
    prompt: String,
}

fn parse_generate_args(args: &[String]) -> Result<GenerateArgs, String> {
    let mut endpoint = None;
    let mut example = None;
    let mut words = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--endpoint" => {
                endpoint = Some(iter.next().ok_or("--endpoint needs a URL")?.clone());
            }
            "--example" => {
                let value = iter.next().ok_or("--example needs an index")?;
                example = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid example index '{}'", value))?,
                );
            }
            _ => words.push(arg.as_str()),
        }
    }

    Ok(GenerateArgs {
        endpoint,
        example,
        prompt: words.join(" "),
    })
}

async fn generate(args: &[String]) -> Result<(), Box<dyn Error>> {
    let args = parse_generate_args(args)?;
    let mut client_config = ClientConfig::from_env();
    if let Some(endpoint) = args.endpoint.clone() {
        client_config = client_config.with_endpoint(endpoint);
    }

    let succeeded = match client_config.endpoint {
        Some(endpoint) => {
            log::info!("Using generation endpoint at {}", endpoint);
            submit(PromptForm::new(HttpGenerateApi::new(&endpoint)), &args).await?
        }
        None => {
            let config = Config::from_env();
            let client = SkytellsClient::new(config.skytells)?;
            submit(PromptForm::new(GenerationProxy::new(Arc::new(client))), &args).await?
        }
    };

    if !succeeded {
        process::exit(1);
    }
    Ok(())
}

async fn submit<A: GenerateApi>(
    mut form: PromptForm<A>,
    args: &GenerateArgs,
) -> Result<bool, Box<dyn Error>> {
    if let Some(index) = args.example {
        if !form.use_example(index) {
            return Err(format!(
                "no example prompt #{} (there are {})",
                index,
                EXAMPLE_PROMPTS.len()
            )
            .into());
        }
    } else {
        form.set_prompt(args.prompt.clone());
    }

    if form.can_submit() {
        println!("{} {}", "Generating...".magenta().bold(), form.prompt());
    }
    let state = form.submit().await;

    if let Some(validation) = &state.validation_error {
        eprintln!("{} {}", "error:".red().bold(), validation);
        return Ok(false);
    }

    match &state.status {
        UiState::Succeeded { image, .. } => {
            println!("{} {}", "Image:".green().bold(), image);
        }
        UiState::Failed { message, .. } => {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
        UiState::Idle | UiState::Generating => {}
    }

    println!("{}", "Response data".bold().underline());
    println!("{}", state.raw_panel());

    Ok(matches!(state.status, UiState::Succeeded { .. }))
}

fn print_help() {
    println!("{:━^60}", " SKYGEN ".yellow());
    println!("Usage:");
    println!("  {} <command> [arguments]", "skygen".bold().green());
    println!("\nCommands:");
    println!("  {}      Run the generation proxy (POST /api/generate).", "serve".bold().cyan());
    println!("  {}   Generate an image from a prompt.", "generate".bold().magenta());
    println!("  {}   List example prompts.", "examples".bold().blue());
    println!("  {}     Show the configured model.", "models".bold().blue());
    println!("\nGenerate options:");
    println!("  {}  Send to a running proxy instead of calling Skytells directly.", "--endpoint <url>".bold());
    println!("  {}     Use example prompt <n> from `skygen examples`.", "--example <n>".bold());
    println!("\nEnvironment:");
    println!("  SKYTELLS_API_KEY, SKYTELLS_MODEL, SKYTELLS_BASE_URL, SKYTELLS_TIMEOUT_SECS");
    println!("  HOST, PORT, SKYGEN_ENDPOINT, LOG_LEVEL, LOG_JSON, LOG_FILE");
    println!("\nExamples:");
    println!("  {} serve", "skygen".bold().green());
    println!("  {} generate An astronaut riding a horse on Mars", "skygen".bold().green());
    println!("  {} generate --example 2 --endpoint http://127.0.0.1:3000", "skygen".bold().green());
    println!("{:━^60}", "".yellow());
}
