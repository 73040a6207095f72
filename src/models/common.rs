use serde::Serialize;

pub const TRUSTED_IMAGE_HOSTS: &[&str] = &[
    "cdn.skytells.ai",
    "skytells-ai.s3.us-east-1.amazonaws.com",
    "storage.skytells.ai",
    "api.skytells.ai",
    "skytells.ai",
    "localhost",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExamplePrompt {
    pub text: &'static str,
    pub category: &'static str,
}

pub const EXAMPLE_PROMPTS: &[ExamplePrompt] = &[
    ExamplePrompt {
        text: "A futuristic cityscape at sunset with flying cars",
        category: "Sci-fi",
    },
    ExamplePrompt {
        text: "A serene mountain lake surrounded by autumn trees",
        category: "Nature",
    },
    ExamplePrompt {
        text: "A cute robot playing with a cat in a living room",
        category: "Whimsical",
    },
    ExamplePrompt {
        text: "An astronaut riding a horse on Mars",
        category: "Surreal",
    },
];

pub fn is_trusted_image_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .map_or(false, |host| TRUSTED_IMAGE_HOSTS.contains(&host.as_str()))
}
