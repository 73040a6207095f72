use crate::{
    client::{
        state::{reduce, Effect, FormEvent, FormState},
        GenerateApi,
    },
    logger,
    models::{is_trusted_image_url, EXAMPLE_PROMPTS},
};

pub struct PromptForm<A> {
    api: A,
    prompt: String,
    state: FormState,
}

impl<A: GenerateApi> PromptForm<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            prompt: String::new(),
            state: FormState::default(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn use_example(&mut self, index: usize) -> bool {
        match EXAMPLE_PROMPTS.get(index) {
            Some(example) => {
                self.prompt = example.text.to_string();
                true
            }
            None => false,
        }
    }

    /// Mirrors the disabled state of the submit button.
    pub fn can_submit(&self) -> bool {
        !self.state.is_generating() && !self.prompt.trim().is_empty()
    }

    pub async fn submit(&mut self) -> &FormState {
        let effect = self.apply(FormEvent::Submit(self.prompt.clone()));

        if let Some(Effect::Dispatch(request)) = effect {
            let mut timer = logger::timer("generate image");
            let event = match self.api.generate(&request).await {
                Ok(reply) => {
                    timer.stop();
                    FormEvent::Responded(reply)
                }
                Err(e) => {
                    timer.fail(&e);
                    log::error!("Error generating image: {}", e);
                    FormEvent::TransportFailed(e.detail())
                }
            };
            self.apply(event);
        }

        if let Some(image) = self.state.image() {
            if !is_trusted_image_url(image) {
                log::warn!("Image served from an unrecognised host: {}", image);
            }
        }

        &self.state
    }

    fn apply(&mut self, event: FormEvent) -> Option<Effect> {
        let (next, effect) = reduce(std::mem::take(&mut self.state), event);
        self.state = next;
        effect
    }
}
