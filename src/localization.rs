use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

const EN_RESOURCE: &str = include_str!("../locales/en/main.ftl");

/// Message catalog for the shop bot
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl std::fmt::Debug for LocalizationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationManager").finish_non_exhaustive()
    }
}

impl LocalizationManager {
    /// Create a localization manager with the bundled English messages
    pub fn new() -> Result<Self> {
        Self::from_source(EN_RESOURCE)
    }

    /// Create a localization manager from Fluent source text
    pub fn from_source(source: &str) -> Result<Self> {
        let locale: LanguageIdentifier = "en".parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Replies are plain text; bidi isolation marks would leak into them
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid message catalog: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate message keys: {errors:?}"))?;

        Ok(Self { bundle })
    }

    pub fn has_message(&self, key: &str) -> bool {
        self.bundle.has_message(key)
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&FluentArgs<'_>>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let mut errors = vec![];
        self.bundle
            .format_pattern(pattern, args, &mut errors)
            .into_owned()
    }

    /// Convenience function to get a message without arguments
    pub fn t(&self, key: &str) -> String {
        self.get_message(key, None)
    }

    /// Convenience function to get a message with string arguments
    pub fn t_args(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, FluentValue::from(value.clone()));
        }
        self.get_message(key, Some(&fluent_args))
    }
}
