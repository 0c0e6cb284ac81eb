use crate::commands::encoder::EncodeOptions;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use toml_edit::{value, Array, DocumentMut};

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, i64);

impl ConfigSerializeDefault for Vec<String> {
    fn fix_config(self, name: &str, doc: &mut DocumentMut) {
        doc.entry(name)
            .or_insert_with(|| value(self.into_iter().collect::<Array>()));
    }
}

macro_rules! gen_config {
    (
        $( $(#[doc = $doc:literal])* $name:ident: $type:ty = $default:expr),*
    ) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct ServerConfig {
            $(
                $(#[doc = $doc])*
                pub $name: $type,
            )*
        }

        impl ServerConfig {
            /// Reads `config_file`, adds any missing keys with their defaults
            /// and writes the file back if it changed. A missing file is
            /// created.
            pub fn load(config_file: impl AsRef<Path>) -> anyhow::Result<ServerConfig> {
                let config_file = config_file.as_ref();
                let str = match fs::read_to_string(config_file) {
                    Ok(str) => str,
                    Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
                    Err(err) => {
                        return Err(err)
                            .with_context(|| format!("failed to read {}", config_file.display()))
                    }
                };
                let mut doc = str
                    .parse::<DocumentMut>()
                    .with_context(|| format!("failed to parse {}", config_file.display()))?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                let patched = doc.to_string();
                if str != patched {
                    fs::write(config_file, &patched)
                        .with_context(|| format!("failed to write {}", config_file.display()))?;
                }

                toml::from_str(&patched)
                    .with_context(|| format!("invalid configuration in {}", config_file.display()))
            }
        }
    };
}

gen_config! {
    /// Sent as the suggestions provider of arguments with custom suggestions.
    suggestions_provider: String = crate::commands::encoder::DEFAULT_SUGGESTIONS_PROVIDER.to_string(),
    max_string_length: i64 = crate::commands::encoder::DEFAULT_MAX_STRING_LENGTH as i64,
    log_directory: String = "./logs".to_string(),
    /// Granted to every player in addition to their own permissions.
    default_permissions: Vec<String> = Vec::new()
}

impl ServerConfig {
    pub fn encode_options(&self) -> anyhow::Result<EncodeOptions> {
        let max_string_length = usize::try_from(self.max_string_length).with_context(|| {
            format!(
                "max_string_length must not be negative, got {}",
                self.max_string_length
            )
        })?;
        Ok(EncodeOptions {
            suggestions_provider: self.suggestions_provider.clone(),
            max_string_length,
        })
    }
}
