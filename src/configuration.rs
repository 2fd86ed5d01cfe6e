use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub kafka: KafkaSettings,
    pub llm: LlmSettings,
    pub stt: SttSettings,
}

impl Settings {
    /// Rejects settings that would only fail later, once a worker is already running.
    ///
    /// Every URL-valued setting must carry an explicit HTTP(S) scheme.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        for (name, value) in [
            ("kafka.server", &self.kafka.server),
            ("llm.host", &self.llm.host),
            ("stt.url", &self.stt.url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(config::ConfigError::Message(format!(
                    "`{}` must be an http(s) URL, got: {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Fixed pause between poll attempts of each worker loop
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_delay_seconds: u64,
    /// How long one poll waits for messages before giving up on the cycle
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_timeout_ms: u64,
    /// How long the supervisor waits on each worker during shutdown
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub shutdown_grace_seconds: u64,
}

impl ApplicationSettings {
    pub fn poll_delay(&self) -> Duration {
        Duration::from_secs(self.poll_delay_seconds)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaSettings {
    /// Broker address, as an http(s) URL (the scheme is stripped before
    /// being handed to the Kafka client)
    pub server: String,
    pub group_id: String,
    pub consume_topics: TopicSettings,
    pub produce_topics: TopicSettings,
}

impl KafkaSettings {
    /// `bootstrap.servers` value for the Kafka client
    pub fn bootstrap_servers(&self) -> String {
        self.server
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string()
    }
}

/// One topic name per modality, used for both the consume and produce sides
#[derive(Debug, Deserialize, Clone)]
pub struct TopicSettings {
    pub audio: String,
    pub video: String,
    pub document: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmSettings {
    pub host: String,
    pub model: String,
    pub api_key: Option<Secret<String>>,
}

impl LlmSettings {
    /// Full URL of the OpenAI-compatible chat-completions endpoint
    pub fn chat_completions_endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.host.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SttSettings {
    pub url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_seconds: u64,
}

impl SttSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Extracts app settings from configuration files and env variables
///
/// `base.yml` should contain shared settings for all environments.
/// A specific env file should be created for each environment: `develop.yml`, `local.yml` and `production.yml`
/// The environment is set with the env var `APP_ENVIRONMENT`.
/// If `APP_ENVIRONMENT` is not set, `develop.yml` is the default.
///
/// Settings are also taken from environment variables: with a prefix of APP and '__' as separator
/// For ex: `APP_KAFKA__GROUP_ID=my-group` would set `Settings.kafka.group_id`
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // Detects the running environment.
    // Default to `develop` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "develop".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    let environment_filename = format!("{}.yml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Adds in settings from environment variables (with a prefix of APP and '__' as separator)
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

/// The possible runtime environment for our application.
pub enum Environment {
    Develop,
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Develop => "develop",
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "develop" => Ok(Self::Develop),
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `develop`, `local` or `production`.",
                other
            )),
        }
    }
}
