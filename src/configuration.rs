use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub provider: ProviderSettings,
    pub api_keys: ApiKeys,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub output: OutputMode,
    pub model: String,
    pub gemini_base_url: String,
    pub search_base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Gemini,
    CustomSearch,
    Demo,
}

/// How the Gemini provider constrains the shape of its answer.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Schema,
    Prompt,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ApiKeys {
    pub gemini: Option<String>,
    pub search: Option<String>,
    pub search_engine_id: Option<String>,
}

impl ApiKeys {
    pub fn gemini(&self) -> Option<String> {
        non_empty(&self.gemini)
    }

    pub fn search(&self) -> Option<String> {
        non_empty(&self.search)
    }

    pub fn search_engine_id(&self) -> Option<String> {
        non_empty(&self.search_engine_id)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| config::ConfigError::Foreign(e.into()))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        // Conventional variable names win over everything else
        .set_override_option("api_keys.gemini", std::env::var("GEMINI_API_KEY").ok())?
        .set_override_option("api_keys.search", std::env::var("GOOGLE_API_KEY").ok())?
        .set_override_option(
            "api_keys.search_engine_id",
            std::env::var("GOOGLE_CSE_ID").ok(),
        )?
        .build()?;

    settings.try_deserialize::<Settings>()
}
