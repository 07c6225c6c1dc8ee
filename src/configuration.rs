use serde;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub app_port: u16,
    pub app_host: String,
    pub data_file: String,
    pub mirror_file: String,
    pub readme_file: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    pub github: GithubSettings,
    pub sync: SyncSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct GithubSettings {
    pub repo: String,
    pub branch: String,
    pub remote_path: String,
    pub api_url: String,
    #[serde(default)]
    pub token: String,
}

impl GithubSettings {
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.repo.is_empty()
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub database_url: Option<String>,
    pub table: String,
    pub strict: bool,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mut settings = config::Config::default();

    // Add configuration values from a file named `configuration`
    // with the .yaml extension
    settings.merge(config::File::with_name("configuration"))?; // .json, .toml, .yaml, .yml

    let mut config: Settings = settings.try_deserialize()?;

    // Secrets and per-deployment toggles come from the environment, never
    // from the checked-in file.
    if let Ok(token) = std::env::var("EDITOR_ACCESS_TOKEN") {
        if !token.is_empty() {
            config.access_token = Some(token);
        }
    }
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        config.github.token = token;
    }
    if let Ok(repo) = std::env::var("GITHUB_REPO") {
        config.github.repo = repo;
    }
    if let Ok(branch) = std::env::var("GITHUB_BRANCH") {
        if !branch.is_empty() {
            config.github.branch = branch;
        }
    }
    if let Ok(url) = std::env::var("SYNC_DATABASE_URL") {
        if !url.trim().is_empty() {
            config.sync.database_url = Some(url);
        }
    }
    if let Ok(table) = std::env::var("SYNC_TABLE") {
        if !table.is_empty() {
            config.sync.table = table;
        }
    }
    if let Ok(strict) = std::env::var("SYNC_STRICT") {
        config.sync.strict = matches!(strict.trim(), "1" | "true" | "yes");
    }

    Ok(config)
}
