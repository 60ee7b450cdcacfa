use anyhow::Result;
use eln2smw::config::{Config, DEFAULT_CONFIG_FILE, ELABFTW_API_KEY_ENV, WIKI_PASSWORD_ENV};
use std::path::Path;

/// Write a commented default configuration into `path`
pub fn init_config(path: &Path) -> Result<()> {
    let config_path = path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    std::fs::create_dir_all(path)?;
    std::fs::write(&config_path, default_config_toml())?;
    println!("Created configuration file: {}", config_path.display());

    Ok(())
}

fn toml_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", quoted.join(", "))
}

fn default_config_toml() -> String {
    let config = Config::default();
    let mapping = &config.elabftw.mapping;

    format!(
        r#"# eln2smw Configuration

[main]
version = "{version}"

[wiki]
api_url = "{wiki_url}"
username = "{username}"
# password = "..."  (or set {password_env})
timeout_secs = {wiki_timeout}

[http]
listen_addr = "{listen_addr}"
# Clients must send one of these keys in the Authorization header
api_keys = []
cors_enabled = false

[logging]
format = "text"
level = "info"
# Daily log files YYYY-MM-DD.log, dated and rotated in UTC
dir = "log"

[elabftw]
api_url = "{elab_url}"
# api_key = "..."  (or set {api_key_env})
verify_tls = true
timeout_secs = {elab_timeout}
# Table parameters that are never copied into records
exclude = []

[elabftw.mapping]
person = {person}
specimen_description = {specimen_description}
date = {date}
experiment = {experiment}
"#,
        version = config.main.version,
        wiki_url = config.wiki.api_url,
        username = config.wiki.username,
        password_env = WIKI_PASSWORD_ENV,
        wiki_timeout = config.wiki.timeout_secs,
        listen_addr = config.http.listen_addr,
        elab_url = config.elabftw.api_url,
        api_key_env = ELABFTW_API_KEY_ENV,
        elab_timeout = config.elabftw.timeout_secs,
        person = toml_list(&mapping.person),
        specimen_description = toml_list(&mapping.specimen_description),
        date = toml_list(&mapping.date),
        experiment = toml_list(&mapping.experiment),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_config_loads_back() {
        let config = Config::from_toml(&default_config_toml()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.wiki.api_url, defaults.wiki.api_url);
        assert_eq!(config.http.listen_addr, defaults.http.listen_addr);
        assert_eq!(config.elabftw.mapping.person, defaults.elabftw.mapping.person);
        assert_eq!(
            config.elabftw.mapping.specimen_description,
            defaults.elabftw.mapping.specimen_description
        );
    }

    #[test]
    fn generated_config_explains_log_file_dates() {
        let toml = default_config_toml();
        let logging = &toml[toml.find("[logging]").unwrap()..toml.find("[elabftw]").unwrap()];
        assert!(logging.contains("YYYY-MM-DD.log, dated and rotated in UTC"));
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        init_config(tmp.path()).unwrap();
        assert!(tmp.path().join(DEFAULT_CONFIG_FILE).exists());
        assert!(init_config(tmp.path()).is_err());
    }
}
