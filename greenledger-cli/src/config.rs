use anyhow::{Context, Result};
use greenledger_finance::EmissionMode;
use greenledger_ingest::{LineParser, NoiseFilter, ParseStrategy, StatementExtractor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Overrides `$HOME/.greenledger` when set and non-empty.
pub const HOME_ENV: &str = "GREENLEDGER_HOME";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserSection,
    pub noise: NoiseSection,
    pub emissions: EmissionsSection,
    pub budget: BudgetSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSection {
    /// Tried in order; first strategy that recovers a row wins
    pub strategies: Vec<ParseStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSection {
    /// Appended to the denylist
    pub extra_phrases: Vec<String>,
    /// Replaces the built-in denylist (one phrase per line, `#` comments)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrases_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionsSection {
    pub mode: EmissionMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSection {
    pub monthly_income: u32,
    /// category -> percent of income
    pub percentages: BTreeMap<String, u32>,
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            strategies: LineParser::default().strategies().to_vec(),
        }
    }
}

impl Default for BudgetSection {
    fn default() -> Self {
        let percentages = [
            ("Travel", 10),
            ("Food", 15),
            ("Shopping", 10),
            ("Housing", 30),
            ("Health", 8),
            ("Entertainment", 7),
            ("Education", 5),
            ("Finances", 12),
            ("Charity", 3),
        ]
        .into_iter()
        .map(|(c, p)| (c.to_string(), p))
        .collect();

        Self {
            monthly_income: 5000,
            percentages,
        }
    }
}

impl Config {
    pub fn line_parser(&self) -> LineParser {
        LineParser::new(self.parser.strategies.clone())
    }

    pub fn noise_filter(&self) -> Result<NoiseFilter> {
        let base = match &self.noise.phrases_file {
            Some(p) => {
                let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
                NoiseFilter::from_phrase_list(&s)
            }
            None => NoiseFilter::default(),
        };
        Ok(base.with_extra_phrases(&self.noise.extra_phrases))
    }

    pub fn extractor(&self) -> Result<StatementExtractor> {
        Ok(StatementExtractor::new(
            Arc::new(self.noise_filter()?),
            self.line_parser(),
        ))
    }
}

fn resolve_home(override_dir: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    match override_dir.filter(|d| !d.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => {
            let home = home.with_context(|| format!("neither {HOME_ENV} nor HOME is set"))?;
            Ok(PathBuf::from(home).join(".greenledger"))
        }
    }
}

pub fn greenledger_home() -> Result<PathBuf> {
    resolve_home(env::var_os(HOME_ENV), env::var_os("HOME"))
}

pub fn config_path() -> Result<PathBuf> {
    let dir = greenledger_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.join("config.toml"))
}

/// An explicit path must exist; the default location may be absent.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");

        init_config(Some(p.as_path())).unwrap();
        let cfg = load_config(Some(p.as_path())).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.line_parser(), LineParser::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(
            &p,
            r#"
[parser]
strategies = ["legacy-whitespace-split"]

[noise]
extra_phrases = ["Overdraft Protection"]

[emissions]
mode = "max"
"#,
        )
        .unwrap();

        let cfg = load_config(Some(p.as_path())).unwrap();
        assert_eq!(cfg.line_parser(), LineParser::legacy());
        assert_eq!(cfg.emissions.mode, EmissionMode::Max);
        assert_eq!(cfg.budget, BudgetSection::default());

        let noise = cfg.noise_filter().unwrap();
        assert!(noise.is_noise("06/30 Overdraft Protection 0.00 0.00"));
        assert!(noise.is_noise("1 of 3 Page of"));
    }

    #[test]
    fn test_phrases_file_replaces_builtin_list() {
        let dir = tempfile::tempdir().unwrap();
        let phrases = dir.path().join("noise.txt");
        fs::write(&phrases, "# custom\nStatement Period\n").unwrap();

        let cfg = Config {
            noise: NoiseSection {
                extra_phrases: vec![],
                phrases_file: Some(phrases),
            },
            ..Config::default()
        };
        let noise = cfg.noise_filter().unwrap();
        assert_eq!(noise.phrases(), ["statement period"]);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[parser]\nstrategies = [\"guess\"]\n").unwrap();
        assert!(load_config(Some(p.as_path())).is_err());
    }

    #[test]
    fn test_home_override_wins_over_home() {
        let resolved = resolve_home(Some("/srv/ledger".into()), Some("/home/jo".into())).unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/ledger"));

        let resolved = resolve_home(Some(OsString::new()), Some("/home/jo".into())).unwrap();
        assert_eq!(resolved, PathBuf::from("/home/jo/.greenledger"));

        assert!(resolve_home(None, None).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("absent.toml").as_path())).is_err());
    }
}
