use crate::error::{DkapiError, Result};
use directories::BaseDirs;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const STATE_FILENAME: &str = ".digi-key_api_state.json";
pub const PARAMETRICS_FILENAME: &str = ".digi-key_api_parametrics.json";

pub const DEFAULT_SSO_HOST: &str = "https://sso.digikey.com";
pub const AUTHORIZE_PATH: &str = "/as/authorization.oauth2";
pub const TOKEN_PATH: &str = "/as/token.oauth2";
pub const DEFAULT_SEARCH_URL: &str = "https://api.digikey.com/services/basicsearch/v1/search";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const HOME_ENV: &str = "DKAPI_HOME";
pub const SSO_HOST_ENV: &str = "DKAPI_SSO_HOST";
pub const SEARCH_URL_ENV: &str = "DKAPI_SEARCH_URL";
pub const TIMEOUT_ENV: &str = "DKAPI_TIMEOUT_SECS";

/// Locations of the state file and the parametrics cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkapiPaths {
    pub state_file: PathBuf,
    pub parametrics_file: PathBuf,
}

impl DkapiPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            state_file: dir.join(STATE_FILENAME),
            parametrics_file: dir.join(PARAMETRICS_FILENAME),
        }
    }

    /// Both files live in the user's home directory unless `DKAPI_HOME`
    /// points elsewhere.
    pub fn resolve() -> Result<Self> {
        if let Some(dir) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::in_dir(PathBuf::from(dir)));
        }
        let base = BaseDirs::new()
            .ok_or_else(|| DkapiError::Api("Could not determine home directory".to_string()))?;
        Ok(Self::in_dir(base.home_dir()))
    }
}

/// Remote endpoints: the SSO host serving both the authorization and the
/// token paths, and the part search endpoint on the API host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    sso_host: Url,
    search_url: Url,
}

impl Endpoints {
    pub fn new(sso_host: &str, search_url: &str) -> Result<Self> {
        Ok(Self {
            sso_host: Url::parse(sso_host)?,
            search_url: Url::parse(search_url)?,
        })
    }

    pub fn from_env() -> Result<Self> {
        let sso = env::var(SSO_HOST_ENV).unwrap_or_else(|_| DEFAULT_SSO_HOST.to_string());
        let search = env::var(SEARCH_URL_ENV).unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string());
        Self::new(&sso, &search)
    }

    pub fn sso_host(&self) -> &Url {
        &self.sso_host
    }

    pub fn authorize_url(&self) -> Result<Url> {
        Ok(self.sso_host.join(AUTHORIZE_PATH)?)
    }

    pub fn token_url(&self) -> Result<Url> {
        Ok(self.sso_host.join(TOKEN_PATH)?)
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

/// Everything the binary needs before it touches the state file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: DkapiPaths,
    pub endpoints: Endpoints,
    pub timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let timeout = match env::var(TIMEOUT_ENV) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                DkapiError::Api(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            paths: DkapiPaths::resolve()?,
            endpoints: Endpoints::from_env()?,
            timeout: Duration::from_secs(timeout),
        })
    }
}
