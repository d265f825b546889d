//! # 配置管理器
//!
//! 加载 TOML 配置文件并应用 `BROKER_` 前缀的环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::AppConfig;
use crate::error::{BrokerError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::provider::types::ProviderKind;
use crate::{ldebug, linfo, lwarn};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "AUTH_BROKER_CONFIG_PATH";

/// 环境变量覆盖前缀
pub const ENV_OVERRIDE_PREFIX: &str = "BROKER_";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 当前配置
    config: Arc<AppConfig>,
    /// 实际加载的配置文件
    source_path: PathBuf,
}

impl ConfigManager {
    /// 创建配置管理器
    ///
    /// 路径优先级：`AUTH_BROKER_CONFIG_PATH` > `config/config.{RUST_ENV}.toml`
    pub fn new() -> Result<Self> {
        Self::from_file(Self::resolve_config_path(|key| env::var(key).ok()))
    }

    /// 计算配置文件路径，`lookup` 用于读取环境变量
    pub fn resolve_config_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        lookup(CONFIG_PATH_ENV).map_or_else(
            || {
                let env = lookup("RUST_ENV").unwrap_or_else(|| "dev".to_string());
                PathBuf::from(format!("config/config.{env}.toml"))
            },
            PathBuf::from,
        )
    }

    /// 从指定文件创建配置管理器
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let mut config = Self::load_config_file(config_path)?;

        let env_overrides = Self::collect_env_overrides(env::vars());
        Self::apply_env_overrides(&mut config, &env_overrides)?;

        super::validate_config(&config)?;

        linfo!(
            "system",
            LogStage::Configuration,
            LogComponent::Config,
            "config_loaded",
            "配置管理器初始化完成",
            path = config_path.display(),
            env_overrides = env_overrides.len(),
        );

        Ok(Self {
            config: Arc::new(config),
            source_path: config_path.to_path_buf(),
        })
    }

    /// 获取当前配置
    #[must_use]
    pub fn get_config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    /// 配置文件路径
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// 加载配置文件
    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Err(BrokerError::config(format!("配置文件不存在: {}", path.display())));
        }

        let config_content = std::fs::read_to_string(path).map_err(|e| {
            BrokerError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&config_content).map_err(|e| {
            BrokerError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}, 详细错误: {e}", path.display()),
                e,
            )
        })
    }

    /// 构建环境变量覆盖映射
    ///
    /// 例如: `BROKER_SERVER_PORT` -> `server.port`
    pub fn collect_env_overrides(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> HashMap<String, String> {
        let overrides: HashMap<String, String> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_OVERRIDE_PREFIX)
                    .map(|config_key| (config_key.to_lowercase().replace('_', "."), value))
            })
            .collect();

        ldebug!(
            "system",
            LogStage::Configuration,
            LogComponent::Config,
            "collect_env_overrides",
            &format!("发现 {} 个环境变量覆盖", overrides.len())
        );
        overrides
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            let shown = if path.contains("secret") || path.contains("key") {
                "***"
            } else {
                value.as_str()
            };
            ldebug!(
                "system",
                LogStage::Configuration,
                LogComponent::Config,
                "apply_env_override",
                &format!("应用环境变量覆盖: {path} = {shown}")
            );

            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    /// 将单个覆盖应用到配置对象
    fn apply_override_to_config(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => config.server.host = value.to_string(),
            ["server", "port"] => config.server.port = parse_number(value, "端口号")?,
            ["frontend", "callback", "url"] => config.frontend.callback_url = value.to_string(),
            ["jwt", "secret"] => config.jwt.secret = value.to_string(),
            ["jwt", "expires", "in"] => config.jwt.expires_in = parse_number(value, "令牌有效期")?,
            ["oauth", "http", "timeout", "secs"] => {
                config.oauth.http_timeout_secs = parse_number(value, "HTTP超时")?;
            }
            ["oauth", "request", "deadline", "secs"] => {
                config.oauth.request_deadline_secs = parse_number(value, "登录截止时间")?;
            }
            ["providers", provider, field @ ..] => {
                let kind = ProviderKind::parse(provider).map_err(|e| {
                    BrokerError::config_with_source(format!("未知的提供商覆盖: {path}"), e)
                })?;
                let creds = config.providers.credentials_mut(kind);
                let value = value.to_string();
                match field.join("_").as_str() {
                    "client_id" | "rest_api_key" => creds.client_id = value,
                    "client_secret" => creds.client_secret = Some(value),
                    "redirect_uri" => creds.redirect_uri = value,
                    "authorization_uri" => creds.authorization_uri = Some(value),
                    "token_uri" => creds.token_uri = Some(value),
                    "user_info_uri" => creds.user_info_uri = Some(value),
                    _ => warn_unknown_path(path),
                }
            }
            _ => warn_unknown_path(path),
        }

        Ok(())
    }
}

fn parse_number<T>(value: &str, what: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .map_err(|e| BrokerError::config_with_source(format!("无效的{what}: {value}"), e))
}

fn warn_unknown_path(path: &str) {
    lwarn!(
        "system",
        LogStage::Configuration,
        LogComponent::Config,
        "unknown_env_override",
        &format!("未知的配置路径，忽略环境变量覆盖: {path}")
    );
}
