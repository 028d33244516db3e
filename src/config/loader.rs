use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（后者覆盖前者）：
    /// 1. 开发环境默认值
    /// 2. ./owlet.toml
    /// 3. OWLET_ 前缀环境变量（OWLET_SERVER__PORT 等）
    pub fn load() -> Result<AppConfig, figment::Error> {
        let figment = Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file("owlet.toml"))
            .merge(Env::prefixed("OWLET_").split("__").global());

        figment.extract()
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        let figment = Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("OWLET_").split("__").global());

        figment.extract()
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.knowledge.chunk_size == 0
            || config.knowledge.chunk_overlap >= config.knowledge.chunk_size
        {
            return Err(ConfigValidationError::InvalidChunking);
        }

        if config.vector.dimension == 0 {
            return Err(ConfigValidationError::InvalidDimension);
        }

        if config.vector.top_k == 0 {
            return Err(ConfigValidationError::InvalidTopK);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("分块参数无效，重叠必须小于分块大小")]
    InvalidChunking,

    #[error("向量维度无效，必须大于 0")]
    InvalidDimension,

    #[error("检索数量无效，必须大于 0")]
    InvalidTopK,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("owlet.toml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config_is_valid() {
        let config = AppConfig::development();
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_chunking() {
        let mut config = AppConfig::development();
        config.knowledge.chunk_overlap = config.knowledge.chunk_size;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidChunking)
        ));
    }
}
