//! # Auth Broker 主程序

use std::path::PathBuf;
use std::sync::Arc;

use auth_broker::{
    Result,
    app::AppContext,
    config::ConfigManager,
    lerror, linfo,
    logging::{self, LogComponent, LogStage},
    management::BrokerServer,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "auth-broker")]
#[command(about = "OAuth2 login broker for Kakao, Naver and Google", long_about = None)]
struct Args {
    /// 配置文件路径，缺省时按 AUTH_BROKER_CONFIG_PATH / RUST_ENV 查找
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// 默认日志级别（RUST_LOG 优先）
    #[arg(long)]
    log_level: Option<String>,

    /// 只校验配置后退出
    #[arg(long)]
    check: bool,

    /// 打印日志配置说明后退出
    #[arg(long)]
    logging_help: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.logging_help {
        logging::print_logging_help();
        return Ok(());
    }

    // 初始化日志系统
    logging::init_optimized_logging(args.log_level.as_ref());

    let config_manager = match &args.config {
        Some(path) => ConfigManager::from_file(path),
        None => ConfigManager::new(),
    }?;

    let context = match AppContext::from_config(config_manager.get_config()) {
        Ok(context) => Arc::new(context),
        Err(e) => {
            lerror!(
                "system",
                LogStage::Startup,
                LogComponent::Main,
                "config_invalid",
                &format!("配置无效: {e}"),
                path = config_manager.source_path().display()
            );
            return Err(e);
        }
    };

    if args.check {
        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::Main,
            "config_ok",
            "配置校验通过",
            path = config_manager.source_path().display()
        );
        return Ok(());
    }

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "service_starting",
        "服务启动"
    );
    BrokerServer::new(context).serve().await?;

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "service_shutdown",
        "服务正常关闭"
    );
    Ok(())
}
