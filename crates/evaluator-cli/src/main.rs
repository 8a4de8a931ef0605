//! 평가 엔진 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 포지션 건강도
//! evaluator health snapshot.json
//!
//! # 회귀 모델 인증서 평가
//! evaluator certificate --kind regression REG_20240301.json
//!
//! # 분류 학습 인증서 평가 (고장 판정 포함)
//! evaluator classification CLS_20240301.json
//!
//! # MAE 오름차순 순위
//! evaluator rank --kind regression --order-by mae certificates.json
//!
//! # 설정 파일 지정
//! evaluator --config config/production.toml health snapshot.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use evaluator_cli::commands::{
    certificate::{run_certificate, run_classification},
    health::run_health,
    rank::run_rank,
    to_pretty_json, KindArg, OrderByArg,
};
use evaluator_core::{init_logging, AppConfig, LogConfig};

/// 기본 설정 파일 경로.
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Parser)]
#[command(name = "evaluator")]
#[command(about = "Position health and model certificate evaluator", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml, 없으면 내장 기본값)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 포지션 스냅샷의 건강도(HP) 계산
    Health {
        /// 스냅샷 JSON 파일
        input: PathBuf,
    },

    /// 모델 인증서 평가 (종류별 기본 템플릿)
    Certificate {
        /// 인증서 종류
        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// 인증서 JSON 파일
        input: PathBuf,
    },

    /// 분류 학습 인증서 평가 (고장 판정 포함)
    Classification {
        /// 인증서 JSON 파일
        input: PathBuf,
    },

    /// 인증서 순위 산출
    Rank {
        /// 인증서 종류
        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// 정렬 기준 지표
        #[arg(short, long, value_enum)]
        order_by: OrderByArg,

        /// 인증서 JSON 배열 파일
        input: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            AppConfig::load_default().context("Failed to load default config")?
        }
        None => AppConfig::default(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run(cli: Cli, config: &AppConfig) -> Result<String> {
    match cli.command {
        Commands::Health { input } => to_pretty_json(&run_health(config, &input)?),
        Commands::Certificate { kind, input } => {
            to_pretty_json(&run_certificate(config, kind.into(), &input)?)
        }
        Commands::Classification { input } => to_pretty_json(&run_classification(config, &input)?),
        Commands::Rank {
            kind,
            order_by,
            input,
        } => to_pretty_json(&run_rank(config, kind.into(), order_by.into(), &input)?),
    }
}

fn main() -> Result<()> {
    // .env 파일 로드 (없어도 무시)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging(LogConfig::from_app_config(&config.logging)?)
        .context("Failed to initialize logging")?;
    debug!(?config, "Configuration loaded");

    match run(cli, &config) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!("Evaluation failed: {e:#}");
            Err(e)
        }
    }
}
